use thiserror::Error;

/// Canonical result for the execution core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("field not found: {0}")]
    FieldNotFound(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error("value {value} outside histogram range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },

    #[error("empty input relation for {0}")]
    EmptyInput(&'static str),

    #[error("unsupported field type: {0}")]
    UnsupportedType(String),

    #[error("unsupported predicate: {0}")]
    UnsupportedPredicate(String),
}
