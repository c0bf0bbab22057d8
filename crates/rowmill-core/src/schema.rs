//! Logical schema types. Pure data; operators synthesize these for
//! their output relations.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Float,
    Str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered (name, type) list describing a tuple's shape. Names need not
/// be unique in general; schemas synthesized by projection and join are
/// unique by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    /// Position of the first field with this exact name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Int),
            Field::new("name", DataType::Str),
            Field::new("age", DataType::Int),
        ])
    }

    #[test]
    fn index_of_finds_first_match() {
        let schema = people();
        assert_eq!(schema.index_of("age"), Some(2));
        assert_eq!(schema.index_of("missing"), None);

        let dup = Schema::new(vec![
            Field::new("x", DataType::Int),
            Field::new("x", DataType::Float),
        ]);
        assert_eq!(dup.index_of("x"), Some(0));
    }

    #[test]
    fn schema_json_shape() {
        let json = serde_json::to_string(&people()).unwrap();
        assert!(json.contains("\"name\":\"age\""));
        assert!(json.contains("\"data_type\":\"Int\""));
    }
}
