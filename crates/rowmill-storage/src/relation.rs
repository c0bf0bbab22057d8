//! The relation seam: forward-only cursor scans plus tuple append.
//!
//! Multiple independent cursors over one relation may coexist, and
//! inserting into an output relation never touches a different input
//! relation's cursors. The operators never mutate a relation they are
//! scanning.

use rowmill_core::error::Result;
use rowmill_core::schema::Schema;
use rowmill_core::tuple::Tuple;

pub trait Relation {
    /// Position marker over this relation's tuples. Cloning a cursor
    /// yields an independent scan position.
    type Cursor: Clone;

    fn schema(&self) -> &Schema;

    /// Cursor at the first tuple (already at end for an empty relation).
    fn begin(&self) -> Self::Cursor;

    fn is_end(&self, cursor: &Self::Cursor) -> bool;

    fn advance(&self, cursor: &mut Self::Cursor);

    /// Materialize the tuple under the cursor. Must not be called at end.
    fn tuple(&self, cursor: &Self::Cursor) -> Tuple;

    /// Append one tuple.
    fn insert(&mut self, tuple: Tuple) -> Result<()>;

    /// Forward iterator over materialized tuples; each call starts a
    /// fresh, independent scan.
    fn scan(&self) -> Scan<'_, Self>
    where
        Self: Sized,
    {
        Scan {
            relation: self,
            cursor: self.begin(),
        }
    }

    fn is_empty(&self) -> bool {
        self.is_end(&self.begin())
    }
}

pub struct Scan<'a, R: Relation> {
    relation: &'a R,
    cursor: R::Cursor,
}

impl<R: Relation> Iterator for Scan<'_, R> {
    type Item = Tuple;

    fn next(&mut self) -> Option<Tuple> {
        if self.relation.is_end(&self.cursor) {
            return None;
        }
        let tuple = self.relation.tuple(&self.cursor);
        self.relation.advance(&mut self.cursor);
        Some(tuple)
    }
}
