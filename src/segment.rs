use crate::{Dialect, error::Result};

/// A classified span of the input query.
///
/// The scanner covers the input with segments exactly once, left to right,
/// with no gaps and no overlaps. The renderer's fold is exhaustive over
/// these three shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary SQL text, copied through verbatim.
    Text(&'a str),
    /// An inert span (quoted literal, identifier, comment, or a single
    /// character claimed by the fallback rule). Copied through verbatim;
    /// never scanned for placeholders.
    Literal(&'a str),
    /// A free-standing `?` marker, replaced by the next numbered reference.
    Placeholder,
}

impl<'a> Segment<'a> {
    /// The verbatim content of this segment, or `None` for a placeholder.
    #[inline]
    #[must_use]
    pub const fn content(&self) -> Option<&'a str> {
        match self {
            Segment::Text(s) | Segment::Literal(s) => Some(s),
            Segment::Placeholder => None,
        }
    }
}

/// An immutable view of one SQL query to be rewritten.
///
/// Thin wrapper so call sites read `Query::new(sql).rewrite()`; it owns
/// nothing and holds no state across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query<'a>(&'a str);

impl<'a> Query<'a> {
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Query(text)
    }

    /// The raw query text.
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Rewrites this query for PostgreSQL. See [`crate::rewrite`].
    pub fn rewrite(&self) -> Result<Vec<u8>> {
        crate::rewrite(self.0)
    }

    /// Rewrites this query for the given dialect. See [`crate::rewrite_for`].
    pub fn rewrite_for(&self, dialect: Dialect) -> Result<Vec<u8>> {
        crate::rewrite_for(self.0, dialect)
    }
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(s: &'a str) -> Self {
        Query::new(s)
    }
}
