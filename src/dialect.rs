//! Target dialect for placeholder rendering.
//!
//! Classification of the input is dialect-independent; only the rendering of
//! a placeholder reference depends on the dialect chosen here.

use core::fmt;
use std::borrow::Cow;

/// SQL dialect selecting the positional-parameter syntax of the output.
///
/// # Examples
///
/// ```
/// use pgparams::Dialect;
///
/// let dialect = Dialect::PostgreSQL;
/// assert!(dialect.uses_numbered_placeholders());
///
/// let sqlite = Dialect::SQLite;
/// assert!(!sqlite.uses_numbered_placeholders());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// PostgreSQL - `$1, $2, ...` numbered placeholders
    #[default]
    PostgreSQL,

    /// SQLite - `?` positional placeholders
    SQLite,

    /// MySQL - `?` positional placeholders
    MySQL,
}

impl Dialect {
    /// Returns `true` if this dialect uses numbered placeholders (`$1, $2, ...`).
    #[inline]
    #[must_use]
    pub const fn uses_numbered_placeholders(&self) -> bool {
        matches!(self, Dialect::PostgreSQL)
    }

    /// Renders a placeholder reference for this dialect with the given
    /// 1-based index.
    ///
    /// Returns `Cow::Borrowed("?")` for SQLite/MySQL (zero allocation),
    /// `Cow::Owned` for PostgreSQL numbered placeholders.
    #[inline]
    #[must_use]
    pub fn render_placeholder(&self, index: usize) -> Cow<'static, str> {
        match self {
            Dialect::PostgreSQL => Cow::Owned(format!("${}", index)),
            Dialect::SQLite | Dialect::MySQL => Cow::Borrowed("?"),
        }
    }

    /// Parse a dialect from a string (case-insensitive).
    ///
    /// Supports common aliases: `"postgresql"`, `"postgres"`, `"pg"`;
    /// `"sqlite"`; `"mysql"`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("postgresql")
            || s.eq_ignore_ascii_case("postgres")
            || s.eq_ignore_ascii_case("pg")
        {
            Some(Dialect::PostgreSQL)
        } else if s.eq_ignore_ascii_case("sqlite") {
            Some(Dialect::SQLite)
        } else if s.eq_ignore_ascii_case("mysql") {
            Some(Dialect::MySQL)
        } else {
            None
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::SQLite => write!(f, "sqlite"),
            Dialect::MySQL => write!(f, "mysql"),
        }
    }
}
