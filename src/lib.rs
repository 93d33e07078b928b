//! Positional-placeholder rewriting for PostgreSQL-bound SQL.
//!
//! Drivers that accept client-style `?` markers need them converted to the
//! server's numbered `$1, $2, ...` syntax before prepare time. The catch is
//! that `?` (and the delimiters around it) may also appear inside string
//! literals, quoted identifiers, dollar-quoted literals, and comments, where
//! it must pass through untouched. This crate does exactly that conversion:
//! a single pass classifies the input into inert and live spans, then a fold
//! substitutes each live marker with the next numbered reference.
//!
//! ```
//! let out = pgparams::rewrite("select '?' from t where id = ?").unwrap();
//! assert_eq!(out, b"select '?' from t where id = $1");
//! ```
//!
//! The transformation is pure and allocation-bounded: no SQL validation, no
//! state across calls, safe to run from any number of threads at once.

pub mod dialect;
pub mod error;
pub mod rewrite;
pub mod scanner;
pub mod segment;
pub mod tracing;

pub use dialect::Dialect;
pub use error::{Result, RewriteError};
pub use rewrite::{rewrite, rewrite_for};
pub use scanner::{Cursor, Segments, scan};
pub use segment::{Query, Segment};
