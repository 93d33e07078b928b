//! The rewrite entry points: classify, then fold segments into output bytes.

use compact_str::CompactString;

use crate::error::Result;
use crate::segment::Segment;
use crate::{Dialect, scanner, trace_rewrite};

/// Rewrites `?` placeholders into PostgreSQL numbered parameters.
///
/// Placeholders inside string literals, quoted identifiers, dollar-quoted
/// literals, and comments are left untouched. All other content passes
/// through byte-for-byte. Returns the rewritten query as UTF-8 bytes, ready
/// for the wire layer.
///
/// # Examples
///
/// ```
/// let out = pgparams::rewrite("select * from t where a = ? and b = ?").unwrap();
/// assert_eq!(out, b"select * from t where a = $1 and b = $2");
/// ```
pub fn rewrite(query: &str) -> Result<Vec<u8>> {
    rewrite_for(query, Dialect::PostgreSQL)
}

/// Rewrites `?` placeholders using the given dialect's parameter syntax.
///
/// For `?`-marker dialects (SQLite, MySQL) the markers re-emit verbatim,
/// but classification still runs in full: malformed literals and comments
/// are rejected the same way for every dialect.
pub fn rewrite_for(query: &str, dialect: Dialect) -> Result<Vec<u8>> {
    let segments = scanner::scan(query)?;

    // Numbered references add a few bytes per placeholder over the input.
    let mut buf = CompactString::with_capacity(query.len() + 8);
    let mut index = 1usize;
    for segment in &segments {
        match segment {
            Segment::Text(s) | Segment::Literal(s) => buf.push_str(s),
            Segment::Placeholder => {
                buf.push_str(&dialect.render_placeholder(index));
                index += 1;
            }
        }
    }

    trace_rewrite!(query.len(), index - 1);
    Ok(String::from(buf).into_bytes())
}
