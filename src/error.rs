use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// A quoted identifier, string literal, or dollar-quoted literal was
    /// opened but never properly closed, or its quote-parity check failed.
    #[error("unterminated or malformed {construct} starting at byte {offset}")]
    UnterminatedLiteral {
        construct: &'static str,
        offset: usize,
    },

    /// A block comment (possibly nested) was never closed.
    #[error("unterminated block comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    /// The tag of a dollar-quoted literal began with a digit.
    #[error("malformed dollar-quote tag starting at byte {offset}")]
    MalformedDollarTag { offset: usize },

    /// The scanner could not make progress. Unreachable given the
    /// single-character fallback rule; kept as a safety net.
    #[error("query rewrite failed: {0}")]
    Parse(String),
}

/// Result type for rewrite operations
pub type Result<T> = std::result::Result<T, RewriteError>;
