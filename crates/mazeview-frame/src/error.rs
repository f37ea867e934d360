/// Reasons a single cell token is rejected.
///
/// Every variant is recoverable: the parser logs it, skips the token, and
/// continues with the rest of the frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// No opening `[` for the given coordinate.
    #[error("missing '[' before {0}")]
    MissingBracket(&'static str),

    /// An opening `[` without its closing `]`.
    #[error("unclosed '[' in {0}")]
    UnclosedBracket(&'static str),

    /// No `:` after the column coordinate.
    #[error("missing ':' after column")]
    MissingColon,

    /// A coordinate or value is not a non-negative decimal integer.
    #[error("invalid {field} '{text}'")]
    InvalidNumber { field: &'static str, text: String },

    /// The value segment has the wrong number of `:`-separated parts.
    #[error("expected {expected} value(s) after ':', found {found}")]
    ValueArity { expected: usize, found: usize },

    /// Coordinates outside the configured maze.
    #[error("cell [{row}][{col}] outside {height}x{width} maze")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
}

pub type Result<T> = std::result::Result<T, TokenError>;
