use thiserror::Error;

/// Errors raised while parsing or converting secondary structures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A character that is neither '(', ')' nor '.'.
    #[error("invalid dot-bracket symbol '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// An opening bracket without a partner.
    #[error("unmatched '(' at position {0}")]
    UnmatchedOpen(usize),

    /// A closing bracket without a partner.
    #[error("unmatched ')' at position {0}")]
    UnmatchedClose(usize),

    /// The structure does not fit into `NAIDX` positions.
    #[error("structure of length {0} exceeds the supported maximum")]
    TooLong(usize),
}
