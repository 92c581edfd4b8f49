use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    /// Traceback without a preceding fold, or after the configuration changed.
    #[error("no folded sequence available for traceback")]
    NotFolded,

    #[error("sequence of length {length} exceeds the maximum of {max}")]
    SequenceTooLong { length: usize, max: usize },

    /// The tables do not reproduce a stored optimum.
    #[error("inconsistent folding tables at {0}")]
    InconsistentTables(String),
}
