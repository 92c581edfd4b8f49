use std::io;
use thiserror::Error;

use sf_structure::StructureError;

use crate::Energy;

#[derive(Debug, Error)]
pub enum EnergyError {
    #[error("invalid nucleotide '{symbol}' at position {position}")]
    InvalidNucleotide { symbol: char, position: usize },

    #[error("failed to read parameter file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse parameter file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid energy parameters: {0}")]
    InvalidParameters(String),

    /// A parameter so large that sums of energies could reach the
    /// infeasibility sentinel.
    #[error("{name} = {value} is out of range (|e| must be below {max})")]
    OutOfRange { name: String, value: Energy, max: Energy },

    #[error("stem length costs must contain at least one value")]
    EmptyStemCosts,

    #[error("sequence length {sequence} does not match structure length {structure}")]
    LengthMismatch { sequence: usize, structure: usize },

    #[error("positions {i} and {j} cannot form a canonical base pair")]
    NonCanonicalPair { i: usize, j: usize },

    #[error(transparent)]
    Structure(#[from] StructureError),
}
