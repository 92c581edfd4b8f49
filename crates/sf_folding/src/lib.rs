//! Minimum free energy folding of RNA sequences.
//!
//! [`StemLengthFolder`] fills five dynamic programming tables (helices,
//! loops, multi-loop fragments, coaxial stacks and the exterior loop) and
//! recovers one optimal structure by traceback. [`fold_batch`] folds many
//! sequences in parallel.

mod error;
mod config;
mod tables;
mod recursions;
mod folder;
mod traceback;
mod batch;

pub use error::*;
pub use config::*;
pub use tables::*;
pub use folder::*;
pub use batch::*;

