//! Nearest-neighbor free energy models for RNA secondary structures.
//!
//! All energies are integers in tenths of kcal/mol (see [`Energy`]).
//! Infeasible configurations evaluate to [`MAX_MFE`], a sentinel that is
//! small enough to be summed a handful of times without overflow.

mod error;
mod sequence;
mod params;
mod model;
mod nearest_neighbor;
mod stem_length;
mod evaluation;

pub use error::*;
pub use sequence::*;
pub use params::*;
pub use model::*;
pub use nearest_neighbor::*;
pub use stem_length::*;
pub use evaluation::*;

