mod error;
mod dotbracket;
mod pair_table;
mod pair_set;
mod loop_decomposition;

pub use error::*;
pub use dotbracket::*;
pub use pair_table::*;
pub use pair_set::*;
pub use loop_decomposition::*;


/// Sequence position. Folding is cubic in time and quadratic in memory,
/// so 16 bits are far beyond any length that can be folded.
pub type NAIDX = u16;

/// A pair (i, j) of positions packed into one integer, see [`Pair::key`].
pub type P1KEY = u32;

const _: () = assert!(2 * NAIDX::BITS <= P1KEY::BITS);
