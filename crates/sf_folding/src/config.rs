use serde::Deserialize;
use serde::Serialize;

/// Options of the folding recursions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Allow pairs that can neither stack inward nor outward.
    pub lonely_pairs: bool,
    /// Dangles, terminal mismatches and coaxial stacking.
    pub stacking: bool,
    /// Maximum number of unpaired nucleotides in a bulge or internal loop.
    pub max_two_loop: usize,
}

impl Default for FolderConfig {
    fn default() -> Self {
        FolderConfig {
            lonely_pairs: true,
            stacking: true,
            max_two_loop: usize::MAX,
        }
    }
}
