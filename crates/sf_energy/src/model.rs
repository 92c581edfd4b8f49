use crate::Base;
use crate::EnergyError;

/// Free energy in tenths of kcal/mol.
pub type Energy = i32;

/// The "infinity" sentinel for infeasible configurations. Small enough that
/// a handful of sentinels can be added without overflowing an `i32`.
pub const MAX_MFE: Energy = i32::MAX / 16;

/// Exclusive bound on the magnitude of every energy parameter. Sums of many
/// parameters then stay far below `MAX_MFE / 2`, so finite candidates are
/// never mistaken for infeasible ones and never overflow.
pub const MAX_PARAMETER: Energy = MAX_MFE / 1024;

/// Rejects an energy parameter with `|value| >= MAX_PARAMETER`.
pub fn check_parameter(name: &str, value: Energy) -> Result<(), EnergyError> {
    if value.unsigned_abs() >= MAX_PARAMETER.unsigned_abs() {
        return Err(EnergyError::OutOfRange {
            name: name.to_string(),
            value,
            max: MAX_PARAMETER,
        });
    }
    Ok(())
}

/// Minimum number of unpaired nucleotides in a hairpin loop.
pub const MIN_HAIRPIN_UNPAIRED: usize = 3;

/// Formats an energy in kcal/mol with one decimal.
pub fn energy_to_kcal(e: Energy) -> String {
    format!("{:.1}", e as f64 / 10.0)
}

/// The nearest-neighbor energy functions used by folding and evaluation.
///
/// All functions are pure and receive the sequence explicitly. They never
/// add branch penalties on their own: callers combine e.g. `branch` and
/// `flush_coax` as needed. Invalid configurations (non-canonical pairs,
/// hairpins that are too small) return `max_mfe()`. Index preconditions are
/// checked with `debug_assert!`.
///
/// The naming of the dangle functions follows the pair (i, j) with i < j:
/// the plain variants are for a branch seen from the outside (the dangling
/// nucleotides are i-1 and j+1), the `closing_*` variants for a pair that
/// closes a multi-loop (the dangling nucleotides are i+1 and j-1).
pub trait EnergyModel {
    /// Hairpin loop closed by (i, j).
    fn hairpin(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Stack, bulge or internal loop closed by (i, j) with inner pair (k, l).
    fn two_loop(&self, seq: &[Base], i: usize, k: usize, l: usize, j: usize) -> Energy;

    /// Terminal penalty of a branch (i, j) in a multi-loop or the exterior loop.
    fn branch(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Flush coaxial stack of the directly adjacent helices (i, j) and (k, l).
    /// Either pair may enclose the other.
    fn flush_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy;

    /// Mismatch-mediated coaxial stack; the mismatch sits on (i, j), which is
    /// separated from (k, l) by exactly one nucleotide.
    fn mismatch_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy;

    /// Nucleotide i-1 dangling on the branch (i, j).
    fn five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Nucleotide j+1 dangling on the branch (i, j).
    fn three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Terminal mismatch of i-1 and j+1 on the branch (i, j).
    fn mismatch(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.five_dangle(seq, i, j) + self.three_dangle(seq, i, j)
    }

    /// Nucleotide j-1 dangling on the closing pair (i, j).
    fn closing_five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Nucleotide i+1 dangling on the closing pair (i, j).
    fn closing_three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy;

    /// Terminal mismatch of i+1 and j-1 on the closing pair (i, j).
    fn closing_mismatch(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.closing_five_dangle(seq, i, j) + self.closing_three_dangle(seq, i, j)
    }

    fn ml_init_cost(&self) -> Energy;
    fn ml_branch_cost(&self) -> Energy;
    fn ml_unpaired_cost(&self) -> Energy;

    /// Cost of a maximal helix of `length` stacked pairs.
    fn stem_length_cost(&self, _length: usize) -> Energy {
        0
    }

    fn max_mfe(&self) -> Energy {
        MAX_MFE
    }

    fn min_hairpin_unpaired(&self) -> usize {
        MIN_HAIRPIN_UNPAIRED
    }
}
