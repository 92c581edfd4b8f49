//! The nearest-neighbor model with an affine multi-loop penalty.

use serde::Deserialize;
use serde::Serialize;

use crate::check_parameter;
use crate::pair_type;
use crate::Base;
use crate::Energy;
use crate::EnergyError;
use crate::EnergyModel;
use crate::EnergyTables;
use crate::PairType;
use crate::MAX_MFE;
use crate::MIN_HAIRPIN_UNPAIRED;

/// Affine multi-loop costs: `init + branch * branches + unpaired * nucleotides`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLoopParams {
    pub init: Energy,
    pub branch: Energy,
    pub unpaired: Energy,
}

impl Default for MultiLoopParams {
    fn default() -> Self {
        MultiLoopParams {
            init: 93,
            branch: -6,
            unpaired: 0,
        }
    }
}

impl MultiLoopParams {
    /// Rejects costs outside the supported parameter range.
    pub fn validate(&self) -> Result<(), EnergyError> {
        check_parameter("multi-loop init", self.init)?;
        check_parameter("multi-loop branch", self.branch)?;
        check_parameter("multi-loop unpaired", self.unpaired)
    }
}

/// Nearest-neighbor energies from [`EnergyTables`] with an affine multi-loop
/// penalty and no stem length costs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NearestNeighborModel {
    tables: EnergyTables,
    multi_loop: MultiLoopParams,
}

impl NearestNeighborModel {
    /// Builds a model after validating both parameter sets.
    pub fn new(tables: EnergyTables, multi_loop: MultiLoopParams) -> Result<Self, EnergyError> {
        tables.validate()?;
        multi_loop.validate()?;
        Ok(Self { tables, multi_loop })
    }

    /// The nearest-neighbor parameter tables.
    pub fn tables(&self) -> &EnergyTables {
        &self.tables
    }

    /// The affine multi-loop costs.
    pub fn multi_loop(&self) -> MultiLoopParams {
        self.multi_loop
    }

    /// Replaces the multi-loop costs; out-of-range costs leave the model unchanged.
    pub fn set_multi_loop(&mut self, multi_loop: MultiLoopParams) -> Result<(), EnergyError> {
        multi_loop.validate()?;
        self.multi_loop = multi_loop;
        Ok(())
    }

    fn terminal(&self, p: PairType) -> Energy {
        if p.is_au_gu() { self.tables.terminal_au_gu } else { 0 }
    }

    /// Stack of 5' a c 3' / 3' b d 5'.
    fn stack(&self, seq: &[Base], a: usize, b: usize, c: usize, d: usize) -> Energy {
        match (pair_type(seq[a], seq[b]), pair_type(seq[c], seq[d])) {
            (Some(p1), Some(p2)) => self.tables.stack[p1.index()][p2.index()],
            _ => MAX_MFE,
        }
    }

    /// Nucleotide x dangling 3' of p, where p pairs with q.
    fn dangle3(&self, seq: &[Base], p: usize, q: usize, x: usize) -> Energy {
        match pair_type(seq[p], seq[q]) {
            Some(pt) => self.tables.dangle3[pt.index()][seq[x].index()],
            None => MAX_MFE,
        }
    }

    /// Nucleotide y dangling 5' of q, where p pairs with q.
    fn dangle5(&self, seq: &[Base], p: usize, q: usize, y: usize) -> Energy {
        match pair_type(seq[p], seq[q]) {
            Some(pt) => self.tables.dangle5[pt.index()][seq[y].index()],
            None => MAX_MFE,
        }
    }

    fn hairpin_first_mismatch(&self, a: Base, b: Base) -> Energy {
        let t = &self.tables;
        match (a, b) {
            (Base::U, Base::U) => t.hairpin_uu_mismatch,
            (Base::G, Base::A) => t.hairpin_ga_mismatch,
            (Base::G, Base::G) => t.hairpin_gg_mismatch,
            _ => 0,
        }
    }

    fn internal_first_mismatch(&self, a: Base, b: Base) -> Energy {
        let t = &self.tables;
        match (a, b) {
            (Base::G, Base::A) | (Base::A, Base::G) => t.internal_ga_mismatch,
            (Base::U, Base::U) => t.internal_uu_mismatch,
            _ => 0,
        }
    }
}

impl EnergyModel for NearestNeighborModel {
    fn hairpin(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        debug_assert!(i < j && j < seq.len());
        let Some(p) = pair_type(seq[i], seq[j]) else {
            return MAX_MFE;
        };
        let n = j - i - 1;
        if n < MIN_HAIRPIN_UNPAIRED {
            return MAX_MFE;
        }
        let t = &self.tables;
        let mut e = t.hairpin_init.cost(n, t.loop_extrapolation);
        if n == 3 {
            e += self.terminal(p);
        } else {
            e += self.closing_mismatch(seq, i, j);
            e += self.hairpin_first_mismatch(seq[i + 1], seq[j - 1]);
        }
        if p == PairType::GU && i >= 2 && seq[i - 1] == Base::G && seq[i - 2] == Base::G {
            e += t.hairpin_special_gu_closure;
        }
        if seq[i + 1..j].iter().all(|&b| b == Base::C) {
            e += if n == 3 {
                t.hairpin_c3_loop
            } else {
                t.hairpin_c_slope * n as Energy + t.hairpin_c_intercept
            };
        }
        e
    }

    fn two_loop(&self, seq: &[Base], i: usize, k: usize, l: usize, j: usize) -> Energy {
        debug_assert!(i < k && k < l && l < j && j < seq.len());
        let (Some(outer), Some(inner)) = (pair_type(seq[i], seq[j]), pair_type(seq[k], seq[l])) else {
            return MAX_MFE;
        };
        let t = &self.tables;
        let n1 = k - i - 1;
        let n2 = j - l - 1;

        if n1 == 0 && n2 == 0 {
            return t.stack[outer.index()][inner.index()];
        }

        if n1 == 0 || n2 == 0 {
            let n = n1 + n2;
            let e = t.bulge_init.cost(n, t.loop_extrapolation);
            return if n == 1 {
                e + t.stack[outer.index()][inner.index()]
            } else {
                e + self.terminal(outer) + self.terminal(inner)
            };
        }

        let closure = |p: PairType| if p.is_au_gu() { t.internal_au_gu_closure } else { 0 };
        let mut e = t.internal_init.cost(n1 + n2, t.loop_extrapolation)
            + t.internal_asymmetry * n1.abs_diff(n2) as Energy
            + closure(outer)
            + closure(inner);
        // 1xn loops get no first mismatch bonus.
        if n1 > 1 && n2 > 1 {
            e += self.internal_first_mismatch(seq[i + 1], seq[j - 1]);
            e += self.internal_first_mismatch(seq[l + 1], seq[k - 1]);
        }
        e
    }

    fn branch(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        pair_type(seq[i], seq[j]).map_or(0, |p| self.terminal(p))
    }

    fn flush_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy {
        for (x, px) in [(i, j), (j, i)] {
            for (y, py) in [(k, l), (l, k)] {
                if x + 1 == y {
                    return self.stack(seq, x, px, y, py);
                }
                if y + 1 == x {
                    return self.stack(seq, y, py, x, px);
                }
            }
        }
        debug_assert!(false, "helices ({i},{j}) and ({k},{l}) are not adjacent");
        MAX_MFE
    }

    fn mismatch_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy {
        let mismatch = if i < k && l < j {
            self.closing_mismatch(seq, i, j)
        } else {
            self.mismatch(seq, i, j)
        };
        mismatch + self.tables.mismatch_coax_bonus
    }

    fn five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        debug_assert!(i >= 1 && i < j);
        self.dangle5(seq, j, i, i - 1)
    }

    fn three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        debug_assert!(i < j && j + 1 < seq.len());
        self.dangle3(seq, j, i, j + 1)
    }

    fn closing_five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        debug_assert!(i + 1 < j);
        self.dangle5(seq, i, j, j - 1)
    }

    fn closing_three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        debug_assert!(i + 1 < j);
        self.dangle3(seq, i, j, i + 1)
    }

    fn ml_init_cost(&self) -> Energy {
        self.multi_loop.init
    }

    fn ml_branch_cost(&self) -> Energy {
        self.multi_loop.branch
    }

    fn ml_unpaired_cost(&self) -> Energy {
        self.multi_loop.unpaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NucleotideVec;
    use crate::MAX_PARAMETER;

    fn seq(s: &str) -> NucleotideVec {
        NucleotideVec::try_from(s).unwrap()
    }

    #[test]
    fn test_hairpins() {
        let m = NearestNeighborModel::default();
        // Triloop closed by GC: initiation only.
        assert_eq!(m.hairpin(&seq("GGGAAACCC"), 2, 6), 54);
        // Triloop closed by GU: plus terminal penalty.
        assert_eq!(m.hairpin(&seq("UGGCGUUC"), 2, 6), 59);
        // Tetraloop: initiation and terminal mismatch (-17 - 5).
        assert_eq!(m.hairpin(&seq("GAAAAC"), 0, 5), 34);
        // All-C tetraloop: 56 - 8 - 3 + 3 * 4 + 16.
        assert_eq!(m.hairpin(&seq("GCCCCC"), 0, 5), 73);
        // Too small.
        assert_eq!(m.hairpin(&seq("GAAC"), 0, 3), MAX_MFE);
        // Not a pair.
        assert_eq!(m.hairpin(&seq("AAAAA"), 0, 4), MAX_MFE);
    }

    #[test]
    fn test_two_loops() {
        let m = NearestNeighborModel::default();
        assert_eq!(m.two_loop(&seq("GGAAACC"), 0, 1, 5, 6), -33);
        // Single nucleotide bulge keeps the stack.
        assert_eq!(m.two_loop(&seq("GAGAAACC"), 0, 2, 6, 7), 5);
        // 1x1 internal loop: initiation only.
        assert_eq!(m.two_loop(&seq("GAGAAACAC"), 0, 2, 6, 8), 5);
        // 2x2 internal loop with a GA first mismatch on the closing pair.
        assert_eq!(m.two_loop(&seq("GGAGAAACAAC"), 0, 3, 7, 10), 3);
    }

    #[test]
    fn test_branch_penalty() {
        let m = NearestNeighborModel::default();
        let s = seq("GAAACAAAAU");
        assert_eq!(m.branch(&s, 0, 4), 0);
        assert_eq!(m.branch(&s, 1, 9), 5);
        assert_eq!(m.branch(&s, 1, 2), 0);
    }

    #[test]
    fn test_dangles() {
        let m = NearestNeighborModel::default();
        let s = seq("UGGCGUUC");
        // 5' U on the branch (1,7): CG row.
        assert_eq!(m.five_dangle(&s, 1, 7), 0);
        let s = seq("AGAAACA");
        assert_eq!(m.five_dangle(&s, 1, 5), -2);
        assert_eq!(m.three_dangle(&s, 1, 5), -11);
        assert_eq!(m.mismatch(&s, 1, 5), -13);
        let s = seq("GAAAAC");
        assert_eq!(m.closing_three_dangle(&s, 0, 5), -17);
        assert_eq!(m.closing_five_dangle(&s, 0, 5), -5);
        assert_eq!(m.closing_mismatch(&s, 0, 5), -22);
    }

    #[test]
    fn test_coaxial_stacks() {
        let m = NearestNeighborModel::default();
        let s = seq("GAAACGAAAC");
        assert_eq!(m.flush_coax(&s, 0, 4, 5, 9), -24);
        assert_eq!(m.flush_coax(&s, 5, 9, 0, 4), -24);

        let s = seq("AGAAACAGAAACA");
        assert_eq!(m.mismatch_coax(&s, 1, 5, 7, 11), -13 - 21);
    }

    #[test]
    fn test_multi_loop_params() {
        let mut m = NearestNeighborModel::default();
        assert_eq!(m.ml_init_cost(), 93);
        assert_eq!(m.ml_branch_cost(), -6);
        assert_eq!(m.ml_unpaired_cost(), 0);
        m.set_multi_loop(MultiLoopParams { init: 34, branch: 4, unpaired: 1 }).unwrap();
        assert_eq!(m.ml_init_cost(), 34);
        assert_eq!(m.ml_unpaired_cost(), 1);
        assert_eq!(m.stem_length_cost(7), 0);
    }

    #[test]
    fn test_out_of_range_multi_loop() {
        let mut m = NearestNeighborModel::default();
        for params in [
            MultiLoopParams { init: MAX_PARAMETER, branch: -6, unpaired: 0 },
            MultiLoopParams { init: 93, branch: -MAX_PARAMETER, unpaired: 0 },
            MultiLoopParams { init: 93, branch: -6, unpaired: i32::MAX },
        ] {
            assert!(matches!(m.set_multi_loop(params), Err(EnergyError::OutOfRange { .. })));
            assert!(matches!(
                NearestNeighborModel::new(EnergyTables::default(), params),
                Err(EnergyError::OutOfRange { .. })
            ));
        }
        assert_eq!(m.multi_loop(), MultiLoopParams::default());
    }

    #[test]
    fn test_new_validates_tables() {
        let mut t = EnergyTables::default();
        t.terminal_au_gu = 2_000_000_000;
        assert!(matches!(
            NearestNeighborModel::new(t, MultiLoopParams::default()),
            Err(EnergyError::OutOfRange { .. })
        ));
        assert!(NearestNeighborModel::new(EnergyTables::default(), MultiLoopParams::default()).is_ok());
    }
}
