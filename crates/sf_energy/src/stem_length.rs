//! Nearest-neighbor model with an additional cost per maximal helix that
//! depends on the number of stacked pairs in the helix.

use crate::check_parameter;
use crate::Base;
use crate::Energy;
use crate::EnergyError;
use crate::EnergyModel;
use crate::NearestNeighborModel;

#[derive(Debug, Clone, PartialEq)]
pub struct StemLengthModel {
    base: NearestNeighborModel,
    /// `costs[k - 1]` is the cost of a stem of length k; the last entry
    /// applies to all longer stems.
    costs: Vec<Energy>,
}

impl Default for StemLengthModel {
    fn default() -> Self {
        StemLengthModel {
            base: NearestNeighborModel::default(),
            costs: vec![0],
        }
    }
}

fn validate_costs(costs: &[Energy]) -> Result<(), EnergyError> {
    if costs.is_empty() {
        return Err(EnergyError::EmptyStemCosts);
    }
    for (k, &c) in costs.iter().enumerate() {
        check_parameter(&format!("stem length cost {}", k + 1), c)?;
    }
    Ok(())
}

impl StemLengthModel {
    /// Wraps `base` with the given stem length costs, which must be non-empty
    /// and within the parameter range.
    pub fn new(base: NearestNeighborModel, costs: Vec<Energy>) -> Result<Self, EnergyError> {
        validate_costs(&costs)?;
        Ok(Self { base, costs })
    }

    /// Replaces the stem length costs; invalid costs leave the model unchanged.
    pub fn set_length_costs(&mut self, costs: Vec<Energy>) -> Result<(), EnergyError> {
        validate_costs(&costs)?;
        self.costs = costs;
        Ok(())
    }

    /// Costs of stems of length 1, 2, ..., k.
    pub fn length_costs(&self) -> &[Energy] {
        &self.costs
    }

    /// The underlying model without stem length costs.
    pub fn nearest_neighbor(&self) -> &NearestNeighborModel {
        &self.base
    }

    pub fn nearest_neighbor_mut(&mut self) -> &mut NearestNeighborModel {
        &mut self.base
    }
}

impl EnergyModel for StemLengthModel {
    fn hairpin(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.hairpin(seq, i, j)
    }

    fn two_loop(&self, seq: &[Base], i: usize, k: usize, l: usize, j: usize) -> Energy {
        self.base.two_loop(seq, i, k, l, j)
    }

    fn branch(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.branch(seq, i, j)
    }

    fn flush_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy {
        self.base.flush_coax(seq, i, j, k, l)
    }

    fn mismatch_coax(&self, seq: &[Base], i: usize, j: usize, k: usize, l: usize) -> Energy {
        self.base.mismatch_coax(seq, i, j, k, l)
    }

    fn five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.five_dangle(seq, i, j)
    }

    fn three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.three_dangle(seq, i, j)
    }

    fn closing_five_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.closing_five_dangle(seq, i, j)
    }

    fn closing_three_dangle(&self, seq: &[Base], i: usize, j: usize) -> Energy {
        self.base.closing_three_dangle(seq, i, j)
    }

    fn ml_init_cost(&self) -> Energy {
        self.base.ml_init_cost()
    }

    fn ml_branch_cost(&self) -> Energy {
        self.base.ml_branch_cost()
    }

    fn ml_unpaired_cost(&self) -> Energy {
        self.base.ml_unpaired_cost()
    }

    fn stem_length_cost(&self, length: usize) -> Energy {
        debug_assert!(length > 0);
        let k = length.clamp(1, self.costs.len());
        self.costs[k - 1]
    }
}
