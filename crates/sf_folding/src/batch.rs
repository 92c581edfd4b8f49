use log::debug;
use rayon::prelude::*;
use sf_energy::Base;
use sf_energy::Energy;
use sf_energy::EnergyModel;
use sf_energy::NucleotideVec;
use sf_structure::PairTable;

use crate::FoldError;
use crate::StemLengthFolder;

/// Minimum free energy and one optimal structure of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldResult {
    /// In dcal/mol.
    pub energy: Energy,
    pub structure: PairTable,
}

impl<M: EnergyModel> StemLengthFolder<M> {
    /// Folds `seq` and traces back one optimal structure.
    pub fn fold_structure(&mut self, seq: &[Base]) -> Result<FoldResult, FoldError> {
        let energy = self.fold(seq)?;
        let structure = self.traceback()?;
        Ok(FoldResult { energy, structure })
    }
}

/// Folds every sequence with its own clone of `folder`, in parallel.
///
/// Results are returned in input order.
pub fn fold_batch<M>(
    folder: &StemLengthFolder<M>,
    seqs: &[NucleotideVec],
) -> Vec<Result<FoldResult, FoldError>>
where
    M: EnergyModel + Clone + Send + Sync,
{
    debug!("Folding {} sequences on {} threads", seqs.len(), rayon::current_num_threads());
    seqs.par_iter()
        .map_init(|| folder.clone(), |f, seq| f.fold_structure(seq))
        .collect()
}
