//! The stem-length-penalized minimum free energy folder.

use log::debug;
use sf_energy::must_be_lonely_pair;
use sf_energy::valid_pair;
use sf_energy::Base;
use sf_energy::Energy;
use sf_energy::EnergyModel;
use sf_structure::NAIDX;

use crate::recursions::Recursions;
use crate::DpTables;
use crate::FoldError;
use crate::FolderConfig;

/// The sequence and tables of the last successful fold.
#[derive(Debug, Clone)]
pub(crate) struct FoldState {
    pub seq: Vec<Base>,
    pub tables: DpTables,
}

/// Folds sequences under an [`EnergyModel`] with per-helix length costs.
///
/// ```
/// use sf_energy::{NucleotideVec, StemLengthModel, NearestNeighborModel};
/// use sf_folding::StemLengthFolder;
///
/// let model = StemLengthModel::new(NearestNeighborModel::default(), vec![2, -61, 69, 18]).unwrap();
/// let mut folder = StemLengthFolder::new(model);
/// let seq = NucleotideVec::try_from("UGGCGUUC").unwrap();
/// assert_eq!(folder.fold(&seq).unwrap(), -17);
/// assert_eq!(folder.traceback().unwrap().to_string(), ".((...))");
/// ```
#[derive(Debug, Clone)]
pub struct StemLengthFolder<M: EnergyModel> {
    model: M,
    config: FolderConfig,
    pub(crate) state: Option<FoldState>,
}

impl<M: EnergyModel + Default> Default for StemLengthFolder<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: EnergyModel> StemLengthFolder<M> {
    /// A folder with the default configuration: lonely pairs and coaxial
    /// stacking allowed, no limit on two-loop size.
    pub fn new(model: M) -> Self {
        Self::with_config(model, FolderConfig::default())
    }

    pub fn with_config(model: M, config: FolderConfig) -> Self {
        StemLengthFolder {
            model,
            config,
            state: None,
        }
    }

    /// The energy model used by [`fold`](Self::fold).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Current options; change them with the setters.
    pub fn config(&self) -> &FolderConfig {
        &self.config
    }

    /// Replaces the energy model and discards the current fold.
    pub fn set_model(&mut self, model: M) {
        self.model = model;
        self.state = None;
    }

    /// Replaces the configuration and discards the current fold.
    pub fn set_config(&mut self, config: FolderConfig) {
        self.config = config;
        self.state = None;
    }

    /// Allows or forbids helices of a single pair.
    pub fn set_lonely_pairs(&mut self, allow: bool) {
        self.config.lonely_pairs = allow;
        self.state = None;
    }

    /// Turns dangles, terminal mismatches and coaxial stacking on or off.
    pub fn set_stacking(&mut self, stacking: bool) {
        self.config.stacking = stacking;
        self.state = None;
    }

    /// Limits the number of unpaired nucleotides in interior loops and
    /// bulges. Invalidates the current fold like the other setters.
    pub fn set_max_two_loop(&mut self, max_unpaired: usize) {
        self.config.max_two_loop = max_unpaired;
        self.state = None;
    }

    pub fn lonely_pairs(&self) -> bool {
        self.config.lonely_pairs
    }

    pub fn stacking(&self) -> bool {
        self.config.stacking
    }

    /// Largest total of unpaired nucleotides allowed in a two-loop.
    pub fn max_two_loop(&self) -> usize {
        self.config.max_two_loop
    }

    /// The tables of the last fold, if any.
    pub fn tables(&self) -> Option<&DpTables> {
        self.state.as_ref().map(|s| &s.tables)
    }

    pub(crate) fn recursions<'a>(&'a self, seq: &'a [Base]) -> Recursions<'a, M> {
        Recursions {
            seq,
            model: &self.model,
            config: &self.config,
        }
    }

    /// Fills all tables for `seq` and returns its minimum free energy.
    ///
    /// The previous fold is discarded first, also when `seq` is rejected.
    pub fn fold(&mut self, seq: &[Base]) -> Result<Energy, FoldError> {
        let n = seq.len();
        self.state = None;
        if n > NAIDX::MAX as usize {
            return Err(FoldError::SequenceTooLong {
                length: n,
                max: NAIDX::MAX as usize,
            });
        }
        debug!("Folding sequence of length {} with {:?}", n, self.config);

        let inf = self.model.max_mfe();
        let mut t = DpTables::new(n, inf);
        let normalized = |e: Energy| if e >= inf / 2 { inf } else { e };

        if n > 0 {
            let rec = self.recursions(seq);
            let u = self.model.ml_unpaired_cost();
            let min_hp = self.model.min_hairpin_unpaired();
            for i in 0..n {
                t.ml[(0, i, i)] = u;
            }

            for i in (0..n - 1).rev() {
                for j in i + 1..n {
                    if valid_pair(seq[i], seq[j])
                        && (self.config.lonely_pairs || !must_be_lonely_pair(seq, i, j, min_hp))
                    {
                        let mut best = Energy::MAX;
                        rec.closed_loop(&t, i, j, &mut |e, _| best = best.min(e));
                        t.l[(i, j)] = normalized(best);

                        let mut best = Energy::MAX;
                        rec.stem(&t, i, j, &mut |e, _| best = best.min(e));
                        t.s[(i, j)] = normalized(best);
                    }

                    let mut best = inf;
                    rec.coaxial(&t, i, j, &mut |e, _| best = best.min(e));
                    t.cx[(i, j)] = normalized(best);

                    for b in 0..3 {
                        let mut best = Energy::MAX;
                        rec.multi_loop(&t, b, i, j, &mut |e, _| best = best.min(e));
                        t.ml[(b, i, j)] = normalized(best);
                    }
                }
            }

            for i in 1..n {
                let mut best = Energy::MAX;
                rec.external(&t, i, &mut |e, _| best = best.min(e));
                t.e[i] = normalized(best);
            }
        }

        let mfe = if n == 0 { 0 } else { t.e[n - 1] };
        debug!("Minimum free energy: {}", mfe);
        self.state = Some(FoldState {
            seq: seq.to_vec(),
            tables: t,
        });
        Ok(mfe)
    }
}
