use log::trace;
use sf_energy::Energy;
use sf_energy::EnergyModel;
use sf_structure::PairTable;

use crate::recursions::Decomp;
use crate::recursions::TraceState;
use crate::DpTables;
use crate::FoldError;
use crate::StemLengthFolder;

fn stored(t: &DpTables, state: TraceState) -> Energy {
    match state {
        TraceState::External(i) => t.e[i],
        TraceState::Stem(i, j) => t.s[(i, j)],
        TraceState::Loop(i, j) => t.l[(i, j)],
        TraceState::MultiLoop(b, i, j) => t.ml[(b, i, j)],
        TraceState::Coaxial(i, j) => t.cx[(i, j)],
    }
}

impl<M: EnergyModel> StemLengthFolder<M> {
    /// Recovers one minimum free energy structure of the last folded sequence.
    ///
    /// Among equally good decompositions of a cell the first enumerated one
    /// is chosen, so repeated calls return the same structure.
    pub fn traceback(&self) -> Result<PairTable, FoldError> {
        let state = self.state.as_ref().ok_or(FoldError::NotFolded)?;
        let (seq, t) = (state.seq.as_slice(), &state.tables);
        let n = seq.len();
        let mut pt = PairTable::new(n);
        if n == 0 {
            return Ok(pt);
        }

        let rec = self.recursions(seq);
        let mut stack = vec![TraceState::External(n - 1)];
        while let Some(current) = stack.pop() {
            match current {
                TraceState::External(0) => continue,
                TraceState::MultiLoop(0, i, j) if i == j => continue,
                _ => (),
            }

            let mut best: Option<(Energy, Decomp)> = None;
            let mut choose = |e: Energy, d: Decomp| {
                if best.is_none_or(|(b, _)| e < b) {
                    best = Some((e, d));
                }
            };
            match current {
                TraceState::External(i) => rec.external(t, i, &mut choose),
                TraceState::Stem(i, j) => rec.stem(t, i, j, &mut choose),
                TraceState::Loop(i, j) => rec.closed_loop(t, i, j, &mut choose),
                TraceState::MultiLoop(b, i, j) => rec.multi_loop(t, b, i, j, &mut choose),
                TraceState::Coaxial(i, j) => rec.coaxial(t, i, j, &mut choose),
            }

            let expected = stored(t, current);
            let (energy, decomp) = match best {
                Some((e, d)) if e == expected => (e, d),
                _ => {
                    debug_assert!(false, "no candidate reproduces {:?}", current);
                    return Err(FoldError::InconsistentTables(format!(
                        "{:?} = {}",
                        current, expected
                    )));
                }
            };
            trace!("{:?} = {} -> {:?}", current, energy, decomp);

            if let TraceState::Stem(i, j) = current {
                if let Some(TraceState::Loop(ip, _)) = decomp[0] {
                    for d in 0..=ip - i {
                        pt.set_pair(i + d, j - d);
                    }
                }
            }
            stack.extend(decomp.into_iter().flatten());
        }
        Ok(pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_energy::evaluate_structure;
    use sf_energy::NearestNeighborModel;
    use sf_energy::NucleotideVec;
    use sf_energy::StemLengthModel;

    fn seq(s: &str) -> NucleotideVec {
        NucleotideVec::try_from(s).unwrap()
    }

    #[test]
    fn test_not_folded() {
        let folder = StemLengthFolder::new(NearestNeighborModel::default());
        assert_eq!(folder.traceback(), Err(FoldError::NotFolded));
    }

    #[test]
    fn test_invalidated_after_setter() {
        let mut folder = StemLengthFolder::new(NearestNeighborModel::default());
        folder.fold(&seq("GGGGAAACCCC")).unwrap();
        assert!(folder.traceback().is_ok());
        folder.set_stacking(false);
        assert_eq!(folder.traceback(), Err(FoldError::NotFolded));
    }

    #[test]
    fn test_empty_and_unpaired() {
        let mut folder = StemLengthFolder::new(NearestNeighborModel::default());
        folder.fold(&seq("")).unwrap();
        assert_eq!(folder.traceback().unwrap().to_string(), "");
        folder.fold(&seq("AAAAAA")).unwrap();
        assert_eq!(folder.traceback().unwrap().to_string(), "......");
    }

    #[test]
    fn test_stem_length_scenario() {
        let model =
            StemLengthModel::new(NearestNeighborModel::default(), vec![2, -61, 69, 18]).unwrap();
        let mut folder = StemLengthFolder::new(model);
        let s = seq("UGGCGUUC");
        assert_eq!(folder.fold(&s).unwrap(), -17);
        let pt = folder.traceback().unwrap();
        assert_eq!(pt.to_string(), ".((...))");
        assert_eq!(evaluate_structure(folder.model(), &s, &pt, true).unwrap(), -17);
    }

    #[test]
    fn test_traceback_is_deterministic() {
        let mut folder = StemLengthFolder::new(NearestNeighborModel::default());
        folder.fold(&seq("GGGAAAUCCAGCGAAAGCUGAGGCAAACCUC")).unwrap();
        let a = folder.traceback().unwrap();
        let b = folder.traceback().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_traceback_matches_evaluation() {
        for s in [
            "GGGGAAACCCC",
            "GGGAAAUCCAGCGAAAGCUGAGGCAAACCUC",
            "GCGCUUCGGCGCAAAGCGCUUCGGCGC",
            "ACGUACGUAGCUAGCUAGGCUAGCUAGCAUCGAUCGA",
        ] {
            for stacking in [false, true] {
                let mut folder = StemLengthFolder::new(NearestNeighborModel::default());
                folder.set_stacking(stacking);
                let s = seq(s);
                let mfe = folder.fold(&s).unwrap();
                let pt = folder.traceback().unwrap();
                assert_eq!(evaluate_structure(folder.model(), &s, &pt, stacking).unwrap(), mfe);
            }
        }
    }
}
