//! Free energy evaluation of a given secondary structure.
//!
//! This is independent of the folding recursions: the structure is split
//! into maximal stems and loops, every loop is scored on its own, and the
//! optional stacking interactions (dangles, terminal mismatches, coaxial
//! stacks) of each multi-loop and of the exterior loop are chosen optimally
//! by a small dynamic program over the branches of the loop.

use log::trace;
use sf_structure::Loop;
use sf_structure::LoopDecomposition;
use sf_structure::Pair;
use sf_structure::PairTable;

use crate::valid_pair;
use crate::Base;
use crate::Energy;
use crate::EnergyError;
use crate::EnergyModel;

/// Evaluates the free energy of `pt` on `seq`.
///
/// With `stacking`, each multi-loop and the exterior loop receive their
/// best assignment of dangles, terminal mismatches and coaxial stacks.
/// Returns `model.max_mfe()` if any loop is infeasible (e.g. a hairpin with
/// fewer than the minimum number of unpaired nucleotides).
pub fn evaluate_structure<M: EnergyModel>(
    model: &M,
    seq: &[Base],
    pt: &PairTable,
    stacking: bool,
) -> Result<Energy, EnergyError> {
    if seq.len() != pt.len() {
        return Err(EnergyError::LengthMismatch {
            sequence: seq.len(),
            structure: pt.len(),
        });
    }
    for pair in pt.pairs() {
        let (i, j) = pair.ij();
        if !valid_pair(seq[i], seq[j]) {
            return Err(EnergyError::NonCanonicalPair { i, j });
        }
    }

    let infeasible = model.max_mfe() / 2;
    let ld = LoopDecomposition::from(pt);
    let mut total: Energy = 0;

    for stem in ld.stems() {
        let pairs: Vec<Pair> = stem.pairs().collect();
        let mut e = model.stem_length_cost(stem.length);
        for w in pairs.windows(2) {
            let (i, j) = w[0].ij();
            let (k, l) = w[1].ij();
            e += model.two_loop(seq, i, k, l, j);
        }
        trace!("stem {} length {}: {}", stem.outer, stem.length, e);
        if e >= infeasible {
            return Ok(model.max_mfe());
        }
        total += e;
    }

    for lp in ld.loops() {
        let e = score_loop(model, seq, lp, stacking);
        if e >= infeasible {
            return Ok(model.max_mfe());
        }
        total += e;
    }

    total += exterior_energy(model, seq, ld.exterior(), stacking);
    Ok(total)
}

fn score_loop<M: EnergyModel>(model: &M, seq: &[Base], lp: &Loop, stacking: bool) -> Energy {
    let Some(closing) = lp.closing else {
        return exterior_energy(model, seq, lp, stacking);
    };
    let (i, j) = closing.ij();
    let e = if lp.is_hairpin() {
        model.hairpin(seq, i, j)
    } else if lp.is_two_loop() {
        let (k, l) = lp.branches[0].ij();
        model.two_loop(seq, i, k, l, j)
    } else {
        multi_loop_energy(model, seq, closing, &lp.branches, lp.unpaired, stacking)
    };
    trace!("loop closed by {}: {}", closing, e);
    e
}

fn exterior_energy<M: EnergyModel>(model: &M, seq: &[Base], lp: &Loop, stacking: bool) -> Energy {
    let branches = &lp.branches;
    let mut e: Energy = branches
        .iter()
        .map(|b| {
            let (i, j) = b.ij();
            model.branch(seq, i, j)
        })
        .sum();
    if stacking && !branches.is_empty() {
        let mut gaps = Vec::with_capacity(branches.len() + 1);
        gaps.push(branches[0].ij().0);
        for w in branches.windows(2) {
            gaps.push(w[1].ij().0 - w[0].ij().1 - 1);
        }
        gaps.push(seq.len() - 1 - branches[branches.len() - 1].ij().1);
        e += best_stacking(model, seq, branches, &gaps, false, false);
    }
    e
}

fn multi_loop_energy<M: EnergyModel>(
    model: &M,
    seq: &[Base],
    closing: Pair,
    branches: &[Pair],
    unpaired: usize,
    stacking: bool,
) -> Energy {
    let (ci, cj) = closing.ij();
    let mut e = model.ml_init_cost()
        + model.branch(seq, ci, cj)
        + model.ml_branch_cost()
        + model.ml_unpaired_cost() * unpaired as Energy;
    for b in branches {
        let (i, j) = b.ij();
        e += model.branch(seq, i, j) + model.ml_branch_cost();
    }
    if stacking {
        e += closing_stacking(model, seq, closing, branches);
    }
    e
}

/// Best stacking bonus of a multi-loop. The interactions of the closing
/// pair are enumerated first; each choice leaves a linear problem over the
/// remaining branches.
fn closing_stacking<M: EnergyModel>(model: &M, seq: &[Base], closing: Pair, bs: &[Pair]) -> Energy {
    let m = bs.len();
    debug_assert!(m >= 2);
    let (ci, cj) = closing.ij();
    let (fi, fj) = bs[0].ij();
    let (li, lj) = bs[m - 1].ij();

    let mut g = Vec::with_capacity(m + 1);
    g.push(fi - ci - 1);
    for w in bs.windows(2) {
        g.push(w[1].ij().0 - w[0].ij().1 - 1);
    }
    g.push(cj - lj - 1);

    let all = |start, end| best_stacking(model, seq, bs, &g, start, end);
    let tail = |start, end| best_stacking(model, seq, &bs[1..], &g[1..], start, end);
    let head = |start, end| best_stacking(model, seq, &bs[..m - 1], &g[..m], start, end);

    let mut best = all(false, false);
    if g[0] >= 1 {
        best = best.min(model.closing_three_dangle(seq, ci, cj) + all(true, false));
    }
    if g[m] >= 1 {
        best = best.min(model.closing_five_dangle(seq, ci, cj) + all(false, true));
    }
    if g[0] >= 1 && g[m] >= 1 {
        best = best.min(model.closing_mismatch(seq, ci, cj) + all(true, true));
    }
    // Coaxial stacks with the first branch.
    if g[0] == 0 {
        best = best.min(model.flush_coax(seq, ci, cj, fi, fj) + tail(false, false));
    }
    if g[0] == 1 && g[m] >= 1 {
        best = best.min(model.mismatch_coax(seq, ci, cj, fi, fj) + tail(false, true));
    }
    if g[0] == 1 && g[1] >= 1 {
        best = best.min(model.mismatch_coax(seq, fi, fj, ci, cj) + tail(true, false));
    }
    // Coaxial stacks with the last branch.
    if g[m] == 0 {
        best = best.min(model.flush_coax(seq, ci, cj, li, lj) + head(false, false));
    }
    if g[m] == 1 && g[0] >= 1 {
        best = best.min(model.mismatch_coax(seq, ci, cj, li, lj) + head(true, false));
    }
    if g[m] == 1 && g[m - 1] >= 1 {
        best = best.min(model.mismatch_coax(seq, li, lj, ci, cj) + head(false, true));
    }
    best
}

/// Best stacking bonus of a linear run of branches.
///
/// `gaps[t]` is the number of unpaired nucleotides before `branches[t]` and
/// `gaps[m]` the number after the last one. `start_taken` marks the first
/// nucleotide of `gaps[0]` as used, `end_reserved` the last nucleotide of
/// `gaps[m]`. Every nucleotide takes part in at most one interaction and
/// every branch in at most one dangle, mismatch or coaxial stack.
fn best_stacking<M: EnergyModel>(
    model: &M,
    seq: &[Base],
    branches: &[Pair],
    gaps: &[usize],
    start_taken: bool,
    end_reserved: bool,
) -> Energy {
    let m = branches.len();
    debug_assert_eq!(gaps.len(), m + 1);

    // 3' interactions of branch t need the first nucleotide of gaps[t+1].
    let three_ok = |t: usize| {
        let after = gaps[t + 1];
        after >= 1 && !(t + 1 == m && end_reserved && after == 1)
    };

    // f[t][c]: best bonus of branches t.., where c says whether the first
    // nucleotide of gaps[t] is already used.
    let mut f = vec![[0 as Energy; 2]; m + 1];
    for t in (0..m).rev() {
        let (a, b) = branches[t].ij();
        let three = three_ok(t);
        for c in 0..2 {
            let five = gaps[t] >= 1 && !(gaps[t] == 1 && c == 1);
            let mut best = f[t + 1][0];
            if five {
                best = best.min(model.five_dangle(seq, a, b) + f[t + 1][0]);
            }
            if three {
                best = best.min(model.three_dangle(seq, a, b) + f[t + 1][1]);
            }
            if five && three {
                best = best.min(model.mismatch(seq, a, b) + f[t + 1][1]);
            }
            if t + 1 < m {
                let (k, l) = branches[t + 1].ij();
                match gaps[t + 1] {
                    0 => {
                        best = best.min(model.flush_coax(seq, a, b, k, l) + f[t + 2][0]);
                    }
                    1 => {
                        if five {
                            best = best.min(model.mismatch_coax(seq, a, b, k, l) + f[t + 2][0]);
                        }
                        if three_ok(t + 1) {
                            best = best.min(model.mismatch_coax(seq, k, l, a, b) + f[t + 2][1]);
                        }
                    }
                    _ => {}
                }
            }
            f[t][c] = best;
        }
    }
    f[0][start_taken as usize]
}
