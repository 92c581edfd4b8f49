//! Candidate enumeration for every table of the folding recursions.
//!
//! The fill takes the minimum over the candidates of a cell, the traceback
//! re-enumerates the same candidates and keeps the first one that is
//! strictly better than all previous ones. Both use the functions here, so
//! candidate order (and thereby tie-breaking) is identical.

use sf_energy::Base;
use sf_energy::Energy;
use sf_energy::EnergyModel;

use crate::DpTables;
use crate::FolderConfig;

/// A sub-problem of the traceback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceState {
    /// E[i]
    External(usize),
    /// S[i][j]
    Stem(usize, usize),
    /// L[i][j]
    Loop(usize, usize),
    /// ML[b][i][j]
    MultiLoop(usize, usize, usize),
    /// Cx[i][j]
    Coaxial(usize, usize),
}

/// The sub-problems a candidate decomposes into.
pub(crate) type Decomp = [Option<TraceState>; 3];

const NONE: Decomp = [None, None, None];

fn one(a: TraceState) -> Decomp {
    [Some(a), None, None]
}

fn two(a: TraceState, b: TraceState) -> Decomp {
    [Some(a), Some(b), None]
}

/// Appends the exterior prefix E[s-1], if any, to a decomposition.
fn with_prefix(mut d: Decomp, s: usize) -> Decomp {
    if s > 0 {
        if let Some(slot) = d.iter_mut().find(|x| x.is_none()) {
            *slot = Some(TraceState::External(s - 1));
        }
    }
    d
}

pub(crate) struct Recursions<'a, M: EnergyModel> {
    pub seq: &'a [Base],
    pub model: &'a M,
    pub config: &'a FolderConfig,
}

impl<M: EnergyModel> Recursions<'_, M> {
    /// Branch of the exterior loop.
    fn ss(&self, t: &DpTables, i: usize, j: usize) -> Energy {
        self.model.branch(self.seq, i, j) + t.s[(i, j)]
    }

    /// Branch of a multi-loop.
    fn mlss(&self, t: &DpTables, i: usize, j: usize) -> Energy {
        self.ss(t, i, j) + self.model.ml_branch_cost()
    }

    /// S[i][j]: a helix of one or more stacked pairs starting at (i, j),
    /// closed by the loop of its innermost pair.
    pub fn stem<F>(&self, t: &DpTables, i: usize, j: usize, f: &mut F)
    where
        F: FnMut(Energy, Decomp),
    {
        let (seq, em) = (self.seq, self.model);
        let (mut ip, mut jp) = (i, j);
        let mut size = 1;
        let mut fe: Energy = 0;
        while ip < jp && sf_energy::valid_pair(seq[ip], seq[jp]) {
            f(
                fe + t.l[(ip, jp)] + em.stem_length_cost(size),
                one(TraceState::Loop(ip, jp)),
            );
            if ip + 1 < jp - 1 {
                fe += em.two_loop(seq, ip, ip + 1, jp - 1, jp);
            }
            size += 1;
            ip += 1;
            jp -= 1;
        }
    }

    /// L[i][j]: hairpin, multi-loop or two-loop closed by (i, j).
    pub fn closed_loop<F>(&self, t: &DpTables, i: usize, j: usize, f: &mut F)
    where
        F: FnMut(Energy, Decomp),
    {
        use TraceState::*;
        let (seq, em) = (self.seq, self.model);
        let u = em.ml_unpaired_cost();
        let ml = |b: usize, p: usize, q: usize| t.ml[(b, p, q)];

        f(em.hairpin(seq, i, j), NONE);

        let init = em.ml_init_cost() + em.branch(seq, i, j) + em.ml_branch_cost();
        f(init + ml(2, i + 1, j - 1), one(MultiLoop(2, i + 1, j - 1)));

        if self.config.stacking {
            if i + 3 < j {
                f(
                    init + ml(2, i + 2, j - 1) + em.closing_three_dangle(seq, i, j) + u,
                    one(MultiLoop(2, i + 2, j - 1)),
                );
            }
            if i + 3 < j {
                f(
                    init + ml(2, i + 1, j - 2) + em.closing_five_dangle(seq, i, j) + u,
                    one(MultiLoop(2, i + 1, j - 2)),
                );
            }
            if i + 4 < j {
                f(
                    init + ml(2, i + 2, j - 2) + em.closing_mismatch(seq, i, j) + 2 * u,
                    one(MultiLoop(2, i + 2, j - 2)),
                );
            }
            for k in i + 1..j {
                // ((_)_)
                if i + 1 < k && k + 2 < j {
                    f(
                        ml(1, k + 1, j - 1) + init
                            + em.flush_coax(seq, i, j, i + 1, k)
                            + self.mlss(t, i + 1, k),
                        two(MultiLoop(1, k + 1, j - 1), Stem(i + 1, k)),
                    );
                }
                // (.(_)_.)
                if i + 2 < k && k + 3 < j {
                    f(
                        ml(1, k + 1, j - 2) + init
                            + em.mismatch_coax(seq, i, j, i + 2, k)
                            + self.mlss(t, i + 2, k) + 2 * u,
                        two(MultiLoop(1, k + 1, j - 2), Stem(i + 2, k)),
                    );
                }
                // (.(_)._)
                if i + 2 < k && k + 3 < j {
                    f(
                        ml(1, k + 2, j - 1) + init
                            + em.mismatch_coax(seq, i + 2, k, i, j)
                            + self.mlss(t, i + 2, k) + 2 * u,
                        two(MultiLoop(1, k + 2, j - 1), Stem(i + 2, k)),
                    );
                }
                // (_(_))
                if i + 2 < k && k + 1 < j {
                    f(
                        ml(1, i + 1, k - 1) + init
                            + em.flush_coax(seq, i, j, k, j - 1)
                            + self.mlss(t, k, j - 1),
                        two(MultiLoop(1, i + 1, k - 1), Stem(k, j - 1)),
                    );
                }
                // (._(_).)
                if i + 3 < k && k + 2 < j {
                    f(
                        ml(1, i + 2, k - 1) + init
                            + em.mismatch_coax(seq, i, j, k, j - 2)
                            + self.mlss(t, k, j - 2) + 2 * u,
                        two(MultiLoop(1, i + 2, k - 1), Stem(k, j - 2)),
                    );
                }
                // (_.(_).)
                if i + 3 < k && k + 2 < j {
                    f(
                        ml(1, i + 1, k - 2) + init
                            + em.mismatch_coax(seq, k, j - 2, i, j)
                            + self.mlss(t, k, j - 2) + 2 * u,
                        two(MultiLoop(1, i + 1, k - 2), Stem(k, j - 2)),
                    );
                }
            }
        }

        // Bulges and internal loops, stacks excluded.
        let max = self.config.max_two_loop;
        for k in (i + 1..j - 1).take_while(|k| k - i - 1 <= max) {
            let left = k - i - 1;
            for l in (k + 1..j).rev().take_while(|l| left + (j - l - 1) <= max) {
                if left + (j - l - 1) == 0 {
                    continue;
                }
                f(t.s[(k, l)] + em.two_loop(seq, i, k, l, j), one(Stem(k, l)));
            }
        }
    }

    /// Cx[i][j]: branches (i, k) and (k', j) in a coaxial stack, with at most
    /// one mismatched nucleotide on each side of the mismatched helix.
    pub fn coaxial<F>(&self, t: &DpTables, i: usize, j: usize, f: &mut F)
    where
        F: FnMut(Energy, Decomp),
    {
        use TraceState::*;
        if !self.config.stacking {
            return;
        }
        let (seq, em) = (self.seq, self.model);
        let u = em.ml_unpaired_cost();
        for k in (i + 1..).take_while(|k| k + 1 < j) {
            f(
                em.flush_coax(seq, i, k, k + 1, j) + self.mlss(t, i, k) + self.mlss(t, k + 1, j),
                two(Stem(i, k), Stem(k + 1, j)),
            );
            if i + 2 < k {
                f(
                    em.mismatch_coax(seq, i + 1, k - 1, k + 1, j)
                        + self.mlss(t, i + 1, k - 1) + self.mlss(t, k + 1, j) + 2 * u,
                    two(Stem(i + 1, k - 1), Stem(k + 1, j)),
                );
            }
            if k + 3 < j {
                f(
                    em.mismatch_coax(seq, k + 2, j - 1, i, k)
                        + self.mlss(t, i, k) + self.mlss(t, k + 2, j - 1) + 2 * u,
                    two(Stem(i, k), Stem(k + 2, j - 1)),
                );
            }
        }
    }

    /// ML[b][i][j]: a multi-loop fragment on [i, j] with at least b branches.
    pub fn multi_loop<F>(&self, t: &DpTables, b: usize, i: usize, j: usize, f: &mut F)
    where
        F: FnMut(Energy, Decomp),
    {
        use TraceState::*;
        let (seq, em) = (self.seq, self.model);
        let u = em.ml_unpaired_cost();
        let stacking = self.config.stacking;
        let ml = |b: usize, p: usize, q: usize| t.ml[(b, p, q)];

        f(ml(b, i, j - 1) + u, one(MultiLoop(b, i, j - 1)));

        if b < 2 {
            f(self.mlss(t, i, j), one(Stem(i, j)));
            if stacking {
                if i + 1 < j {
                    f(
                        self.mlss(t, i + 1, j) + em.five_dangle(seq, i + 1, j) + u,
                        one(Stem(i + 1, j)),
                    );
                    f(
                        self.mlss(t, i, j - 1) + em.three_dangle(seq, i, j - 1) + u,
                        one(Stem(i, j - 1)),
                    );
                }
                if i + 1 < j - 1 {
                    f(
                        self.mlss(t, i + 1, j - 1) + em.mismatch(seq, i + 1, j - 1) + 2 * u,
                        one(Stem(i + 1, j - 1)),
                    );
                }
            }
        }

        if stacking {
            f(t.cx[(i, j)], one(Coaxial(i, j)));
        }

        let bp = b.saturating_sub(1);
        for k in (i..).take_while(|k| k + 2 <= j) {
            let prefix = ml(bp, i, k);
            f(prefix + self.mlss(t, k + 1, j), two(MultiLoop(bp, i, k), Stem(k + 1, j)));
            if stacking {
                if k + 2 < j {
                    f(
                        prefix + self.mlss(t, k + 2, j) + em.five_dangle(seq, k + 2, j) + u,
                        two(MultiLoop(bp, i, k), Stem(k + 2, j)),
                    );
                }
                if k + 1 < j - 1 {
                    f(
                        prefix + self.mlss(t, k + 1, j - 1) + em.three_dangle(seq, k + 1, j - 1) + u,
                        two(MultiLoop(bp, i, k), Stem(k + 1, j - 1)),
                    );
                }
                if k + 2 < j - 1 {
                    f(
                        prefix + self.mlss(t, k + 2, j - 1) + em.mismatch(seq, k + 2, j - 1) + 2 * u,
                        two(MultiLoop(bp, i, k), Stem(k + 2, j - 1)),
                    );
                }
                f(ml(0, i, k) + t.cx[(k + 1, j)], two(MultiLoop(0, i, k), Coaxial(k + 1, j)));
            }
        }
    }

    /// E[i]: the exterior loop on [0, i], for i >= 1.
    pub fn external<F>(&self, t: &DpTables, i: usize, f: &mut F)
    where
        F: FnMut(Energy, Decomp),
    {
        use TraceState::*;
        let (seq, em) = (self.seq, self.model);

        f(t.e[i - 1], one(External(i - 1)));

        // s is the 5' end of the region following the prefix E[s-1].
        for s in 0..i {
            let pre = if s == 0 { 0 } else { t.e[s - 1] };
            f(pre + self.ss(t, s, i), with_prefix(one(Stem(s, i)), s));
            if !self.config.stacking {
                continue;
            }
            if s + 1 < i {
                f(
                    pre + self.ss(t, s + 1, i) + em.five_dangle(seq, s + 1, i),
                    with_prefix(one(Stem(s + 1, i)), s),
                );
                f(
                    pre + self.ss(t, s, i - 1) + em.three_dangle(seq, s, i - 1),
                    with_prefix(one(Stem(s, i - 1)), s),
                );
            }
            if s + 2 < i {
                f(
                    pre + self.ss(t, s + 1, i - 1) + em.mismatch(seq, s + 1, i - 1),
                    with_prefix(one(Stem(s + 1, i - 1)), s),
                );
            }
            for m in (s..).take_while(|m| m + 1 < i) {
                if s < m {
                    f(
                        pre + em.flush_coax(seq, s, m, m + 1, i)
                            + self.ss(t, s, m) + self.ss(t, m + 1, i),
                        with_prefix(two(Stem(s, m), Stem(m + 1, i)), s),
                    );
                }
                if s + 2 < m {
                    f(
                        pre + em.mismatch_coax(seq, s + 1, m - 1, m + 1, i)
                            + self.ss(t, s + 1, m - 1) + self.ss(t, m + 1, i),
                        with_prefix(two(Stem(s + 1, m - 1), Stem(m + 1, i)), s),
                    );
                }
                if s < m && m + 3 < i {
                    f(
                        pre + em.mismatch_coax(seq, m + 2, i - 1, s, m)
                            + self.ss(t, s, m) + self.ss(t, m + 2, i - 1),
                        with_prefix(two(Stem(s, m), Stem(m + 2, i - 1)), s),
                    );
                }
            }
        }
    }
}
