//! Loop and stem decomposition of a nested structure.
//!
//! Every pair (i, j) closes exactly one loop: the positions i < k < j that
//! are not enclosed by any other pair inside (i, j). Pairs whose loop is a
//! single directly stacked pair (i+1, j-1) are grouped into stems instead.

use crate::Pair;
use crate::PairTable;
use crate::NAIDX;

/// A loop of a secondary structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    /// The closing pair, `None` for the exterior loop.
    pub closing: Option<Pair>,
    /// Pairs directly enclosed by the loop, 5' to 3'.
    pub branches: Vec<Pair>,
    /// Number of unpaired nucleotides in the loop.
    pub unpaired: usize,
}

impl Loop {
    pub fn is_exterior(&self) -> bool {
        self.closing.is_none()
    }

    pub fn is_hairpin(&self) -> bool {
        self.closing.is_some() && self.branches.is_empty()
    }

    /// Stacks, bulges and internal loops.
    pub fn is_two_loop(&self) -> bool {
        self.closing.is_some() && self.branches.len() == 1
    }

    pub fn is_multi_loop(&self) -> bool {
        self.closing.is_some() && self.branches.len() > 1
    }

    /// A two-loop without unpaired nucleotides.
    pub fn is_stack(&self) -> bool {
        self.is_two_loop() && self.unpaired == 0
    }
}

/// A maximal helix of directly stacked pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stem {
    /// The outermost pair of the helix.
    pub outer: Pair,
    /// Number of pairs in the helix (>= 1).
    pub length: usize,
}

impl Stem {
    /// The innermost pair of the helix.
    pub fn inner(&self) -> Pair {
        let d = (self.length - 1) as NAIDX;
        Pair::new(self.outer.i() + d, self.outer.j() - d)
    }

    /// All pairs of the helix, outermost first.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        (0..self.length as NAIDX).map(|d| Pair::new(self.outer.i() + d, self.outer.j() - d))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopDecomposition {
    exterior: Loop,
    loops: Vec<Loop>,
    stems: Vec<Stem>,
}

impl LoopDecomposition {
    /// The exterior loop (always present, possibly without branches).
    pub fn exterior(&self) -> &Loop {
        &self.exterior
    }

    /// All loops closed by a pair that is not a pure stack, sorted by
    /// closing pair.
    pub fn loops(&self) -> &[Loop] {
        &self.loops
    }

    /// Maximal stems, sorted by their outer pair.
    pub fn stems(&self) -> &[Stem] {
        &self.stems
    }
}

/// Walks the positions strictly between `start` and `end`, collecting
/// branches and counting unpaired nucleotides.
fn scan_loop(pt: &PairTable, closing: Option<Pair>, start: usize, end: usize) -> Loop {
    let mut branches = Vec::new();
    let mut unpaired = 0;
    let mut k = start;
    while k < end {
        match pt.partner(k) {
            Some(l) if l > k => {
                branches.push(Pair::new(k as NAIDX, l as NAIDX));
                k = l + 1;
            }
            _ => {
                unpaired += 1;
                k += 1;
            }
        }
    }
    Loop { closing, branches, unpaired }
}

fn stacked_on(pt: &PairTable, i: usize, j: usize) -> bool {
    i + 1 < j && pt.partner(i + 1) == Some(j - 1)
}

impl From<&PairTable> for LoopDecomposition {
    fn from(pt: &PairTable) -> Self {
        let exterior = scan_loop(pt, None, 0, pt.len());
        let mut loops = Vec::new();
        let mut stems = Vec::new();

        for pair in pt.pairs() {
            let (i, j) = pair.ij();
            let lp = scan_loop(pt, Some(pair), i + 1, j);
            if !lp.is_stack() {
                loops.push(lp);
            }
            let continues_outward = i > 0 && j + 1 < pt.len() && pt.partner(i - 1) == Some(j + 1);
            if !continues_outward {
                let mut length = 1;
                while stacked_on(pt, i + length - 1, j + 1 - length) {
                    length += 1;
                }
                stems.push(Stem { outer: pair, length });
            }
        }
        Self { exterior, loops, stems }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_chain() {
        let ld = LoopDecomposition::from(&PairTable::try_from("....").unwrap());
        assert!(ld.exterior().is_exterior());
        assert!(ld.exterior().branches.is_empty());
        assert_eq!(ld.exterior().unpaired, 4);
        assert!(ld.loops().is_empty());
        assert!(ld.stems().is_empty());
    }

    #[test]
    fn test_hairpin_stem() {
        let ld = LoopDecomposition::from(&PairTable::try_from(".((...))").unwrap());
        assert_eq!(ld.exterior().branches, vec![Pair::new(1, 7)]);
        assert_eq!(ld.exterior().unpaired, 1);
        assert_eq!(ld.loops().len(), 1);
        let hp = &ld.loops()[0];
        assert!(hp.is_hairpin());
        assert_eq!(hp.closing, Some(Pair::new(2, 6)));
        assert_eq!(hp.unpaired, 3);
        assert_eq!(ld.stems(), &[Stem { outer: Pair::new(1, 7), length: 2 }]);
        assert_eq!(ld.stems()[0].inner(), Pair::new(2, 6));
    }

    #[test]
    fn test_multi_loop() {
        let ld = LoopDecomposition::from(&PairTable::try_from("((.((...))..((...))..)).").unwrap());
        let ml: Vec<&Loop> = ld.loops().iter().filter(|l| l.is_multi_loop()).collect();
        assert_eq!(ml.len(), 1);
        assert_eq!(ml[0].closing, Some(Pair::new(1, 21)));
        assert_eq!(ml[0].branches, vec![Pair::new(3, 9), Pair::new(12, 18)]);
        assert_eq!(ml[0].unpaired, 5);
        assert_eq!(ld.loops().iter().filter(|l| l.is_hairpin()).count(), 2);
        let lengths: Vec<usize> = ld.stems().iter().map(|s| s.length).collect();
        assert_eq!(lengths, vec![2, 2, 2]);
    }

    #[test]
    fn test_stem_lengths() {
        let pt = PairTable::try_from("((..((...))..(....).))..((((.((...))))))").unwrap();
        let ld = LoopDecomposition::from(&pt);
        let lengths: Vec<usize> = ld.stems().iter().map(|s| s.length).collect();
        assert_eq!(lengths, vec![2, 2, 1, 4, 2]);
        let stacked: usize = lengths.iter().sum();
        assert_eq!(stacked, pt.num_pairs());
    }

    #[test]
    fn test_interior_loop_splits_stems() {
        let ld = LoopDecomposition::from(&PairTable::try_from("((.((...)).))").unwrap());
        assert_eq!(ld.stems().len(), 2);
        let il = ld.loops().iter().find(|l| l.is_two_loop()).unwrap();
        assert_eq!(il.closing, Some(Pair::new(1, 11)));
        assert_eq!(il.unpaired, 2);
        assert!(!il.is_stack());
        let pairs: Vec<Pair> = ld.stems()[0].pairs().collect();
        assert_eq!(pairs, vec![Pair::new(0, 12), Pair::new(1, 11)]);
    }
}
