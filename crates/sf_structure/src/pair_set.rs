//! Base pairs as packed integer keys, and sets of them.
//!
//! Scoring a prediction against a reference only needs set operations on
//! pairs, so a structure is reduced to the keys of its pairs.

use std::fmt;
use nohash_hasher::IntSet;

use crate::PairTable;
use crate::NAIDX;
use crate::P1KEY;

/// A base pair (i, j) with i < j.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    i: NAIDX,
    j: NAIDX,
}

impl Pair {
    /// Panics in debug builds unless `i < j`.
    pub fn new(i: NAIDX, j: NAIDX) -> Self {
        debug_assert!(i < j, "pair ({i}, {j}) is not ordered");
        Pair { i, j }
    }

    /// 5' position.
    pub fn i(&self) -> NAIDX {
        self.i
    }

    /// 3' position.
    pub fn j(&self) -> NAIDX {
        self.j
    }

    /// (i, j) as table indices.
    pub fn ij(&self) -> (usize, usize) {
        (self.i as usize, self.j as usize)
    }

    /// i in the high half, j in the low half of the key.
    pub fn key(&self) -> P1KEY {
        (P1KEY::from(self.i) << NAIDX::BITS) | P1KEY::from(self.j)
    }

    /// Inverse of [`Pair::key`].
    pub fn from_key(key: P1KEY) -> Self {
        Pair::new((key >> NAIDX::BITS) as NAIDX, key as NAIDX)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.i, self.j)
    }
}

/// The pairs of a structure on a sequence of `length` nucleotides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSet {
    length: usize,
    keys: IntSet<P1KEY>,
}

impl PairSet {
    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Length of the sequence the pairs belong to.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn contains(&self, pair: &Pair) -> bool {
        self.keys.contains(&pair.key())
    }

    /// The pairs sorted by i.
    pub fn to_vec(&self) -> Vec<Pair> {
        let mut keys: Vec<P1KEY> = self.keys.iter().copied().collect();
        keys.sort_unstable();
        keys.into_iter().map(Pair::from_key).collect()
    }

    /// Number of pairs present in both sets.
    pub fn common(&self, other: &PairSet) -> usize {
        self.keys.intersection(&other.keys).count()
    }
}

impl From<&PairTable> for PairSet {
    fn from(pt: &PairTable) -> Self {
        PairSet {
            length: pt.len(),
            keys: pt.pairs().map(|p| p.key()).collect(),
        }
    }
}

impl fmt::Display for PairSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs: Vec<String> = self.to_vec().iter().map(Pair::to_string).collect();
        write!(f, "{}", pairs.join(","))
    }
}

/// Pair-level accuracy of a predicted structure with respect to a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairStatistics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl PairStatistics {
    /// Counts matches between two structures on the same sequence.
    pub fn compare(reference: &PairSet, predicted: &PairSet) -> Self {
        debug_assert_eq!(reference.length(), predicted.length());
        let tp = reference.common(predicted);
        Self {
            true_positives: tp,
            false_positives: predicted.len() - tp,
            false_negatives: reference.len() - tp,
        }
    }

    /// Fraction of reference pairs that were predicted (0 if there are none).
    pub fn sensitivity(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Fraction of predicted pairs that are in the reference (0 if there are none).
    pub fn ppv(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Harmonic mean of sensitivity and PPV.
    pub fn f1_score(&self) -> f64 {
        let (s, p) = (self.sensitivity(), self.ppv());
        if s + p <= 0.0 {
            0.0
        } else {
            2.0 * s * p / (s + p)
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
