//! The PairTable: for every position, the partner it pairs with (if any).
//!
//! This is the representation returned by folding. It is always nested
//! (pseudoknot-free) when built through `TryFrom`, but mutable access is
//! available for code that builds structures pair by pair.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::Pair;
use crate::StructureError;
use crate::NAIDX;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairTable(pub Vec<Option<NAIDX>>);

impl Deref for PairTable {
    type Target = Vec<Option<NAIDX>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PairTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl PairTable {
    /// The open chain of length `n`.
    pub fn new(n: usize) -> Self {
        debug_assert!(n <= NAIDX::MAX as usize);
        PairTable(vec![None; n])
    }

    /// Record the pair (i, j) in both directions.
    pub fn set_pair(&mut self, i: usize, j: usize) {
        debug_assert!(i < j && j < self.len());
        debug_assert!(self[i].is_none() && self[j].is_none());
        self[i] = Some(j as NAIDX);
        self[j] = Some(i as NAIDX);
    }

    /// Partner of position `i`, if it is paired.
    pub fn partner(&self, i: usize) -> Option<usize> {
        self[i].map(|j| j as usize)
    }

    /// All pairs (i, j) with i < j, sorted by i.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.iter().enumerate().filter_map(|(i, &j_opt)| match j_opt {
            Some(j) if (j as usize) > i => Some(Pair::new(i as NAIDX, j)),
            _ => None,
        })
    }

    /// Number of base pairs.
    pub fn num_pairs(&self) -> usize {
        self.pairs().count()
    }

    /// The matching form: `m[i] == i` for unpaired positions, otherwise
    /// `m[i] == j` and `m[j] == i`.
    pub fn to_matching(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .map(|(i, j_opt)| j_opt.map_or(i, |j| j as usize))
            .collect()
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        if dbv.len() > NAIDX::MAX as usize {
            return Err(StructureError::TooLong(dbv.len()));
        }
        let mut table = vec![None; dbv.len()];
        let mut stack: Vec<usize> = Vec::new();
        for (j, db) in dbv.iter().enumerate() {
            match db {
                DotBracket::Unpaired => {}
                DotBracket::Open => stack.push(j),
                DotBracket::Close => {
                    let i = stack.pop().ok_or(StructureError::UnmatchedClose(j))?;
                    table[i] = Some(j as NAIDX);
                    table[j] = Some(i as NAIDX);
                }
            }
        }
        if let Some(i) = stack.pop() {
            return Err(StructureError::UnmatchedOpen(i));
        }
        Ok(PairTable(table))
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairTable::try_from(&DotBracketVec::try_from(s)?)
    }
}

impl fmt::Display for PairTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DotBracketVec::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_from_str() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt[0], Some(5));
        assert_eq!(pt[1], Some(4));
        assert_eq!(pt[2], None);
        assert_eq!(pt[5], Some(0));
        assert_eq!(pt.num_pairs(), 2);
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(PairTable::try_from("(()"), Err(StructureError::UnmatchedOpen(0)));
        assert_eq!(PairTable::try_from("())"), Err(StructureError::UnmatchedClose(2)));
    }

    #[test]
    fn test_matching() {
        let pt = PairTable::try_from(".(.)").unwrap();
        assert_eq!(pt.to_matching(), vec![0, 3, 2, 1]);
        assert!(PairTable::new(0).to_matching().is_empty());
    }

    #[test]
    fn test_set_pair_and_display() {
        let mut pt = PairTable::new(8);
        pt.set_pair(1, 7);
        pt.set_pair(2, 6);
        assert_eq!(pt.to_string(), ".((...))");
        assert_eq!(pt.partner(6), Some(2));
        assert_eq!(pt.partner(0), None);
        let pairs: Vec<Pair> = pt.pairs().collect();
        assert_eq!(pairs, vec![Pair::new(1, 7), Pair::new(2, 6)]);
    }
}
