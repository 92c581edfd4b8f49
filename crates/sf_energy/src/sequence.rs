//! Nucleotide sequences and the canonical pairing rules.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;
use std::str::FromStr;

use crate::EnergyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    C,
    G,
    U,
}

impl Base {
    /// Column index into the dangle tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<char> for Base {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Base::A),
            'C' => Ok(Base::C),
            'G' => Ok(Base::G),
            'U' | 'T' => Ok(Base::U),
            _ => Err(c),
        }
    }
}

impl From<Base> for char {
    fn from(b: Base) -> Self {
        match b {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::U => 'U',
        }
    }
}

/// The six canonical pair types, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairType {
    AU,
    CG,
    GC,
    GU,
    UA,
    UG,
}

impl PairType {
    /// Row/column index into the stacking and dangle tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pairs that carry the terminal AU/GU penalty.
    pub fn is_au_gu(self) -> bool {
        !matches!(self, PairType::CG | PairType::GC)
    }
}

/// The pair type of a 5' base `a` pairing with a 3' base `b`, if canonical.
pub fn pair_type(a: Base, b: Base) -> Option<PairType> {
    match (a, b) {
        (Base::A, Base::U) => Some(PairType::AU),
        (Base::C, Base::G) => Some(PairType::CG),
        (Base::G, Base::C) => Some(PairType::GC),
        (Base::G, Base::U) => Some(PairType::GU),
        (Base::U, Base::A) => Some(PairType::UA),
        (Base::U, Base::G) => Some(PairType::UG),
        _ => None,
    }
}

/// Watson-Crick and GU wobble pairs.
pub fn valid_pair(a: Base, b: Base) -> bool {
    pair_type(a, b).is_some()
}

/// True if (i, j) can neither stack inward on (i+1, j-1) without violating
/// the minimum hairpin size, nor outward on (i-1, j+1).
pub fn must_be_lonely_pair(seq: &[Base], i: usize, j: usize, min_hairpin: usize) -> bool {
    debug_assert!(i < j && j < seq.len());
    let inward = i + 1 < j
        && valid_pair(seq[i + 1], seq[j - 1])
        && (j - 1) - (i + 1) > min_hairpin;
    let outward = i > 0 && j + 1 < seq.len() && valid_pair(seq[i - 1], seq[j + 1]);
    !inward && !outward
}

/// An RNA sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NucleotideVec(pub Vec<Base>);

impl Deref for NucleotideVec {
    type Target = Vec<Base>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for NucleotideVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for NucleotideVec {
    type Error = EnergyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .enumerate()
            .map(|(position, c)| {
                Base::try_from(c).map_err(|symbol| EnergyError::InvalidNucleotide { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(NucleotideVec)
    }
}

impl FromStr for NucleotideVec {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NucleotideVec::try_from(s)
    }
}

impl fmt::Display for NucleotideVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.iter() {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> NucleotideVec {
        NucleotideVec::try_from(s).unwrap()
    }

    #[test]
    fn test_parse_sequence() {
        let s = seq("acgTU");
        assert_eq!(s.0, vec![Base::A, Base::C, Base::G, Base::U, Base::U]);
        assert_eq!(s.to_string(), "ACGUU");
        assert!(seq("").is_empty());
    }

    #[test]
    fn test_invalid_nucleotide() {
        match NucleotideVec::try_from("ACNG") {
            Err(EnergyError::InvalidNucleotide { symbol, position }) => {
                assert_eq!(symbol, 'N');
                assert_eq!(position, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_valid_pairs() {
        let bases = [Base::A, Base::C, Base::G, Base::U];
        let valid: Vec<(Base, Base)> = bases
            .iter()
            .flat_map(|&a| bases.iter().map(move |&b| (a, b)))
            .filter(|&(a, b)| valid_pair(a, b))
            .collect();
        assert_eq!(valid.len(), 6);
        assert!(valid_pair(Base::G, Base::U));
        assert!(valid_pair(Base::U, Base::G));
        assert!(!valid_pair(Base::A, Base::C));
        assert!(pair_type(Base::A, Base::U).unwrap().is_au_gu());
        assert!(!pair_type(Base::C, Base::G).unwrap().is_au_gu());
    }

    #[test]
    fn test_lonely_pairs() {
        // (0,8) can stack inward on (1,7).
        let s = seq("GGAAAAACC");
        assert!(!must_be_lonely_pair(&s, 0, 8, 3));
        // (1,7) can stack outward on (0,8).
        assert!(!must_be_lonely_pair(&s, 1, 7, 3));
        // Nothing to stack on.
        let s = seq("AGAAAACA");
        assert!(must_be_lonely_pair(&s, 1, 6, 3));
        // Inward stack would leave a hairpin that is too small.
        let s = seq("GGAACC");
        assert!(must_be_lonely_pair(&s, 0, 5, 3));
    }

    #[test]
    fn test_lonely_pairs_mixed() {
        let s = seq("AUCGAUGCGUAGGGGC");
        assert!(must_be_lonely_pair(&s, 4, 5, 3));
        assert!(!must_be_lonely_pair(&s, 3, 7, 3));
        assert!(must_be_lonely_pair(&s, 1, 10, 3));
        assert!(must_be_lonely_pair(&s, 7, 11, 3));
        assert!(!must_be_lonely_pair(&s, 2, 8, 3));
    }
}
