//! Dot-bracket notation for nested secondary structures.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;

use crate::PairTable;
use crate::StructureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DotBracket {
    Unpaired,
    Open,
    Close,
}

impl TryFrom<char> for DotBracket {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            _ => Err(c),
        }
    }
}

impl From<DotBracket> for char {
    fn from(db: DotBracket) -> Self {
        match db {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
        }
    }
}

/// A structure as a vector of dot-bracket symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl Deref for DotBracketVec {
    type Target = Vec<DotBracket>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DotBracketVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.chars()
            .enumerate()
            .map(|(position, c)| {
                DotBracket::try_from(c)
                    .map_err(|symbol| StructureError::InvalidSymbol { symbol, position })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DotBracketVec)
    }
}

impl From<&PairTable> for DotBracketVec {
    fn from(pt: &PairTable) -> Self {
        let dbv = pt
            .iter()
            .enumerate()
            .map(|(i, &j_opt)| match j_opt {
                None => DotBracket::Unpaired,
                Some(j) if (j as usize) > i => DotBracket::Open,
                Some(_) => DotBracket::Close,
            })
            .collect();
        DotBracketVec(dbv)
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &db in self.iter() {
            write!(f, "{}", char::from(db))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotbracket_roundtrip() {
        let dbv = DotBracketVec::try_from("((..)).").unwrap();
        assert_eq!(dbv.len(), 7);
        assert_eq!(dbv[0], DotBracket::Open);
        assert_eq!(dbv[4], DotBracket::Close);
        assert_eq!(dbv[6], DotBracket::Unpaired);
        assert_eq!(format!("{}", dbv), "((..)).");
    }

    #[test]
    fn test_invalid_symbol() {
        let err = DotBracketVec::try_from("((.x))").unwrap_err();
        assert_eq!(err, StructureError::InvalidSymbol { symbol: 'x', position: 3 });
    }

    #[test]
    fn test_from_pair_table() {
        let pt = PairTable::try_from(".((...))").unwrap();
        let dbv = DotBracketVec::from(&pt);
        assert_eq!(dbv.to_string(), ".((...))");
    }
}
