//! Nearest-neighbor parameter tables.
//!
//! The built-in parameterization follows the 2004 Turner rules in a compact
//! form: stacking, dangles, loop initiation by size (with logarithmic
//! extrapolation beyond the tabulated range), terminal AU/GU penalties and a
//! handful of special hairpin and internal loop terms. Terminal mismatches
//! are modeled as the sum of the two dangles.
//!
//! Tables can be written to and read from JSON, which allows experimenting
//! with alternative parameter sets without recompiling.

use std::fs;
use std::path::Path;
use log::debug;
use serde::Deserialize;
use serde::Serialize;

use sf_structure::NAIDX;

use crate::check_parameter;
use crate::Energy;
use crate::EnergyError;
use crate::MAX_MFE;

/// Initiation costs of a loop type, indexed by loop size starting at `first`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopInitiation {
    pub first: usize,
    pub values: Vec<Energy>,
}

impl LoopInitiation {
    /// The initiation cost of a loop with `n` unpaired nucleotides.
    /// Sizes below `first` are infeasible; sizes past the table are
    /// extrapolated as `values[last] + round(scale * ln(n / last))`.
    pub fn cost(&self, n: usize, scale: f64) -> Energy {
        if n < self.first || self.values.is_empty() {
            return MAX_MFE;
        }
        let idx = n - self.first;
        if let Some(&e) = self.values.get(idx) {
            return e;
        }
        let last = self.first + self.values.len() - 1;
        let tail = self.values[self.values.len() - 1];
        tail.saturating_add((scale * (n as f64 / last as f64).ln()).round() as Energy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyTables {
    /// `stack[p1][p2]` for 5' a c 3' / 3' b d 5', where p1 = (a, b) and
    /// p2 = (c, d), both indexed by `PairType`.
    pub stack: [[Energy; 6]; 6],
    /// `dangle3[(p, q)][x]`: nucleotide x dangling 3' of p in the pair (p, q).
    pub dangle3: [[Energy; 4]; 6],
    /// `dangle5[(p, q)][y]`: nucleotide y dangling 5' of q in the pair (p, q).
    pub dangle5: [[Energy; 4]; 6],

    pub hairpin_init: LoopInitiation,
    pub bulge_init: LoopInitiation,
    pub internal_init: LoopInitiation,
    /// Scale of the logarithmic loop extrapolation.
    pub loop_extrapolation: f64,

    pub terminal_au_gu: Energy,

    pub hairpin_uu_mismatch: Energy,
    pub hairpin_ga_mismatch: Energy,
    pub hairpin_gg_mismatch: Energy,
    pub hairpin_special_gu_closure: Energy,
    pub hairpin_c3_loop: Energy,
    pub hairpin_c_slope: Energy,
    pub hairpin_c_intercept: Energy,

    pub internal_asymmetry: Energy,
    pub internal_au_gu_closure: Energy,
    pub internal_ga_mismatch: Energy,
    pub internal_uu_mismatch: Energy,

    /// Bonus on top of the terminal mismatch for mismatch-mediated
    /// coaxial stacking.
    pub mismatch_coax_bonus: Energy,
}

impl Default for EnergyTables {
    fn default() -> Self {
        EnergyTables {
            //        AU   CG   GC   GU   UA   UG
            stack: [
                [ -9, -22, -21,  -6, -11, -14], // AU
                [-21, -33, -24, -14, -21, -21], // CG
                [-24, -34, -33, -15, -22, -25], // GC
                [-13, -25, -21,  -5, -14,  13], // GU
                [-13, -24, -21, -10,  -9, -13], // UA
                [-10, -15, -14,   3,  -6,  -5], // UG
            ],
            //          A    C    G    U
            dangle3: [
                [ -7,  -1,  -7,  -1], // AU
                [-11,  -4, -13,  -6], // CG
                [-17,  -8, -17, -12], // GC
                [ -7,  -1,  -7,  -1], // GU
                [ -8,  -5,  -8,  -6], // UA
                [ -8,  -5,  -8,  -6], // UG
            ],
            dangle5: [
                [ -3,  -3,  -4,  -2], // AU
                [ -2,  -3,   0,   0], // CG
                [ -5,  -3,  -2,  -3], // GC
                [ -3,  -3,  -4,  -2], // GU
                [ -3,  -1,  -2,  -2], // UA
                [ -3,  -1,  -2,  -2], // UG
            ],
            hairpin_init: LoopInitiation {
                first: 3,
                values: vec![54, 56, 57, 54, 60, 55, 64],
            },
            bulge_init: LoopInitiation {
                first: 1,
                values: vec![38, 28, 32, 36, 40, 44, 46, 47, 48, 49],
            },
            internal_init: LoopInitiation {
                first: 2,
                values: vec![5, 16, 11, 20, 20, 22, 23, 24, 25],
            },
            loop_extrapolation: 10.7856,
            terminal_au_gu: 5,
            hairpin_uu_mismatch: -9,
            hairpin_ga_mismatch: -8,
            hairpin_gg_mismatch: -8,
            hairpin_special_gu_closure: -22,
            hairpin_c3_loop: 15,
            hairpin_c_slope: 3,
            hairpin_c_intercept: 16,
            internal_asymmetry: 6,
            internal_au_gu_closure: 7,
            internal_ga_mismatch: -8,
            internal_uu_mismatch: -7,
            mismatch_coax_bonus: -21,
        }
    }
}

impl EnergyTables {
    /// Reads a parameter set from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, EnergyError> {
        let path = path.as_ref();
        debug!("Loading energy tables from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, EnergyError> {
        let tables: EnergyTables = serde_json::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn to_json_string(&self) -> Result<String, EnergyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the loop tables are usable and that no parameter, including
    /// extrapolated loop costs up to the longest foldable sequence, reaches
    /// [`MAX_PARAMETER`](crate::MAX_PARAMETER).
    pub fn validate(&self) -> Result<(), EnergyError> {
        if !self.loop_extrapolation.is_finite() {
            return Err(EnergyError::InvalidParameters(format!(
                "loop_extrapolation must be finite, got {}",
                self.loop_extrapolation
            )));
        }
        for (name, init) in [
            ("hairpin_init", &self.hairpin_init),
            ("bulge_init", &self.bulge_init),
            ("internal_init", &self.internal_init),
        ] {
            if init.values.is_empty() {
                return Err(EnergyError::InvalidParameters(format!("{name} has no values")));
            }
            if init.first == 0 {
                return Err(EnergyError::InvalidParameters(format!("{name} must start at size >= 1")));
            }
            for (k, &e) in init.values.iter().enumerate() {
                check_parameter(&format!("{name}[{}]", init.first + k), e)?;
            }
            let longest = NAIDX::MAX as usize;
            if longest >= init.first + init.values.len() {
                let e = init.cost(longest, self.loop_extrapolation);
                check_parameter(&format!("{name} extrapolated to size {longest}"), e)?;
            }
        }

        let pairs = ["AU", "CG", "GC", "GU", "UA", "UG"];
        for (p, row) in self.stack.iter().enumerate() {
            for (q, &e) in row.iter().enumerate() {
                check_parameter(&format!("stack[{}][{}]", pairs[p], pairs[q]), e)?;
            }
        }
        for (name, table) in [("dangle3", &self.dangle3), ("dangle5", &self.dangle5)] {
            for (p, row) in table.iter().enumerate() {
                for (x, &e) in row.iter().enumerate() {
                    check_parameter(&format!("{name}[{}][{}]", pairs[p], "ACGU".as_bytes()[x] as char), e)?;
                }
            }
        }

        for (name, e) in [
            ("terminal_au_gu", self.terminal_au_gu),
            ("hairpin_uu_mismatch", self.hairpin_uu_mismatch),
            ("hairpin_ga_mismatch", self.hairpin_ga_mismatch),
            ("hairpin_gg_mismatch", self.hairpin_gg_mismatch),
            ("hairpin_special_gu_closure", self.hairpin_special_gu_closure),
            ("hairpin_c3_loop", self.hairpin_c3_loop),
            ("hairpin_c_slope", self.hairpin_c_slope),
            ("hairpin_c_intercept", self.hairpin_c_intercept),
            ("internal_asymmetry", self.internal_asymmetry),
            ("internal_au_gu_closure", self.internal_au_gu_closure),
            ("internal_ga_mismatch", self.internal_ga_mismatch),
            ("internal_uu_mismatch", self.internal_uu_mismatch),
            ("mismatch_coax_bonus", self.mismatch_coax_bonus),
        ] {
            check_parameter(name, e)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_loop_initiation() {
        let t = EnergyTables::default();
        let s = t.loop_extrapolation;
        assert_eq!(t.hairpin_init.cost(2, s), MAX_MFE);
        assert_eq!(t.hairpin_init.cost(3, s), 54);
        assert_eq!(t.hairpin_init.cost(9, s), 64);
        // 64 + round(10.7856 * ln(18/9)) = 64 + 7
        assert_eq!(t.hairpin_init.cost(18, s), 71);
        assert_eq!(t.bulge_init.cost(1, s), 38);
        assert_eq!(t.internal_init.cost(2, s), 5);
        assert_eq!(t.internal_init.cost(4, s), 11);
    }

    #[test]
    fn test_json_roundtrip() {
        let t = EnergyTables::default();
        let json = t.to_json_string().unwrap();
        let u = EnergyTables::from_json_str(&json).unwrap();
        assert_eq!(t, u);
    }

    #[test]
    fn test_json_file() {
        let mut t = EnergyTables::default();
        t.terminal_au_gu = 4;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(t.to_json_string().unwrap().as_bytes()).unwrap();
        let u = EnergyTables::from_json_file(file.path()).unwrap();
        assert_eq!(u.terminal_au_gu, 4);
    }

    #[test]
    fn test_invalid_tables() {
        let mut t = EnergyTables::default();
        t.hairpin_init.values.clear();
        let json = serde_json::to_string(&t).unwrap();
        assert!(matches!(
            EnergyTables::from_json_str(&json),
            Err(EnergyError::InvalidParameters(_))
        ));
        assert!(matches!(
            EnergyTables::from_json_str("{ not json"),
            Err(EnergyError::Json(_))
        ));
        assert!(matches!(
            EnergyTables::from_json_file("/nonexistent/params.json"),
            Err(EnergyError::Io(_))
        ));
    }

    fn out_of_range(t: &EnergyTables) -> bool {
        matches!(t.validate(), Err(EnergyError::OutOfRange { .. }))
    }

    #[test]
    fn test_out_of_range_table_entries() {
        let big = crate::MAX_PARAMETER;
        assert!(EnergyTables::default().validate().is_ok());

        let mut t = EnergyTables::default();
        t.stack[2][1] = big;
        assert!(out_of_range(&t));

        let mut t = EnergyTables::default();
        t.dangle3[0][3] = -big;
        assert!(out_of_range(&t));

        let mut t = EnergyTables::default();
        t.dangle5[5][0] = i32::MIN;
        assert!(out_of_range(&t));

        let mut t = EnergyTables::default();
        t.bulge_init.values[4] = big;
        assert!(out_of_range(&t));

        let mut t = EnergyTables::default();
        t.mismatch_coax_bonus = -2_000_000_000;
        assert!(out_of_range(&t));
        let json = serde_json::to_string(&t).unwrap();
        assert!(matches!(
            EnergyTables::from_json_str(&json),
            Err(EnergyError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_out_of_range_extrapolation() {
        let mut t = EnergyTables::default();
        t.loop_extrapolation = f64::NAN;
        assert!(matches!(t.validate(), Err(EnergyError::InvalidParameters(_))));
        t.loop_extrapolation = f64::INFINITY;
        assert!(matches!(t.validate(), Err(EnergyError::InvalidParameters(_))));

        // Finite, but long loops would cost more than any parameter may.
        t.loop_extrapolation = 1e7;
        assert!(out_of_range(&t));
    }
}
