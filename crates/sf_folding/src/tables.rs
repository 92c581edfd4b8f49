use ndarray::Array1;
use ndarray::Array2;
use ndarray::Array3;
use sf_energy::Energy;

/// The dynamic programming tables of one fold.
///
/// Every entry is either a finite optimum or the model's `max_mfe()`
/// sentinel, meaning the sub-problem has no valid decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct DpTables {
    /// Helix whose outermost pair is (i, j).
    pub(crate) s: Array2<Energy>,
    /// Non-stacking loop closed by (i, j).
    pub(crate) l: Array2<Energy>,
    /// Multi-loop fragment on [i, j] with at least b branches.
    pub(crate) ml: Array3<Energy>,
    /// Two coaxially stacked branches spanning [i, j].
    pub(crate) cx: Array2<Energy>,
    /// Exterior loop fragment on [0, i].
    pub(crate) e: Array1<Energy>,
}

impl DpTables {
    pub fn new(n: usize, inf: Energy) -> Self {
        let mut e = Array1::from_elem(n, inf);
        if n > 0 {
            e[0] = 0;
        }
        DpTables {
            s: Array2::from_elem((n, n), inf),
            l: Array2::from_elem((n, n), inf),
            ml: Array3::from_elem((3, n, n), inf),
            cx: Array2::from_elem((n, n), inf),
            e,
        }
    }

    pub fn len(&self) -> usize {
        self.e.len()
    }

    pub fn is_empty(&self) -> bool {
        self.e.is_empty()
    }

    pub fn stem(&self, i: usize, j: usize) -> Energy {
        self.s[(i, j)]
    }

    pub fn closed_loop(&self, i: usize, j: usize) -> Energy {
        self.l[(i, j)]
    }

    pub fn multi_loop(&self, b: usize, i: usize, j: usize) -> Energy {
        self.ml[(b, i, j)]
    }

    pub fn coaxial(&self, i: usize, j: usize) -> Energy {
        self.cx[(i, j)]
    }

    pub fn exterior(&self, i: usize) -> Energy {
        self.e[i]
    }
}
