//! # CNF Encodings for Cardinality Constraints
//!
//! The module contains the sequential counter encoding for lower bounding
//! cardinality constraints (`x1 + x2 + ... + xn >= k`) and a dispatching helper
//! picking the cheapest correct encoding for a given bound.
//!
//! ## Example Usage
//!
//! ```
//! use satenc::{
//!     encodings::card::SequentialCounters,
//!     instances::{BasicVarManager, Cnf, ManageVars},
//!     lit, var,
//! };
//!
//! let mut var_manager = BasicVarManager::from_next_free(var![3]);
//! let mut encoding = Cnf::new();
//! let mut enc = SequentialCounters::from(vec![lit![0], lit![1], lit![2]]);
//! let counter = enc.encode_lb(2, &mut encoding, &mut var_manager);
//! assert_eq!(counter.n_rows(), 3);
//! assert_eq!(counter.n_cols(), 3);
//! assert_eq!(var_manager.n_used(), 12);
//! ```

use std::fmt;

use crate::{
    encodings::{atomics, CollectClauses},
    instances::ManageVars,
    types::{Lit, Var},
};

mod sequentialcounters;
pub use sequentialcounters::SequentialCounters;

/// The auxiliary variables of a sequential counter. The variable in row `j`
/// and column `i` is true if at least `j` of the first `i + 1` input literals
/// are true. Rows range from `0` to `k` (inclusive), columns from `0` to
/// `n - 1`.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CounterMatrix {
    /// Row-major storage of the counter variables
    vars: Vec<Var>,
    n_cols: usize,
}

impl CounterMatrix {
    pub(crate) fn new(rows: Vec<Vec<Var>>, n_cols: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == n_cols));
        Self {
            vars: rows.into_iter().flatten().collect(),
            n_cols,
        }
    }

    /// Gets the number of rows, the bound of the encoding plus one
    #[must_use]
    pub fn n_rows(&self) -> usize {
        if self.n_cols == 0 {
            return 0;
        }
        self.vars.len() / self.n_cols
    }

    /// Gets the number of columns, equal to the number of input literals
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Gets the counter variable at `row` and `col`
    ///
    /// # Panics
    ///
    /// If `row` or `col` is out of range.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Var {
        assert!(col < self.n_cols, "counter column out of range");
        self.vars[row * self.n_cols + col]
    }

    /// Gets the positive literal of the counter variable at `row` and `col`
    ///
    /// # Panics
    ///
    /// If `row` or `col` is out of range.
    #[must_use]
    pub fn lit(&self, row: usize, col: usize) -> Lit {
        self.get(row, col).pos_lit()
    }

    /// Gets one row of the counter
    ///
    /// # Panics
    ///
    /// If `row` is out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Var] {
        &self.vars[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Gets the variable that is forced true to enforce the bound, i.e., the
    /// last column of the last row.
    ///
    /// # Panics
    ///
    /// If the counter is empty.
    #[must_use]
    pub fn output(&self) -> Var {
        *self.vars.last().expect("empty counter matrix")
    }

    /// Iterates over all counter variables in row-major order
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Var>> {
        self.vars.iter().copied()
    }
}

impl fmt::Debug for CounterMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..self.n_rows()).map(|r| self.row(r)))
            .finish()
    }
}

/// Encodes `lits[0] + ... + lits[n-1] >= lb` into `collector`.
///
/// - `lb == 0` is trivially satisfied and nothing is added,
/// - `lb == 1` adds a single disjunction over `lits`,
/// - otherwise a [`SequentialCounters`] encoding is built and its counter
///   variables are returned.
///
/// # Panics
///
/// If `lb > 0` and `lits` is empty, since the encoding would be the empty
/// clause.
pub fn encode_at_least<Col>(
    lits: &[Lit],
    lb: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Option<CounterMatrix>
where
    Col: CollectClauses,
{
    assert!(
        lb == 0 || !lits.is_empty(),
        "at-least-{lb} constraint requires at least one input literal"
    );
    match lb {
        0 => None,
        1 => {
            collector.add_clause(atomics::disjunction(lits));
            None
        }
        _ => {
            let mut enc = SequentialCounters::from(lits.to_vec());
            Some(enc.encode_lb(lb, collector, var_manager))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_at_least, CounterMatrix};
    use crate::{
        clause,
        instances::{BasicVarManager, Cnf, ManageVars},
        lit, var,
    };

    #[test]
    fn matrix_layout() {
        let matrix = CounterMatrix::new(
            vec![vec![var![3], var![4]], vec![var![5], var![6]], vec![var![7], var![8]]],
            2,
        );
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 2);
        assert_eq!(matrix.get(1, 0), var![5]);
        assert_eq!(matrix.lit(2, 1), lit![8]);
        assert_eq!(matrix.row(2), &[var![7], var![8]]);
        assert_eq!(matrix.output(), var![8]);
        assert_eq!(matrix.iter().count(), 6);
    }

    #[test]
    #[should_panic(expected = "counter column out of range")]
    fn matrix_column_out_of_range() {
        let matrix = CounterMatrix::new(vec![vec![var![0]], vec![var![1]]], 1);
        let _ = matrix.get(0, 1);
    }

    #[test]
    fn dispatch_trivial() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![3]);
        assert!(encode_at_least(&[lit![0], lit![1]], 0, &mut cnf, &mut vm).is_none());
        assert!(cnf.is_empty());
        assert!(encode_at_least(&[lit![0], lit![1]], 1, &mut cnf, &mut vm).is_none());
        assert_eq!(cnf.len(), 1);
        assert_eq!(cnf[0], clause![lit![0], lit![1]]);
        assert_eq!(vm.n_used(), 3);
    }

    #[test]
    fn dispatch_counter() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![3]);
        let matrix = encode_at_least(&[lit![0], lit![1], lit![2]], 2, &mut cnf, &mut vm).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.get(0, 0), var![3]);
        assert_eq!(vm.n_used(), 12);
    }

    #[test]
    fn dispatch_no_inputs() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        assert!(encode_at_least(&[], 0, &mut cnf, &mut vm).is_none());
        assert!(cnf.is_empty());
    }

    #[test]
    #[should_panic(expected = "requires at least one input literal")]
    fn dispatch_no_inputs_bound_one() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        encode_at_least(&[], 1, &mut cnf, &mut vm);
    }
}
