//! # Sequential Counters Encoding
//!
//! ## References
//!
//! - Carsten Sinz: _Towards an Optimal CNF Encoding of Boolean Cardinality Constraints_, CP 2005.

use tracing::debug;

use super::CounterMatrix;
use crate::{
    clause,
    encodings::{atomics, CollectClauses, EncodeStats},
    instances::ManageVars,
    types::Lit,
};

/// Implementation of the sequential counters encoding for lower bounds.
///
/// For `n` input literals and a bound `k`, a counter matrix `y` with `k + 1`
/// rows and `n` columns of fresh variables is allocated, where `y[j][i]`
/// holds iff at least `j` of the first `i + 1` inputs are true. The encoding
/// is equisatisfiable with `x0 + ... + x(n-1) >= k` for all `n >= 1` and
/// `k >= 2`.
///
/// # References
///
/// - Carsten Sinz: _Towards an Optimal CNF Encoding of Boolean Cardinality Constraints_, CP 2005.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequentialCounters {
    /// Input literals to the counter
    in_lits: Vec<Lit>,
    /// The number of variables in the counter
    n_vars: u32,
    /// The number of clauses in the counter
    n_clauses: usize,
}

impl SequentialCounters {
    /// Gets the number of input literals
    #[must_use]
    pub fn n_lits(&self) -> usize {
        self.in_lits.len()
    }

    /// Gets an iterator over copies of the input literals
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Lit>> {
        self.in_lits.iter().copied()
    }

    /// Encodes and enforces `x0 + ... + x(n-1) >= lb` and returns the counter
    /// variables. New variables are taken from `var_manager`, clauses are added
    /// to `collector` in a fixed order.
    ///
    /// For `lb <= 1`, use [`atomics::disjunction`] or
    /// [`super::encode_at_least`] instead.
    ///
    /// # Panics
    ///
    /// If `lb <= 1` or there are no input literals.
    pub fn encode_lb<Col>(
        &mut self,
        lb: usize,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> CounterMatrix
    where
        Col: CollectClauses,
    {
        assert!(
            lb > 1,
            "sequential counter requires a bound larger than one, got {lb}"
        );
        assert!(
            !self.in_lits.is_empty(),
            "sequential counter requires at least one input literal"
        );
        let n = self.in_lits.len();
        let prev_clauses = collector.n_clauses();
        let prev_vars = var_manager.n_used();

        let rows: Vec<_> = (0..=lb).map(|_| var_manager.new_vars(n)).collect();
        let matrix = CounterMatrix::new(rows, n);
        let y = |j: usize, i: usize| matrix.lit(j, i);
        let x = &self.in_lits;

        // zero inputs are always reached
        collector.add_clause(atomics::unit_true(y(0, 0)));
        // the bound itself
        collector.add_clause(atomics::unit_true(y(lb, n - 1)));
        // first column
        collector.add_clause(atomics::lit_impl_lit(x[0], y(1, 0)));
        collector.add_clause(atomics::lit_impl_lit(y(1, 0), x[0]));
        collector.add_clause(atomics::unit_false(y(2, 0)));
        // vertical
        collector.extend((0..n).flat_map(|i| {
            (1..=lb).map(move |j| atomics::lit_impl_lit(y(j, i), y(j - 1, i)))
        }));
        // horizontal
        collector.extend((0..n - 1).flat_map(|i| {
            (0..=lb).map(move |j| atomics::lit_impl_lit(y(j, i), y(j, i + 1)))
        }));
        // diagonal
        collector.extend((0..n - 1).flat_map(|i| {
            (0..lb).map(move |j| atomics::lit_impl_lit(!y(j, i), !y(j + 1, i + 1)))
        }));
        // count up on a true input
        collector.extend((0..n - 1).flat_map(|i| {
            (0..lb).map(move |j| clause![!y(j, i), !x[i + 1], y(j + 1, i + 1)])
        }));
        // no new count without a true input
        collector.extend((1..n).flat_map(|i| {
            (0..=lb).map(move |j| clause![x[i], y(j, i - 1), !y(j, i)])
        }));

        self.n_clauses += collector.n_clauses() - prev_clauses;
        self.n_vars += var_manager.n_used() - prev_vars;
        debug!(
            n_lits = n,
            bound = lb,
            n_vars = self.n_vars,
            n_clauses = self.n_clauses,
            "encoded sequential counter"
        );
        matrix
    }
}

impl EncodeStats for SequentialCounters {
    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn n_vars(&self) -> u32 {
        self.n_vars
    }
}

impl From<Vec<Lit>> for SequentialCounters {
    fn from(lits: Vec<Lit>) -> Self {
        Self {
            in_lits: lits,
            ..Default::default()
        }
    }
}

impl FromIterator<Lit> for SequentialCounters {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self::from(Vec::from_iter(iter))
    }
}

impl Extend<Lit> for SequentialCounters {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.in_lits.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::SequentialCounters;
    use crate::{
        clause,
        encodings::EncodeStats,
        instances::{BasicVarManager, Cnf, ManageVars},
        lit, var,
    };

    #[test]
    fn basic() {
        let mut enc: SequentialCounters = [lit![0], lit![1], lit![2]].into_iter().collect();
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![3]);
        let matrix = enc.encode_lb(2, &mut cnf, &mut vm);
        assert_eq!(vm.n_used(), 12);
        assert_eq!(enc.n_vars(), 9);
        // 5 initial + 6 vertical + 6 horizontal + 4 diagonal + 4 increment + 6 channeling
        assert_eq!(cnf.len(), 31);
        assert_eq!(enc.n_clauses(), 31);
        assert_eq!(matrix.output(), var![11]);
    }

    #[test]
    fn clause_order() {
        let mut enc = SequentialCounters::from(vec![lit![0], lit![1]]);
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![2]);
        let y = enc.encode_lb(2, &mut cnf, &mut vm);
        assert_eq!(y.row(0), &[var![2], var![3]]);
        assert_eq!(y.row(1), &[var![4], var![5]]);
        assert_eq!(y.row(2), &[var![6], var![7]]);
        let expected = vec![
            clause![y.lit(0, 0)],
            clause![y.lit(2, 1)],
            clause![!lit![0], y.lit(1, 0)],
            clause![!y.lit(1, 0), lit![0]],
            clause![!y.lit(2, 0)],
            // vertical
            clause![!y.lit(1, 0), y.lit(0, 0)],
            clause![!y.lit(2, 0), y.lit(1, 0)],
            clause![!y.lit(1, 1), y.lit(0, 1)],
            clause![!y.lit(2, 1), y.lit(1, 1)],
            // horizontal
            clause![!y.lit(0, 0), y.lit(0, 1)],
            clause![!y.lit(1, 0), y.lit(1, 1)],
            clause![!y.lit(2, 0), y.lit(2, 1)],
            // diagonal
            clause![y.lit(0, 0), !y.lit(1, 1)],
            clause![y.lit(1, 0), !y.lit(2, 1)],
            // increment
            clause![!y.lit(0, 0), !lit![1], y.lit(1, 1)],
            clause![!y.lit(1, 0), !lit![1], y.lit(2, 1)],
            // channeling
            clause![lit![1], y.lit(0, 0), !y.lit(0, 1)],
            clause![lit![1], y.lit(1, 0), !y.lit(1, 1)],
            clause![lit![1], y.lit(2, 0), !y.lit(2, 1)],
        ];
        assert_eq!(cnf.into_iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn repeated_encodings_use_fresh_vars() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![2]);
        let first = SequentialCounters::from(vec![lit![0], lit![1]]).encode_lb(2, &mut cnf, &mut vm);
        let second =
            SequentialCounters::from(vec![lit![0], lit![1]]).encode_lb(2, &mut cnf, &mut vm);
        assert!(first.iter().all(|v| second.iter().all(|w| v != w)));
        assert_eq!(vm.n_used(), 14);
    }

    #[test]
    #[should_panic(expected = "bound larger than one")]
    fn bound_one() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![2]);
        SequentialCounters::from(vec![lit![0], lit![1]]).encode_lb(1, &mut cnf, &mut vm);
    }

    #[test]
    #[should_panic(expected = "bound larger than one")]
    fn bound_zero() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![2]);
        SequentialCounters::from(vec![lit![0], lit![1]]).encode_lb(0, &mut cnf, &mut vm);
    }

    #[test]
    #[should_panic(expected = "at least one input literal")]
    fn no_inputs() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        SequentialCounters::default().encode_lb(2, &mut cnf, &mut vm);
    }
}
