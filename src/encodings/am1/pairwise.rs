//! # Pairwise At-Most-1 Encoding
//!
//! ## References
//!
//! - Steven D. Prestwich: _CNF Encodings_, in Handbook of Satisfiability 2021.

use tracing::debug;

use super::Encode;
use crate::{
    encodings::{atomics, CollectClauses, EncodeStats},
    instances::ManageVars,
    types::Lit,
};

/// Implementations of the pairwise at-most-1 encoding. For every pair of
/// input literals `(a, b)` with `a` before `b`, the clause `a -> !b` is added.
/// No auxiliary variables are used.
///
/// # References
///
/// - Steven D. Prestwich: _CNF Encodings_, in Handbook of Satisfiability 2021.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pairwise {
    /// Input literals
    in_lits: Vec<Lit>,
    /// The number of clauses in the encoding
    n_clauses: usize,
}

impl Pairwise {
    /// Gets an iterator over copies of the input literals
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, Lit>> {
        self.in_lits.iter().copied()
    }
}

impl Encode for Pairwise {
    fn n_lits(&self) -> usize {
        self.in_lits.len()
    }

    fn encode<Col>(&mut self, collector: &mut Col, _var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses,
    {
        let prev_clauses = collector.n_clauses();
        let lits = &self.in_lits;
        let clause_iter = (0..lits.len()).flat_map(|first| {
            (first + 1..lits.len())
                .map(move |second| atomics::lit_impl_lit(lits[first], !lits[second]))
        });
        collector.extend(clause_iter);
        self.n_clauses = collector.n_clauses() - prev_clauses;
        debug!(
            n_lits = self.in_lits.len(),
            n_clauses = self.n_clauses,
            "encoded pairwise at-most-one"
        );
    }
}

impl EncodeStats for Pairwise {
    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn n_vars(&self) -> u32 {
        0
    }
}

impl From<Vec<Lit>> for Pairwise {
    fn from(lits: Vec<Lit>) -> Self {
        Self {
            in_lits: lits,
            n_clauses: Default::default(),
        }
    }
}

impl FromIterator<Lit> for Pairwise {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            in_lits: Vec::from_iter(iter),
            n_clauses: Default::default(),
        }
    }
}

impl Extend<Lit> for Pairwise {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.in_lits.extend(iter);
    }
}
