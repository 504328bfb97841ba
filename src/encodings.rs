//! # Encodings for Common Constraint Types to CNF
//!
//! Clause constructors for implications and disjunctions ([`atomics`]) and
//! CNF encodings of cardinality constraints ([`am1`], [`card`]).

use crate::types::Clause;

pub mod am1;
pub mod atomics;
pub mod card;

/// Trait for collecting clauses. Encodings add their clauses to a collector
/// implementing this trait, which can for example be a [`crate::instances::Cnf`]
/// or a [`crate::instances::Model`].
pub trait CollectClauses: Extend<Clause> {
    /// Gets the number of clauses in the collection
    fn n_clauses(&self) -> usize;

    /// Adds a single clause to the collection
    fn add_clause(&mut self, cl: Clause) {
        self.extend([cl]);
    }
}

/// Trait for encodings that track statistics.
pub trait EncodeStats {
    /// Gets the number of clauses in the encoding
    fn n_clauses(&self) -> usize;

    /// Gets the number of variables in the encoding
    fn n_vars(&self) -> u32;
}
