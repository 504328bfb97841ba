//! # CNF Encodings for At-Most-1 Constraints
//!
//! The module contains implementations of CNF encodings for at-most-1
//! constraints.
//!
//! ## Example Usage
//!
//! ```
//! use satenc::{
//!     encodings::am1::{self, Encode},
//!     instances::{BasicVarManager, Cnf, ManageVars},
//!     lit, var,
//! };
//!
//! let mut var_manager = BasicVarManager::default();
//! var_manager.increase_next_free(var![3]);
//!
//! let mut encoder = am1::Pairwise::default();
//! encoder.extend(vec![lit![0], lit![1], lit![2]]);
//! let mut encoding = Cnf::new();
//! encoder.encode(&mut encoding, &mut var_manager);
//! assert_eq!(encoding.len(), 3);
//! ```

use crate::{encodings::CollectClauses, instances::ManageVars, types::Lit};

mod pairwise;
pub use pairwise::Pairwise;

/// Trait for all at-most-1 encodings
pub trait Encode: Default + From<Vec<Lit>> + FromIterator<Lit> + Extend<Lit> {
    /// Gets the number of literals in the encoding
    fn n_lits(&self) -> usize;

    /// Encodes and enforces the at-most-1 constraint, adding the clauses to
    /// `collector`
    fn encode<Col>(&mut self, collector: &mut Col, var_manager: &mut dyn ManageVars)
    where
        Col: CollectClauses;
}

/// The default at-most-1 encoding. For now this is a [`Pairwise`] encoding.
pub type DefAm1 = Pairwise;
