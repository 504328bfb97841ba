//! # "Atomic"/"Trivial" Encodings
//!
//! Side-effect free constructors for the small clauses every other encoding is
//! built from.

use crate::{
    clause,
    types::{Clause, Lit},
};

/// Unit clause forcing `a` to true
#[must_use]
pub fn unit_true(a: Lit) -> Clause {
    clause![a]
}

/// Unit clause forcing `a` to false
#[must_use]
pub fn unit_false(a: Lit) -> Clause {
    clause![!a]
}

/// Implication of form `a -> b`
#[must_use]
pub fn lit_impl_lit(a: Lit, b: Lit) -> Clause {
    clause![!a, b]
}

/// Implication of form `a -> (b1 | b2 | ... | bm)`
#[must_use]
pub fn lit_impl_clause(a: Lit, b: &[Lit]) -> Clause {
    let mut cl = Clause::with_capacity(b.len() + 1);
    cl.add(!a);
    cl.extend(b.iter().copied());
    cl
}

/// Implication of form `a -> (b1 & b2 & ... & bm)`
pub fn lit_impl_cube(a: Lit, b: &[Lit]) -> impl Iterator<Item = Clause> + '_ {
    b.iter().map(move |bi| clause![!a, *bi])
}

/// Implication of form `(a1 & a2 & ... & an) -> b`
#[must_use]
pub fn cube_impl_lit(a: &[Lit], b: Lit) -> Clause {
    let mut cl: Clause = a.iter().map(|ai| !*ai).collect();
    cl.add(b);
    cl
}

/// Disjunction `l1 | l2 | ... | lm`, literals are kept as given
#[must_use]
pub fn disjunction(lits: &[Lit]) -> Clause {
    Clause::from(lits)
}
