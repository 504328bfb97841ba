//! # Constraint Types
//!
//! The most important constraint type is [`Clause`]. [`CardConstraint`]
//! describes the cardinality constraints that
//! [`Model::add_card_constr`](crate::instances::Model::add_card_constr) can
//! encode.

use std::{fmt, ops};

use itertools::Itertools;

use super::{Assignment, Lit, TernaryVal};

/// Type representing a clause, a disjunction of literals.
/// Literals keep the order they were added in, nothing is deduplicated.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty clause with at least the specified capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lits: Vec::with_capacity(capacity),
        }
    }

    /// Gets the clause as a slice of literals
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit);
    }

    /// Evaluates a clause under a given assignment
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare => {
                    if val == TernaryVal::False {
                        TernaryVal::DontCare
                    } else {
                        val
                    }
                }
                TernaryVal::False => val,
            })
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }
}

impl AsRef<[Lit]> for Clause {
    fn as_ref(&self) -> &[Lit] {
        &self.lits
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl From<&[Lit]> for Clause {
    fn from(lits: &[Lit]) -> Self {
        Self {
            lits: lits.to_vec(),
        }
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(lits: Vec<Lit>) -> Self {
        Self { lits }
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: iter.into_iter().collect(),
        }
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter);
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.iter().format("|"))
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.iter().format("|"))
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use satenc::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    () => {
        $crate::types::Clause::new()
    };
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// A cardinality constraint over a set of literals
#[derive(Eq, PartialEq, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardConstraint {
    /// At most one of the literals is true
    AtMostOne(Vec<Lit>),
    /// At least the given number of literals are true
    AtLeast(Vec<Lit>, usize),
}

impl CardConstraint {
    /// Gets the literals of the constraint
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        match self {
            CardConstraint::AtMostOne(lits) | CardConstraint::AtLeast(lits, _) => lits,
        }
    }

    /// Checks whether the constraint holds regardless of the assignment
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        match self {
            CardConstraint::AtMostOne(lits) => lits.len() <= 1,
            CardConstraint::AtLeast(_, bound) => *bound == 0,
        }
    }

    /// Checks whether the constraint can never hold
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        match self {
            CardConstraint::AtMostOne(_) => false,
            CardConstraint::AtLeast(lits, bound) => *bound > lits.len(),
        }
    }

    /// Evaluates the constraint under a given assignment.
    /// Returns [`TernaryVal::DontCare`] if the outcome depends on unassigned literals.
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        let (n_true, n_undef) =
            self.lits()
                .iter()
                .fold((0usize, 0usize), |(n_true, n_undef), lit| {
                    match assignment.lit_value(*lit) {
                        TernaryVal::True => (n_true + 1, n_undef),
                        TernaryVal::DontCare => (n_true, n_undef + 1),
                        TernaryVal::False => (n_true, n_undef),
                    }
                });
        match self {
            CardConstraint::AtMostOne(_) => {
                if n_true > 1 {
                    TernaryVal::False
                } else if n_true + n_undef <= 1 {
                    TernaryVal::True
                } else {
                    TernaryVal::DontCare
                }
            }
            CardConstraint::AtLeast(_, bound) => {
                if n_true >= *bound {
                    TernaryVal::True
                } else if n_true + n_undef < *bound {
                    TernaryVal::False
                } else {
                    TernaryVal::DontCare
                }
            }
        }
    }
}

impl fmt::Display for CardConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardConstraint::AtMostOne(lits) => write!(f, "{} <= 1", lits.iter().format(" + ")),
            CardConstraint::AtLeast(lits, bound) => {
                write!(f, "{} >= {bound}", lits.iter().format(" + "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CardConstraint, Clause};
    use crate::{
        lit,
        types::{Assignment, TernaryVal},
    };

    #[test]
    fn clause_macro_keeps_order() {
        let cl = clause![lit![2], !lit![0], lit![2]];
        assert_eq!(cl.lits(), &[lit![2], !lit![0], lit![2]]);
    }

    #[test]
    fn clause_evaluate() {
        let cl = clause![lit![0], !lit![1]];
        let sol = Assignment::from(vec![TernaryVal::False, TernaryVal::True]);
        assert_eq!(cl.evaluate(&sol), TernaryVal::False);
        let sol = Assignment::from(vec![TernaryVal::False]);
        assert_eq!(cl.evaluate(&sol), TernaryVal::DontCare);
        let sol = Assignment::from(vec![TernaryVal::True]);
        assert_eq!(cl.evaluate(&sol), TernaryVal::True);
        assert_eq!(Clause::new().evaluate(&sol), TernaryVal::False);
    }

    #[test]
    fn clause_display() {
        let cl = clause![lit![0], !lit![1]];
        assert_eq!(format!("{cl}"), "(x0|~x1)");
    }

    #[test]
    fn card_evaluate() {
        let am1 = CardConstraint::AtMostOne(vec![lit![0], lit![1], lit![2]]);
        let alk = CardConstraint::AtLeast(vec![lit![0], lit![1], lit![2]], 2);
        let sol = Assignment::from(vec![TernaryVal::True, TernaryVal::True, TernaryVal::False]);
        assert_eq!(am1.evaluate(&sol), TernaryVal::False);
        assert_eq!(alk.evaluate(&sol), TernaryVal::True);
        let sol = Assignment::from(vec![TernaryVal::True, TernaryVal::False]);
        assert_eq!(am1.evaluate(&sol), TernaryVal::DontCare);
        assert_eq!(alk.evaluate(&sol), TernaryVal::DontCare);
        let sol = Assignment::from(vec![TernaryVal::False, TernaryVal::False]);
        assert_eq!(am1.evaluate(&sol), TernaryVal::True);
        assert_eq!(alk.evaluate(&sol), TernaryVal::False);
    }

    #[test]
    fn card_trivial() {
        assert!(CardConstraint::AtMostOne(vec![lit![0]]).is_tautology());
        assert!(CardConstraint::AtLeast(vec![lit![0]], 0).is_tautology());
        assert!(CardConstraint::AtLeast(vec![lit![0]], 2).is_unsat());
        assert!(!CardConstraint::AtLeast(vec![lit![0], lit![1]], 2).is_unsat());
    }
}
