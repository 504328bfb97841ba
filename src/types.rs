//! # Common Types for Instance Construction
//!
//! Common types used throughout the library to guarantee type safety.

use core::ffi::c_int;
use std::{fmt, ops};

use thiserror::Error;

pub mod constraints;
pub use constraints::Clause;

/// Type representing boolean variables in a SAT problem. Variables indexing in
/// `satenc` starts from 0 and the maximum index is `(u32::MAX - 1) / 2`. This is
/// because literals are represented as a single `u32` as well. In DIMACS output,
/// the variable with index `i` is written as `i + 1`.
#[derive(Hash, Eq, PartialEq, PartialOrd, Clone, Copy, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Var {
    idx: u32,
}

impl Var {
    /// The maximum index that can be represented.
    pub const MAX_IDX: u32 = (u32::MAX - 1) / 2;

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32) -> Var {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Var { idx }
    }

    /// Creates a new variables with a given index.
    /// Indices start from 0.
    ///
    /// # Errors
    ///
    /// `TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32) -> Result<Var, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Var { idx })
    }

    /// Creates a literal that is not negated.
    ///
    /// # Examples
    ///
    /// ```
    /// use satenc::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::positive(5);
    ///
    /// assert_eq!(lit, var.pos_lit());
    /// ```
    #[inline]
    #[must_use]
    pub fn pos_lit(self) -> Lit {
        Lit::new(self.idx, false)
    }

    /// Creates a negated literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use satenc::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(lit, var.neg_lit());
    /// ```
    #[inline]
    #[must_use]
    pub fn neg_lit(self) -> Lit {
        Lit::new(self.idx, true)
    }

    /// Returns the index of the variable. This is a `usize` to enable easier
    /// indexing of data structures like vectors, even though the internal
    /// representation of a variable is `u32`. For the 32 bit index use
    /// [`Var::idx32`].
    #[inline]
    #[must_use]
    pub fn idx(self) -> usize {
        self.idx as usize
    }

    /// Returns the 32 bit index of the variable.
    #[inline]
    #[must_use]
    pub fn idx32(self) -> u32 {
        self.idx
    }

    /// Converts the variable to an integer as accepted by the IPASIR API and
    /// DIMACS files. The IPASIR variable will have idx+1.
    ///
    /// # Panics
    ///
    /// If the variable does not fit into a `c_int`.
    #[must_use]
    pub fn to_ipasir(self) -> c_int {
        (self.idx() + 1)
            .try_into()
            .expect("variable index too high to fit in c_int")
    }
}

/// Incrementing variables
impl ops::Add<u32> for Var {
    type Output = Var;

    fn add(self, rhs: u32) -> Self::Output {
        Var::new(
            self.idx
                .checked_add(rhs)
                .expect("variable index overflow"),
        )
    }
}

impl ops::AddAssign<u32> for Var {
    fn add_assign(&mut self, rhs: u32) {
        *self = *self + rhs;
    }
}

/// Decrementing variables
impl ops::Sub<u32> for Var {
    type Output = Var;

    fn sub(self, rhs: u32) -> Self::Output {
        Var {
            idx: self.idx - rhs,
        }
    }
}

/// Variables can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.idx)
    }
}

/// More easily creates variables. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use satenc::{var, types::Var};
///
/// assert_eq!(var![42], Var::new(42));
/// ```
#[macro_export]
macro_rules! var {
    ($v:expr) => {
        $crate::types::Var::new($v)
    };
}

/// Type representing literals, possibly negated boolean variables.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Lit {
    /// Literal representation is `idx << 1` with the last bit representing
    /// whether the literal is negated or not.
    lidx: u32,
}

impl Lit {
    /// Represents a literal in memory
    #[inline]
    fn represent(idx: u32, negated: bool) -> u32 {
        (idx << 1) + u32::from(negated)
    }

    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[must_use]
    pub fn new(idx: u32, negated: bool) -> Lit {
        assert!(idx <= Var::MAX_IDX, "variable index too high");
        Lit {
            lidx: Lit::represent(idx, negated),
        }
    }

    /// Creates a new (negated or not) literal with a given index.
    ///
    /// # Errors
    ///
    /// `TypeError::IdxTooHigh(idx, Var::MAX_IDX)` if `idx > Var::MAX_IDX`.
    pub fn new_with_error(idx: u32, negated: bool) -> Result<Lit, TypeError> {
        if idx > Var::MAX_IDX {
            return Err(TypeError::IdxTooHigh(idx, Var::MAX_IDX));
        }
        Ok(Lit {
            lidx: Lit::represent(idx, negated),
        })
    }

    /// Creates a new positive literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[inline]
    #[must_use]
    pub fn positive(idx: u32) -> Lit {
        Lit::new(idx, false)
    }

    /// Creates a new negated literal with a given index.
    ///
    /// # Panics
    ///
    /// If `idx > Var::MAX_IDX`.
    #[inline]
    #[must_use]
    pub fn negative(idx: u32) -> Lit {
        Lit::new(idx, true)
    }

    /// Create a literal from an IPASIR/DIMACS integer value.
    ///
    /// # Errors
    ///
    /// If the value is zero or the index too high.
    pub fn from_ipasir(val: c_int) -> Result<Lit, TypeError> {
        if val == 0 {
            return Err(TypeError::IpasirZero);
        }
        let negated = val < 0;
        let idx = val.unsigned_abs();
        Lit::new_with_error(idx - 1, negated)
    }

    /// Gets the variable index of the literal
    #[inline]
    #[must_use]
    pub fn vidx(self) -> usize {
        (self.lidx >> 1) as usize
    }

    /// Gets the 32bit variable index of the literal
    #[inline]
    #[must_use]
    pub fn vidx32(self) -> u32 {
        self.lidx >> 1
    }

    /// Gets the variables that the literal corresponds to.
    ///
    /// # Examples
    ///
    /// ```
    /// use satenc::types::{Var, Lit};
    ///
    /// let var = Var::new(5);
    /// let lit = Lit::negative(5);
    ///
    /// assert_eq!(var, lit.var());
    /// ```
    #[inline]
    #[must_use]
    pub fn var(self) -> Var {
        Var {
            idx: self.vidx32(),
        }
    }

    /// True if the literal is positive.
    #[inline]
    #[must_use]
    pub fn is_pos(self) -> bool {
        (self.lidx & 1u32) == 0
    }

    /// True if the literal is negated.
    #[inline]
    #[must_use]
    pub fn is_neg(self) -> bool {
        (self.lidx & 1u32) == 1
    }

    /// Converts the literal to an integer as accepted by the IPASIR API and
    /// DIMACS files. The IPASIR literal will have idx+1 and be negative if the
    /// literal is negated.
    ///
    /// # Panics
    ///
    /// If the literal does not fit into a `c_int`.
    #[must_use]
    pub fn to_ipasir(self) -> c_int {
        let idx = self.var().to_ipasir();
        if self.is_neg() {
            -idx
        } else {
            idx
        }
    }
}

/// Trait implementation allowing for negating literals with the `!` operator.
impl ops::Not for Lit {
    type Output = Lit;

    #[inline]
    fn not(self) -> Lit {
        Lit {
            lidx: self.lidx ^ 1u32,
        }
    }
}

/// Trait implementation allowing for negating literals with the unary `-` operator.
impl ops::Neg for Lit {
    type Output = Lit;

    #[inline]
    fn neg(self) -> Lit {
        !self
    }
}

/// Literals can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_neg() {
            write!(f, "~x{}", self.vidx())
        } else {
            write!(f, "x{}", self.vidx())
        }
    }
}

/// More easily creates literals. Mainly used in tests.
///
/// # Examples
///
/// ```
/// use satenc::{lit, types::Lit};
///
/// assert_eq!(lit![42], Lit::positive(42));
/// assert_eq!(!lit![42], Lit::negative(42));
/// ```
#[macro_export]
macro_rules! lit {
    ($l:expr) => {
        $crate::types::Lit::positive($l)
    };
}

/// More easily creates literals with DIMACS indexing (starts from 1) and
/// negation (negative value is negation). Mainly used in tests.
///
/// # Examples
///
/// ```
/// use satenc::{lit, ipasir_lit, types::Lit};
///
/// assert_eq!(ipasir_lit![42], lit![41]);
/// assert_eq!(ipasir_lit![-42], !lit![41]);
/// ```
#[macro_export]
macro_rules! ipasir_lit {
    ($l:expr) => {
        $crate::types::Lit::from_ipasir($l).unwrap()
    };
}

/// Ternary value assigned to a literal or variable, including possible "don't care"
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TernaryVal {
    /// Positive assignment.
    True,
    /// Negative assignment.
    False,
    /// Not assigned by the solution
    #[default]
    DontCare,
}

impl TernaryVal {
    /// Converts a [`TernaryVal`] to a bool with a default value for "don't cares"
    #[must_use]
    pub fn to_bool_with_def(self, def: bool) -> bool {
        match self {
            TernaryVal::True => true,
            TernaryVal::False => false,
            TernaryVal::DontCare => def,
        }
    }
}

/// Ternary values can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TernaryVal::True => write!(f, "1"),
            TernaryVal::False => write!(f, "0"),
            TernaryVal::DontCare => write!(f, "_"),
        }
    }
}

impl fmt::Debug for TernaryVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<bool> for TernaryVal {
    fn from(value: bool) -> Self {
        if value {
            return TernaryVal::True;
        }
        TernaryVal::False
    }
}

impl ops::Not for TernaryVal {
    type Output = TernaryVal;

    fn not(self) -> Self::Output {
        match self {
            TernaryVal::True => TernaryVal::False,
            TernaryVal::False => TernaryVal::True,
            TernaryVal::DontCare => TernaryVal::DontCare,
        }
    }
}

/// Type representing an assignment of variables, typically the solution
/// reported by a solver.
#[derive(Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Assignment {
    assignment: Vec<TernaryVal>,
}

impl Assignment {
    /// Get the value that the solution assigns to a variable.
    /// If the variable is not included in the solution, will return `TernaryVal::DontCare`.
    #[must_use]
    pub fn var_value(&self, var: Var) -> TernaryVal {
        self.assignment
            .get(var.idx())
            .copied()
            .unwrap_or(TernaryVal::DontCare)
    }

    /// Same as [`Assignment::var_value`], but for literals.
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        if lit.is_neg() {
            !self.var_value(lit.var())
        } else {
            self.var_value(lit.var())
        }
    }

    /// Gets the values of a sequence of variables, in the given order
    ///
    /// # Examples
    ///
    /// ```
    /// use satenc::{types::Assignment, var};
    ///
    /// let sol = Assignment::from_vline("v 1 -2 3 0").unwrap();
    /// let shown: String = sol.values(&[var![0], var![1], var![2]]).map(|v| v.to_string()).collect();
    /// assert_eq!(shown, "101");
    /// ```
    pub fn values<'a>(&'a self, vars: &'a [Var]) -> impl Iterator<Item = TernaryVal> + 'a {
        vars.iter().map(|var| self.var_value(*var))
    }

    /// Replaces all "don't care" values with a default value
    pub fn replace_dont_care(&mut self, def: bool) {
        for tv in &mut self.assignment {
            if *tv == TernaryVal::DontCare {
                *tv = def.into();
            }
        }
    }

    /// Assigns a variable in the assignment
    pub fn assign_var(&mut self, var: Var, val: TernaryVal) {
        if self.assignment.len() < var.idx() + 1 {
            self.assignment.resize(var.idx() + 1, TernaryVal::DontCare);
        }
        self.assignment[var.idx()] = val;
    }

    /// Assigns a literal to true
    pub fn assign_lit(&mut self, lit: Lit) {
        self.assign_var(lit.var(), lit.is_pos().into());
    }

    /// Truncates a solution to only include assignments up to a maximum variable
    #[must_use]
    pub fn truncate(mut self, max_var: Var) -> Self {
        self.assignment.truncate(max_var.idx() + 1);
        self
    }

    /// Get the maximum variable in the assignment
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        let len = u32::try_from(self.assignment.len()).ok()?;
        len.checked_sub(1).map(Var::new)
    }

    /// Gets the number of variables covered by the assignment
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    /// Checks whether the assignment is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }

    /// Parses an assignment from a solver value line (`v <lit> <lit> ... [0]`)
    ///
    /// # Errors
    ///
    /// If the line is not a valid value line or assigns a variable twice with different values.
    pub fn from_vline(line: &str) -> Result<Self, InvalidVLine> {
        let mut assignment = Assignment::default();
        assignment.extend_from_vline(line)?;
        Ok(assignment)
    }

    /// Adds the literals of another solver value line to the assignment
    ///
    /// A `0` token terminates the value sequence, tokens following it are ignored.
    ///
    /// # Errors
    ///
    /// If the line is not a valid value line or assigns a variable twice with different values.
    pub fn extend_from_vline(&mut self, line: &str) -> Result<(), InvalidVLine> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => (),
            Some(tag) => {
                return Err(InvalidVLine::InvalidTag(
                    tag.chars().next().unwrap_or_default(),
                ))
            }
            None => return Err(InvalidVLine::EmptyLine),
        }
        for token in tokens {
            let val: c_int = token
                .parse()
                .map_err(|_| InvalidVLine::InvalidLiteral(token.to_string()))?;
            if val == 0 {
                break;
            }
            let lit = Lit::from_ipasir(val)
                .map_err(|_| InvalidVLine::InvalidLiteral(token.to_string()))?;
            let val = TernaryVal::from(lit.is_pos());
            match self.var_value(lit.var()) {
                TernaryVal::DontCare => self.assign_var(lit.var(), val),
                prev if prev == val => (),
                _ => return Err(InvalidVLine::ConflictingAssignment(lit.var())),
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment.iter().try_for_each(|tv| write!(f, "{tv}"))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.assignment.iter().try_for_each(|tv| write!(f, "{tv}"))
    }
}

/// Turns the solution into an iterator over all assigned literals
impl IntoIterator for Assignment {
    type Item = Lit;

    type IntoIter = std::iter::FilterMap<
        std::iter::Enumerate<std::vec::IntoIter<TernaryVal>>,
        fn((usize, TernaryVal)) -> Option<Lit>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.assignment
            .into_iter()
            .enumerate()
            .filter_map(|(idx, tv)| {
                let idx = u32::try_from(idx).expect("assignment longer than `u32::MAX`");
                match tv {
                    TernaryVal::True => Some(Lit::positive(idx)),
                    TernaryVal::False => Some(Lit::negative(idx)),
                    TernaryVal::DontCare => None,
                }
            })
    }
}

impl FromIterator<Lit> for Assignment {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        let mut assignment = Assignment::default();
        iter.into_iter().for_each(|l| assignment.assign_lit(l));
        assignment
    }
}

impl From<Vec<TernaryVal>> for Assignment {
    fn from(assignment: Vec<TernaryVal>) -> Self {
        Self { assignment }
    }
}

/// Errors related to types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The requested index is too high.
    /// Contains the requested and the maximum index.
    #[error("index {0} is too high (maximum {1})")]
    IdxTooHigh(u32, u32),
    /// IPASIR index is zero
    #[error("zero is an invalid IPASIR literal")]
    IpasirZero,
}

/// Errors in a solver value line
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidVLine {
    /// The line does not start with `v`
    #[error("the value line does not start with 'v' but with '{0}'")]
    InvalidTag(char),
    /// The same variable was assigned different values
    #[error("the solver assigned variable {0} different values")]
    ConflictingAssignment(Var),
    /// A token is not a valid literal
    #[error("invalid literal '{0}' in value line")]
    InvalidLiteral(String),
    /// The line is empty
    #[error("empty value line")]
    EmptyLine,
}
