//! # Calling Solvers
//!
//! Instances are solved by an external solver executable through
//! [`ExternalSolver`]. The result of a call is an [`Outcome`]; unsatisfiability
//! is a regular outcome and never terminates the process.
//!
//! ## Example
//!
//! ```no_run
//! use std::process::Command;
//! use satenc::{instances::Model, solvers::{ExternalSolver, Outcome}};
//!
//! let mut model = Model::new();
//! let x = model.new_vars(2);
//! model.add_at_most_one(&[x[0].pos_lit(), x[1].pos_lit()]);
//!
//! let solver = ExternalSolver::new_default(Command::new("kissat"));
//! match solver.run(&model) {
//!     Outcome::Satisfiable(sol) => println!("x0 = {}", sol.var_value(x[0])),
//!     Outcome::Unsatisfiable => println!("no solution"),
//!     Outcome::AdapterFailure(err) => eprintln!("solver call failed: {err}"),
//! }
//! ```

use crate::types::{Assignment, TernaryVal, Var};

pub mod external;
pub use external::Solver as ExternalSolver;

/// The outcome of solving an instance with an external solver
#[derive(Debug)]
pub enum Outcome {
    /// The instance is satisfiable, with the assignment reported by the solver
    Satisfiable(Assignment),
    /// The instance is unsatisfiable
    Unsatisfiable,
    /// The solver could not be run, failed, gave up or produced malformed output
    AdapterFailure(anyhow::Error),
}

impl Outcome {
    /// Checks whether the outcome is [`Outcome::Satisfiable`]
    #[must_use]
    pub fn is_sat(&self) -> bool {
        matches!(self, Outcome::Satisfiable(_))
    }

    /// Checks whether the outcome is [`Outcome::Unsatisfiable`]
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        matches!(self, Outcome::Unsatisfiable)
    }

    /// Gets the assignment if the outcome is satisfiable
    #[must_use]
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Outcome::Satisfiable(sol) => Some(sol),
            _ => None,
        }
    }

    /// Gets the value of a variable if the outcome is satisfiable
    #[must_use]
    pub fn var_value(&self, var: Var) -> Option<TernaryVal> {
        self.assignment().map(|sol| sol.var_value(var))
    }

    /// Converts the outcome into a result, with unsatisfiability as `Ok(None)`
    ///
    /// # Errors
    ///
    /// The adapter failure, if the solver call failed.
    pub fn into_result(self) -> anyhow::Result<Option<Assignment>> {
        match self {
            Outcome::Satisfiable(sol) => Ok(Some(sol)),
            Outcome::Unsatisfiable => Ok(None),
            Outcome::AdapterFailure(err) => Err(err),
        }
    }
}
