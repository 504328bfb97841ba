//! # Models: Complete SAT and MaxSAT Instances
//!
//! A [`Model`] owns everything that makes up an instance: the variables handed
//! out so far, the hard clauses and the (unit weight) soft clauses. Models only
//! grow, there is no way of removing clauses.

use std::{fmt, io, path::Path};

use tracing::debug;

use super::{
    fio::{self, dimacs},
    BasicVarManager, Cnf, ManageVars,
};
use crate::{
    encodings::{
        am1::{self, Encode as _},
        card::{self, CounterMatrix, SequentialCounters},
        CollectClauses,
    },
    types::{constraints::CardConstraint, Clause, Lit, Var},
};

/// A SAT instance with optional soft clauses.
///
/// Invariant: every literal in a hard or soft clause refers to a variable
/// below [`Model::n_vars`]. Adding a clause over higher variables marks them as
/// used.
///
/// # Examples
///
/// ```
/// use satenc::instances::Model;
///
/// let mut model = Model::with_name("pick two");
/// let xs = model.new_vars(3);
/// let lits: Vec<_> = xs.iter().map(|x| x.pos_lit()).collect();
/// model.add_at_least_k(&lits, 2);
/// assert_eq!(model.n_vars(), 12);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    name: String,
    var_manager: BasicVarManager,
    cnf: Cnf,
    soft: Vec<Clause>,
}

impl Model {
    /// Creates a new, empty model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty model with a name
    #[must_use]
    pub fn with_name<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Gets the name of the model
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name of the model
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Allocates a fresh variable
    ///
    /// # Panics
    ///
    /// If the variable index exceeds [`Var::MAX_IDX`].
    pub fn new_var(&mut self) -> Var {
        self.var_manager.new_var()
    }

    /// Allocates `count` fresh, contiguous variables
    ///
    /// # Panics
    ///
    /// If the variable index exceeds [`Var::MAX_IDX`].
    pub fn new_vars(&mut self, count: usize) -> Vec<Var> {
        self.var_manager.new_vars(count)
    }

    /// Gets the number of variables in the model
    #[must_use]
    pub fn n_vars(&self) -> u32 {
        self.var_manager.n_used()
    }

    /// Gets the variable manager of the model
    #[must_use]
    pub fn var_manager(&self) -> &BasicVarManager {
        &self.var_manager
    }

    /// Gets a mutable reference to the variable manager, e.g., for passing it
    /// to an encoding that adds to a separate collector
    pub fn var_manager_mut(&mut self) -> &mut BasicVarManager {
        &mut self.var_manager
    }

    fn mark_lits_used(&mut self, lits: &[Lit]) {
        if let Some(max) = lits.iter().map(|l| l.var()).max() {
            self.var_manager.mark_used(max);
        }
    }

    /// Adds a hard clause
    pub fn add_clause(&mut self, clause: Clause) {
        self.mark_lits_used(clause.lits());
        self.cnf.add_clause(clause);
    }

    /// Adds a soft clause with weight one
    pub fn add_soft_clause(&mut self, clause: Clause) {
        self.mark_lits_used(clause.lits());
        self.soft.push(clause);
    }

    /// Forces a literal to be true
    pub fn add_unit(&mut self, unit: Lit) {
        self.add_clause(crate::encodings::atomics::unit_true(unit));
    }

    /// Adds an implication of form `a -> b`
    pub fn add_lit_impl_lit(&mut self, a: Lit, b: Lit) {
        self.add_clause(crate::encodings::atomics::lit_impl_lit(a, b));
    }

    /// Adds an implication of form `a -> (b1 | b2 | ... | bm)`
    pub fn add_lit_impl_clause(&mut self, a: Lit, b: &[Lit]) {
        self.add_clause(crate::encodings::atomics::lit_impl_clause(a, b));
    }

    /// Enforces that at most one of `lits` is true with the pairwise encoding
    pub fn add_at_most_one(&mut self, lits: &[Lit]) {
        self.mark_lits_used(lits);
        let mut enc = am1::Pairwise::from(lits.to_vec());
        enc.encode(&mut self.cnf, &mut self.var_manager);
    }

    /// Enforces that at least `k` of `lits` are true with the sequential
    /// counter encoding and returns the counter variables.
    ///
    /// # Panics
    ///
    /// If `k <= 1` or `lits` is empty. Use [`Model::add_card_constr`] for
    /// bounds that might be trivial.
    pub fn add_at_least_k(&mut self, lits: &[Lit], k: usize) -> CounterMatrix {
        self.mark_lits_used(lits);
        let mut enc = SequentialCounters::from(lits.to_vec());
        enc.encode_lb(k, &mut self.cnf, &mut self.var_manager)
    }

    /// Adds a cardinality constraint with the cheapest fitting encoding.
    /// Returns the counter variables if a sequential counter was built.
    ///
    /// # Panics
    ///
    /// If the constraint is an at-least constraint with a positive bound over
    /// no literals.
    pub fn add_card_constr(&mut self, constr: CardConstraint) -> Option<CounterMatrix> {
        match constr {
            CardConstraint::AtMostOne(lits) => {
                self.add_at_most_one(&lits);
                None
            }
            CardConstraint::AtLeast(lits, bound) => {
                self.mark_lits_used(&lits);
                card::encode_at_least(&lits, bound, &mut self.cnf, &mut self.var_manager)
            }
        }
    }

    /// Gets the hard clauses
    #[must_use]
    pub fn cnf(&self) -> &Cnf {
        &self.cnf
    }

    /// Gets the soft clauses
    #[must_use]
    pub fn soft_clauses(&self) -> &[Clause] {
        &self.soft
    }

    /// Gets the number of hard clauses
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        self.cnf.len()
    }

    /// Gets the number of soft clauses
    #[must_use]
    pub fn n_soft_clauses(&self) -> usize {
        self.soft.len()
    }

    /// Checks whether the model has soft clauses, i.e., is a MaxSAT instance
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        !self.soft.is_empty()
    }

    /// Writes the hard clauses to a DIMACS CNF file. Soft clauses are ignored.
    ///
    /// # Errors
    ///
    /// If writing fails, returns [`io::Error`].
    pub fn write_dimacs<W: io::Write>(&self, writer: W) -> Result<(), io::Error> {
        debug!(
            n_vars = self.n_vars(),
            n_clauses = self.n_clauses(),
            "writing DIMACS CNF"
        );
        dimacs::write_cnf_annotated(writer, &self.cnf, self.n_vars())
    }

    /// Writes the model to a DIMACS WCNF file
    ///
    /// # Errors
    ///
    /// If writing fails, returns [`io::Error`].
    pub fn write_wcnf<W: io::Write>(&self, writer: W) -> Result<(), io::Error> {
        debug!(
            n_vars = self.n_vars(),
            n_clauses = self.n_clauses(),
            n_soft = self.n_soft_clauses(),
            "writing DIMACS WCNF"
        );
        dimacs::write_wcnf_annotated(writer, &self.cnf, &self.soft, self.n_vars())
    }

    /// Writes the hard clauses to a DIMACS CNF file at a path. With feature
    /// `compression`, the file is compressed based on its extension.
    ///
    /// # Errors
    ///
    /// If opening or writing the file fails, returns [`io::Error`].
    pub fn write_dimacs_path<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_dimacs(&mut writer)
    }

    /// Writes the model to a DIMACS WCNF file at a path. With feature
    /// `compression`, the file is compressed based on its extension.
    ///
    /// # Errors
    ///
    /// If opening or writing the file fails, returns [`io::Error`].
    pub fn write_wcnf_path<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let mut writer = fio::open_compressed_uncompressed_write(path)?;
        self.write_wcnf(&mut writer)
    }

    fn from_parsed(inst: dimacs::Instance) -> Result<Self, dimacs::Error> {
        let n_vars = u32::try_from(inst.header.n_vars())
            .ok()
            .and_then(|n| Var::new_with_error(n).ok())
            .ok_or(dimacs::Error::TooManyVars {
                line: inst.header_line,
                n_vars: inst.header.n_vars(),
            })?;
        let mut model = Model {
            var_manager: BasicVarManager::from_next_free(n_vars),
            ..Model::default()
        };
        inst.hard.into_iter().for_each(|cl| model.add_clause(cl));
        inst.soft.into_iter().for_each(|cl| model.add_soft_clause(cl));
        Ok(model)
    }

    /// Parses a DIMACS CNF file. The number of variables is the maximum of the
    /// header count and the variables occurring in clauses.
    ///
    /// # Errors
    ///
    /// Parsing errors from [`dimacs::parse_cnf`].
    pub fn from_dimacs<R: io::BufRead>(reader: R) -> Result<Self, dimacs::Error> {
        Self::from_parsed(dimacs::parse_cnf(reader)?)
    }

    /// Parses a pre-2022 DIMACS WCNF file with unit weight soft clauses
    ///
    /// # Errors
    ///
    /// Parsing errors from [`dimacs::parse_wcnf`].
    pub fn from_wcnf<R: io::BufRead>(reader: R) -> Result<Self, dimacs::Error> {
        Self::from_parsed(dimacs::parse_wcnf(reader)?)
    }

    /// Parses a DIMACS CNF file at a path. With feature `compression`, the file
    /// is decompressed based on its extension.
    ///
    /// # Errors
    ///
    /// If the file cannot be opened or parsing fails.
    pub fn from_dimacs_path<P: AsRef<Path>>(path: P) -> Result<Self, dimacs::Error> {
        let reader = fio::open_compressed_uncompressed_read(path)?;
        Self::from_dimacs(io::BufReader::new(reader))
    }
}

/// Prints a human-readable dump of the model as DIMACS comment lines
impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "c model name: {}", self.name)?;
        writeln!(f, "c number of variables: {}", self.n_vars())?;
        writeln!(f, "c hard clauses:")?;
        for cl in &self.cnf {
            writeln!(f, "c   {cl}")?;
        }
        if self.is_weighted() {
            writeln!(f, "c soft clauses:")?;
            for cl in &self.soft {
                writeln!(f, "c   {cl}")?;
            }
        }
        Ok(())
    }
}

/// Clauses added through [`CollectClauses`], e.g., by an encoding, are hard clauses
impl CollectClauses for Model {
    fn n_clauses(&self) -> usize {
        self.cnf.len()
    }
}

impl Extend<Clause> for Model {
    fn extend<T: IntoIterator<Item = Clause>>(&mut self, iter: T) {
        iter.into_iter().for_each(|cl| self.add_clause(cl));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::Model;
    use crate::{
        clause,
        encodings::card::SequentialCounters,
        instances::{fio::dimacs, BasicVarManager, ManageVars},
        lit,
        types::{constraints::CardConstraint, Var},
        var,
    };

    #[test]
    fn models_do_not_share_state() {
        let mut a = Model::with_name("a");
        let b = Model::with_name("b");
        a.new_vars(4);
        a.add_clause(clause![lit![0]]);
        assert_eq!(a.n_vars(), 4);
        assert_eq!(b.n_vars(), 0);
        assert_eq!(b.n_clauses(), 0);
    }

    #[test]
    fn adding_clause_marks_vars_used() {
        let mut model = Model::new();
        model.add_clause(clause![lit![0], !lit![6]]);
        assert_eq!(model.n_vars(), 7);
        model.add_soft_clause(clause![lit![9]]);
        assert_eq!(model.n_vars(), 10);
        assert_eq!(model.new_var(), var![10]);
        assert!(model.is_weighted());
    }

    #[test]
    fn helpers() {
        let mut model = Model::new();
        let x = model.new_vars(3);
        model.add_unit(x[0].pos_lit());
        model.add_lit_impl_lit(x[0].pos_lit(), x[1].neg_lit());
        model.add_lit_impl_clause(x[1].pos_lit(), &[x[2].pos_lit()]);
        assert_eq!(model.cnf()[0], clause![lit![0]]);
        assert_eq!(model.cnf()[1], clause![!lit![0], !lit![1]]);
        assert_eq!(model.cnf()[2], clause![!lit![1], lit![2]]);
    }

    #[test]
    fn cardinality() {
        let mut model = Model::new();
        let lits: Vec<_> = model.new_vars(4).into_iter().map(Var::pos_lit).collect();
        model.add_at_most_one(&lits);
        assert_eq!(model.n_clauses(), 6);
        let matrix = model.add_at_least_k(&lits, 2);
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 4);
        assert_eq!(model.n_vars(), 16);
        assert_eq!(matrix.output(), var![15]);
    }

    #[test]
    fn card_constr_dispatch() {
        let mut model = Model::new();
        let lits = vec![lit![0], lit![1], lit![2]];
        assert!(model
            .add_card_constr(CardConstraint::AtLeast(lits.clone(), 0))
            .is_none());
        assert_eq!(model.n_clauses(), 0);
        assert_eq!(model.n_vars(), 3);
        assert!(model
            .add_card_constr(CardConstraint::AtLeast(lits.clone(), 1))
            .is_none());
        assert_eq!(model.cnf()[0], clause![lit![0], lit![1], lit![2]]);
        assert!(model
            .add_card_constr(CardConstraint::AtLeast(lits.clone(), 2))
            .is_some());
        assert!(model
            .add_card_constr(CardConstraint::AtMostOne(lits))
            .is_none());
    }

    #[test]
    #[should_panic(expected = "requires at least one input literal")]
    fn card_constr_empty_at_least_one() {
        let mut model = Model::new();
        model.add_card_constr(CardConstraint::AtLeast(vec![], 1));
    }

    #[test]
    fn encodings_into_model() {
        let mut model = Model::new();
        let lits: Vec<_> = model.new_vars(2).into_iter().map(Var::pos_lit).collect();
        let mut vm = BasicVarManager::from_next_free(var![model.n_vars()]);
        let mut enc = SequentialCounters::from(lits);
        enc.encode_lb(2, &mut model, &mut vm);
        assert_eq!(model.n_vars(), vm.n_used());
    }

    #[test]
    fn dimacs_round_trip() {
        let mut model = Model::new();
        let lits: Vec<_> = model.new_vars(3).into_iter().map(Var::pos_lit).collect();
        model.add_at_least_k(&lits, 2);
        let mut buf = vec![];
        model.write_dimacs(&mut buf).unwrap();
        let header = dimacs::parse_header(Cursor::new(&buf)).unwrap();
        assert_eq!(header.n_vars(), 12);
        assert_eq!(header.n_clauses(), 31);
        let parsed = Model::from_dimacs(Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.n_vars(), model.n_vars());
        assert_eq!(parsed.cnf(), model.cnf());
    }

    #[test]
    fn wcnf_round_trip() {
        let mut model = Model::new();
        let x = model.new_vars(2);
        model.add_clause(clause![x[0].pos_lit(), x[1].pos_lit()]);
        model.add_soft_clause(clause![x[0].neg_lit()]);
        model.add_soft_clause(clause![x[1].neg_lit()]);
        let mut buf = vec![];
        model.write_wcnf(&mut buf).unwrap();
        let header = dimacs::parse_header(Cursor::new(&buf)).unwrap();
        assert_eq!(
            header,
            dimacs::Header::Wcnf {
                n_vars: 2,
                n_clauses: 3,
                top: 3
            }
        );
        let parsed = Model::from_wcnf(Cursor::new(&buf)).unwrap();
        assert_eq!(parsed.cnf(), model.cnf());
        assert_eq!(parsed.soft_clauses(), model.soft_clauses());
    }

    #[test]
    fn parse_too_many_vars() {
        let err =
            Model::from_dimacs(Cursor::new("c huge\np cnf 3000000000 1\n1 0\n")).unwrap_err();
        assert!(matches!(
            err,
            dimacs::Error::TooManyVars {
                line: 2,
                n_vars: 3_000_000_000
            }
        ));
    }

    #[test]
    fn parse_marks_clause_vars() {
        let model = Model::from_dimacs(Cursor::new("p cnf 2 1\n1 -5 0\n")).unwrap();
        assert_eq!(model.n_vars(), 5);
        let model = Model::from_dimacs(Cursor::new("p cnf 8 1\n1 -5 0\n")).unwrap();
        assert_eq!(model.n_vars(), 8);
    }

    #[test]
    fn display() {
        let mut model = Model::with_name("demo");
        model.add_clause(clause![lit![0], !lit![1]]);
        model.add_soft_clause(clause![lit![1]]);
        assert_eq!(
            format!("{model}"),
            "c model name: demo\nc number of variables: 2\nc hard clauses:\nc   (x0|~x1)\nc soft clauses:\nc   (x1)\n"
        );
    }
}
