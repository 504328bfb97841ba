//! # Solver Interface for External Executables
//!
//! The instance is handed to the solver executable through a file (or
//! `stdin`), the solver output is read from `stdout` (directly or through a
//! file) and parsed with [`fio::parse_sat_solver_output`]. Models with soft
//! clauses are passed as WCNF, all others as CNF.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    process::{self, Command, ExitStatus},
};

use anyhow::Context;
use tracing::{debug, warn};

use super::Outcome;
use crate::{
    instances::{
        fio::{self, SolverOutput},
        Model,
    },
    types::Var,
};

/// Specifies what argument position the instance is passed to the solver at
///
/// Most solvers expect the instance as the last argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum InstanceArg {
    /// Pass the instance file path as the first solver argument
    First,
    /// Pass the instance file path as the last argument
    #[default]
    Last,
}

/// Options for how the input instance should be passed to the external solver
#[derive(Debug, Clone)]
pub struct InputVia(InputViaInt);

#[derive(Debug, Clone)]
enum InputViaInt {
    /// Passes the instance by writing it to a file at the specified path
    ///
    /// The file will _not_ be removed afterwards
    File(PathBuf, InstanceArg),
    /// Passes the instance by writing it to a temporary file that will automatically be removed
    TempFile(InstanceArg),
    /// Passes the instance through a pipe to `stdin`
    ///
    /// Note, not all solvers support reading input from `stdin`
    Pipe,
}

impl InputVia {
    /// Pass the input via a persistent file at `path`, passed to the solver as the last argument
    #[must_use]
    pub fn file_last<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::Last,
        ))
    }

    /// Pass the input via a persistent file at `path`, passed to the solver as the first argument
    #[must_use]
    pub fn file_first<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::First,
        ))
    }

    /// Pass the input via a temporary file, passed to the solver as the last argument
    #[must_use]
    pub fn tempfile_last() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::Last))
    }

    /// Pass the input via a temporary file, passed to the solver as the first argument
    #[must_use]
    pub fn tempfile_first() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::First))
    }

    /// Pass the input via a pipe to `<stdin>`
    #[must_use]
    pub fn pipe() -> Self {
        InputVia(InputViaInt::Pipe)
    }
}

impl Default for InputVia {
    fn default() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::default()))
    }
}

/// Options for how the output of the solver is read
#[derive(Debug, Clone, Default)]
pub struct OutputVia(OutputViaInt);

#[derive(Debug, Clone, Default)]
enum OutputViaInt {
    /// The solver output is written to a file at the given path that is not automatically deleted
    File(PathBuf),
    /// The solver output is read directly through a pipe
    #[default]
    Pipe,
}

impl OutputVia {
    /// Process the solver output via a persistent file at `path`
    #[must_use]
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        OutputVia(OutputViaInt::File(path.as_ref().to_path_buf()))
    }

    /// Process the solver output via a pipe from `<stdout>`
    #[must_use]
    pub fn pipe() -> Self {
        OutputVia(OutputViaInt::Pipe)
    }
}

/// A solver called via an external executable
///
/// Every call to [`Solver::solve`] or [`Solver::run`] spawns a new solver
/// process and blocks until it terminated. No timeout is imposed, pass the
/// solver's own time limit options if needed.
#[derive(Debug)]
pub struct Solver {
    cmd: Command,
    input: InputVia,
    output: OutputVia,
}

impl Solver {
    /// Initializes a solver with a [`Command`] that is fully set up, except for the input instance
    ///
    /// # Notes
    ///
    /// - If input is passed via a file with a path that ends in a compression extension and
    ///     feature `compression` is enabled, a compressed file is written
    /// - If the solver output is processed via a file, compression is _not_ supported
    ///
    /// # Example
    ///
    /// ```
    /// use std::process::Command;
    /// use satenc::solvers::{ExternalSolver, external};
    /// let solver = ExternalSolver::new(
    ///     Command::new("<path to solver binary>"),
    ///     external::InputVia::tempfile_last(),
    ///     external::OutputVia::pipe(),
    /// );
    /// ```
    #[must_use]
    pub fn new(cmd: Command, input: InputVia, output: OutputVia) -> Self {
        Solver { cmd, input, output }
    }

    /// Initializes a solver with default values for [`InputVia`] and [`OutputVia`]
    ///
    /// The default values are passing the input via a temporary file and processing the output via
    /// a pipe.
    #[must_use]
    pub fn new_default(cmd: Command) -> Self {
        Solver::new(cmd, InputVia::default(), OutputVia::default())
    }

    /// Initializes a solver that writes the instance to `path` and captures the
    /// solver output in a file next to it with extension `sol`, i.e., for
    /// `instance.cnf` the output is written to `instance.sol`. Both files are
    /// kept after solving.
    ///
    /// # Example
    ///
    /// ```
    /// use std::process::Command;
    /// use satenc::solvers::ExternalSolver;
    /// let solver = ExternalSolver::with_instance_file(Command::new("kissat"), "/tmp/cover.cnf");
    /// assert_eq!(solver.result_path().unwrap(), std::path::Path::new("/tmp/cover.sol"));
    /// ```
    #[must_use]
    pub fn with_instance_file<P: AsRef<Path>>(cmd: Command, path: P) -> Self {
        let path = path.as_ref();
        Solver::new(
            cmd,
            InputVia::file_last(path),
            OutputVia::file(path.with_extension("sol")),
        )
    }

    /// Gets the path the solver output is captured in, if it is captured in a file
    #[must_use]
    pub fn result_path(&self) -> Option<&Path> {
        match &self.output.0 {
            OutputViaInt::File(path) => Some(path),
            OutputViaInt::Pipe => None,
        }
    }

    /// Solves a model and returns the parsed solver output
    ///
    /// # Errors
    ///
    /// If writing the instance, spawning the solver, or reading its output
    /// fails, the solver exits with an unexpected code, or the output is
    /// malformed.
    pub fn solve(&self, model: &Model) -> anyhow::Result<SolverOutput> {
        debug!(
            program = ?self.cmd.get_program(),
            n_vars = model.n_vars(),
            n_clauses = model.n_clauses(),
            n_soft = model.n_soft_clauses(),
            "calling external solver"
        );
        let output = call_external(self, model)?;
        debug!(
            result = match &output {
                SolverOutput::Sat(_) => "sat",
                SolverOutput::Unsat => "unsat",
                SolverOutput::Unknown => "unknown",
            },
            "external solver finished"
        );
        Ok(output)
    }

    /// Solves a model and classifies the result. Assignments reported by the
    /// solver are truncated to the variables of the model.
    pub fn run(&self, model: &Model) -> Outcome {
        match self.solve(model) {
            Ok(SolverOutput::Sat(mut sol)) => {
                let n_vars = model.n_vars();
                if sol.len() < n_vars as usize {
                    warn!(
                        reported = sol.len(),
                        expected = n_vars,
                        "solver assignment does not cover all variables"
                    );
                } else if n_vars > 0 {
                    sol = sol.truncate(Var::new(n_vars - 1));
                }
                Outcome::Satisfiable(sol)
            }
            Ok(SolverOutput::Unsat) => Outcome::Unsatisfiable,
            Ok(SolverOutput::Unknown) => {
                Outcome::AdapterFailure(anyhow::anyhow!("solver did not decide the instance"))
            }
            Err(err) => {
                warn!(error = %err, "external solver call failed");
                Outcome::AdapterFailure(err)
            }
        }
    }

    /// Builds a fresh command from the configured one, with the instance path
    /// added at the requested position
    fn command(&self, instance: Option<(&Path, InstanceArg)>) -> Command {
        let mut cmd = Command::new(self.cmd.get_program());
        if let Some((path, InstanceArg::First)) = instance {
            cmd.arg(path);
        }
        cmd.args(self.cmd.get_args());
        if let Some((path, InstanceArg::Last)) = instance {
            cmd.arg(path);
        }
        for (key, val) in self.cmd.get_envs() {
            if let Some(val) = val {
                cmd.env(key, val);
            } else {
                cmd.env_remove(key);
            }
        }
        if let Some(dir) = self.cmd.get_current_dir() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

macro_rules! check_exit_code {
    ($status:expr) => {
        match $status.code() {
            // these are the expected return codes for SAT solvers
            // we don't check them against the output though
            Some(0 | 10 | 20) => (),
            Some(x) => anyhow::bail!("solver returned unexpected code {x}"),
            None => anyhow::bail!("solver process terminated by signal"),
        };
    };
}

fn write_instance<W: io::Write>(writer: W, model: &Model) -> Result<(), io::Error> {
    if model.is_weighted() {
        model.write_wcnf(writer)
    } else {
        model.write_dimacs(writer)
    }
}

fn log_exit(program: &OsStr, exit: ExitStatus) {
    debug!(program = ?program, code = ?exit.code(), "solver process exited");
}

/// Parses the solver output from a pipe and reads the pipe to its end, so
/// that the solver never blocks on a full pipe after the relevant lines
fn parse_and_drain(stdout: process::ChildStdout) -> anyhow::Result<SolverOutput> {
    let mut stdout = io::BufReader::new(stdout);
    let output = fio::parse_sat_solver_output(&mut stdout);
    let drained = io::copy(&mut stdout, &mut io::sink());
    let output = output?;
    drained.context("failed to read solver output")?;
    Ok(output)
}

fn call_external(solver: &Solver, model: &Model) -> anyhow::Result<SolverOutput> {
    // when writing to a temporary file, this needs to be explicitly closed at the end
    let mut temppath = None;
    // build the final command
    let mut cmd = match &solver.input.0 {
        InputViaInt::File(in_path, argpos) => {
            write_instance(fio::open_compressed_uncompressed_write(in_path)?, model)
                .with_context(|| format!("failed to write instance to {}", in_path.display()))?;
            solver.command(Some((in_path.as_path(), *argpos)))
        }
        InputViaInt::TempFile(argpos) => {
            let mut writer = io::BufWriter::new(tempfile::NamedTempFile::new()?);
            write_instance(&mut writer, model)?;
            let path = writer.into_inner()?.into_temp_path();
            let cmd = solver.command(Some((&*path, *argpos)));
            temppath = Some(path);
            cmd
        }
        InputViaInt::Pipe => {
            let mut cmd = solver.command(None);
            cmd.stdin(process::Stdio::piped());
            return call_piped(cmd, solver, model);
        }
    };
    let output = match &solver.output.0 {
        OutputViaInt::File(path) => {
            // NOTE: this currently does not support compression
            cmd.stdout(fs::File::create(path)?);
            let exit = cmd
                .status()
                .with_context(|| format!("failed to run {:?}", cmd.get_program()))?;
            log_exit(cmd.get_program(), exit);
            let output =
                fio::parse_sat_solver_output(io::BufReader::new(fs::File::open(path)?))?;
            check_exit_code!(exit);
            output
        }
        OutputViaInt::Pipe => {
            let mut child = cmd
                .stdout(process::Stdio::piped())
                .spawn()
                .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
            let stdout = child
                .stdout
                .take()
                .context("solver stdout is not captured")?;
            let output = parse_and_drain(stdout);
            let exit = child.wait()?;
            log_exit(cmd.get_program(), exit);
            let output = output?;
            check_exit_code!(exit);
            output
        }
    };
    if let Some(temppath) = temppath {
        temppath.close()?;
    }
    Ok(output)
}

/// Solver call with the instance passed through `stdin`
fn call_piped(mut cmd: Command, solver: &Solver, model: &Model) -> anyhow::Result<SolverOutput> {
    match &solver.output.0 {
        OutputViaInt::File(path) => {
            // NOTE: this currently does not support compression
            let mut child = cmd
                .stdout(fs::File::create(path)?)
                .spawn()
                .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
            let stdin = child.stdin.take().context("solver stdin is not captured")?;
            let written = write_instance(io::BufWriter::new(stdin), model);
            let exit = child.wait()?;
            log_exit(cmd.get_program(), exit);
            written?;
            let output =
                fio::parse_sat_solver_output(io::BufReader::new(fs::File::open(path)?))?;
            check_exit_code!(exit);
            Ok(output)
        }
        OutputViaInt::Pipe => {
            let mut child = cmd
                .stdout(process::Stdio::piped())
                .spawn()
                .with_context(|| format!("failed to spawn {:?}", cmd.get_program()))?;
            let stdin = child.stdin.take().context("solver stdin is not captured")?;
            let stdout = child
                .stdout
                .take()
                .context("solver stdout is not captured")?;
            // second thread for processing stdout to avoid blocking
            let output_handle = std::thread::spawn(move || parse_and_drain(stdout));
            // main thread writes input to stdin
            let written = write_instance(io::BufWriter::new(stdin), model);
            let output = output_handle
                .join()
                .map_err(|_| anyhow::anyhow!("output parsing thread panicked"));
            let exit = child.wait()?;
            log_exit(cmd.get_program(), exit);
            let output = output??;
            written?;
            check_exit_code!(exit);
            Ok(output)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{ffi::OsStr, path::Path, process::Command};

    use super::{InputVia, InstanceArg, OutputVia, Solver};
    use crate::{
        clause,
        instances::{fio::SolverOutput, Model},
        lit,
        solvers::Outcome,
        types::TernaryVal,
    };

    /// A "solver" that is a shell script with the instance path as `$0`
    fn script(body: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(body);
        cmd
    }

    fn model() -> Model {
        let mut model = Model::with_name("three");
        model.new_vars(3);
        model.add_clause(clause![lit![0], lit![1], lit![2]]);
        model
    }

    #[test]
    fn sat_output() {
        let solver = Solver::new_default(script(
            "grep -q '^p cnf 3 1' \"$0\" || exit 1; echo 's SATISFIABLE'; echo 'v 1 -2 3 0'; exit 10",
        ));
        let sol = match solver.run(&model()) {
            Outcome::Satisfiable(sol) => sol,
            other => panic!("expected a solution, got {other:?}"),
        };
        assert_eq!(
            sol.values(&[crate::var![0], crate::var![1], crate::var![2]])
                .collect::<Vec<_>>(),
            vec![TernaryVal::True, TernaryVal::False, TernaryVal::True]
        );
    }

    #[test]
    fn unsat_output() {
        let solver = Solver::new_default(script("echo 's UNSATISFIABLE'; exit 20"));
        assert!(solver.run(&model()).is_unsat());
    }

    #[test]
    fn unknown_is_failure() {
        let solver = Solver::new_default(script("echo 's UNKNOWN'; exit 0"));
        assert!(matches!(solver.run(&model()), Outcome::AdapterFailure(_)));
    }

    #[test]
    fn bad_exit_code() {
        let solver = Solver::new_default(script("echo 'v 1 2 3 0'; exit 3"));
        assert!(matches!(solver.run(&model()), Outcome::AdapterFailure(_)));
    }

    #[test]
    fn missing_binary() {
        let solver = Solver::new_default(Command::new("/nonexistent/satenc-solver"));
        assert!(matches!(solver.run(&model()), Outcome::AdapterFailure(_)));
    }

    #[test]
    fn malformed_output() {
        let solver = Solver::new_default(script("echo 'c nothing to see'; exit 0"));
        assert!(solver.solve(&model()).is_err());
    }

    #[test]
    fn instance_argument_position() {
        let mut cmd = Command::new("solver");
        cmd.arg("--flag").env("SOLVER_SEED", "3").current_dir("/tmp");
        let solver = Solver::new(cmd, InputVia::tempfile_first(), OutputVia::pipe());
        let inst = Path::new("inst.cnf");
        let first = solver.command(Some((inst, InstanceArg::First)));
        assert_eq!(first.get_program(), OsStr::new("solver"));
        assert_eq!(
            first.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("inst.cnf"), OsStr::new("--flag")]
        );
        assert_eq!(first.get_current_dir(), Some(Path::new("/tmp")));
        assert_eq!(first.get_envs().count(), 1);
        let last = solver.command(Some((inst, InstanceArg::Last)));
        assert_eq!(
            last.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("--flag"), OsStr::new("inst.cnf")]
        );
    }

    #[test]
    fn instance_as_last_arg() {
        let mut cmd = script("test \"$1\" = extra || exit 1; grep -q '^p cnf' \"$2\" && echo 'v -1 0'");
        cmd.arg("sh").arg("extra");
        let solver = Solver::new(cmd, InputVia::tempfile_last(), OutputVia::pipe());
        let SolverOutput::Sat(sol) = solver.solve(&model()).unwrap() else {
            panic!("expected a solution")
        };
        assert_eq!(sol.var_value(crate::var![0]), TernaryVal::False);
    }

    #[test]
    fn pipe_input() {
        let dir = tempfile::tempdir().unwrap();
        for output in [OutputVia::pipe(), OutputVia::file(dir.path().join("out.log"))] {
            let solver = Solver::new(
                script("input=$(cat); echo \"$input\" | grep -q '^p cnf 3 1' && echo 'v 1 2 3 0'"),
                InputVia::pipe(),
                output,
            );
            assert!(solver.run(&model()).is_sat());
        }
    }

    #[test]
    fn weighted_models_are_wcnf() {
        let mut model = model();
        model.add_soft_clause(clause![!lit![0]]);
        let solver = Solver::new_default(script("grep -q '^p wcnf 3 2 2' \"$0\" && echo 'v -1 2 -3 0'"));
        assert!(solver.run(&model).is_sat());
    }

    #[test]
    fn instance_and_result_files() {
        let dir = tempfile::tempdir().unwrap();
        let inst = dir.path().join("three.cnf");
        let solver = Solver::with_instance_file(
            script("echo 'c solving'; echo 'v 1 -2 -3 0'; exit 10"),
            &inst,
        );
        assert_eq!(solver.result_path(), Some(dir.path().join("three.sol").as_path()));
        assert!(solver.run(&model()).is_sat());
        let written = std::fs::read_to_string(&inst).unwrap();
        assert!(written.contains("p cnf 3 1\n1 2 3 0\n"));
        let result = std::fs::read_to_string(dir.path().join("three.sol")).unwrap();
        assert!(result.contains("v 1 -2 -3 0"));
    }

    #[test]
    fn assignment_truncated_to_model() {
        let solver = Solver::new_default(script("echo 'v 1 2 3 4 5 0'"));
        let sol = solver.run(&model()).into_result().unwrap().unwrap();
        assert_eq!(sol.len(), 3);
    }
}
