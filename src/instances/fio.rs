//! # Module for File IO (Writing and Parsing)
//!
//! It is recommended to write and parse instances through the interface of
//! [`super::Model`] rather than using these functions directly. Solver output
//! parsing is used by [`crate::solvers::ExternalSolver`].

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use thiserror::Error;
use tracing::{trace, warn};

use crate::types::Assignment;

pub use crate::types::InvalidVLine;

pub mod dimacs;

/// Opens a reader for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_read<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Read>, io::Error> {
    let path = path.as_ref();
    let raw_reader = File::open(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::read::BzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::read::GzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::read::XzDecoder::new(raw_reader)));
        }
    }
    Ok(Box::new(raw_reader))
}

/// Opens a writer for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_write<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Write>, io::Error> {
    let path = path.as_ref();
    let raw_writer = File::create(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(io::BufWriter::new(bzip2::write::BzEncoder::new(
                raw_writer,
                bzip2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(io::BufWriter::new(flate2::write::GzEncoder::new(
                raw_writer,
                flate2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(io::BufWriter::new(xz2::write::XzEncoder::new(
                raw_writer, 1,
            ))));
        }
    }
    Ok(Box::new(io::BufWriter::new(raw_writer)))
}

/// The answer of a SAT solver as read from its output
#[derive(Debug, PartialEq, Eq)]
pub enum SolverOutput {
    /// A satisfying assignment was found
    Sat(Assignment),
    /// The instance is unsatisfiable
    Unsat,
    /// The solver gave up
    Unknown,
}

/// Errors in the output of a SAT solver
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SatSolverOutputError {
    /// Neither a value line nor unsatisfiability was reported
    #[error("no value line found in the solver output")]
    NoVline,
    /// A value line could not be parsed
    #[error("invalid value line in line {line} of the solver output: {err}")]
    InvalidVLine {
        /// The line number (starting at 1)
        line: usize,
        /// The underlying error
        err: InvalidVLine,
    },
}

/// Parses the output of a SAT solver line by line
///
/// - a line containing `UNSATISFIABLE` makes the output [`SolverOutput::Unsat`],
/// - `s UNKNOWN` and `s INDETERMINATE` make it [`SolverOutput::Unknown`],
/// - every value line (starting with the token `v`) contributes its literals
///   to the assignment,
/// - all other lines are ignored.
///
/// # Errors
///
/// If reading fails or the output is malformed, i.e., contains no or invalid
/// value lines.
pub fn parse_sat_solver_output<R: BufRead>(reader: R) -> anyhow::Result<SolverOutput> {
    let mut solution: Option<Assignment> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        trace!(line = idx + 1, content = %line, "solver output");

        if line.contains("UNSATISFIABLE") {
            return Ok(SolverOutput::Unsat);
        }

        if let Some(status) = line.strip_prefix("s ") {
            let status = status.trim_start();
            if status.starts_with("UNKNOWN") || status.starts_with("INDETERMINATE") {
                return Ok(SolverOutput::Unknown);
            }
            continue;
        }

        if line.split_whitespace().next() == Some("v") {
            let assign = solution.get_or_insert_with(Assignment::default);
            if let Err(err) = assign.extend_from_vline(&line) {
                anyhow::bail!(SatSolverOutputError::InvalidVLine {
                    line: idx + 1,
                    err
                });
            }
        }
    }

    if let Some(solution) = solution {
        return Ok(SolverOutput::Sat(solution));
    }

    warn!("solver output neither reports unsatisfiability nor contains a value line");
    anyhow::bail!(SatSolverOutputError::NoVline);
}
