//! # Parsing and Writing DIMACS Files
//!
//! Functions for writing and parsing DIMACS CNF and (pre-2022) WCNF files.
//! The parser also accepts files that bend the format a little, e.g., with
//! blank lines or without a line break after the final `0`.
//!
//! ## References
//!
//! - [DIMACS CNF](http://www.satcompetition.org/2011/format-benchmarks2011.html)
//! - [DIMACS WCNF pre-22](https://maxsat-evaluations.github.io/2017/rules.html#input)

use std::io::{self, BufRead, Write};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{i32, line_ending, multispace0, multispace1, u64},
    combinator::{all_consuming, map_res, recognize, success},
    error::{Error as NomError, ErrorKind},
    multi::separated_list0,
    sequence::{pair, separated_pair, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::{
    instances::Cnf,
    types::{Clause, Lit, Var},
};

/// Errors when parsing DIMACS files
#[derive(Error, Debug)]
pub enum Error {
    /// The input ended before a `p` line was found
    #[error("no DIMACS header found")]
    NoHeader,
    /// The `p` line could not be parsed
    #[error("invalid DIMACS header in line {line}: '{content}'")]
    InvalidHeader {
        /// The line number (starting at 1)
        line: usize,
        /// The line content
        content: String,
    },
    /// The header announces a different file type than requested
    #[error("expected a {expected} file but found a {found} header")]
    WrongFormat {
        /// The requested format
        expected: &'static str,
        /// The format announced by the header
        found: &'static str,
    },
    /// A clause line could not be parsed
    #[error("invalid clause in line {line}: '{content}'")]
    InvalidClause {
        /// The line number (starting at 1)
        line: usize,
        /// The line content
        content: String,
    },
    /// The header announces more variables than can be represented
    #[error(
        "header in line {line} announces {n_vars} variables, at most {} are supported",
        Var::MAX_IDX
    )]
    TooManyVars {
        /// The line number of the header (starting at 1)
        line: usize,
        /// The number of variables in the header
        n_vars: usize,
    },
    /// A soft clause with a weight other than one
    #[error("soft clause in line {line} has weight {weight}, only unit weights are supported")]
    NonUnitWeight {
        /// The line number (starting at 1)
        line: usize,
        /// The weight of the clause
        weight: usize,
    },
    /// Reading the input failed
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The `p` line of a DIMACS file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// `p cnf <n_vars> <n_clauses>`
    Cnf {
        /// The number of variables
        n_vars: usize,
        /// The number of clauses
        n_clauses: usize,
    },
    /// `p wcnf <n_vars> <n_clauses> <top>`
    Wcnf {
        /// The number of variables
        n_vars: usize,
        /// The total number of hard and soft clauses
        n_clauses: usize,
        /// The weight marking hard clauses
        top: usize,
    },
}

impl Header {
    /// Gets the number of variables announced by the header
    #[must_use]
    pub fn n_vars(&self) -> usize {
        match self {
            Header::Cnf { n_vars, .. } | Header::Wcnf { n_vars, .. } => *n_vars,
        }
    }

    /// Gets the number of clauses announced by the header
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        match self {
            Header::Cnf { n_clauses, .. } | Header::Wcnf { n_clauses, .. } => *n_clauses,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Header::Cnf { .. } => "cnf",
            Header::Wcnf { .. } => "wcnf",
        }
    }
}

/// The content of a parsed DIMACS file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// The header of the file
    pub header: Header,
    /// The line number of the header (starting at 1)
    pub header_line: usize,
    /// The hard clauses
    pub hard: Cnf,
    /// The soft clauses, all with weight one
    pub soft: Vec<Clause>,
}

/// Reads the header of a DIMACS file, skipping leading comments. Returns the
/// header and the number of lines consumed.
fn read_header<R: BufRead>(reader: &mut R) -> Result<(Header, usize), Error> {
    let mut line_num = 0;
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Err(Error::NoHeader);
        }
        line_num += 1;
        let line = buf.trim_start();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        return match parse_p_line(line) {
            Ok((_, header)) if header.n_vars() > Var::MAX_IDX as usize => {
                Err(Error::TooManyVars {
                    line: line_num,
                    n_vars: header.n_vars(),
                })
            }
            Ok((_, header)) => Ok((header, line_num)),
            Err(_) => Err(Error::InvalidHeader {
                line: line_num,
                content: buf.trim_end().to_string(),
            }),
        };
    }
}

/// Parses only the header of a DIMACS file
///
/// # Errors
///
/// If reading fails or no valid header is found.
pub fn parse_header<R: BufRead>(mut reader: R) -> Result<Header, Error> {
    read_header(&mut reader).map(|(header, _)| header)
}

/// Parses a DIMACS CNF file
///
/// # Errors
///
/// If reading fails, the header is missing or not a CNF header, or a clause is
/// invalid.
pub fn parse_cnf<R: BufRead>(mut reader: R) -> Result<Instance, Error> {
    let (header, mut line_num) = read_header(&mut reader)?;
    let header_line = line_num;
    if !matches!(header, Header::Cnf { .. }) {
        return Err(Error::WrongFormat {
            expected: "cnf",
            found: header.kind(),
        });
    }
    let mut hard = Cnf::with_capacity(header.n_clauses());
    for line in reader.lines() {
        let line = line?;
        line_num += 1;
        match parse_cnf_line(&line) {
            Ok((_, Some(clause))) => hard.add_clause(clause),
            Ok((_, None)) => (),
            Err(_) => {
                return Err(Error::InvalidClause {
                    line: line_num,
                    content: line,
                })
            }
        }
    }
    Ok(Instance {
        header,
        header_line,
        hard,
        soft: vec![],
    })
}

/// Parses a pre-2022 DIMACS WCNF file. Clauses with a weight of at least `top`
/// are hard.
///
/// # Errors
///
/// If reading fails, the header is missing or not a WCNF header, a clause is
/// invalid, or a soft clause has a weight other than one.
pub fn parse_wcnf<R: BufRead>(mut reader: R) -> Result<Instance, Error> {
    let (header, mut line_num) = read_header(&mut reader)?;
    let header_line = line_num;
    let Header::Wcnf { top, .. } = header else {
        return Err(Error::WrongFormat {
            expected: "wcnf",
            found: header.kind(),
        });
    };
    let mut hard = Cnf::new();
    let mut soft = vec![];
    for line in reader.lines() {
        let line = line?;
        line_num += 1;
        match parse_wcnf_line(&line) {
            Ok((_, Some((weight, clause)))) => {
                if weight >= top {
                    hard.add_clause(clause);
                } else if weight == 1 {
                    soft.push(clause);
                } else {
                    return Err(Error::NonUnitWeight {
                        line: line_num,
                        weight,
                    });
                }
            }
            Ok((_, None)) => (),
            Err(_) => {
                return Err(Error::InvalidClause {
                    line: line_num,
                    content: line,
                })
            }
        }
    }
    Ok(Instance {
        header,
        header_line,
        hard,
        soft,
    })
}

/// Parses p line and determines the file format
fn parse_p_line(input: &str) -> IResult<&str, Header> {
    let (input, _) = terminated(tag("p"), multispace1)(input)?;
    let (input, id_token) = terminated(alt((tag("cnf"), tag("wcnf"))), multispace1)(input)?;
    if id_token == "cnf" {
        let (input, (n_vars, _, n_clauses)) =
            tuple((parse_count, multispace1, parse_count))(input)?;
        return Ok((input, Header::Cnf { n_vars, n_clauses }));
    }
    let (input, (n_vars, _, n_clauses, _, top)) = tuple((
        parse_count,
        multispace1,
        parse_count,
        multispace1,
        parse_count,
    ))(input)?;
    Ok((
        input,
        Header::Wcnf {
            n_vars,
            n_clauses,
            top,
        },
    ))
}

/// Parses a CNF line, either a comment, an empty line or a clause
fn parse_cnf_line(input: &str) -> IResult<&str, Option<Clause>> {
    let (input, _) = multispace0(input)?;
    if input.is_empty() {
        return Ok((input, None));
    }
    match tag::<&str, &str, NomError<&str>>("c")(input) {
        Ok((input, _)) => Ok((input, None)),
        Err(_) => {
            let (input, clause) =
                terminated(separated_list0(multispace1, parse_lit), parse_clause_ending)(input)?;
            Ok((input, Some(Clause::from(clause))))
        }
    }
}

/// Parses a WCNF line, either a comment, an empty line or a weighted clause
fn parse_wcnf_line(input: &str) -> IResult<&str, Option<(usize, Clause)>> {
    let (input, _) = multispace0(input)?;
    if input.is_empty() {
        return Ok((input, None));
    }
    match tag::<&str, &str, NomError<&str>>("c")(input) {
        Ok((input, _)) => Ok((input, None)),
        Err(_) => {
            let (input, (weight, opt_clause)) =
                separated_pair(parse_weight, multispace1, parse_cnf_line)(input)?;
            match opt_clause {
                Some(clause) => Ok((input, Some((weight, clause)))),
                None => Err(nom::Err::Error(NomError::new(input, ErrorKind::Digit))),
            }
        }
    }
}

/// Nuclear parser for counts in the header
fn parse_count(input: &str) -> IResult<&str, usize> {
    map_res(u64, usize::try_from)(input)
}

/// Nuclear parser for weight value
fn parse_weight(input: &str) -> IResult<&str, usize> {
    let (rest, w) = parse_count(input)?;
    if w == 0 {
        Err(nom::Err::Error(NomError::new(input, ErrorKind::Satisfy)))
    } else {
        Ok((rest, w))
    }
}

/// Nuclear parser for literal
fn parse_lit(input: &str) -> IResult<&str, Lit> {
    map_res(i32, Lit::from_ipasir)(input)
}

/// Parses the end of a clause
/// A '0' followed by a linebreak, as well as a '0' followed by
/// whitespace or only a linebreak are treated as valid clause endings.
/// This is more lenient than the DIMACS format description.
fn parse_clause_ending(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        multispace0,
        alt((
            recognize(all_consuming(success(""))),
            recognize(all_consuming(tag("0"))),
            recognize(terminated(tag("0"), line_ending)),
            recognize(terminated(tag("0"), multispace1)),
            recognize(line_ending),
        )),
    ))(input)
}

/// Writes a CNF to a DIMACS CNF file
///
/// # Errors
///
/// If writing fails, returns [`io::Error`].
pub fn write_cnf_annotated<W: Write>(
    mut writer: W,
    cnf: &Cnf,
    n_vars: u32,
) -> Result<(), io::Error> {
    writeln!(writer, "c CNF file written by satenc")?;
    writeln!(writer, "p cnf {n_vars} {}", cnf.len())?;
    cnf.iter()
        .try_for_each(|cl| write_clause(&mut writer, cl))?;
    writer.flush()
}

/// Writes hard and soft clauses to a pre-2022 DIMACS WCNF file. All soft
/// clauses have weight one, `top` is one more than the number of soft clauses
/// and prefixes every hard clause.
///
/// # Errors
///
/// If writing fails, returns [`io::Error`].
pub fn write_wcnf_annotated<W: Write>(
    mut writer: W,
    hard: &Cnf,
    soft: &[Clause],
    n_vars: u32,
) -> Result<(), io::Error> {
    let top = soft.len() + 1;
    writeln!(writer, "c WCNF file written by satenc")?;
    writeln!(writer, "c {} hard clauses", hard.len())?;
    writeln!(writer, "c {} soft clauses", soft.len())?;
    writeln!(writer, "p wcnf {n_vars} {} {top}", hard.len() + soft.len())?;
    hard.iter().try_for_each(|cl| {
        write!(writer, "{top} ")?;
        write_clause(&mut writer, cl)
    })?;
    soft.iter().try_for_each(|cl| {
        write!(writer, "1 ")?;
        write_clause(&mut writer, cl)
    })?;
    writer.flush()
}

fn write_clause<W: Write>(writer: &mut W, clause: &Clause) -> Result<(), io::Error> {
    clause
        .iter()
        .try_for_each(|l| write!(writer, "{} ", l.to_ipasir()))?;
    writeln!(writer, "0")
}
