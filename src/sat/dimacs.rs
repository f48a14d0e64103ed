#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser for the DIMACS CNF (Conjunctive Normal Form) file format.
//!
//! The DIMACS CNF format is a standard text-based format for representing
//! boolean satisfiability problems:
//! - Comment lines start with 'c' and are skipped to end-of-line.
//! - One problem line `p cnf <num_variables> <num_clauses>` appears before
//!   any clause.
//! - Clauses are sequences of nonzero signed integers terminated by `0`.
//!   Terminators need not coincide with line breaks: the clause data is a
//!   stream of whitespace-separated tokens.
//! - An optional '%' line marks end-of-data (used in competition data).
//!
//! Duplicate literals and tautologies are normalised away by the `Formula`
//! constructor, not here.

use crate::sat::formula::Formula;
use std::io::{self, BufRead};
use std::path::Path;

/// Parses a DIMACS CNF formula from a string slice.
///
/// A convenience wrapper around [`parse_dimacs`], useful for testing or when
/// the DIMACS data is already in memory.
///
/// # Errors
///
/// If parsing fails due to malformed input (non-integer literals, a missing
/// or malformed problem line, an unterminated clause).
pub fn parse_dimacs_text(dimacs_text: &str) -> Result<Formula, String> {
    parse_dimacs(io::Cursor::new(dimacs_text))
}

/// Parses DIMACS formatted data from a `BufRead` source into a `Formula`.
///
/// # Errors
///
/// - If reading from `reader` fails.
/// - If a clause appears before the problem line, the problem line is
///   malformed or duplicated, a literal token is not an integer, or the
///   final clause is missing its `0` terminator.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Formula, String> {
    let mut declared_vars: Option<usize> = None;
    let mut declared_clauses = 0;
    let mut clauses: Vec<Vec<i32>> = Vec::new();
    let mut current: Vec<i32> = Vec::new();

    'lines: for line in reader.lines() {
        let line = line.map_err(|e| format!("read error: {e}"))?;
        let trimmed = line.trim_start();
        if trimmed.starts_with('c') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace().peekable();
        match tokens.peek() {
            None => continue,
            Some(&"%") => break,
            Some(&"p") => {
                if declared_vars.is_some() {
                    return Err("duplicate problem line".to_string());
                }
                tokens.next();
                if tokens.next() != Some("cnf") {
                    return Err("problem line is not of the form 'p cnf ...'".to_string());
                }
                declared_vars = Some(parse_count(tokens.next(), "variable")?);
                declared_clauses = parse_count(tokens.next(), "clause")?;
                clauses.reserve(declared_clauses);
                continue;
            }
            Some(_) => {}
        }

        if declared_vars.is_none() {
            return Err("clause data before the problem line".to_string());
        }
        for token in tokens {
            if token == "%" {
                break 'lines;
            }
            let lit: i32 = token
                .parse()
                .map_err(|e| format!("failed to parse literal '{token}': {e}"))?;
            if lit == 0 {
                clauses.push(std::mem::take(&mut current));
            } else {
                current.push(lit);
            }
        }
    }

    if !current.is_empty() {
        return Err("last clause is missing its 0 terminator".to_string());
    }
    let num_vars = declared_vars.ok_or_else(|| "missing problem line".to_string())?;
    Ok(Formula::new(clauses, num_vars))
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize, String> {
    token
        .ok_or_else(|| format!("problem line is missing the {what} count"))?
        .parse()
        .map_err(|e| format!("bad {what} count: {e}"))
}

/// Parses a DIMACS CNF file specified by its path.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or if its content
/// is not well-formed DIMACS (reported as `InvalidData`).
pub fn parse_file<P: AsRef<Path>>(path: P) -> io::Result<Formula> {
    let file = std::fs::File::open(&path)?;
    let reader = io::BufReader::new(file);
    parse_dimacs(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "failed to parse DIMACS file {}: {e}",
                path.as_ref().display()
            ),
        )
    })
}
