/*!
Reads formulas from text.

Two layouts are accepted:

- the plain layout, one clause per line with whitespace separated literals such
  as `p !q r`, where lines starting with `#` are comments;
- DIMACS CNF, recognized by its `p cnf <num_variables> <num_clauses>` problem
  line, where variable `n` is named `x<n>`.
*/

use std::{
    fs,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use crate::formula::{Clause, Formula, Literal, LiteralParseError};
use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("I/O error occurred while reading formula file '{}'", path.display()))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse line '{}' as clause", clause))]
    MalformedClause { clause: String },
    #[snafu(display("Invalid literal found in clause '{}'", clause))]
    MalformedLiteral {
        clause: String,
        source: LiteralParseError,
    },
    #[snafu(display("Invalid variable found in clause '{}'", clause))]
    MalformedVariable {
        clause: String,
        source: ParseIntError,
    },
    #[snafu(display("Problem line must be 'p cnf <num_variables> <num_clauses>', found '{}'", line))]
    MalformedProblemDefinition { line: String },
    #[snafu(display(
        "Variable {} is out of range (the problem line declares {} variables)",
        variable,
        num_variables
    ))]
    VariableOutOfRange { variable: u64, num_variables: u64 },
    #[snafu(display(
        "The number of clauses ({}) does not match the clauses number in the problem definition ({})",
        found,
        expected,
    ))]
    ClauseCountMismatch { expected: usize, found: usize },
}

/// Parses a formula from a file
pub fn parse_file(path: impl AsRef<Path>) -> Result<Formula, Error> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).context(IoError {
        path: path.to_owned(),
    })?;

    parse_str(&content)
}

/// Parses a formula from a string, detecting the layout
pub fn parse_str(content: &str) -> Result<Formula, Error> {
    if content.lines().any(is_problem_line) {
        parse_dimacs(content)
    } else {
        parse_plain(content)
    }
}

/// Returns true for a DIMACS `p cnf ...` line. A plain clause over the variables
/// `p` and `cnf` is indistinguishable from it.
fn is_problem_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    tokens.next() == Some("p") && tokens.next() == Some("cnf")
}

fn parse_plain(content: &str) -> Result<Formula, Error> {
    let mut formula = Formula::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            // empty line, comment
            continue;
        }

        let literals = trimmed
            .split_whitespace()
            .map(str::parse::<Literal>)
            .collect::<Result<Vec<_>, _>>()
            .context(MalformedLiteral { clause: trimmed })?;
        formula.add_clause(Clause::new(literals));
    }

    Ok(formula)
}

/// Parse a DIMACS line to a clause
fn parse_dimacs_line(line: &str, num_variables: u64) -> Result<Clause, Error> {
    let splitted = line.split_whitespace().collect::<Vec<_>>();

    ensure!(
        splitted.last() == Some(&"0"),
        MalformedClause {
            clause: line.to_owned(),
        }
    );

    let mut literals = Vec::new();
    for s in &splitted[..splitted.len() - 1] {
        let value = s
            .parse::<i64>()
            .context(MalformedVariable { clause: line })?;
        let variable = value.unsigned_abs();

        ensure!(
            value != 0,
            MalformedClause {
                clause: line.to_owned(),
            }
        );
        ensure!(
            variable <= num_variables,
            VariableOutOfRange {
                variable,
                num_variables,
            }
        );

        literals.push(Literal::new(format!("x{}", variable), value < 0));
    }

    Ok(Clause::new(literals))
}

fn parse_dimacs(content: &str) -> Result<Formula, Error> {
    // skip until we find the problem definition
    let mut lines = content
        .lines()
        .map(str::trim)
        .skip_while(|line| !is_problem_line(line));

    let prob_line = lines.next().unwrap_or_default();
    let malformed = || MalformedProblemDefinition { line: prob_line };

    let splitted = prob_line.split_whitespace().collect::<Vec<_>>();

    // We only support CNF DIMACS format
    ensure!(
        splitted.len() == 4 && splitted[0] == "p" && splitted[1] == "cnf",
        malformed()
    );

    let (num_variables, num_clauses) =
        match (splitted[2].parse::<u64>(), splitted[3].parse::<usize>()) {
            (Ok(num_variables), Ok(num_clauses)) => (num_variables, num_clauses),
            _ => return malformed().fail(),
        };

    let mut formula = Formula::new();

    for line in lines {
        if line.is_empty() || line.starts_with('c') {
            // empty line, comment
            continue;
        }
        formula.add_clause(parse_dimacs_line(line, num_variables)?);
    }

    ensure!(
        formula.num_clauses() == num_clauses,
        ClauseCountMismatch {
            found: formula.num_clauses(),
            expected: num_clauses,
        }
    );

    Ok(formula)
}
