use std::{env::args, path::Path};

use dpll_sat::{
    formula::{Formula, LiteralParseError, Model},
    parser::{self, parse_file},
    prelude::*,
    report::Report,
    solver::{solve_with, DpllSolver, Options, Solver, StackSolver},
};
use pretty_env_logger::formatted_builder;

fn usage_string() -> String {
    format!(
        "Usage: {} <solver_name> <command> [flags]

solver_name: dpll, stack

command:
    check <file_name> - solve the formula in the given file
    demo              - solve the built-in example formulas

flags:
    --no-unit - disable unit propagation
    --no-pure - disable pure literal elimination
    --quiet   - print only SAT or UNSAT",
        args().next().unwrap_or_else(|| "dpll-sat".to_owned())
    )
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Unknown solver '{}'\n\n{}", name, usage_string()))]
    UnknownSolver { name: String },
    #[snafu(display("Unknown command '{}'\n\n{}", name, usage_string()))]
    UnknownCommand { name: String },
    #[snafu(display("Unknown flag '{}'\n\n{}", name, usage_string()))]
    UnknownFlag { name: String },
    #[snafu(display("Failed to parse formula"))]
    ParserError { source: parser::Error },
    #[snafu(display("Failed to build example formula"))]
    ExampleError { source: LiteralParseError },
    #[snafu(display("Required argument does not exist\n\n{}", usage_string()))]
    MissingArgument,
}

/// (p ∨ q) ∧ (¬p ∨ r) ∧ (¬q ∨ ¬r), optionally extended with
/// (p ∨ ¬s) ∧ (q ∨ s) ∧ (r ∨ s).
fn example_formula(extended: bool) -> Result<Formula, LiteralParseError> {
    let mut clauses = vec![vec!["p", "q"], vec!["!p", "r"], vec!["!q", "!r"]];
    if extended {
        clauses.extend(vec![vec!["p", "!s"], vec!["q", "s"], vec!["r", "s"]]);
    }

    Formula::from_tokens(clauses)
}

fn parse_flags(flags: &[String]) -> Result<Options, Error> {
    let mut options = Options::default();
    for flag in flags {
        options = match flag.as_str() {
            "--no-unit" => options.unit_propagation(false),
            "--no-pure" => options.pure_literal_elimination(false),
            "--quiet" => options.verbose(false),
            name => {
                return UnknownFlag {
                    name: name.to_owned(),
                }
                .fail()
            }
        };
    }

    Ok(options)
}

fn run<T: Solver>(formula: Formula, options: Options) -> Option<Model> {
    let result = solve_with::<T>(formula, options);
    if !options.verbose {
        println!("{}", if result.is_some() { "SAT" } else { "UNSAT" });
    }

    result
}

fn solve_path<T: Solver>(path: &Path, options: Options) -> Result<Option<Model>, Error> {
    let formula = parse_file(path).context(ParserError)?;
    Ok(run::<T>(formula, options))
}

fn dispatch_command<T: Solver>(args: Vec<String>) -> Result<(), Error> {
    match args.get(0).map(|s| s.as_str()) {
        Some("check") => {
            let path = args.get(1).context(MissingArgument)?;
            let options = parse_flags(&args[2..])?;
            solve_path::<T>(path.as_ref(), options)?;
        }
        Some("demo") => {
            let options = parse_flags(&args[1..])?;
            for &extended in &[false, true] {
                let formula = example_formula(extended).context(ExampleError)?;
                run::<T>(formula, options);
            }
        }
        Some(name) => UnknownCommand {
            name: name.to_owned(),
        }
        .fail()?,
        None => MissingArgument.fail()?,
    }

    Ok(())
}

fn init_logger() {
    let mut builder = formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else if cfg!(debug_assertions) {
        builder.parse_filters("dpll_sat=debug");
    } else {
        builder.parse_filters("dpll_sat=warn");
    }

    builder.try_init().expect("Failed to initialize the logger");
}

fn main() -> Result<(), Report> {
    init_logger();

    let mut args = args();

    // drop arg[0]
    args.next();

    // solver name
    let solver_name = args.next();
    let remaining: Vec<_> = args.collect();

    match solver_name.as_deref() {
        Some("dpll") => dispatch_command::<DpllSolver>(remaining)?,
        Some("stack") => dispatch_command::<StackSolver>(remaining)?,
        Some(name) => UnknownSolver {
            name: name.to_owned(),
        }
        .fail()?,
        None => {
            println!("{}", usage_string());
        }
    }

    Ok(())
}
