use std::time::{Duration, Instant};

use crate::formula::{Assignment, Formula, Model};

mod dpll;
mod simplify;
mod stack;

pub use dpll::DpllSolver;
pub use simplify::{
    assert_literal, assign_variable, eliminate_pure_literals, propagate_units, simplify,
};
pub use stack::StackSolver;

/// Solver configuration. Every switch defaults to `true`.
///
/// Turning a deduction rule off never changes whether a formula is reported
/// satisfiable, only how much branching the search needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub unit_propagation: bool,
    pub pure_literal_elimination: bool,
    /// Print the formula, the elapsed time and the outcome on stdout.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            unit_propagation: true,
            pure_literal_elimination: true,
            verbose: true,
        }
    }
}

impl Options {
    pub fn unit_propagation(mut self, enabled: bool) -> Self {
        self.unit_propagation = enabled;
        self
    }

    pub fn pure_literal_elimination(mut self, enabled: bool) -> Self {
        self.pure_literal_elimination = enabled;
        self
    }

    pub fn verbose(mut self, enabled: bool) -> Self {
        self.verbose = enabled;
        self
    }
}

pub trait Solver {
    /// Creates a new solver instance.
    fn with_options(formula: Formula, options: Options) -> Self;

    /// Creates a new solver instance with the default options.
    fn new(formula: Formula) -> Self
    where
        Self: Sized,
    {
        Self::with_options(formula, Options::default())
    }

    /// Solves a CNF SAT problem with the solver.
    /// Returns `Some(Model)` if satisfiable, `None` otherwise.
    fn solve(self) -> Option<Model>;
}

/// Solves `formula` with the recursive DPLL solver.
pub fn solve(formula: Formula, options: Options) -> Option<Model> {
    solve_with::<DpllSolver>(formula, options)
}

/// Solves `formula` with solver `T`, reporting on stdout when `options.verbose` is set.
pub fn solve_with<T: Solver>(formula: Formula, options: Options) -> Option<Model> {
    if options.verbose {
        println!("Starting solver...");
        println!("Formula: {}", formula);
    }

    debug!(
        "Solving {} clauses over {} variables",
        formula.num_clauses(),
        formula.variables().len()
    );

    let start = Instant::now();
    let result = T::with_options(formula, options).solve();
    let elapsed = start.elapsed();

    debug!(
        "Solver finished in {:?}: {}",
        elapsed,
        if result.is_some() { "SAT" } else { "UNSAT" }
    );

    if options.verbose {
        print_outcome(result.as_ref(), elapsed);
    }

    result
}

fn print_outcome(result: Option<&Model>, elapsed: Duration) {
    println!("Solver finished in {}ms", elapsed.as_millis());

    match result {
        Some(model) => {
            println!("Formula is satisfiable!");
            if model.assignment().is_empty() {
                println!("No variables to assign");
            } else {
                print!("Assignment:\n{}", model.assignment());
            }
        }
        None => println!("Formula is unsatisfiable!"),
    }
}

/// Outcome of simplifying a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Satisfied,
    Conflict,
    Undecided { variable: String },
}

/// A node of the decision tree: a private copy of the formula together with
/// the commitments made on the path from the root.
#[derive(Debug, Clone)]
struct Branch {
    formula: Formula,
    scope: Assignment,
    depth: usize,
}

impl Branch {
    fn root(formula: Formula) -> Self {
        Branch {
            formula,
            scope: Assignment::new(),
            depth: 0,
        }
    }

    /// Simplifies the branch and classifies the result.
    fn reduce(&mut self, options: &Options) -> Status {
        simplify(&mut self.formula, &mut self.scope, options);

        if self.formula.is_empty() {
            Status::Satisfied
        } else if self.formula.has_empty_clause() {
            Status::Conflict
        } else {
            Status::Undecided {
                variable: self.formula.first_literal().name().to_owned(),
            }
        }
    }

    /// Returns a child branch where `variable` is fixed to `value`.
    fn assume(&self, variable: &str, value: bool) -> Branch {
        let mut child = self.clone();
        child.decide(variable, value);
        child
    }

    /// Turns this branch into its child where `variable` is fixed to `value`.
    fn decide(&mut self, variable: &str, value: bool) {
        assign_variable(&mut self.formula, variable, value);
        self.scope.insert(variable, value);
        self.depth += 1;
    }
}
