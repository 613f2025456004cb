use crate::formula::{Assignment, Formula, Model};

use super::{Branch, Options, Solver, Status};

/// Recursive DPLL with copy-per-branch backtracking.
///
/// Each call owns its formula and assignment scope, so a failed branch never
/// leaks assignments into its sibling. Recursion depth grows with the number
/// of decisions, which is bounded by the number of variables; use
/// [`StackSolver`](super::StackSolver) for formulas with many variables.
#[derive(Debug)]
pub struct DpllSolver {
    formula: Formula,
    options: Options,
}

impl DpllSolver {
    /// Returns the scope of the first satisfiable leaf below `branch`.
    fn search(&self, mut branch: Branch) -> Option<Assignment> {
        let variable = match branch.reduce(&self.options) {
            Status::Satisfied => return Some(branch.scope),
            Status::Conflict => return None,
            Status::Undecided { variable } => variable,
        };

        debug!("Decide {} = true at depth {}", variable, branch.depth);
        if let Some(assignment) = self.search(branch.assume(&variable, true)) {
            return Some(assignment);
        }

        trace!("Backtrack {} at depth {}", variable, branch.depth);
        debug!("Decide {} = false at depth {}", variable, branch.depth);
        branch.decide(&variable, false);
        self.search(branch)
    }
}

impl Solver for DpllSolver {
    fn with_options(formula: Formula, options: Options) -> Self {
        DpllSolver { formula, options }
    }

    fn solve(self) -> Option<Model> {
        let assignment = self.search(Branch::root(self.formula.clone()))?;
        Some(Model::new(self.formula, assignment))
    }
}
