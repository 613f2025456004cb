use crate::formula::{Formula, Model};

use super::{Branch, Options, Solver, Status};

/// DPLL driven by an explicit stack of pending branches instead of recursion.
///
/// The `false` child is pushed below the `true` child, so branches are popped
/// in the same depth-first, true-first order as [`DpllSolver`](super::DpllSolver)
/// and the same model is found. Stack depth is bounded by the heap instead of
/// the thread's call stack.
#[derive(Debug)]
pub struct StackSolver {
    formula: Formula,
    options: Options,
}

impl Solver for StackSolver {
    fn with_options(formula: Formula, options: Options) -> Self {
        StackSolver { formula, options }
    }

    fn solve(self) -> Option<Model> {
        let mut pending = vec![Branch::root(self.formula.clone())];

        while let Some(mut branch) = pending.pop() {
            let variable = match branch.reduce(&self.options) {
                Status::Satisfied => return Some(Model::new(self.formula, branch.scope)),
                Status::Conflict => {
                    trace!("Backtrack at depth {}", branch.depth);
                    continue;
                }
                Status::Undecided { variable } => variable,
            };

            debug!("Decide {} at depth {}", variable, branch.depth);
            let positive = branch.assume(&variable, true);
            branch.decide(&variable, false);
            pending.push(branch);
            pending.push(positive);
        }

        None
    }
}
