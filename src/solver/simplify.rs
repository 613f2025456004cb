//! Deduction rules shared by the search drivers.
//!
//! Every rule only ever removes clauses or literals, so a formula shrinks
//! monotonically while it is being simplified.

use crate::formula::{Assignment, ClauseIdx, Formula, Literal};

use super::Options;

/// Makes `literal` true in `formula`.
///
/// Clauses containing `literal` are satisfied and removed. The complement is
/// deleted from every other clause, which may leave a clause empty; empty
/// clauses are kept so the caller can detect the conflict.
pub fn assert_literal(formula: &mut Formula, literal: &Literal) {
    let complement = !literal;

    // Walk backwards so that removals do not shift indices still to be visited.
    for index in (0..formula.num_clauses()).rev().map(ClauseIdx::from) {
        if formula.clause(index).contains(literal) {
            formula.remove_clause_at(index);
        } else {
            formula.clause_mut(index).remove_literal(&complement);
        }
    }
}

/// Fixes `name` to `value` in `formula`.
pub fn assign_variable(formula: &mut Formula, name: &str, value: bool) {
    assert_literal(formula, &Literal::new(name, !value));
}

/// Runs unit propagation until no unit clause remains.
pub fn propagate_units(formula: &mut Formula, assignment: &mut Assignment) {
    loop {
        let literal = match formula
            .unit_clause_indices()
            .next()
            .and_then(|index| formula.clause(index).unit_literal())
        {
            Some(literal) => literal.clone(),
            None => break,
        };

        trace!("Unit propagation {}", literal);
        assignment.insert(literal.name(), !literal.negated());
        assert_literal(formula, &literal);
    }
}

/// Runs pure-literal elimination until no pure variable remains.
pub fn eliminate_pure_literals(formula: &mut Formula, assignment: &mut Assignment) {
    loop {
        let pure = formula.pure_variables();
        if pure.is_empty() {
            break;
        }

        for (name, value) in pure {
            trace!("Pure literal {} = {}", name, value);

            for index in (0..formula.num_clauses()).rev().map(ClauseIdx::from) {
                if formula.clause(index).mentions(&name) {
                    formula.remove_clause_at(index);
                }
            }
            assignment.insert(name, value);
        }
    }
}

/// Applies the enabled deduction rules, unit propagation first.
pub fn simplify(formula: &mut Formula, assignment: &mut Assignment, options: &Options) {
    if options.unit_propagation {
        propagate_units(formula, assignment);
    }

    if options.pure_literal_elimination {
        eliminate_pure_literals(formula, assignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(clauses: &[&[&str]]) -> Formula {
        Formula::from_tokens(clauses.iter().map(|clause| clause.iter())).unwrap()
    }

    #[test]
    fn assert_literal_removes_satisfied_and_falsified() {
        let mut formula = formula(&[&["p", "q"], &["!p", "r"], &["!p"], &["s"]]);
        assert_literal(&mut formula, &Literal::positive("p"));

        assert_eq!(formula.to_string(), "(r) ∧ () ∧ (s)");
    }

    #[test]
    fn assign_variable_false() {
        let mut formula = formula(&[&["p", "q"], &["!p", "r"]]);
        assign_variable(&mut formula, "p", false);

        assert_eq!(formula.to_string(), "(q)");
    }

    #[test]
    fn unit_propagation_chains() {
        let mut formula = formula(&[&["p"], &["!p", "q"], &["!q", "r"], &["r", "s", "t"]]);
        let mut assignment = Assignment::new();
        propagate_units(&mut formula, &mut assignment);

        assert!(formula.is_empty());
        assert_eq!(assignment.get("p"), Some(true));
        assert_eq!(assignment.get("q"), Some(true));
        assert_eq!(assignment.get("r"), Some(true));
        assert_eq!(assignment.get("s"), None);
    }

    #[test]
    fn unit_propagation_keeps_empty_clause() {
        let mut formula = formula(&[&["p"], &["!p"]]);
        let mut assignment = Assignment::new();
        propagate_units(&mut formula, &mut assignment);

        assert_eq!(formula.num_clauses(), 1);
        assert!(formula.has_empty_clause());
        assert_eq!(assignment.get("p"), Some(true));
    }

    #[test]
    fn unit_propagation_fixpoint() {
        let mut formula = formula(&[&["p"], &["!p", "q", "r"], &["!q", "!r"], &["r", "s"]]);
        let mut assignment = Assignment::new();
        propagate_units(&mut formula, &mut assignment);

        let reduced = formula.to_string();
        let assigned = assignment.clone();
        propagate_units(&mut formula, &mut assignment);

        assert_eq!(formula.to_string(), reduced);
        assert_eq!(assignment, assigned);
    }

    #[test]
    fn pure_literal_elimination() {
        let mut formula = formula(&[&["p", "q"], &["!p", "!r"], &["q", "!r"], &["p", "!q", "s"]]);
        let mut assignment = Assignment::new();
        eliminate_pure_literals(&mut formula, &mut assignment);

        assert!(formula.is_empty());
        assert_eq!(assignment.get("r"), Some(false));
        assert_eq!(assignment.get("s"), Some(true));
        assert_eq!(assignment.get("p"), Some(true));
        assert_eq!(assignment.get("q"), Some(true));
    }

    #[test]
    fn pure_literal_elimination_exposes_new_purities() {
        // Removing the clauses of pure `r` leaves `q` only positive.
        let mut formula = formula(&[&["p", "q"], &["!p", "q"], &["!q", "r"]]);
        let mut assignment = Assignment::new();
        eliminate_pure_literals(&mut formula, &mut assignment);

        assert!(formula.is_empty());
        assert_eq!(assignment.get("r"), Some(true));
        assert_eq!(assignment.get("q"), Some(true));
        assert_eq!(assignment.get("p"), None);

        let mut again = formula.clone();
        eliminate_pure_literals(&mut again, &mut assignment);
        assert_eq!(again.to_string(), formula.to_string());
    }

    #[test]
    fn simplification_never_grows() {
        let mut formula = formula(&[
            &["a", "b", "!c"],
            &["!a"],
            &["c", "d"],
            &["!d", "b", "e"],
            &["!e", "!b"],
        ]);
        let mut assignment = Assignment::new();

        let mut clauses = formula.num_clauses();
        let mut literals = formula.num_literals();
        loop {
            let index = match formula.unit_clause_indices().next() {
                Some(index) => index,
                None => break,
            };
            let literal = formula.clause(index).unit_literal().unwrap().clone();
            assignment.insert(literal.name(), !literal.negated());
            assert_literal(&mut formula, &literal);

            assert!(formula.num_clauses() <= clauses);
            assert!(formula.num_literals() <= literals);
            clauses = formula.num_clauses();
            literals = formula.num_literals();
        }

        eliminate_pure_literals(&mut formula, &mut assignment);
        assert!(formula.num_clauses() <= clauses);
        assert!(formula.num_literals() <= literals);
    }

    #[test]
    fn disabled_rules_leave_formula_untouched() {
        let mut formula = formula(&[&["p"], &["q", "r"]]);
        let mut assignment = Assignment::new();
        let options = Options::default()
            .unit_propagation(false)
            .pure_literal_elimination(false);
        simplify(&mut formula, &mut assignment, &options);

        assert_eq!(formula.num_clauses(), 2);
        assert!(assignment.is_empty());
    }
}
