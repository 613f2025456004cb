/*!
A module to represent propositional formulas in conjunctive normal form.

Variables are referenced by name. A [`Formula`] is a conjunction of [`Clause`]s
and each clause is a disjunction of [`Literal`]s.
*/

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Display,
    iter::FromIterator,
    str::FromStr,
};

use typed_index_collections::TiVec;

use crate::prelude::*;

#[derive(Debug, Snafu)]
pub enum LiteralParseError {
    #[snafu(display("Literal '{}' has no variable name", token))]
    MissingName { token: String },
}

/// A variable reference with a polarity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    name: String,
    negated: bool,
}

impl Literal {
    pub fn new(name: impl Into<String>, negated: bool) -> Self {
        Literal {
            name: name.into(),
            negated,
        }
    }

    pub fn positive(name: impl Into<String>) -> Self {
        Literal::new(name, false)
    }

    pub fn negative(name: impl Into<String>) -> Self {
        Literal::new(name, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn negated(&self) -> bool {
        self.negated
    }

    /// Returns true if assigning `value` to the variable makes this literal true.
    pub fn is_satisfied_by(&self, value: bool) -> bool {
        self.negated != value
    }

}

impl FromStr for Literal {
    type Err = LiteralParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let (negated, name) = match token
            .strip_prefix('!')
            .or_else(|| token.strip_prefix('¬'))
        {
            Some(rest) => (true, rest),
            None => (false, token),
        };

        ensure!(
            !name.is_empty(),
            MissingName {
                token: s.to_owned()
            }
        );

        Ok(Literal::new(name, negated))
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.negated { "¬" } else { "" }, self.name)
    }
}

impl std::ops::Not for &Literal {
    type Output = Literal;

    fn not(self) -> Self::Output {
        Literal {
            name: self.name.clone(),
            negated: !self.negated,
        }
    }
}

/// Disjunction of literals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    pub fn num_literals(&self) -> usize {
        self.literals.len()
    }

    /// An empty clause is a false disjunction.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    /// Returns the sole literal of a unit clause.
    pub fn unit_literal(&self) -> Option<&Literal> {
        match self.literals.as_slice() {
            [literal] => Some(literal),
            _ => None,
        }
    }

    pub fn first(&self) -> Option<&Literal> {
        self.literals.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Literal> + '_ {
        self.literals.iter()
    }

    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// Returns true if the variable occurs in the clause with any polarity.
    pub fn mentions(&self, name: &str) -> bool {
        self.literals.iter().any(|literal| literal.name() == name)
    }

    /// Removes every occurrence of `literal`.
    pub fn remove_literal(&mut self, literal: &Literal) {
        self.literals.retain(|current| current != literal);
    }

    /// Returns true if some literal is made true by `assignment`.
    /// Unassigned variables never satisfy a literal.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.literals.iter().any(|literal| {
            assignment
                .get(literal.name())
                .map_or(false, |value| literal.is_satisfied_by(value))
        })
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Clause::new(iter.into_iter().collect())
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for literal in iter {
            write!(f, " ∨ {}", literal)?;
        }

        write!(f, ")")?;

        Ok(())
    }
}

/// Position of a clause inside a [`Formula`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClauseIdx(usize);

impl From<usize> for ClauseIdx {
    fn from(index: usize) -> Self {
        ClauseIdx(index)
    }
}

impl From<ClauseIdx> for usize {
    fn from(index: ClauseIdx) -> Self {
        index.0
    }
}

/// Polarities with which a variable occurs across a formula.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occurrence {
    pub positive: bool,
    pub negative: bool,
}

impl Occurrence {
    /// A variable is pure when it occurs with exactly one polarity.
    pub fn is_pure(&self) -> bool {
        self.positive != self.negative
    }

    fn record(&mut self, literal: &Literal) {
        if literal.negated() {
            self.negative = true;
        } else {
            self.positive = true;
        }
    }
}

/// Formula representation in Conjunctive Normal Form
#[derive(Debug, Clone, Default)]
pub struct Formula {
    clauses: TiVec<ClauseIdx, Clause>,
}

impl Formula {
    pub fn new() -> Self {
        Formula {
            clauses: TiVec::new(),
        }
    }

    /// Builds a formula from clauses of literal tokens such as `"p"` or `"!q"`.
    /// Empty tokens are skipped.
    pub fn from_tokens<C, T>(clauses: C) -> Result<Self, LiteralParseError>
    where
        C: IntoIterator,
        C::Item: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut formula = Formula::new();
        for tokens in clauses {
            let mut literals = Vec::new();
            for token in tokens {
                let token = token.as_ref();
                if token.trim().is_empty() {
                    continue;
                }
                literals.push(token.parse()?);
            }
            formula.add_clause(Clause::new(literals));
        }

        Ok(formula)
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Total number of literal occurrences over all clauses.
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::num_literals).sum()
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> + '_ {
        self.clauses.iter()
    }

    pub fn clause(&self, index: ClauseIdx) -> &Clause {
        &self.clauses[index]
    }

    pub fn clause_mut(&mut self, index: ClauseIdx) -> &mut Clause {
        &mut self.clauses[index]
    }

    /// An empty formula is trivially satisfied.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// A formula holding an empty clause cannot be satisfied.
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Indices of all current unit clauses, in clause order.
    pub fn unit_clause_indices(&self) -> impl Iterator<Item = ClauseIdx> + '_ {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, clause)| clause.is_unit())
            .map(|(index, _)| ClauseIdx::from(index))
    }

    /// Polarity table of every variable in the formula.
    pub fn occurrences(&self) -> BTreeMap<&str, Occurrence> {
        let mut table = BTreeMap::<&str, Occurrence>::new();
        for literal in self.clauses.iter().flat_map(Clause::iter) {
            table.entry(literal.name()).or_default().record(literal);
        }

        table
    }

    /// Variables that occur with a single polarity, mapped to the value that
    /// satisfies all of their occurrences.
    pub fn pure_variables(&self) -> BTreeMap<String, bool> {
        self.occurrences()
            .into_iter()
            .filter(|(_, occurrence)| occurrence.is_pure())
            .map(|(name, occurrence)| (name.to_owned(), occurrence.positive))
            .collect()
    }

    pub fn variables(&self) -> BTreeSet<&str> {
        self.clauses
            .iter()
            .flat_map(Clause::iter)
            .map(Literal::name)
            .collect()
    }

    /// Removes the clause at `index`. Later clauses shift down by one.
    pub fn remove_clause_at(&mut self, index: ClauseIdx) -> Clause {
        self.clauses.remove(index)
    }

    /// Returns the first literal of the first clause, used as the branching variable.
    ///
    /// # Panics
    ///
    /// Panics when the formula is empty or its first clause is empty.
    pub fn first_literal(&self) -> &Literal {
        self.clauses
            .iter()
            .next()
            .and_then(Clause::first)
            .expect("branching literal requested from an empty formula or clause")
    }

    /// Returns true if every clause is satisfied by `assignment`.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.is_satisfied_by(assignment))
    }
}

impl FromIterator<Clause> for Formula {
    fn from_iter<I: IntoIterator<Item = Clause>>(iter: I) -> Self {
        Formula {
            clauses: iter.into_iter().collect(),
        }
    }
}

impl Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut iter = self.clauses.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first)?;
        }
        for clause in iter {
            write!(f, " ∧ {}", clause)?;
        }

        Ok(())
    }
}

/// Mapping from variable name to truth value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<String, bool>,
}

impl Assignment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    /// Records a value, returning the previous one if the variable was assigned.
    pub fn insert(&mut self, name: impl Into<String>, value: bool) -> Option<bool> {
        self.values.insert(name.into(), value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        self.values
            .iter()
            .map(|(name, &value)| (name.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Assignment {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (name, value) in self.iter() {
            writeln!(f, "{} ↦ {}", name, if value { "⊤" } else { "⊥" })?;
        }

        Ok(())
    }
}

/// Represents a satisfying assignment for a formula.
#[derive(Debug)]
pub struct Model {
    formula: Formula,
    assignment: Assignment,
}

impl Model {
    /// Creates a new model from a formula and an assignment.
    ///
    /// # Panics
    ///
    /// Panics when `assignment` leaves some clause of `formula` unsatisfied.
    pub fn new(formula: Formula, assignment: Assignment) -> Self {
        assert!(
            formula.is_satisfied_by(&assignment),
            "assignment does not satisfy the formula"
        );

        Model {
            formula,
            assignment,
        }
    }

    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }

    /// Value of a variable, `None` if the search never had to fix it.
    pub fn value(&self, name: &str) -> Option<bool> {
        self.assignment.get(name)
    }

    /// Variables of the formula left unassigned; any value satisfies the formula.
    pub fn free_variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.formula
            .variables()
            .into_iter()
            .filter(move |name| self.assignment.get(name).is_none())
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Model for {}", self.formula)?;
        write!(f, "Assignment:")?;
        for (name, value) in self.assignment.iter() {
            write!(f, "\n  {}: {}", name, value)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formula(clauses: &[&[&str]]) -> Formula {
        Formula::from_tokens(clauses.iter().map(|clause| clause.iter())).unwrap()
    }

    #[test]
    fn literal_parse() {
        assert_eq!("p".parse::<Literal>().unwrap(), Literal::positive("p"));
        assert_eq!("!p".parse::<Literal>().unwrap(), Literal::negative("p"));
        assert_eq!("¬q".parse::<Literal>().unwrap(), Literal::negative("q"));
        assert!("!".parse::<Literal>().is_err());
    }

    #[test]
    fn literal_satisfaction() {
        assert!(Literal::positive("p").is_satisfied_by(true));
        assert!(!Literal::positive("p").is_satisfied_by(false));
        assert!(Literal::negative("p").is_satisfied_by(false));
        assert!(!Literal::negative("p").is_satisfied_by(true));
    }

    #[test]
    fn literal_complement() {
        let p = Literal::positive("p");
        assert_eq!(!&p, Literal::negative("p"));
        assert_eq!(!&!&p, p);
    }

    #[test]
    fn remove_literal_removes_all_occurrences() {
        let mut clause: Clause = vec![
            Literal::positive("p"),
            Literal::negative("q"),
            Literal::positive("p"),
        ]
        .into_iter()
        .collect();

        clause.remove_literal(&Literal::positive("p"));
        assert_eq!(clause, Clause::new(vec![Literal::negative("q")]));

        clause.remove_literal(&Literal::positive("p"));
        assert!(clause.is_unit());

        clause.remove_literal(&Literal::negative("q"));
        assert!(clause.is_empty());
    }

    #[test]
    fn empty_tokens_are_ignored() {
        let formula = formula(&[&["p", "", "!q"], &[""]]);
        assert_eq!(formula.num_clauses(), 2);
        assert_eq!(formula.clause(ClauseIdx::from(0)).num_literals(), 2);
        assert!(formula.has_empty_clause());
    }

    #[test]
    fn unit_clause_indices() {
        let formula = formula(&[&["p"], &["p", "q"], &["!r"]]);
        let units: Vec<usize> = formula.unit_clause_indices().map(usize::from).collect();
        assert_eq!(units, vec![0, 2]);
    }

    #[test]
    fn pure_variables() {
        let formula = formula(&[&["p", "q"], &["!p", "!r"], &["q", "!r"]]);
        let pure = formula.pure_variables();

        assert_eq!(pure.len(), 2);
        assert_eq!(pure.get("q"), Some(&true));
        assert_eq!(pure.get("r"), Some(&false));
        assert_eq!(pure.get("p"), None);
    }

    #[test]
    fn remove_clause_shifts_indices() {
        let mut formula = formula(&[&["a"], &["b"], &["c"]]);
        let removed = formula.remove_clause_at(ClauseIdx::from(1));

        assert_eq!(removed.to_string(), "(b)");
        assert_eq!(formula.clause(ClauseIdx::from(1)).to_string(), "(c)");
    }

    #[test]
    #[should_panic]
    fn first_literal_of_empty_formula() {
        Formula::new().first_literal();
    }

    #[test]
    fn display() {
        let formula = formula(&[&["p", "q"], &["!p", "r"], &["!q", "!r"]]);
        assert_eq!(formula.to_string(), "(p ∨ q) ∧ (¬p ∨ r) ∧ (¬q ∨ ¬r)");

        let assignment: Assignment = vec![("q", false), ("p", true)].into_iter().collect();
        assert_eq!(assignment.to_string(), "p ↦ ⊤\nq ↦ ⊥\n");
    }

    #[test]
    fn clause_satisfaction_ignores_unassigned() {
        let clause = Clause::new(vec![Literal::positive("p"), Literal::negative("q")]);

        assert!(!clause.is_satisfied_by(&Assignment::new()));
        assert!(clause.is_satisfied_by(&vec![("q", false)].into_iter().collect()));
        assert!(!clause.is_satisfied_by(&vec![("p", false), ("q", true)].into_iter().collect()));
    }

    #[test]
    #[should_panic]
    fn model_rejects_unsatisfying_assignment() {
        let formula = formula(&[&["p"]]);
        Model::new(formula, vec![("p", false)].into_iter().collect());
    }

    #[test]
    fn model_free_variables() {
        let formula = formula(&[&["p", "q"]]);
        let model = Model::new(formula, vec![("p", true)].into_iter().collect());

        assert_eq!(model.value("p"), Some(true));
        assert_eq!(model.free_variables().collect::<Vec<_>>(), vec!["q"]);
    }
}
