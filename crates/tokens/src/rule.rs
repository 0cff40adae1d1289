//! The top-level parsed unit: one rewrite rule.

use crate::constraint::Constraint;
use crate::expr::{Expr, Opcode, Var};

/// A parsed rewrite rule: `name: match_expr :- { constraints } => replace_expr`.
///
/// `constraints` is conjunctive — every constraint must hold for the rule
/// to apply. `replace_expr` is grammatically allowed to be a bare
/// variable, but `rulechef-emit` rejects that form (see `spec.md` §9,
/// open question 1); this type does not enforce it so the parser can
/// still produce a `Rule` for such (currently unsupported) input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub match_expr: Opcode,
    pub constraints: Vec<Constraint>,
    pub replace_expr: Expr,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        match_expr: Opcode,
        constraints: Vec<Constraint>,
        replace_expr: Expr,
    ) -> Self {
        Rule {
            name: name.into(),
            match_expr,
            constraints,
            replace_expr,
        }
    }

    /// Every variable named anywhere in the rule (match, constraints,
    /// replacement), depth-first with duplicates.
    pub fn get_variables(&self) -> Vec<Var> {
        let mut vars = self.match_expr.get_variables();
        for c in &self.constraints {
            vars.extend(c.get_variables());
        }
        vars.extend(self.replace_expr.get_variables());
        vars
    }

    /// Lines of a pretty-printed reconstruction of the rule's DSL source,
    /// one element per line. Used by `rulechef-emit` to build the
    /// generated class's documentation comment.
    pub fn pretty_lines(&self) -> Vec<String> {
        let match_expr = self.match_expr.to_pretty();
        let replace_expr = self.replace_expr.to_pretty();

        if self.constraints.is_empty() {
            vec![format!("{match_expr} => {replace_expr}")]
        } else {
            let mut lines = vec![format!("{match_expr} :- {{")];
            for c in &self.constraints {
                lines.push(format!("    {}", c.to_pretty()));
            }
            lines.push(format!("}} => {replace_expr}"));
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ComparisonOp;
    use crate::expr::{Number, Size};

    fn var(name: &str) -> Var {
        Var::new(format!("autovar_{name}"))
    }

    #[test]
    fn pretty_lines_without_constraints() {
        let rule = Rule::new(
            "AddZero",
            Opcode::new("INT_ADD", vec![Expr::Var(var("x")), Expr::Number(Number::new(0, Size::default()))]),
            vec![],
            Expr::Var(var("x")),
        );
        assert_eq!(rule.pretty_lines(), vec!["INT_ADD(x, 0) => x".to_string()]);
    }

    #[test]
    fn pretty_lines_with_constraints() {
        let rule = Rule::new(
            "SafeShift",
            Opcode::new("INT_LEFT", vec![Expr::Var(var("x")), Expr::Var(var("s"))]),
            vec![Constraint::new(
                Expr::Var(var("s")),
                ComparisonOp::Less,
                Expr::Number(Number::new(64, Size::default())),
            )],
            Expr::Opcode(Opcode::new("INT_LEFT", vec![Expr::Var(var("x")), Expr::Var(var("s"))])),
        );
        assert_eq!(
            rule.pretty_lines(),
            vec![
                "INT_LEFT(x, s) :- {".to_string(),
                "    s < 64".to_string(),
                "} => INT_LEFT(x, s)".to_string(),
            ]
        );
    }

    #[test]
    fn get_variables_collects_from_all_parts() {
        let rule = Rule::new(
            "Foo",
            Opcode::new("INT_ADD", vec![Expr::Var(var("x")), Expr::Var(var("y"))]),
            vec![],
            Expr::Var(var("x")),
        );
        assert_eq!(rule.get_variables(), vec![var("x"), var("y"), var("x")]);
    }
}
