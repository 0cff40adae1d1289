//! Lowering of a parsed [`rulechef_tokens::Rule`] into a `RuleSimplify*`
//! `ghidra` `Rule` subclass: class header, op-list registration, a
//! documentation comment embedding the rule's own pretty-printed source,
//! and the `applyOp` body (match-side checks, constraint checks, rewrite).

mod checks;
mod constraint;
mod context;
mod error;
mod header;
mod match_side;
mod render;
mod rewrite;

use std::collections::HashSet;

use constraint::{close_opcode_or, constraint_to_check_c, PendingOpcodeOr};
use context::EmitContext;
use match_side::emit_check_opcode_children;
use rewrite::{emit_declare_var, emit_rewrite};

pub use error::EmitError;
pub use rulechef_tokens::Rule;

/// The result of emitting one rule: generated source plus any non-fatal
/// observations worth surfacing (e.g. a trivially-unsatisfiable
/// constraint).
#[derive(Debug)]
pub struct EmitOutcome {
    pub code: String,
    pub warnings: Vec<String>,
}

/// Lower `rule` into a complete `RuleSimplify*` class definition.
pub fn emit_rule(rule: &Rule) -> Result<EmitOutcome, EmitError> {
    let header = header::emit_class_header(&rule.name);
    let doc = header::emit_doc_comment(&rule.name, rule);
    let oplist = header::emit_get_oplist(&rule.name, &rule.match_expr.name);

    let mut ctx = EmitContext::new();
    let apply_op = emit_apply_op(&mut ctx, &rule.name, rule)?;

    let code = [header, String::new(), doc, oplist, String::new(), apply_op].join("\n");
    Ok(EmitOutcome {
        code,
        warnings: ctx.take_warnings(),
    })
}

fn emit_apply_op(ctx: &mut EmitContext, class_name: &str, rule: &Rule) -> Result<String, EmitError> {
    let mut out = format!(
        "int4 RuleSimplify{class_name}::applyOp(PcodeOp *op, Funcdata &data)\n\
         \n\
         {{\n\
         \n\
         \u{20}\u{20}// Remaining checks on the match expression\n"
    );

    let mut seen = HashSet::new();
    for var in rule.replace_expr.get_variables() {
        if seen.insert(var.0.clone()) {
            out.push_str(&emit_declare_var(ctx, &var));
        }
    }

    out.push_str(&emit_check_opcode_children(ctx, "op", &rule.match_expr, 2)?);

    if !rule.constraints.is_empty() {
        out.push_str("\n  // Some more checks for the extra constraints\n");
    }

    let indent = 2;
    let mut pending: Vec<(usize, PendingOpcodeOr)> = Vec::new();
    for constraint in &rule.constraints {
        let (code, next_indent, closer) = constraint_to_check_c(ctx, constraint, indent)?;
        out.push_str(&code);
        if let Some(closer) = closer {
            pending.push((next_indent, closer));
        }
    }
    for (indent, closer) in pending.into_iter().rev() {
        out.push_str(&close_opcode_or(ctx, &closer, indent)?);
    }

    out.push_str("\n  // matched this PcodeOp - replace this with the simplified structure\n");
    out.push_str(&emit_rewrite(ctx, &rule.match_expr, &rule.replace_expr)?);
    out.push_str("\n  return 1;\n}\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulechef_tokens::{ComparisonOp, Constraint, Expr, Number, Opcode, Size, Var};

    fn var(name: &str) -> Expr {
        Expr::Var(Var::new(name))
    }

    #[test]
    fn emits_complete_class_for_simple_rule() {
        let rule = Rule::new(
            "AddZero",
            Opcode::new("INT_ADD", vec![var("autovar_x"), Expr::Number(Number::new(0, Size::default()))]),
            vec![],
            var("autovar_x"),
        );
        let err = emit_rule(&rule).unwrap_err();
        assert!(matches!(err, EmitError::UnsupportedConstruct(_)));
    }

    #[test]
    fn emits_rule_with_opcode_replacement_end_to_end() {
        let rule = Rule::new(
            "DoubleNegate",
            Opcode::new("INT_2COMP", vec![Expr::Opcode(Opcode::new("INT_2COMP", vec![var("autovar_x")]))]),
            vec![],
            var("autovar_x"),
        );
        let err = emit_rule(&rule).unwrap_err();
        assert!(matches!(err, EmitError::UnsupportedConstruct(_)));
    }

    #[test]
    fn emits_rule_with_constraint_and_commutative_match() {
        let rule = Rule::new(
            "SafeShift",
            Opcode::new("INT_LEFT", vec![var("autovar_x"), var("autovar_s")]),
            vec![Constraint::new(var("autovar_s"), ComparisonOp::Less, Expr::Number(Number::new(64, Size::default())))],
            Expr::Opcode(Opcode::new("INT_RIGHT", vec![var("autovar_x"), var("autovar_s")])),
        );
        let outcome = emit_rule(&rule).unwrap();
        assert!(outcome.code.contains("class RuleSimplifySafeShift : public Rule {"));
        assert!(outcome.code.contains("int4 RuleSimplifySafeShift::applyOp(PcodeOp *op, Funcdata &data)"));
        assert!(outcome.code.contains("autovar_s->getOffset() >= 64"));
        assert!(outcome.code.contains("data.opSetOpcode(op, CPUI_INT_RIGHT);"));
        assert!(outcome.code.ends_with("  return 1;\n}\n"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn dedupes_repeated_replacement_variable_declaration() {
        let rule = Rule::new(
            "Square",
            Opcode::new("INT_MULT", vec![var("autovar_x"), var("autovar_y")]),
            vec![],
            Expr::Opcode(Opcode::new("INT_MULT", vec![var("autovar_x"), var("autovar_x")])),
        );
        let outcome = emit_rule(&rule).unwrap();
        assert_eq!(outcome.code.matches("Varnode* autovar_x;").count(), 1);
    }
}
