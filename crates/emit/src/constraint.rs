//! Constraint compilation (§4.3.2): turns each `Constraint` into fail-fast
//! checks inserted between the match-side checks and the rewrite.

use crate::checks::{emit_check_constant_equal, emit_check_is_constant};
use crate::context::EmitContext;
use crate::error::EmitError;
use crate::match_side::emit_check_opcode;
use crate::render::offset_expr;
use rulechef_tokens::{ComparisonOp, Constraint, Expr};

/// An `OpcodeOr` constraint is compiled in two passes: `open` emits the
/// per-alternative branch (opened here, at the `=` site); `close`, run
/// once the surrounding opcode's nested checks are fully emitted, closes
/// the alternation construct. Mirrors the reference generator's
/// `to_check_c` / `to_check_c_end` split.
pub(crate) struct PendingOpcodeOr {
    or_func_name: String,
    num_elements: usize,
}

/// Compile one constraint; returns the emitted code, the indent level that
/// subsequent (nested) checks should use, and — for an `OpcodeOr`
/// right-hand side — a closer to invoke once those nested checks are done.
pub(crate) fn constraint_to_check_c(
    ctx: &mut EmitContext,
    constraint: &Constraint,
    indent: usize,
) -> Result<(String, usize, Option<PendingOpcodeOr>), EmitError> {
    match constraint.op {
        ComparisonOp::Equal => equal_to_check_c(ctx, constraint, indent),
        ComparisonOp::Less => Ok((ordering_to_check_c(ctx, &constraint.lhs, &constraint.rhs, "<", indent), indent, None)),
        ComparisonOp::Greater => Ok((ordering_to_check_c(ctx, &constraint.lhs, &constraint.rhs, ">", indent), indent, None)),
    }
}

fn equal_to_check_c(
    ctx: &mut EmitContext,
    constraint: &Constraint,
    indent: usize,
) -> Result<(String, usize, Option<PendingOpcodeOr>), EmitError> {
    if constraint.lhs == constraint.rhs {
        return Ok((String::new(), indent, None));
    }

    let lhs_name = constraint
        .lhs
        .as_var()
        .ok_or_else(|| EmitError::UnsupportedConstruct("the left side of an '=' constraint must be a bound variable".into()))?
        .0
        .clone();

    match &constraint.rhs {
        Expr::Number(_) | Expr::BinOp(_) => {
            Ok((emit_check_constant_equal(&lhs_name, &constraint.rhs, indent), indent, None))
        }
        Expr::Opcode(opcode) => Ok((emit_check_opcode(ctx, &lhs_name, opcode, indent)?, indent, None)),
        Expr::OpcodeOr(alt) => open_opcode_or(ctx, &lhs_name, &alt.elements, indent),
        Expr::Var(_) => Err(EmitError::UnsupportedConstruct(
            "a variable-to-variable '=' constraint is not supported".into(),
        )),
        Expr::SizeOf(_) => Err(EmitError::UnsupportedConstruct(
            "the right side of an '=' constraint cannot be a size-of expression".into(),
        )),
    }
}

fn open_opcode_or(
    ctx: &mut EmitContext,
    lhs_name: &str,
    elements: &[Expr],
    indent: usize,
) -> Result<(String, usize, Option<PendingOpcodeOr>), EmitError> {
    for element in elements {
        if element.as_var().is_some() {
            return Err(EmitError::UnsupportedConstruct(
                "a bare variable cannot appear inside an opcode alternation".into(),
            ));
        }
    }

    let sp = " ".repeat(indent);
    let or_func_name = ctx.fresh("check_or")?;
    let idx = ctx.fresh("alt")?;
    let mut out = format!("{sp}auto {or_func_name} = [&](int4 {idx}) -> bool {{\n");
    for (n, element) in elements.iter().enumerate() {
        let opcode = element
            .as_opcode()
            .expect("non-opcode alternatives already rejected above");
        let branch = if n == 0 { "if" } else { "else if" };
        out.push_str(&format!("{sp}  {branch} ({idx} == {n}) {{\n"));
        out.push_str(&emit_check_opcode(ctx, lhs_name, opcode, indent + 4)?);
        out.push_str(&format!("{sp}    return true;\n{sp}  }}\n"));
    }
    out.push_str(&format!("{sp}  return false;\n{sp}}};\n"));

    Ok((
        out,
        indent,
        Some(PendingOpcodeOr {
            or_func_name,
            num_elements: elements.len(),
        }),
    ))
}

/// Close a still-open `OpcodeOr` constraint, run once for each pending
/// closer, in reverse declaration order — mirroring the reference
/// generator's `to_check_c_end`, which allocates its loop variable lazily
/// at close time. Tries every alternative index in turn and fails only
/// once all of them have (invariant 8).
pub(crate) fn close_opcode_or(
    ctx: &mut EmitContext,
    closer: &PendingOpcodeOr,
    indent: usize,
) -> Result<String, EmitError> {
    let sp = " ".repeat(indent);
    let it_var = ctx.fresh("i")?;
    let matched_var = ctx.fresh("matched")?;
    let mut out = format!("{sp}bool {matched_var} = false;\n");
    out.push_str(&format!(
        "{sp}for (int4 {it_var} = 0; {it_var} < {}; {it_var}++) {{\n",
        closer.num_elements
    ));
    out.push_str(&format!(
        "{sp}  if ({}({it_var})) {{ {matched_var} = true; break; }}\n",
        closer.or_func_name
    ));
    out.push_str(&format!("{sp}}}\n"));
    out.push_str(&format!("{sp}if (! {matched_var}) return 0;\n"));
    Ok(out)
}

/// `<`/`>` constraints compare runtime constant offsets. The reference
/// generator's handling of this case has call-site type errors; this
/// follows the documented "is-constant, then unmasked offset comparison"
/// behavior instead (see DESIGN.md).
fn ordering_to_check_c(ctx: &mut EmitContext, lhs: &Expr, rhs: &Expr, op: &str, indent: usize) -> String {
    let sp = " ".repeat(indent);
    let mut out = String::new();

    if let Expr::Var(v) = lhs {
        out.push_str(&emit_check_is_constant(&v.0, indent));
    }
    if let Expr::Var(v) = rhs {
        out.push_str(&emit_check_is_constant(&v.0, indent));
    }

    if lhs == rhs {
        ctx.warn(format!(
            "constraint '{} {op} {}' always fails: both sides are the same expression",
            lhs.to_pretty(),
            rhs.to_pretty()
        ));
        out.push_str(&format!("{sp}return 0;\n"));
        return out;
    }

    let lhs_c = offset_expr(lhs);
    let rhs_c = offset_expr(rhs);
    let fail_cmp = if op == "<" { ">=" } else { "<=" };
    out.push_str(&format!("{sp}if ({lhs_c} {fail_cmp} {rhs_c}) return 0;\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulechef_tokens::{Number, Opcode, OpcodeOr, Size, Var};

    fn var(name: &str) -> Expr {
        Expr::Var(Var::new(name))
    }

    #[test]
    fn equal_constant_delegates_to_constant_equal_check() {
        let mut ctx = EmitContext::new();
        let c = Constraint::new(var("autovar_x"), ComparisonOp::Equal, Expr::Number(Number::new(4, Size::default())));
        let (code, next_indent, closer) = constraint_to_check_c(&mut ctx, &c, 2).unwrap();
        assert!(code.contains("constantMatch(4)"));
        assert_eq!(next_indent, 2);
        assert!(closer.is_none());
    }

    #[test]
    fn equal_opcode_checks_writer() {
        let mut ctx = EmitContext::new();
        let c = Constraint::new(
            var("autovar_y"),
            ComparisonOp::Equal,
            Expr::Opcode(Opcode::new("INT_XOR", vec![var("autovar_a"), var("autovar_b")])),
        );
        let (code, _, closer) = constraint_to_check_c(&mut ctx, &c, 2).unwrap();
        assert!(code.contains("autovar_y->isWritten()"));
        assert!(code.contains("CPUI_INT_XOR"));
        assert!(closer.is_none());
    }

    #[test]
    fn equal_opcode_or_opens_and_closes() {
        let mut ctx = EmitContext::new();
        let alt = OpcodeOr::new(vec![
            Expr::Opcode(Opcode::new("INT_XOR", vec![var("autovar_a"), var("autovar_b")])),
            Expr::Opcode(Opcode::new("INT_ADD", vec![var("autovar_a"), var("autovar_b")])),
        ]);
        let c = Constraint::new(var("autovar_y"), ComparisonOp::Equal, Expr::OpcodeOr(alt));
        let (open_code, _, closer) = constraint_to_check_c(&mut ctx, &c, 2).unwrap();
        assert!(open_code.contains("auto check_or_0 = [&](int4 alt_0) -> bool {"));
        assert!(open_code.contains("if (alt_0 == 0) {"));
        assert!(open_code.contains("else if (alt_0 == 1) {"));
        let closer = closer.expect("OpcodeOr must produce a pending closer");
        let close_code = close_opcode_or(&mut ctx, &closer, 2).unwrap();
        assert!(close_code.contains("for (int4 i_0 = 0; i_0 < 2; i_0++)"));
        assert!(close_code.contains("if (check_or_0(i_0)) { matched_0 = true; break; }"));
        assert!(close_code.contains("if (! matched_0) return 0;"));
    }

    #[test]
    fn equal_trivially_equal_sides_is_a_no_op() {
        let c = Constraint::new(var("autovar_x"), ComparisonOp::Equal, var("autovar_x"));
        let (code, next_indent, closer) = constraint_to_check_c(&mut EmitContext::new(), &c, 2).unwrap();
        assert!(code.is_empty());
        assert_eq!(next_indent, 2);
        assert!(closer.is_none());
    }

    #[test]
    fn trivially_equal_sides_always_fail_and_warn() {
        let c = Constraint::new(var("autovar_x"), ComparisonOp::Less, var("autovar_x"));
        let mut ctx = EmitContext::new();
        let (code, _, _) = constraint_to_check_c(&mut ctx, &c, 2).unwrap();
        assert!(code.trim_end().ends_with("return 0;"));
        assert_eq!(ctx.take_warnings().len(), 1);
    }

    #[test]
    fn less_than_checks_constant_on_var_side_and_compares_offsets() {
        let c = Constraint::new(var("autovar_s"), ComparisonOp::Less, Expr::Number(Number::new(64, Size::default())));
        let (code, _, closer) = constraint_to_check_c(&mut EmitContext::new(), &c, 2).unwrap();
        assert!(code.contains("autovar_s->isConstant()"));
        assert!(code.contains("if (autovar_s->getOffset() >= 64) return 0;"));
        assert!(closer.is_none());
    }

    #[test]
    fn greater_than_uses_le_as_fail_condition() {
        let c = Constraint::new(var("autovar_s"), ComparisonOp::Greater, Expr::Number(Number::new(0, Size::default())));
        let (code, _, _) = constraint_to_check_c(&mut EmitContext::new(), &c, 2).unwrap();
        assert!(code.contains("if (autovar_s->getOffset() <= 0) return 0;"));
    }

    #[test]
    fn variable_to_variable_equality_is_unsupported() {
        let c = Constraint::new(var("autovar_x"), ComparisonOp::Equal, var("autovar_y"));
        assert!(constraint_to_check_c(&mut EmitContext::new(), &c, 2).is_err());
    }

    #[test]
    fn bare_variable_inside_opcode_or_is_rejected() {
        let alt = OpcodeOr::new(vec![
            var("autovar_a"),
            Expr::Opcode(Opcode::new("INT_ADD", vec![var("autovar_a"), var("autovar_b")])),
        ]);
        let c = Constraint::new(var("autovar_y"), ComparisonOp::Equal, Expr::OpcodeOr(alt));
        assert!(constraint_to_check_c(&mut EmitContext::new(), &c, 2).is_err());
    }
}
