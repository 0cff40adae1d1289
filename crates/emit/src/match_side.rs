//! Match-side code generation (§4.3.1): linearized, fail-fast checks that
//! bind or verify a `T : PcodeOp*` against an `Opcode` pattern.

use crate::checks::{emit_check_constant_equal, emit_check_equality, emit_create_varnode};
use crate::context::EmitContext;
use crate::error::EmitError;
use rulechef_tokens::{Expr, Opcode};

/// Check `target` (a `PcodeOp*`-valued C expression) against `opcode`'s
/// children, handling commutative roots via an inner helper closure tried
/// both orderings.
pub(crate) fn emit_check_opcode_children(
    ctx: &mut EmitContext,
    target: &str,
    opcode: &Opcode,
    indent: usize,
) -> Result<String, EmitError> {
    let sp = " ".repeat(indent);
    let mut out = format!("\n{sp}// Checks {}\n", opcode.to_pretty());

    let commutative = opcode.is_commutative();
    let mut body_indent = indent;
    let mut lambda_name = String::new();
    let mut left_name = String::new();
    let mut right_name = String::new();

    if commutative {
        let suffix = opcode.name.rsplit('_').next().unwrap_or(&opcode.name).to_lowercase();
        lambda_name = ctx.fresh(&format!("check_{suffix}"))?;
        left_name = ctx.fresh("autovar_left")?;
        right_name = ctx.fresh("autovar_right")?;
        out.push_str(&format!(
            "{sp}auto {lambda_name} = [&](Varnode* {left_name}, Varnode* {right_name}) -> int4 {{\n"
        ));
        body_indent += 2;
    }
    let body_sp = " ".repeat(body_indent);

    for (i, arg) in opcode.args.iter().enumerate() {
        let target_arg = if commutative {
            [&left_name, &right_name][i].clone()
        } else {
            format!("{target}->getIn({i})")
        };

        match arg {
            Expr::Var(v) => {
                if ctx.is_bound(&v.0) {
                    out.push_str(&emit_check_equality(&target_arg, &v.0, body_indent));
                } else {
                    ctx.mark_bound(&v.0);
                    out.push_str(&emit_create_varnode(ctx, &v.0, &target_arg, body_indent));
                }
            }
            Expr::Number(_) | Expr::BinOp(_) => {
                out.push_str(&emit_check_constant_equal(&target_arg, arg, body_indent));
            }
            Expr::Opcode(nested) => {
                let varnode_name = if commutative {
                    target_arg.clone()
                } else {
                    let fresh = ctx.fresh("autovar")?;
                    out.push_str(&emit_create_varnode(ctx, &fresh, &target_arg, body_indent));
                    fresh
                };
                out.push_str(&emit_check_opcode(ctx, &varnode_name, nested, body_indent)?);
            }
            Expr::SizeOf(_) | Expr::OpcodeOr(_) => {
                return Err(EmitError::UnsupportedConstruct(format!(
                    "argument {i} of '{}' cannot be a size-of or alternation expression",
                    opcode.name
                )));
            }
        }
        out.push('\n');
    }

    if commutative {
        let name_a = ctx.fresh("autovar")?;
        let name_b = ctx.fresh("autovar")?;
        out.push_str(&format!("{body_sp}return 1;\n{sp}}};\n\n"));
        out.push_str(&emit_create_varnode(ctx, &name_a, &format!("{target}->getIn(0)"), indent));
        out.push_str(&emit_create_varnode(ctx, &name_b, &format!("{target}->getIn(1)"), indent));
        out.push_str(&format!(
            "{sp}if ((! {lambda_name}({name_a}, {name_b})) && (! {lambda_name}({name_b}, {name_a})))\n{sp}  return 0;\n"
        ));
    }

    Ok(out)
}

/// Check that `varnode_name` is written by `opcode` and recurse into its
/// children — used both for nested match-side opcodes and for `=`
/// constraints whose right side is an opcode pattern.
pub(crate) fn emit_check_opcode(
    ctx: &mut EmitContext,
    varnode_name: &str,
    opcode: &Opcode,
    indent: usize,
) -> Result<String, EmitError> {
    let sp = " ".repeat(indent);
    let mut out = format!("{sp}if (! {varnode_name}->isWritten()) return 0;\n");
    let pcode_var = ctx.fresh("temp_pcode")?;
    out.push_str(&format!("{sp}PcodeOp* {pcode_var} = {varnode_name}->getDef();\n"));
    out.push_str(&emit_check_equality(
        &format!("{pcode_var}->code()"),
        &format!("CPUI_{}", opcode.name),
        indent,
    ));
    out.push_str(&emit_check_opcode_children(ctx, &pcode_var, opcode, indent)?);
    Ok(out)
}
