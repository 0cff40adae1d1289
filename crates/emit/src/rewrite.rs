//! Replace-side code generation (§4.3.3): builds the replacement pcode
//! tree and splices it in for the matched op.

use crate::context::EmitContext;
use crate::error::EmitError;
use crate::render::{size_to_c, value_to_c};
use rulechef_tokens::{Expr, Opcode, Var};

/// Declare a replacement-side variable ahead of the rewrite body, so a
/// variable used more than once in the replacement is only declared once
/// (the reference generator does not dedupe here and would emit a
/// duplicate declaration for a repeated variable).
pub(crate) fn emit_declare_var(ctx: &mut EmitContext, var: &Var) -> String {
    ctx.declare(&var.0);
    format!("  Varnode* {};\n", var.0)
}

/// Build the replacement tree rooted at `replace_expr` and splice it in
/// for `match_expr`'s op, adjusting input count to match the replacement's
/// arity before filling in its inputs.
pub(crate) fn emit_rewrite(
    ctx: &mut EmitContext,
    match_expr: &Opcode,
    replace_expr: &Expr,
) -> Result<String, EmitError> {
    let root = replace_expr.as_opcode().ok_or_else(|| {
        EmitError::UnsupportedConstruct("the replacement cannot be a bare variable".into())
    })?;

    let mut out = String::new();
    if root.name != match_expr.name {
        out.push_str(&format!("  data.opSetOpcode(op, CPUI_{});\n", root.name));
    }

    let old_arity = match_expr.num_args();
    let new_arity = root.num_args();
    for i in old_arity..new_arity {
        out.push_str(&format!("  op->insertInput({i});\n"));
    }
    for i in new_arity..old_arity {
        out.push_str(&format!("  data.opRemoveInput(op, {i});\n"));
    }

    for (i, arg) in root.args.iter().enumerate() {
        out.push_str(&emit_fill_input(ctx, arg, "op", i)?);
    }
    Ok(out)
}

fn emit_fill_input(ctx: &mut EmitContext, arg: &Expr, parent: &str, input_num: usize) -> Result<String, EmitError> {
    match arg {
        Expr::Opcode(nested) => emit_create_opcode(ctx, nested, parent, input_num),
        Expr::Var(v) => Ok(emit_create_var(v, parent, input_num)),
        Expr::Number(_) | Expr::BinOp(_) => emit_create_const(ctx, arg, parent, input_num),
        Expr::SizeOf(_) | Expr::OpcodeOr(_) => Err(EmitError::UnsupportedConstruct(
            "a replacement argument cannot be a size-of or alternation expression".into(),
        )),
    }
}

/// Allocate a fresh op + output varnode for a nested opcode in the
/// replacement, then recurse into its own arguments.
fn emit_create_opcode(
    ctx: &mut EmitContext,
    opcode: &Opcode,
    parent: &str,
    input_num: usize,
) -> Result<String, EmitError> {
    let size = opcode
        .get_size()
        .ok_or_else(|| EmitError::InternalConsistency(format!("'{}' has no statically known output size", opcode.name)))?;

    let out_op = ctx.fresh("out_op")?;
    let out_varnode = ctx.fresh("out_varnode")?;

    let mut out = format!(
        "  PcodeOp* {out_op} = data.newOp({}, op->getAddr());\n\
         \u{20}\u{20}data.opSetOpcode({out_op}, CPUI_{});\n\
         \u{20}\u{20}Varnode* {out_varnode} = data.newUniqueOut({size}, {out_op});\n\
         \u{20}\u{20}data.opInsertBefore({out_op}, op);\n\
         \u{20}\u{20}data.opSetInput({parent}, {out_varnode}, {input_num});\n",
        opcode.num_args(),
        opcode.name,
    );

    for (i, arg) in opcode.args.iter().enumerate() {
        out.push_str(&emit_fill_input(ctx, arg, &out_op, i)?);
    }
    Ok(out)
}

fn emit_create_var(var: &Var, parent: &str, input_num: usize) -> String {
    format!("  data.opSetInput({parent}, {}, {input_num});\n", var.0)
}

/// Allocate a fresh constant varnode for a `Number`/`BinOp` replacement
/// argument, sized by its declared width.
fn emit_create_const(ctx: &mut EmitContext, arg: &Expr, parent: &str, input_num: usize) -> Result<String, EmitError> {
    let out_const = ctx.fresh("out_const")?;
    let value = value_to_c(arg);
    let size = match arg {
        Expr::Number(n) => size_to_c(&n.size),
        Expr::BinOp(_) => "8".to_string(),
        _ => unreachable!("emit_create_const only called on Number/BinOp"),
    };
    Ok(format!(
        "  Varnode* {out_const} = data.newConstant({size}, {value});\n\
         \u{20}\u{20}data.opSetInput({parent}, {out_const}, {input_num});\n"
    ))
}
