//! Primitive "fail-fast on mismatch" check emitters shared by the
//! match-side and constraint compilers.

use crate::context::EmitContext;
use crate::render::{const_is_size_8, const_size_to_c, value_to_c};
use rulechef_tokens::Expr;

pub(crate) fn emit_check_equality(a: &str, b: &str, indent: usize) -> String {
    format!("{}if ({a} != {b}) return 0;\n", " ".repeat(indent))
}

/// Balanced-parens form (the reference generator emits an unbalanced
/// `if ((! x->isConstant()) return 0;` here).
pub(crate) fn emit_check_is_constant(varnode_name: &str, indent: usize) -> String {
    format!("{}if (!{varnode_name}->isConstant()) return 0;\n", " ".repeat(indent))
}

/// Declare-or-assign a local to `source`: declared with a `Varnode*`
/// prefix the first time a name is used, bare assignment afterward (the
/// name may already have been pre-declared because it also appears in the
/// replacement).
pub(crate) fn emit_create_varnode(ctx: &EmitContext, name: &str, source: &str, indent: usize) -> String {
    let prefix = if ctx.is_declared(name) { "" } else { "Varnode* " };
    format!("{}{prefix}{name} = {source};\n", " ".repeat(indent))
}

/// `is-constant AND offset equals (masked) value; else fail`.
pub(crate) fn emit_check_constant_equal(varnode_name: &str, constant: &Expr, indent: usize) -> String {
    let sp = " ".repeat(indent);
    let c = value_to_c(constant);
    if const_is_size_8(constant) {
        format!("{sp}if (! {varnode_name}->constantMatch({c})) return 0;\n")
    } else {
        let size_c = const_size_to_c(constant);
        format!(
            "{sp}uintb masked_const = {c} & ((((uintb) 1) << (8 * {size_c})) - 1);\n\
             {sp}if (! {varnode_name}->constantMatch(masked_const)) return 0;\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulechef_tokens::{Number, Size};

    #[test]
    fn constant_equal_size_8_uses_constant_match_directly() {
        let n = Expr::Number(Number::new(0, Size::default()));
        assert_eq!(
            emit_check_constant_equal("v", &n, 2),
            "  if (! v->constantMatch(0)) return 0;\n"
        );
    }

    #[test]
    fn constant_equal_masks_when_size_below_8() {
        let n = Expr::Number(Number::new(0xff, Size::Literal(1)));
        let code = emit_check_constant_equal("v", &n, 2);
        assert!(code.contains("masked_const = 255 & ((((uintb) 1) << (8 * 1)) - 1);"));
        assert!(code.contains("constantMatch(masked_const)"));
    }

    #[test]
    fn is_constant_check_has_balanced_parens() {
        let code = emit_check_is_constant("v", 2);
        assert_eq!(code, "  if (!v->isConstant()) return 0;\n");
    }
}
