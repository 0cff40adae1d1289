//! Rendering of value-typed `Expr` trees (`Var`, `SizeOf`, `Number`,
//! `BinOp`) into the target language's expression syntax.

use rulechef_tokens::{BinOp, Expr, Size};

/// Render a value expression as a C expression. Never called on `Opcode`
/// or `OpcodeOr` — those are structural patterns, not values.
pub(crate) fn value_to_c(expr: &Expr) -> String {
    match expr {
        Expr::Var(v) => v.0.clone(),
        Expr::SizeOf(v) => format!("{}->getSize()", v.0),
        Expr::Number(n) => n.value.to_string(),
        Expr::BinOp(b) => binop_to_c(b),
        Expr::Opcode(_) | Expr::OpcodeOr(_) => {
            unreachable!("value_to_c called on a non-value expression")
        }
    }
}

fn binop_to_c(b: &BinOp) -> String {
    format!("({} {} {})", value_to_c(&b.left), b.kind.symbol(), value_to_c(&b.right))
}

pub(crate) fn size_to_c(size: &Size) -> String {
    match size {
        Size::Literal(n) => n.to_string(),
        Size::SizeOf(v) => format!("{}->getSize()", v.0),
    }
}

/// The declared byte-width of a `Number`/`BinOp` constant, as a C
/// expression — `BinOp` is always 8 (the IR's unsigned-integer width).
pub(crate) fn const_size_to_c(expr: &Expr) -> String {
    match expr {
        Expr::Number(n) => size_to_c(&n.size),
        Expr::BinOp(_) => "8".to_string(),
        _ => unreachable!("const_size_to_c called on a non-constant expression"),
    }
}

pub(crate) fn const_is_size_8(expr: &Expr) -> bool {
    match expr {
        Expr::Number(n) => matches!(n.size, Size::Literal(8)),
        Expr::BinOp(_) => true,
        _ => unreachable!("const_is_size_8 called on a non-constant expression"),
    }
}

/// The expression read on one side of a `<`/`>` constraint threshold
/// comparison. A bound `Var` contributes its runtime constant offset;
/// everything else is a compile-time-renderable value.
pub(crate) fn offset_expr(expr: &Expr) -> String {
    match expr {
        Expr::Var(v) => format!("{}->getOffset()", v.0),
        _ => value_to_c(expr),
    }
}
