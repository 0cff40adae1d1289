//! RuleChef AST / token model.
//!
//! This crate provides the foundational data structures for describing a
//! single peephole simplification rule:
//!
//! - [`opcodes`] — the fixed opcode table and the commutative subset
//! - [`Expr`] — the tagged-variant AST node (variable, size-of, number,
//!   binary operation, opcode application, opcode alternation)
//! - [`Constraint`] — a side condition imposed on the match
//! - [`Rule`] — name + match expression + constraints + replace expression
//!
//! # Dependencies
//!
//! This crate has no dependencies beyond the standard library.

pub mod constraint;
pub mod expr;
pub mod opcodes;
pub mod rule;

pub use constraint::{Constraint, ComparisonOp};
pub use expr::{BinOp, BinOpKind, Expr, Number, Opcode, OpcodeOr, Size, Var};
pub use rule::Rule;
