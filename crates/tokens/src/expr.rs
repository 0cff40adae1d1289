//! The AST node model.
//!
//! Every rule is a tree of [`Expr`] nodes built during parsing and never
//! mutated afterward. There is no sharing between nodes, so each is owned
//! outright by its parent — no arena or handle indirection is needed.

use crate::opcodes::{self, SizeRule};

/// A symbolic name bound somewhere in a rule.
///
/// Internally carries the `autovar_` prefix added at parse time; equality
/// and hashing are by the full (prefixed) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Var(pub String);

impl Var {
    /// Wrap an already-prefixed name.
    pub fn new(name: impl Into<String>) -> Self {
        Var(name.into())
    }

    /// The name with the internal `autovar_` prefix stripped, as used in
    /// `to_pretty` output.
    pub fn display_name(&self) -> &str {
        self.0.strip_prefix("autovar_").unwrap_or(&self.0)
    }
}

/// The declared byte-width of a [`Number`] literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Size {
    /// A literal byte count, e.g. `:1`.
    Literal(u64),
    /// A `|var|` size-of expression, e.g. `:|x|`.
    SizeOf(Var),
}

impl Default for Size {
    fn default() -> Self {
        Size::Literal(8)
    }
}

/// An integer literal with a declared byte-width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Number {
    pub value: i64,
    pub size: Size,
}

impl Number {
    pub fn new(value: i64, size: Size) -> Self {
        Number { value, size }
    }

    /// The runtime value type (the IR's unsigned integer) is always
    /// 8 bytes wide; the declared [`Size`] only governs masking of the
    /// literal before comparison, not the node's own width.
    pub fn get_size(&self) -> Option<u64> {
        Some(8)
    }

    pub fn get_variables(&self) -> Vec<Var> {
        match &self.size {
            Size::SizeOf(v) => vec![v.clone()],
            Size::Literal(_) => Vec::new(),
        }
    }

    pub fn to_pretty(&self) -> String {
        match &self.size {
            Size::Literal(8) => self.value.to_string(),
            Size::Literal(n) => format!("{}:{}", self.value, n),
            Size::SizeOf(v) => format!("{}:|{}|", self.value, v.display_name()),
        }
    }
}

/// A binary arithmetic operator, C-style precedence and associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    And,
    Or,
    Xor,
    Lshift,
    Rshift,
}

impl BinOpKind {
    /// The token used to render this operator in pretty-printed text (and,
    /// not coincidentally, in the emitted C++ expression).
    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mult => "*",
            BinOpKind::And => "&",
            BinOpKind::Or => "|",
            BinOpKind::Xor => "^",
            BinOpKind::Lshift => "<<",
            BinOpKind::Rshift => ">>",
        }
    }
}

/// A binary arithmetic expression over value-typed operands.
///
/// Always evaluates to the IR's 8-byte unsigned integer type, regardless
/// of its operands' declared sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinOp {
    pub kind: BinOpKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

impl BinOp {
    pub fn new(kind: BinOpKind, left: Expr, right: Expr) -> Self {
        BinOp {
            kind,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn get_size(&self) -> Option<u64> {
        Some(8)
    }

    pub fn get_variables(&self) -> Vec<Var> {
        let mut vars = self.left.get_variables();
        vars.extend(self.right.get_variables());
        vars
    }

    pub fn to_pretty(&self) -> String {
        format!(
            "{} {} {}",
            self.left.to_pretty(),
            self.kind.symbol(),
            self.right.to_pretty()
        )
    }
}

/// An opcode applied to an ordered argument list. May be the root of a
/// match or replace expression, or nested as the argument of another
/// opcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Opcode {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Opcode {
            name: name.into(),
            args,
        }
    }

    pub fn is_commutative(&self) -> bool {
        opcodes::is_commutative(&self.name)
    }

    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// Output size of this opcode's result, per the fixed opcode→size
    /// table. Returns `None` when the opcode's output size has no fixed
    /// relationship to its inputs.
    pub fn get_size(&self) -> Option<u64> {
        match opcodes::size_rule(&self.name) {
            SizeRule::SameAsInput0 => self.args.first().and_then(Expr::get_size),
            SizeRule::Boolean => Some(1),
            SizeRule::SumOfInputs => {
                let a = self.args.first()?.get_size()?;
                let b = self.args.get(1)?.get_size()?;
                Some(a + b)
            }
            SizeRule::Unknown => None,
        }
    }

    pub fn get_variables(&self) -> Vec<Var> {
        self.args.iter().flat_map(Expr::get_variables).collect()
    }

    pub fn to_pretty(&self) -> String {
        let args: Vec<String> = self.args.iter().map(Expr::to_pretty).collect();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// A set of alternative opcode (or bare variable) patterns, appearing only
/// on the right-hand side of an `=` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpcodeOr {
    pub elements: Vec<Expr>,
}

impl OpcodeOr {
    pub fn new(elements: Vec<Expr>) -> Self {
        assert!(elements.len() >= 2, "OpcodeOr needs at least 2 alternatives");
        OpcodeOr { elements }
    }

    pub fn get_size(&self) -> Option<u64> {
        None
    }

    pub fn get_variables(&self) -> Vec<Var> {
        self.elements.iter().flat_map(Expr::get_variables).collect()
    }

    pub fn to_pretty(&self) -> String {
        self.elements
            .iter()
            .map(Expr::to_pretty)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// The tagged-variant AST node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(Var),
    SizeOf(Var),
    Number(Number),
    BinOp(BinOp),
    Opcode(Opcode),
    OpcodeOr(OpcodeOr),
}

impl Expr {
    /// Size inference as described in the data model: `Var` alone is
    /// unknown (its size depends on what it's eventually bound to),
    /// `SizeOf` is always 8 (the size of a size), numbers and binary
    /// operations are always 8, and opcodes follow the fixed table.
    pub fn get_size(&self) -> Option<u64> {
        match self {
            Expr::Var(_) => None,
            Expr::SizeOf(_) => Some(8),
            Expr::Number(n) => n.get_size(),
            Expr::BinOp(b) => b.get_size(),
            Expr::Opcode(o) => o.get_size(),
            Expr::OpcodeOr(o) => o.get_size(),
        }
    }

    /// Depth-first enumeration of contained variables, with duplicates.
    /// Callers deduplicate as they consume the sequence.
    pub fn get_variables(&self) -> Vec<Var> {
        match self {
            Expr::Var(v) => vec![v.clone()],
            Expr::SizeOf(v) => vec![v.clone()],
            Expr::Number(n) => n.get_variables(),
            Expr::BinOp(b) => b.get_variables(),
            Expr::Opcode(o) => o.get_variables(),
            Expr::OpcodeOr(o) => o.get_variables(),
        }
    }

    pub fn to_pretty(&self) -> String {
        match self {
            Expr::Var(v) => v.display_name().to_string(),
            Expr::SizeOf(v) => format!("|{}|", v.display_name()),
            Expr::Number(n) => n.to_pretty(),
            Expr::BinOp(b) => b.to_pretty(),
            Expr::Opcode(o) => o.to_pretty(),
            Expr::OpcodeOr(o) => o.to_pretty(),
        }
    }

    pub fn as_opcode(&self) -> Option<&Opcode> {
        match self {
            Expr::Opcode(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self {
            Expr::Var(v) => Some(v),
            _ => None,
        }
    }
}
