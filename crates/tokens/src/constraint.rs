//! Side constraints imposed on a match, beyond the structural pattern.

use crate::expr::{Expr, Var};

/// A constraint's comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    Less,
    Greater,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::Less => "<",
            ComparisonOp::Greater => ">",
        }
    }
}

/// One constraint: `lhs <op> rhs`. The left side must be a value
/// expression (never an opcode) since it denotes something with a
/// concrete runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub lhs: Expr,
    pub op: ComparisonOp,
    pub rhs: Expr,
}

impl Constraint {
    pub fn new(lhs: Expr, op: ComparisonOp, rhs: Expr) -> Self {
        Constraint { lhs, op, rhs }
    }

    /// A constraint imposes a predicate, not a value; it has no size.
    pub fn get_size(&self) -> Option<u64> {
        None
    }

    pub fn get_variables(&self) -> Vec<Var> {
        let mut vars = self.lhs.get_variables();
        vars.extend(self.rhs.get_variables());
        vars
    }

    pub fn to_pretty(&self) -> String {
        format!(
            "{} {} {}",
            self.lhs.to_pretty(),
            self.op.symbol(),
            self.rhs.to_pretty()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Number, Size, Var as VarNode};

    #[test]
    fn pretty_print_constraint() {
        let c = Constraint::new(
            Expr::Var(VarNode::new("autovar_s")),
            ComparisonOp::Less,
            Expr::Number(Number::new(64, Size::default())),
        );
        assert_eq!(c.to_pretty(), "s < 64");
        assert_eq!(c.get_size(), None);
    }
}
