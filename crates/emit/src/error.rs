//! Errors produced while lowering a `Rule` into target-language source.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// A grammar-legal construct this emitter does not support: a
    /// bare-variable replacement root, a two-variable equality constraint,
    /// an opcode/size-of argument in a position the algorithm can't lower,
    /// and similar.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    /// The fresh-name generator exhausted its per-prefix allocation budget.
    #[error("exhausted the fresh-name budget for prefix '{prefix}'")]
    BudgetExhausted { prefix: String },

    /// An invariant the parser should already guarantee did not hold —
    /// surfaced as a bug rather than silently producing wrong code.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),
}
