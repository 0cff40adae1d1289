//! The fixed opcode table.
//!
//! Mnemonics and the commutative subset mirror the decompiler IR's
//! `CPUI_*` opcode set (the host side of this system, never emitted by
//! name alone but always prefixed `CPUI_` in generated code).

/// All opcode mnemonics the DSL recognizes, in no particular order beyond
/// how the host IR groups them.
pub const ALL_OP_NAMES: &[&str] = &[
    "COPY", "LOAD", "STORE", "BRANCH", "CBRANCH", "BRANCHIND", "CALL", "CALLIND",
    "CALLOTHER", "RETURN", "INT_EQUAL", "INT_NOTEQUAL", "INT_SLESS",
    "INT_SLESSEQUAL", "INT_LESS", "INT_LESSEQUAL", "INT_ZEXT", "INT_SEXT",
    "INT_ADD", "INT_SUB", "INT_CARRY", "INT_SCARRY", "INT_SBORROW", "INT_2COMP",
    "INT_NEGATE", "INT_XOR", "INT_AND", "INT_OR", "INT_LEFT", "INT_RIGHT",
    "INT_SRIGHT", "INT_MULT", "INT_DIV", "INT_SDIV", "INT_REM", "INT_SREM",
    "BOOL_NEGATE", "BOOL_XOR", "BOOL_AND", "BOOL_OR", "FLOAT_EQUAL",
    "FLOAT_NOTEQUAL", "FLOAT_LESS", "FLOAT_LESSEQUAL", "FLOAT_NAN", "FLOAT_ADD",
    "FLOAT_DIV", "FLOAT_MULT", "FLOAT_SUB", "FLOAT_NEG", "FLOAT_ABS",
    "FLOAT_SQRT", "FLOAT_INT2FLOAT", "FLOAT_FLOAT2FLOAT", "FLOAT_TRUNC",
    "FLOAT_CEIL", "FLOAT_FLOOR", "FLOAT_ROUND", "MULTIEQUAL", "INDIRECT",
    "PIECE", "SUBPIECE", "CAST", "PTRADD", "PTRSUB", "SEGMENTOP", "CPOOLREF",
    "NEW", "INSERT", "EXTRACT", "POPCOUNT",
];

/// The subset of [`ALL_OP_NAMES`] whose two inputs may be matched in
/// either order.
pub const COMMUTATIVE_OP_NAMES: &[&str] = &[
    "INT_EQUAL", "INT_NOTEQUAL", "INT_ADD", "INT_XOR", "INT_AND", "INT_OR",
    "INT_MULT", "BOOL_XOR", "BOOL_AND", "BOOL_OR", "FLOAT_EQUAL", "FLOAT_NOTEQUAL",
    "FLOAT_ADD", "FLOAT_MULT",
];

/// Opcodes whose output size equals the size of their first input.
const SAME_AS_INPUT0: &[&str] = &[
    "COPY", "INT_ADD", "INT_SUB", "INT_2COMP", "INT_NEGATE",
    "INT_XOR", "INT_AND", "INT_OR", "INT_LEFT", "INT_RIGHT",
    "INT_SRIGHT", "INT_MULT", "INT_DIV", "INT_REM", "INT_SDIV",
    "INT_SREM", "FLOAT_ADD", "FLOAT_SUB", "FLOAT_MULT", "FLOAT_DIV",
    "FLOAT_NEG", "FLOAT_ABS", "FLOAT_SQRT", "FLOAT_CEIL",
    "FLOAT_FLOOR", "FLOAT_ROUND",
];

/// Opcodes whose output is a single boolean byte.
const BOOLEAN_RESULT: &[&str] = &[
    "INT_EQUAL", "INT_NOTEQUAL", "INT_LESS", "INT_SLESS",
    "INT_LESSEQUAL", "INT_SLESSEQUAL", "INT_CARRY", "INT_SCARRY",
    "INT_SBORROW", "BOOL_NEGATE", "BOOL_XOR", "BOOL_AND", "BOOL_OR",
    "FLOAT_EQUAL", "FLOAT_NOTEQUAL", "FLOAT_LESS", "FLOAT_LESSEQUAL",
    "FLOAT_NAN",
];

/// Is `name` a recognized opcode mnemonic?
pub fn is_known(name: &str) -> bool {
    ALL_OP_NAMES.contains(&name)
}

/// Is `name` in the commutative subset? Only ever true for 2-argument
/// opcodes, per the DSL invariant in the data model.
pub fn is_commutative(name: &str) -> bool {
    COMMUTATIVE_OP_NAMES.contains(&name)
}

/// Size-inference classification for an opcode's output, independent of
/// its actual argument sizes (those are supplied by the caller).
pub enum SizeRule {
    /// Output is the same size as input 0.
    SameAsInput0,
    /// Output is a single byte.
    Boolean,
    /// Output is the sum of input 0 and input 1's sizes (`PIECE`).
    SumOfInputs,
    /// No fixed relationship; size is not inferrable from the opcode alone.
    Unknown,
}

/// Classify `name`'s output-size rule. Panics if `name` is not a known
/// opcode — callers are expected to validate names at parse time.
pub fn size_rule(name: &str) -> SizeRule {
    if name == "PIECE" {
        SizeRule::SumOfInputs
    } else if SAME_AS_INPUT0.contains(&name) {
        SizeRule::SameAsInput0
    } else if BOOLEAN_RESULT.contains(&name) {
        SizeRule::Boolean
    } else {
        SizeRule::Unknown
    }
}
