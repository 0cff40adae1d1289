//! Errors produced while turning DSL text into a [`rulechef_tokens::Rule`].

use thiserror::Error;

/// Errors produced during parsing of a rule description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A character does not start any recognized token.
    #[error("line {line}, col {col}: unexpected character '{found}'")]
    UnexpectedChar { line: usize, col: usize, found: char },

    /// A numeric literal could not be parsed or is out of range.
    #[error("line {line}, col {col}: invalid number '{token}'")]
    InvalidNumber {
        line: usize,
        col: usize,
        token: String,
    },

    /// An opcode name was used that is not in the fixed opcode set.
    #[error("line {line}, col {col}: unknown opcode '{name}'")]
    UnknownOpcode {
        line: usize,
        col: usize,
        name: String,
    },

    /// A token appeared where the grammar did not expect it.
    #[error("line {line}, col {col}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        col: usize,
        expected: &'static str,
        found: String,
    },

    /// Input ended before the grammar's production was complete.
    #[error("line {line}, col {col}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, col: usize, expected: &'static str },
}
