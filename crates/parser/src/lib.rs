//! Parser for the rule DSL: turns rule-file text into a
//! [`rulechef_tokens::Rule`].

mod error;
mod grammar;
mod lexer;

pub use error::ParseError;

/// Parse one rule from DSL source text.
///
/// The grammar permits exactly one rule per input; trailing tokens after
/// the rule are a parse error.
pub fn parse(source: &str) -> Result<rulechef_tokens::Rule, ParseError> {
    let lexemes = lexer::tokenize(source)?;
    grammar::parse_rule(&lexemes)
}
