pub mod ast;
mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind};
pub use parser::MAX_NESTING;

/// Parses free text into expressions and verbatim words.
pub fn parse(s: &str) -> Result<ast::Roll, ParseError> {
    parser::Parser::new(s).parse()
}
