//! Logic for turning raw `Jack` source into an AST.
//!
//! Parsing happens in stages: comments are blanked out
//! (keeping byte offsets intact), the result is tokenized,
//! and the tokens are fed to a recursive-descent parser which
//! also fills the symbol tables.

use crate::{common::ast::JackClass, error::Error};

pub mod comments;
pub mod grammar;
pub mod lexer;
pub mod token;
pub mod token_stream;
pub mod xml;

use token::Token;

/// Strip comments and tokenize a single source file.
pub fn tokenize_source(source: &str) -> Result<Vec<Token>, Error> {
    let stripped = comments::strip(source)?;
    lexer::tokenize(&stripped)
}

/// Parse an already tokenized class.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<JackClass, Error> {
    grammar::Parser::new(tokens).parse_class()
}

/// Parse a single class (source file).
pub fn parse_source(source: &str) -> Result<JackClass, Error> {
    parse_tokens(tokenize_source(source)?)
}
