//! Errors which stop the compilation of a Jack translation unit.
//!
//! Every error is fatal: the first one encountered terminates the
//! compilation, and no `.vm` file is written for it.

use std::{io, path::PathBuf};

use crate::common::ast::Span;

/// List of all errors that could possibly occur while compiling Jack code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("LexicalError: {kind} `{lexeme}`")]
    Lexical {
        kind: LexicalErrorKind,
        lexeme: String,
        span: Span,
    },

    #[error("SyntaxError: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("SymbolError: {kind} `{name}`")]
    Symbol {
        kind: SymbolErrorKind,
        name: String,
        span: Span,
    },

    #[error("IOError: {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LexicalErrorKind {
    #[strum(serialize = "unexpected character in")]
    UnexpectedCharacter,
    #[strum(serialize = "malformed integer constant")]
    MalformedInteger,
    #[strum(serialize = "integer constant out of range (0..=32767)")]
    IntegerOutOfRange,
    #[strum(serialize = "unterminated string constant")]
    UnterminatedString,
    #[strum(serialize = "unterminated comment")]
    UnterminatedComment,
    #[strum(serialize = "character outside the Hack character set in")]
    UnsupportedCharacter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SymbolErrorKind {
    #[strum(serialize = "redefinition of")]
    Redefinition,
    #[strum(serialize = "undeclared variable")]
    Undeclared,
    #[strum(serialize = "method call on a variable of primitive type")]
    PrimitiveReceiver,
}

impl Error {
    /// Source span the error points at (if it came from a source file).
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexical { span, .. } | Self::Syntax { span, .. } | Self::Symbol { span, .. } => {
                Some(span.clone())
            }
            Self::Io { .. } => None,
        }
    }

    /// Short description of the error, used as a report label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Lexical { .. } => "invalid token",
            Self::Syntax { .. } => "unexpected token",
            Self::Symbol { .. } => "symbol used here",
            Self::Io { .. } => "file error",
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_is_single_line() {
        let error = Error::Syntax {
            expected: String::from("';'"),
            found: String::from("identifier `x`"),
            span: 3..4,
        };

        assert_eq!(
            error.to_string(),
            "SyntaxError: expected ';', found identifier `x`"
        );
        assert_eq!(error.span(), Some(3..4));
    }

    #[test]
    fn test_symbol_error_names_symbol() {
        let error = Error::Symbol {
            kind: SymbolErrorKind::Redefinition,
            name: String::from("count"),
            span: 0..5,
        };

        assert_eq!(error.to_string(), "SymbolError: redefinition of `count`");
    }

    #[test]
    fn test_io_error_has_no_span() {
        let error = Error::io(
            "Missing.jack",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );

        assert!(error.span().is_none());
        assert!(error.to_string().starts_with("IOError: Missing.jack"));
    }
}
