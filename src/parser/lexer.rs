//! Lexical analysis of comment-stripped Jack source.
//!
//! The source is processed line by line. String constants are cut out
//! first (splitting on `"`), the remaining code is split on whitespace,
//! and every word is further split around symbol characters. Each
//! resulting fragment is then classified.

use std::{collections::VecDeque, str::FromStr};

use crate::{
    error::{Error, LexicalErrorKind},
    parser::token::{Keyword, Symbol, Token, TokenKind},
};

/// Largest value of a Jack integer constant.
pub const MAX_INTEGER_CONSTANT: u16 = 32767;

/// Lazy token stream over comment-stripped source.
///
/// Stops after the first error.
pub struct Lexer<'a> {
    lines: std::str::Split<'a, char>,
    offset: usize,
    pending: VecDeque<Token>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(stripped_source: &'a str) -> Self {
        Self {
            lines: stripped_source.split('\n'),
            offset: 0,
            pending: VecDeque::new(),
            failed: false,
        }
    }

    /// Next line with its surrounding whitespace removed,
    /// alongside the byte offset of its first character.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let line = self.lines.next()?;
        let offset = self.offset;
        self.offset += line.len() + 1;

        let trimmed = line.trim_start();
        Some((offset + line.len() - trimmed.len(), trimmed.trim_end()))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }

            if self.failed {
                return None;
            }

            let (offset, line) = self.next_line()?;
            match lex_line(line, offset) {
                Ok(tokens) => self.pending.extend(tokens),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

/// Tokenize the whole (comment-stripped) source.
pub fn tokenize(stripped_source: &str) -> Result<Vec<Token>, Error> {
    Lexer::new(stripped_source).collect()
}

fn lex_line(line: &str, offset: usize) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();

    // pieces alternate between code and string constants
    let pieces: Vec<&str> = line.split('"').collect();
    if pieces.len() % 2 == 0 {
        let quote = line.rfind('"').unwrap_or_default();
        return Err(Error::Lexical {
            kind: LexicalErrorKind::UnterminatedString,
            lexeme: line[quote..].to_owned(),
            span: offset + quote..offset + line.len(),
        });
    }

    let mut piece_offset = offset;
    for (i, piece) in pieces.into_iter().enumerate() {
        if i % 2 == 1 {
            // string constants keep their inner whitespace;
            // the span includes both quotes
            let span = piece_offset - 1..piece_offset + piece.len() + 1;

            if !piece.chars().all(is_printable) {
                return Err(Error::Lexical {
                    kind: LexicalErrorKind::UnsupportedCharacter,
                    lexeme: piece.to_owned(),
                    span,
                });
            }

            tokens.push(Token::new(TokenKind::StringConstant(piece.to_owned()), span));
        } else {
            for (word_offset, word) in words(piece) {
                split_symbols(word, piece_offset + word_offset, &mut tokens)?;
            }
        }

        piece_offset += piece.len() + 1;
    }

    Ok(tokens)
}

/// Whitespace separated words, with their offsets.
fn words(text: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;

    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(word_start)) => {
                words.push((word_start, &text[word_start..i]));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }

    if let Some(word_start) = start {
        words.push((word_start, &text[word_start..]));
    }

    words
}

/// Emit every symbol of a word as its own token, classifying
/// the fragments between them.
fn split_symbols(word: &str, offset: usize, tokens: &mut Vec<Token>) -> Result<(), Error> {
    let mut start = 0;

    for (i, c) in word.char_indices() {
        let Some(symbol) = Symbol::from_char(c) else {
            continue;
        };

        if start < i {
            tokens.push(classify(&word[start..i], offset + start)?);
        }

        tokens.push(Token::new(
            TokenKind::Symbol(symbol),
            offset + i..offset + i + 1,
        ));

        // all symbols are single byte characters
        start = i + 1;
    }

    if start < word.len() {
        tokens.push(classify(&word[start..], offset + start)?);
    }

    Ok(())
}

fn classify(fragment: &str, offset: usize) -> Result<Token, Error> {
    let span = offset..offset + fragment.len();

    if let Ok(keyword) = Keyword::from_str(fragment) {
        return Ok(Token::new(TokenKind::Keyword(keyword), span));
    }

    let error = |kind| Error::Lexical {
        kind,
        lexeme: fragment.to_owned(),
        span: offset..offset + fragment.len(),
    };

    if fragment.starts_with(|c: char| c.is_ascii_digit()) {
        if !fragment.chars().all(|c| c.is_ascii_digit()) {
            return Err(error(LexicalErrorKind::MalformedInteger));
        }

        return match fragment.parse::<u16>() {
            Ok(value) if value <= MAX_INTEGER_CONSTANT => {
                Ok(Token::new(TokenKind::IntegerConstant(value), span))
            }
            _ => Err(error(LexicalErrorKind::IntegerOutOfRange)),
        };
    }

    if is_identifier(fragment) {
        return Ok(Token::new(TokenKind::Identifier(fragment.to_owned()), span));
    }

    Err(error(LexicalErrorKind::UnexpectedCharacter))
}

/// Characters a string constant may hold: printable ASCII,
/// the part of the Hack character set that can be typed.
const fn is_printable(c: char) -> bool {
    matches!(c, ' '..='~')
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(fragment: &str) -> bool {
    let mut chars = fragment.chars();

    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
