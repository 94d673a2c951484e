//! Jack tokens, classified into one of five categories.

use phf::phf_map;

use crate::common::ast::Span;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::VariantArray,
)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    Comma,
    Semicolon,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Ampersand,
    Pipe,
    LessThan,
    GreaterThan,
    Equals,
    Tilde,
}

static SYMBOLS: phf::Map<char, Symbol> = phf_map! {
    '{' => Symbol::LeftBrace,
    '}' => Symbol::RightBrace,
    '(' => Symbol::LeftParen,
    ')' => Symbol::RightParen,
    '[' => Symbol::LeftBracket,
    ']' => Symbol::RightBracket,
    '.' => Symbol::Dot,
    ',' => Symbol::Comma,
    ';' => Symbol::Semicolon,
    '+' => Symbol::Plus,
    '-' => Symbol::Minus,
    '*' => Symbol::Asterisk,
    '/' => Symbol::Slash,
    '&' => Symbol::Ampersand,
    '|' => Symbol::Pipe,
    '<' => Symbol::LessThan,
    '>' => Symbol::GreaterThan,
    '=' => Symbol::Equals,
    '~' => Symbol::Tilde,
};

impl Symbol {
    /// Look up a character in the fixed Jack symbol set.
    pub fn from_char(c: char) -> Option<Self> {
        SYMBOLS.get(&c).copied()
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::LeftBrace => '{',
            Self::RightBrace => '}',
            Self::LeftParen => '(',
            Self::RightParen => ')',
            Self::LeftBracket => '[',
            Self::RightBracket => ']',
            Self::Dot => '.',
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Asterisk => '*',
            Self::Slash => '/',
            Self::Ampersand => '&',
            Self::Pipe => '|',
            Self::LessThan => '<',
            Self::GreaterThan => '>',
            Self::Equals => '=',
            Self::Tilde => '~',
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The five token categories. The `Display` form doubles
/// as the tag name of the token XML dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum TokenCategory {
    Keyword,
    Symbol,
    Identifier,
    IntegerConstant,
    StringConstant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Symbol(Symbol),
    Identifier(String),
    IntegerConstant(u16),
    /// Contents of the string constant, without the surrounding quotes.
    StringConstant(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn category(&self) -> TokenCategory {
        match self.kind {
            TokenKind::Keyword(_) => TokenCategory::Keyword,
            TokenKind::Symbol(_) => TokenCategory::Symbol,
            TokenKind::Identifier(_) => TokenCategory::Identifier,
            TokenKind::IntegerConstant(_) => TokenCategory::IntegerConstant,
            TokenKind::StringConstant(_) => TokenCategory::StringConstant,
        }
    }

    /// Literal text of the token (string constants without their quotes).
    pub fn lexeme(&self) -> String {
        match &self.kind {
            TokenKind::Keyword(keyword) => keyword.to_string(),
            TokenKind::Symbol(symbol) => symbol.to_string(),
            TokenKind::Identifier(name) | TokenKind::StringConstant(name) => name.clone(),
            TokenKind::IntegerConstant(value) => value.to_string(),
        }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    pub fn is_symbol(&self, symbol: Symbol) -> bool {
        self.kind == TokenKind::Symbol(symbol)
    }

    /// Human readable form used in diagnostics, e.g. ``keyword `class` ``.
    pub fn describe(&self) -> String {
        format!("{} `{}`", self.category(), self.lexeme())
    }
}
