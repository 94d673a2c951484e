//! Types representing the structure of a Jack class.
//!
//! Note: node types are prefixed with `Jack` to avoid potential
//! name collision with existing keywords/phrases (e.g. Type).
//!
//! Leaf types (types, operators, keyword constants, ...) know which
//! tokens they can be built from, so the parser only has to ask them
//! whether the token at hand is acceptable.

use crate::{
    common::symbol_table::{ClassSymbolTable, SubroutineSymbolTable},
    parser::token::{Keyword, Symbol, Token, TokenKind},
};

/// Associate each AST element with its corresponding
/// source code span (for better error reporting).
pub type Span = std::ops::Range<usize>;

// region: non-terminals

/// Root of a translation unit, alongside its class-level symbols.
#[derive(Debug)]
pub struct JackClass {
    pub name: JackIdentifier,
    pub variables: Vec<JackClassVariables>,
    pub subroutines: Vec<JackSubroutine>,
    pub symbols: ClassSymbolTable,
}

/// `static int x, y;` or `field Square square;`
#[derive(Debug)]
pub struct JackClassVariables {
    pub kind: ClassVariableKind,
    pub r#type: JackType,
    pub names: Vec<JackIdentifier>,
}

#[derive(Debug)]
pub struct JackSubroutine {
    pub kind: SubroutineKind,
    /// `None` for `void` subroutines.
    pub return_type: Option<JackType>,
    pub name: JackIdentifier,
    pub parameters: Vec<JackParameter>,
    pub body: JackSubroutineBody,
    /// Arguments and locals, as collected while parsing this subroutine.
    pub symbols: SubroutineSymbolTable,
}

#[derive(Debug)]
pub struct JackParameter {
    pub r#type: JackType,
    pub name: JackIdentifier,
}

#[derive(Debug)]
pub struct JackSubroutineBody {
    pub variables: Vec<JackLocalVariables>,
    pub statements: Vec<JackStatement>,
}

impl JackSubroutineBody {
    /// Number of local variables, summed across all `var` declarations.
    pub fn local_count(&self) -> usize {
        self.variables.iter().map(|dec| dec.names.len()).sum()
    }
}

/// `var int i, j;`
#[derive(Debug)]
pub struct JackLocalVariables {
    pub r#type: JackType,
    pub names: Vec<JackIdentifier>,
}

#[derive(Debug)]
pub enum JackStatement {
    Let(JackLet),
    If(JackIf),
    While(JackWhile),
    Do(JackSubroutineCall),
    Return(Option<JackExpression>),
}

/// `let target = value;` or `let target[index] = value;`
#[derive(Debug)]
pub struct JackLet {
    pub target: JackIdentifier,
    pub index: Option<JackExpression>,
    pub value: JackExpression,
}

#[derive(Debug)]
pub struct JackIf {
    pub condition: JackExpression,
    pub then_branch: Vec<JackStatement>,
    pub else_branch: Option<Vec<JackStatement>>,
}

#[derive(Debug)]
pub struct JackWhile {
    pub condition: JackExpression,
    pub body: Vec<JackStatement>,
}

/// `term (op term)*`, evaluated strictly left to right.
#[derive(Debug)]
pub struct JackExpression {
    pub first: JackTerm,
    pub rest: Vec<(BinaryOperator, JackTerm)>,
}

#[derive(Debug)]
pub enum JackTerm {
    IntegerConstant(u16),
    StringConstant(String),
    KeywordConstant(KeywordConstant),
    Variable(JackIdentifier),
    ArrayAccess(JackIdentifier, Box<JackExpression>),
    SubroutineCall(JackSubroutineCall),
    Parenthesized(Box<JackExpression>),
    Unary(UnaryOperator, Box<JackTerm>),
}

/// `name(arguments)` or `receiver.name(arguments)`, where the
/// receiver is either a class name or a variable name.
#[derive(Debug)]
pub struct JackSubroutineCall {
    pub receiver: Option<JackIdentifier>,
    pub name: JackIdentifier,
    pub arguments: Vec<JackExpression>,
}

// endregion

// region: terminals

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ClassVariableKind {
    Static,
    Field,
}

impl ClassVariableKind {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Keyword(Keyword::Static) => Some(Self::Static),
            TokenKind::Keyword(Keyword::Field) => Some(Self::Field),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Keyword(Keyword::Constructor) => Some(Self::Constructor),
            TokenKind::Keyword(Keyword::Function) => Some(Self::Function),
            TokenKind::Keyword(Keyword::Method) => Some(Self::Method),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JackType {
    Int,
    Char,
    Boolean,
    Class(String),
}

impl JackType {
    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Keyword(Keyword::Int) => Some(Self::Int),
            TokenKind::Keyword(Keyword::Char) => Some(Self::Char),
            TokenKind::Keyword(Keyword::Boolean) => Some(Self::Boolean),
            TokenKind::Identifier(class_name) => Some(Self::Class(class_name.clone())),
            _ => None,
        }
    }

    /// Name of the class whose methods can be called on values of this type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Self::Class(name) => Some(name),
            Self::Int | Self::Char | Self::Boolean => None,
        }
    }
}

impl std::fmt::Display for JackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Char => write!(f, "char"),
            Self::Boolean => write!(f, "boolean"),
            Self::Class(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    And,
    Or,
    LessThan,
    GreaterThan,
    Equal,
}

impl BinaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        let TokenKind::Symbol(symbol) = token.kind else {
            return None;
        };

        match symbol {
            Symbol::Plus => Some(Self::Add),
            Symbol::Minus => Some(Self::Subtract),
            Symbol::Asterisk => Some(Self::Multiply),
            Symbol::Slash => Some(Self::Divide),
            Symbol::Ampersand => Some(Self::And),
            Symbol::Pipe => Some(Self::Or),
            Symbol::LessThan => Some(Self::LessThan),
            Symbol::GreaterThan => Some(Self::GreaterThan),
            Symbol::Equals => Some(Self::Equal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl UnaryOperator {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Symbol(Symbol::Minus) => Some(Self::Negate),
            TokenKind::Symbol(Symbol::Tilde) => Some(Self::Not),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConstant {
    True,
    False,
    Null,
    This,
}

impl KeywordConstant {
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind {
            TokenKind::Keyword(Keyword::True) => Some(Self::True),
            TokenKind::Keyword(Keyword::False) => Some(Self::False),
            TokenKind::Keyword(Keyword::Null) => Some(Self::Null),
            TokenKind::Keyword(Keyword::This) => Some(Self::This),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JackIdentifier(pub String, pub Span);

impl JackIdentifier {
    /// Construct an internally used Jack identifier
    /// (as opposed to a parsed one).
    ///
    /// Most commonly used in tests.
    pub fn internal(name: &str) -> Self {
        // did not come from a source file, so does not have a related span
        Self(name.to_owned(), Span::default())
    }

    pub fn from_token(token: &Token) -> Option<Self> {
        match &token.kind {
            TokenKind::Identifier(name) => Some(Self(name.clone(), token.span.clone())),
            _ => None,
        }
    }
}

impl std::fmt::Display for JackIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// endregion

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, 0..1)
    }

    #[test]
    fn test_type_from_token() {
        assert_eq!(
            JackType::from_token(&token(TokenKind::Keyword(Keyword::Boolean))),
            Some(JackType::Boolean)
        );
        assert_eq!(
            JackType::from_token(&token(TokenKind::Identifier("Square".to_owned()))),
            Some(JackType::Class("Square".to_owned()))
        );
        assert_eq!(
            JackType::from_token(&token(TokenKind::Keyword(Keyword::Void))),
            None
        );
    }

    #[test]
    fn test_operator_from_token() {
        assert_eq!(
            BinaryOperator::from_token(&token(TokenKind::Symbol(Symbol::Asterisk))),
            Some(BinaryOperator::Multiply)
        );
        assert_eq!(
            BinaryOperator::from_token(&token(TokenKind::Symbol(Symbol::Tilde))),
            None
        );
        assert_eq!(
            UnaryOperator::from_token(&token(TokenKind::Symbol(Symbol::Tilde))),
            Some(UnaryOperator::Not)
        );
        assert_eq!(
            UnaryOperator::from_token(&token(TokenKind::Symbol(Symbol::Plus))),
            None
        );
    }

    #[test]
    fn test_local_count_sums_declarations() {
        let body = JackSubroutineBody {
            variables: vec![
                JackLocalVariables {
                    r#type: JackType::Int,
                    names: vec![JackIdentifier::internal("i"), JackIdentifier::internal("j")],
                },
                JackLocalVariables {
                    r#type: JackType::Class("Array".to_owned()),
                    names: vec![JackIdentifier::internal("a")],
                },
            ],
            statements: vec![],
        };

        assert_eq!(body.local_count(), 3);
    }
}
