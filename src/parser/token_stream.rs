use crate::{common::ast::Span, parser::token::Token};

/// Cursor over the tokens of one translation unit, with
/// one- and two-token lookahead.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
    /// Points just past the last token, for "unexpected end of input" reports.
    end: Span,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens
            .last()
            .map_or(0..0, |token| token.span.end..token.span.end);

        Self {
            tokens,
            cursor: 0,
            end,
        }
    }

    /// Token at the cursor; moves the cursor forward.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Token at the cursor.
    pub fn first(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Token right after the one at the cursor.
    pub fn second(&self) -> Option<&Token> {
        self.tokens.get(self.cursor + 1)
    }

    /// Move the cursor back to the first token.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    pub fn end_span(&self) -> Span {
        self.end.clone()
    }
}
