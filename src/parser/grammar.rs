//! Predictive recursive-descent parser for the Jack grammar.
//!
//! Every production decides what to do from at most two tokens of
//! lookahead. Declarations are entered into the symbol tables as soon
//! as they are parsed; the finished tables travel with the AST.

use crate::{
    common::{
        ast::{
            BinaryOperator, ClassVariableKind, JackClass, JackClassVariables, JackExpression,
            JackIdentifier, JackIf, JackLet, JackLocalVariables, JackParameter, JackStatement,
            JackSubroutine, JackSubroutineBody, JackSubroutineCall, JackTerm, JackType, JackWhile,
            KeywordConstant, SubroutineKind, UnaryOperator,
        },
        symbol_table::{SubroutineVariableKind, SymbolTables},
    },
    error::Error,
    parser::{
        token::{Keyword, Symbol, Token, TokenKind},
        token_stream::TokenStream,
    },
};

type ParseResult<T> = Result<T, Error>;

pub struct Parser {
    tokens: TokenStream,
    symbols: SymbolTables,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: TokenStream::new(tokens),
            symbols: SymbolTables::new(),
        }
    }

    // region: program structure

    /// `class ClassName { ClassVarDec* SubroutineDec* }`
    pub fn parse_class(mut self) -> ParseResult<JackClass> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier("class name")?;
        self.expect_symbol(Symbol::LeftBrace)?;

        let mut variables = Vec::new();
        while self.first_is(|token| ClassVariableKind::from_token(token).is_some()) {
            variables.push(self.class_variables()?);
        }

        let mut subroutines = Vec::new();
        while self.first_is(|token| SubroutineKind::from_token(token).is_some()) {
            subroutines.push(self.subroutine(&name.0)?);
        }

        if !self.accept_symbol(Symbol::RightBrace) {
            return Err(self.unexpected("subroutine declaration or '}'"));
        }

        if !self.tokens.is_at_end() {
            return Err(self.unexpected("end of input"));
        }

        Ok(JackClass {
            name,
            variables,
            subroutines,
            symbols: std::mem::take(&mut self.symbols.class),
        })
    }

    /// `(static | field) Type VarName (, VarName)* ;`
    fn class_variables(&mut self) -> ParseResult<JackClassVariables> {
        let kind = self.expect("'static' or 'field'", ClassVariableKind::from_token)?;
        let r#type = self.expect_type()?;

        let names = self.variable_names(|symbols, name| {
            symbols.define_class_symbol(name, r#type.clone(), kind)?;
            Ok(())
        })?;

        Ok(JackClassVariables {
            kind,
            r#type,
            names,
        })
    }

    /// `(constructor | function | method) (void | Type) SubName ( ParamList ) SubroutineBody`
    fn subroutine(&mut self, class_name: &str) -> ParseResult<JackSubroutine> {
        let kind = self.expect(
            "'constructor', 'function' or 'method'",
            SubroutineKind::from_token,
        )?;

        self.symbols
            .reset_subroutine(class_name, kind == SubroutineKind::Method);

        let return_type = if self.accept_keyword(Keyword::Void) {
            None
        } else {
            Some(self.expect("'void' or type", JackType::from_token)?)
        };

        let name = self.expect_identifier("subroutine name")?;

        self.expect_symbol(Symbol::LeftParen)?;
        let parameters = self.parameter_list()?;
        self.expect_symbol(Symbol::RightParen)?;

        let body = self.subroutine_body()?;

        Ok(JackSubroutine {
            kind,
            return_type,
            name,
            parameters,
            body,
            symbols: self.symbols.take_subroutine(),
        })
    }

    /// `(Type VarName (, Type VarName)*)?`
    fn parameter_list(&mut self) -> ParseResult<Vec<JackParameter>> {
        let mut parameters = Vec::new();

        if self.first_is(|token| token.is_symbol(Symbol::RightParen)) {
            return Ok(parameters);
        }

        loop {
            let r#type = self.expect_type()?;
            let name = self.expect_identifier("parameter name")?;

            self.symbols.define_subroutine_symbol(
                &name,
                r#type.clone(),
                SubroutineVariableKind::Argument,
            )?;
            parameters.push(JackParameter { r#type, name });

            if !self.accept_symbol(Symbol::Comma) {
                return Ok(parameters);
            }
        }
    }

    /// `{ VarDec* Statement* }`
    fn subroutine_body(&mut self) -> ParseResult<JackSubroutineBody> {
        self.expect_symbol(Symbol::LeftBrace)?;

        let mut variables = Vec::new();
        while self.first_is(|token| token.is_keyword(Keyword::Var)) {
            variables.push(self.local_variables()?);
        }

        let statements = self.statements()?;

        if !self.accept_symbol(Symbol::RightBrace) {
            return Err(self.unexpected("statement or '}'"));
        }

        Ok(JackSubroutineBody {
            variables,
            statements,
        })
    }

    /// `var Type VarName (, VarName)* ;`
    fn local_variables(&mut self) -> ParseResult<JackLocalVariables> {
        self.expect_keyword(Keyword::Var)?;
        let r#type = self.expect_type()?;

        let names = self.variable_names(|symbols, name| {
            symbols.define_subroutine_symbol(name, r#type.clone(), SubroutineVariableKind::Local)?;
            Ok(())
        })?;

        Ok(JackLocalVariables { r#type, names })
    }

    /// `VarName (, VarName)* ;`, registering every name as soon as it is read.
    fn variable_names(
        &mut self,
        mut define: impl FnMut(&mut SymbolTables, &JackIdentifier) -> ParseResult<()>,
    ) -> ParseResult<Vec<JackIdentifier>> {
        let mut names = Vec::new();

        loop {
            let name = self.expect_identifier("variable name")?;
            define(&mut self.symbols, &name)?;
            names.push(name);

            if !self.accept_symbol(Symbol::Comma) {
                break;
            }
        }

        self.expect_symbol(Symbol::Semicolon)?;
        Ok(names)
    }

    // endregion

    // region: statements

    fn statements(&mut self) -> ParseResult<Vec<JackStatement>> {
        let mut statements = Vec::new();

        loop {
            let keyword = match self.tokens.first() {
                Some(Token {
                    kind: TokenKind::Keyword(keyword),
                    ..
                }) => *keyword,
                _ => return Ok(statements),
            };

            let statement = match keyword {
                Keyword::Let => JackStatement::Let(self.let_statement()?),
                Keyword::If => JackStatement::If(self.if_statement()?),
                Keyword::While => JackStatement::While(self.while_statement()?),
                Keyword::Do => JackStatement::Do(self.do_statement()?),
                Keyword::Return => JackStatement::Return(self.return_statement()?),
                _ => return Ok(statements),
            };

            statements.push(statement);
        }
    }

    /// `let VarName ([ Expression ])? = Expression ;`
    fn let_statement(&mut self) -> ParseResult<JackLet> {
        self.expect_keyword(Keyword::Let)?;

        let is_array_element = self.second_is(|token| token.is_symbol(Symbol::LeftBracket));
        let target = self.expect_identifier("variable name")?;

        let index = if is_array_element {
            self.expect_symbol(Symbol::LeftBracket)?;
            let index = self.expression()?;
            self.expect_symbol(Symbol::RightBracket)?;
            Some(index)
        } else {
            None
        };

        self.expect_symbol(Symbol::Equals)?;
        let value = self.expression()?;
        self.expect_symbol(Symbol::Semicolon)?;

        Ok(JackLet {
            target,
            index,
            value,
        })
    }

    /// `if ( Expression ) { Statement* } (else { Statement* })?`
    fn if_statement(&mut self) -> ParseResult<JackIf> {
        self.expect_keyword(Keyword::If)?;
        let condition = self.parenthesized_condition()?;
        let then_branch = self.block()?;

        let else_branch = if self.accept_keyword(Keyword::Else) {
            Some(self.block()?)
        } else {
            None
        };

        Ok(JackIf {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `while ( Expression ) { Statement* }`
    fn while_statement(&mut self) -> ParseResult<JackWhile> {
        self.expect_keyword(Keyword::While)?;
        let condition = self.parenthesized_condition()?;
        let body = self.block()?;

        Ok(JackWhile { condition, body })
    }

    /// `do SubroutineCall ;`
    fn do_statement(&mut self) -> ParseResult<JackSubroutineCall> {
        self.expect_keyword(Keyword::Do)?;
        let call = self.subroutine_call()?;
        self.expect_symbol(Symbol::Semicolon)?;

        Ok(call)
    }

    /// `return Expression? ;`
    fn return_statement(&mut self) -> ParseResult<Option<JackExpression>> {
        self.expect_keyword(Keyword::Return)?;

        if self.accept_symbol(Symbol::Semicolon) {
            return Ok(None);
        }

        let value = self.expression()?;
        self.expect_symbol(Symbol::Semicolon)?;

        Ok(Some(value))
    }

    fn parenthesized_condition(&mut self) -> ParseResult<JackExpression> {
        self.expect_symbol(Symbol::LeftParen)?;
        let condition = self.expression()?;
        self.expect_symbol(Symbol::RightParen)?;

        Ok(condition)
    }

    /// `{ Statement* }`
    fn block(&mut self) -> ParseResult<Vec<JackStatement>> {
        self.expect_symbol(Symbol::LeftBrace)?;
        let statements = self.statements()?;

        if !self.accept_symbol(Symbol::RightBrace) {
            return Err(self.unexpected("statement or '}'"));
        }

        Ok(statements)
    }

    // endregion

    // region: expressions

    /// `Term (Op Term)*`
    fn expression(&mut self) -> ParseResult<JackExpression> {
        let first = self.term()?;
        let mut rest = Vec::new();

        while let Some(operator) = self.tokens.first().and_then(BinaryOperator::from_token) {
            self.tokens.advance();
            rest.push((operator, self.term()?));
        }

        Ok(JackExpression { first, rest })
    }

    fn term(&mut self) -> ParseResult<JackTerm> {
        let Some(kind) = self.tokens.first().map(|token| token.kind.clone()) else {
            return Err(self.unexpected("term"));
        };

        match kind {
            TokenKind::IntegerConstant(value) => {
                self.tokens.advance();
                Ok(JackTerm::IntegerConstant(value))
            }
            TokenKind::StringConstant(value) => {
                self.tokens.advance();
                Ok(JackTerm::StringConstant(value))
            }
            TokenKind::Keyword(_) => self
                .expect("keyword constant", KeywordConstant::from_token)
                .map(JackTerm::KeywordConstant),
            TokenKind::Identifier(_) => self.identifier_term(),
            TokenKind::Symbol(Symbol::LeftParen) => {
                self.tokens.advance();
                let inner = self.expression()?;
                self.expect_symbol(Symbol::RightParen)?;

                Ok(JackTerm::Parenthesized(Box::new(inner)))
            }
            TokenKind::Symbol(_) => {
                let operator = self.expect("'(', '-' or '~'", UnaryOperator::from_token)?;
                let operand = self.term()?;

                Ok(JackTerm::Unary(operator, Box::new(operand)))
            }
        }
    }

    /// Variable, array element or subroutine call, told apart by the second token.
    fn identifier_term(&mut self) -> ParseResult<JackTerm> {
        let second = self.tokens.second().map(|token| token.kind.clone());

        match second {
            Some(TokenKind::Symbol(Symbol::LeftBracket)) => {
                let array = self.expect_identifier("variable name")?;
                self.expect_symbol(Symbol::LeftBracket)?;
                let index = self.expression()?;
                self.expect_symbol(Symbol::RightBracket)?;

                Ok(JackTerm::ArrayAccess(array, Box::new(index)))
            }
            Some(TokenKind::Symbol(Symbol::LeftParen | Symbol::Dot)) => {
                self.subroutine_call().map(JackTerm::SubroutineCall)
            }
            _ => self
                .expect_identifier("variable name")
                .map(JackTerm::Variable),
        }
    }

    /// `SubName ( ExprList )` or `(ClassName | VarName) . SubName ( ExprList )`
    fn subroutine_call(&mut self) -> ParseResult<JackSubroutineCall> {
        let first = self.expect_identifier("subroutine, class or variable name")?;

        let (receiver, name) = if self.accept_symbol(Symbol::Dot) {
            (Some(first), self.expect_identifier("subroutine name")?)
        } else {
            (None, first)
        };

        self.expect_symbol(Symbol::LeftParen)?;
        let arguments = self.expression_list()?;
        self.expect_symbol(Symbol::RightParen)?;

        Ok(JackSubroutineCall {
            receiver,
            name,
            arguments,
        })
    }

    /// `(Expression (, Expression)*)?`
    fn expression_list(&mut self) -> ParseResult<Vec<JackExpression>> {
        let mut expressions = Vec::new();

        if self.first_is(|token| token.is_symbol(Symbol::RightParen)) {
            return Ok(expressions);
        }

        loop {
            expressions.push(self.expression()?);

            if !self.accept_symbol(Symbol::Comma) {
                return Ok(expressions);
            }
        }
    }

    // endregion

    // region: token helpers

    fn first_is(&self, predicate: impl FnOnce(&Token) -> bool) -> bool {
        self.tokens.first().is_some_and(predicate)
    }

    fn second_is(&self, predicate: impl FnOnce(&Token) -> bool) -> bool {
        self.tokens.second().is_some_and(predicate)
    }

    /// Consume the next token if `accept` can build a node out of it.
    fn expect<T>(
        &mut self,
        expected: &str,
        accept: impl FnOnce(&Token) -> Option<T>,
    ) -> ParseResult<T> {
        match self.tokens.first().and_then(accept) {
            Some(node) => {
                self.tokens.advance();
                Ok(node)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        self.expect(&format!("'{keyword}'"), |token| {
            token.is_keyword(keyword).then_some(())
        })
    }

    fn expect_symbol(&mut self, symbol: Symbol) -> ParseResult<()> {
        self.expect(&format!("'{symbol}'"), |token| {
            token.is_symbol(symbol).then_some(())
        })
    }

    fn expect_identifier(&mut self, expected: &str) -> ParseResult<JackIdentifier> {
        self.expect(expected, JackIdentifier::from_token)
    }

    fn expect_type(&mut self) -> ParseResult<JackType> {
        self.expect("type", JackType::from_token)
    }

    fn accept_keyword(&mut self, keyword: Keyword) -> bool {
        self.expect_keyword(keyword).is_ok()
    }

    fn accept_symbol(&mut self, symbol: Symbol) -> bool {
        self.expect_symbol(symbol).is_ok()
    }

    fn unexpected(&self, expected: &str) -> Error {
        let (found, span) = self.tokens.first().map_or_else(
            || (String::from("end of input"), self.tokens.end_span()),
            |token| (token.describe(), token.span.clone()),
        );

        Error::Syntax {
            expected: expected.to_owned(),
            found,
            span,
        }
    }

    // endregion
}

#[cfg(test)]
mod tests {
    use crate::{
        common::symbol_table::SymbolKind,
        parser::{comments, lexer},
    };

    use super::*;

    fn parse(source: &str) -> ParseResult<JackClass> {
        let stripped = comments::strip(source)?;
        Parser::new(lexer::tokenize(&stripped)?).parse_class()
    }

    /// Parse a single expression, wrapped in a throwaway class.
    fn parse_expression(expression: &str) -> JackExpression {
        let source = format!("class T {{ function void f() {{ return {expression}; }} }}");
        let mut class = parse(&source).expect("should parse");
        let subroutine = class.subroutines.remove(0);

        match subroutine.body.statements.into_iter().next() {
            Some(JackStatement::Return(Some(expression))) => expression,
            other => panic!("expected a return statement, got {other:?}"),
        }
    }

    fn expected_of(result: ParseResult<JackClass>) -> String {
        match result {
            Err(Error::Syntax { expected, .. }) => expected,
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    const SQUARE_GAME: &str = r#"
        /** Runs the game. */
        class SquareGame {
            field Square square; // the square
            field int direction;
            static int games;

            constructor SquareGame new() {
                let square = Square.new(0, 0, 30);
                let direction = 0;
                return this;
            }

            method void dispose() {
                do square.dispose();
                do Memory.deAlloc(this);
                return;
            }

            method void moveSquare(int steps, boolean fast) {
                var int i, j;
                var Array trail;
                if (direction = 1) { do square.moveUp(); }
                else { do square.moveDown(); }
                while (i < steps) {
                    let trail[i] = i * 2;
                    let i = i + 1;
                }
                do Sys.wait(5);
                return;
            }
        }
    "#;

    #[test]
    fn test_class_structure() {
        let class = parse(SQUARE_GAME).expect("should parse");

        assert_eq!(class.name.0, "SquareGame");
        assert_eq!(class.variables.len(), 3);
        assert_eq!(class.symbols.field_count(), 2);
        assert_eq!(class.symbols.static_count(), 1);

        let kinds: Vec<_> = class.subroutines.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            [
                SubroutineKind::Constructor,
                SubroutineKind::Method,
                SubroutineKind::Method
            ]
        );

        let constructor = &class.subroutines[0];
        assert_eq!(
            constructor.return_type,
            Some(JackType::Class("SquareGame".to_owned()))
        );
        assert_eq!(constructor.body.statements.len(), 3);

        let dispose = &class.subroutines[1];
        assert_eq!(dispose.return_type, None);
    }

    #[test]
    fn test_subroutine_symbols() {
        let class = parse(SQUARE_GAME).expect("should parse");

        // constructor: no implicit `this`
        assert!(class.subroutines[0].symbols.get("this").is_none());

        let move_square = &class.subroutines[2];
        let symbols: Vec<_> = move_square
            .symbols
            .iter()
            .map(|s| (s.name.as_str(), s.kind, s.index))
            .collect();

        assert_eq!(
            symbols,
            [
                ("this", SymbolKind::Argument, 0),
                ("steps", SymbolKind::Argument, 1),
                ("fast", SymbolKind::Argument, 2),
                ("i", SymbolKind::Local, 0),
                ("j", SymbolKind::Local, 1),
                ("trail", SymbolKind::Local, 2),
            ]
        );
        assert_eq!(move_square.body.local_count(), 3);
    }

    #[test]
    fn test_statement_shapes() {
        let class = parse(SQUARE_GAME).expect("should parse");
        let statements = &class.subroutines[2].body.statements;

        assert!(matches!(
            &statements[0],
            JackStatement::If(JackIf {
                else_branch: Some(_),
                ..
            })
        ));

        let JackStatement::While(JackWhile { body, .. }) = &statements[1] else {
            panic!("expected a while statement");
        };
        assert!(matches!(
            &body[0],
            JackStatement::Let(JackLet { index: Some(_), .. })
        ));
        assert!(matches!(
            &body[1],
            JackStatement::Let(JackLet { index: None, .. })
        ));

        assert!(matches!(
            &statements[2],
            JackStatement::Do(JackSubroutineCall {
                receiver: Some(receiver),
                ..
            }) if receiver.0 == "Sys"
        ));
        assert!(matches!(&statements[3], JackStatement::Return(None)));
    }

    #[test]
    fn test_expression_has_no_precedence() {
        let expression = parse_expression("2 + 3 * 4");

        assert!(matches!(expression.first, JackTerm::IntegerConstant(2)));
        assert!(matches!(
            expression.rest.as_slice(),
            [
                (BinaryOperator::Add, JackTerm::IntegerConstant(3)),
                (BinaryOperator::Multiply, JackTerm::IntegerConstant(4)),
            ]
        ));
    }

    #[test]
    fn test_term_shapes() {
        assert!(matches!(
            parse_expression("a[i + 1]").first,
            JackTerm::ArrayAccess(..)
        ));
        assert!(matches!(parse_expression("a").first, JackTerm::Variable(_)));
        assert!(matches!(
            parse_expression("f(1, 2)").first,
            JackTerm::SubroutineCall(JackSubroutineCall { receiver: None, ref arguments, .. })
                if arguments.len() == 2
        ));
        assert!(matches!(
            parse_expression("Math.max(a, b)").first,
            JackTerm::SubroutineCall(JackSubroutineCall {
                receiver: Some(_),
                ..
            })
        ));
        assert!(matches!(
            parse_expression("~(x)").first,
            JackTerm::Unary(UnaryOperator::Not, _)
        ));
        assert!(matches!(
            parse_expression("-x").first,
            JackTerm::Unary(UnaryOperator::Negate, _)
        ));
        assert!(matches!(
            parse_expression("this").first,
            JackTerm::KeywordConstant(KeywordConstant::This)
        ));
        assert!(matches!(
            parse_expression("\"hi\"").first,
            JackTerm::StringConstant(ref s) if s == "hi"
        ));
    }

    #[test]
    fn test_missing_semicolon() {
        let result = parse("class T { function void f() { return 1 } }");

        assert_eq!(expected_of(result), "';'");
    }

    #[test]
    fn test_invalid_term_symbol() {
        let result = parse("class T { function void f() { return *; } }");

        assert_eq!(expected_of(result), "'(', '-' or '~'");
    }

    #[test]
    fn test_keyword_is_not_a_term() {
        let result = parse("class T { function void f() { return while; } }");

        assert_eq!(expected_of(result), "keyword constant");
    }

    #[test]
    fn test_tokens_after_class() {
        let result = parse("class T { } class U { }");

        assert_eq!(expected_of(result), "end of input");
    }

    #[test]
    fn test_unexpected_end_of_input() {
        let source = "class T { function void f() {";
        let result = parse(source);

        assert!(matches!(
            result,
            Err(Error::Syntax { ref found, ref span, .. })
                if found == "end of input" && span.start == source.len()
        ));
    }

    #[test]
    fn test_error_names_offending_token() {
        let result = parse("class T { field int 7; }");

        assert!(matches!(
            result,
            Err(Error::Syntax { ref expected, ref found, .. })
                if expected == "variable name" && found == "integerConstant `7`"
        ));
    }

    #[test]
    fn test_redefinition_is_fatal() {
        let result = parse("class T { field int x; static char x; }");

        assert!(matches!(result, Err(Error::Symbol { ref name, .. }) if name == "x"));

        let result = parse("class T { function void f(int a) { var int a; return; } }");

        assert!(matches!(result, Err(Error::Symbol { ref name, .. }) if name == "a"));
    }

    #[test]
    fn test_same_name_in_different_subroutines() {
        let source = "
            class T {
                function void f(int a) { var int b; return; }
                function void g(int a) { var int b; return; }
            }
        ";

        assert!(parse(source).is_ok());
    }
}
