use std::rc::Rc;

use thiserror::Error;

use crate::ast::{Block, Expression, FnDecl, Program, Statement};
use crate::token::{Pos, Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq)]
#[error("ParseError: unexpected {found}; expected {expected} ({pos})")]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub pos: Pos,
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Pos::default()));
        }
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !matches!(self.current().kind, TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        while self.accept(&TokenKind::Semicolon) {}

        match self.current().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Fn => self.parse_fn_decl(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let pos = self.current().pos;
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Break { pos })
            }
            TokenKind::Continue => {
                let pos = self.current().pos;
                self.advance();
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Continue { pos })
            }
            TokenKind::LBrace => Ok(Statement::Block(self.parse_block()?)),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Expr(expr))
            }
        }
    }

    fn parse_let(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::Let)?.pos;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Let { name, value, pos })
    }

    fn parse_fn_decl(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::Fn)?.pos;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        while !self.accept(&TokenKind::RParen) {
            if !params.is_empty() {
                self.expect(TokenKind::Comma)?;
            }
            let (param, _) = self.expect_identifier()?;
            params.push(param);
        }

        let body = self.parse_block()?;
        Ok(Statement::FnDecl(Rc::new(FnDecl {
            name,
            params,
            body,
            pos,
        })))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::If)?.pos;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then_block = self.parse_block()?;

        let else_branch = if self.accept(&TokenKind::Else) {
            // "else if" chains nest as an if statement in the else branch.
            if matches!(self.current().kind, TokenKind::If) {
                Some(Box::new(self.parse_if()?))
            } else {
                Some(Box::new(Statement::Block(self.parse_block()?)))
            }
        } else {
            None
        };

        Ok(Statement::If {
            cond,
            then_block,
            else_branch,
            pos,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::While)?.pos;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Statement::While { cond, body, pos })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::For)?.pos;
        self.expect(TokenKind::LParen)?;

        if matches!(self.kind_at(0), TokenKind::Let)
            && matches!(self.kind_at(1), TokenKind::Identifier(_))
            && matches!(self.kind_at(2), TokenKind::Of)
        {
            return self.parse_for_of(pos);
        }
        self.parse_c_for(pos)
    }

    // "for" "(" "let" identifier "of" expr ")" block
    fn parse_for_of(&mut self, pos: Pos) -> ParseResult<Statement> {
        self.expect(TokenKind::Let)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Of)?;
        let iterable = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Statement::ForOf {
            name,
            iterable,
            body,
            pos,
        })
    }

    // "for" "(" (let_stmt | expr_stmt | ";") expr? ";" expr? ")" block
    fn parse_c_for(&mut self, pos: Pos) -> ParseResult<Statement> {
        let init = if self.accept(&TokenKind::Semicolon) {
            None
        } else if matches!(self.current().kind, TokenKind::Let) {
            Some(Box::new(self.parse_let()?))
        } else {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Semicolon)?;
            Some(Box::new(Statement::Expr(expr)))
        };

        let cond = if self.accept(&TokenKind::Semicolon) {
            None
        } else {
            let expr = self.parse_expression()?;
            self.expect(TokenKind::Semicolon)?;
            Some(expr)
        };

        let post = if matches!(self.current().kind, TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Statement::CFor {
            init,
            cond,
            post,
            body,
            pos,
        })
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let pos = self.expect(TokenKind::Return)?.pos;
        if self.accept(&TokenKind::Semicolon) {
            return Ok(Statement::Return { value: None, pos });
        }
        let value = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Return {
            value: Some(value),
            pos,
        })
    }

    fn parse_block(&mut self) -> ParseResult<Block> {
        let pos = self.expect(TokenKind::LBrace)?.pos;
        let mut stmts = Vec::new();
        while !self.accept(&TokenKind::RBrace) {
            stmts.push(self.parse_statement()?);
        }
        Ok(Block { stmts, pos })
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Integer(value) => {
                self.advance();
                Ok(Expression::IntLit(value, token.pos))
            }
            TokenKind::Float(value) => {
                self.advance();
                Ok(Expression::FloatLit(value, token.pos))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expression::StrLit(value, token.pos))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::BoolLit(true, token.pos))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::BoolLit(false, token.pos))
            }
            TokenKind::Null => {
                self.advance();
                Ok(Expression::NullLit(token.pos))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expression::Name(name, token.pos))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list_lit(),
            TokenKind::LBrace => self.parse_dict_lit(),
            _ => Err(self.error("expression")),
        }
    }

    /// Applies any mix of `.name`, `[key]`, and `(args)` suffixes, each of
    /// which may complete into an assignment for attribute/subscript targets.
    fn parse_postfix(&mut self, primary: Expression) -> ParseResult<Expression> {
        let pos = primary.pos();
        let mut current = primary;
        loop {
            match self.current().kind {
                TokenKind::Dot => {
                    self.advance();
                    let (name, _) = self.expect_identifier()?;
                    if self.accept(&TokenKind::Equal) {
                        let value = self.parse_expression()?;
                        current = Expression::AttrAssign {
                            target: Box::new(current),
                            name,
                            value: Box::new(value),
                            pos,
                        };
                    } else {
                        current = Expression::Attr {
                            target: Box::new(current),
                            name,
                            pos,
                        };
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    if self.accept(&TokenKind::Equal) {
                        let value = self.parse_expression()?;
                        current = Expression::IndexAssign {
                            target: Box::new(current),
                            key: Box::new(key),
                            value: Box::new(value),
                            pos,
                        };
                    } else {
                        current = Expression::Index {
                            target: Box::new(current),
                            key: Box::new(key),
                            pos,
                        };
                    }
                }
                TokenKind::LParen => {
                    self.advance();
                    let mut args = Vec::new();
                    while !self.accept(&TokenKind::RParen) {
                        if !args.is_empty() {
                            self.expect(TokenKind::Comma)?;
                        }
                        args.push(self.parse_expression()?);
                    }
                    current = Expression::Call {
                        callee: Box::new(current),
                        args,
                        pos,
                    };
                }
                _ => return Ok(current),
            }
        }
    }

    fn parse_list_lit(&mut self) -> ParseResult<Expression> {
        let pos = self.expect(TokenKind::LBracket)?.pos;
        let mut elems = Vec::new();
        loop {
            if self.accept(&TokenKind::RBracket) {
                break;
            }
            elems.push(self.parse_expression()?);
            if !self.accept(&TokenKind::Comma) {
                self.expect(TokenKind::RBracket)?;
                break;
            }
        }
        Ok(Expression::ListLit(elems, pos))
    }

    fn parse_dict_lit(&mut self) -> ParseResult<Expression> {
        let pos = self.expect(TokenKind::LBrace)?.pos;
        let mut pairs = Vec::new();
        loop {
            if self.accept(&TokenKind::RBrace) {
                break;
            }
            let key = self.parse_expression()?;
            self.expect(TokenKind::Colon)?;
            let value = self.parse_expression()?;
            pairs.push((key, value));
            if !self.accept(&TokenKind::Comma) {
                self.expect(TokenKind::RBrace)?;
                break;
            }
        }
        Ok(Expression::DictLit(pairs, pos))
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| &self.tokens[self.tokens.len() - 1])
    }

    fn kind_at(&self, offset: usize) -> &TokenKind {
        // The token stream always ends with Eof, so clamp lookahead to it.
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn accept(&mut self, kind: &TokenKind) -> bool {
        if &self.current().kind == kind {
            self.advance();
            return true;
        }
        false
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.current().kind == kind {
            let token = self.current().clone();
            self.advance();
            return Ok(token);
        }
        Err(self.error(&kind.to_string()))
    }

    fn expect_identifier(&mut self) -> ParseResult<(String, Pos)> {
        if let TokenKind::Identifier(name) = &self.current().kind {
            let name = name.clone();
            let pos = self.current().pos;
            self.advance();
            return Ok((name, pos));
        }
        Err(self.error("identifier"))
    }

    fn error(&self, expected: &str) -> ParseError {
        let token = self.current();
        ParseError {
            expected: expected.to_string(),
            found: token.kind.to_string(),
            pos: token.pos,
        }
    }
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseResult<Program> {
    Parser::new(tokens).parse_program()
}
