//! blinkc-par - Recursive-descent parser for the Blink language.
//!
//! Consumes the lexer's token vector and yields a list of top-level
//! statements. One token of lookahead covers most of the grammar; two are
//! needed to tell a call statement from an assignment (`ID (`) and to spot
//! the keyword-less declaration in a `for` header (`ID :`), so the parser
//! exposes `peek(k)` for small `k`.
//!
//! The grammar draws no line between module scope and function bodies: a
//! program is a flat statement sequence, and globals are plain variable
//! declarations at depth zero.

pub mod ast;
pub mod error;
mod expr;
mod stmt;
pub mod types;

use blinkc_lex::{Token, TokenKind};
use blinkc_util::Span;

pub use ast::*;
pub use error::ParseError;
pub use types::{Type, TypeKind, Value};

/// Parser over a fully materialized token vector.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses the whole stream into a statement list.
    pub fn parse(mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while self.pos < self.tokens.len() {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    /// Dispatches on the leading token of a statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.peek(0)?;
        match token.kind {
            TokenKind::Var | TokenKind::Const => self.parse_var_decl_stmt(),
            TokenKind::Func => self.parse_func_decl_stmt(),
            TokenKind::Id => {
                if self.peek_kind(1) == Some(TokenKind::LParen) {
                    self.parse_func_call_stmt()
                } else {
                    Ok(Stmt::VarAsgn(self.parse_var_asgn_stmt(true)?))
                }
            }
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::For => self.parse_for_cycle_stmt(),
            TokenKind::While => self.parse_while_cycle_stmt(),
            TokenKind::Do => self.parse_do_while_cycle_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            _ => Err(ParseError::UnsupportedToken {
                value: token.value.clone(),
                span: token.span,
            }),
        }
    }

    /// Token `rpos` positions ahead; fatal past the end of the stream.
    pub(crate) fn peek(&self, rpos: usize) -> Result<&Token, ParseError> {
        self.tokens
            .get(self.pos + rpos)
            .ok_or(ParseError::OutOfRange {
                index: self.pos + rpos,
                len: self.tokens.len(),
                span: self.last_span(),
            })
    }

    /// Tag `rpos` positions ahead, or `None` past the end.
    pub(crate) fn peek_kind(&self, rpos: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + rpos).map(|t| t.kind)
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.peek(0)?.clone();
        self.pos += 1;
        Ok(token)
    }

    /// Consumes a token of the given tag or fails with `Expected {what}`.
    pub(crate) fn consume(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        let token = self.peek(0)?;
        if token.kind == kind {
            self.advance()
        } else {
            Err(ParseError::Expected {
                what: what.to_string(),
                span: token.span,
            })
        }
    }

    /// Consumes the current token if it has the given tag.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind(0) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Whether the current token has the given tag.
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    /// Span of the last token, for end-of-stream diagnostics.
    pub(crate) fn last_span(&self) -> Span {
        self.tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY)
    }
}
