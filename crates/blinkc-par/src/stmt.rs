//! Statement parsing.

use blinkc_lex::TokenKind;

use crate::ast::*;
use crate::error::ParseError;
use crate::Parser;

impl Parser {
    /// `(var|const) ID ':' type ('=' expr)? ';'`
    pub(crate) fn parse_var_decl_stmt(&mut self) -> Result<Stmt, ParseError> {
        let is_const = self.advance()?.kind == TokenKind::Const;
        let name_token = self.consume(TokenKind::Id, "identifier")?;
        self.consume(TokenKind::Colon, "':'")?;
        let ty = self.consume_type(is_const)?;

        let init = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.consume(TokenKind::Semicolon, "';'")?;

        Ok(Stmt::VarDecl(VarDeclStmt {
            ty,
            name: name_token.value.clone(),
            init,
            token: name_token,
        }))
    }

    /// `func ID '(' arg-list? ')' ':' (const)? type '{' stmt* '}'`
    pub(crate) fn parse_func_decl_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.advance()?;
        let name_token = self.consume(TokenKind::Id, "identifier")?;
        self.consume(TokenKind::LParen, "'('")?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_argument()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "')'")?;
        self.consume(TokenKind::Colon, "':'")?;
        let ret_const = self.eat(TokenKind::Const);
        let return_type = self.consume_type(ret_const)?;

        self.consume(TokenKind::LBrace, "'{'")?;
        let mut body = Vec::new();
        while !self.check(TokenKind::RBrace) {
            body.push(self.parse_stmt()?);
        }
        self.consume(TokenKind::RBrace, "'}'")?;

        Ok(Stmt::FuncDecl(FuncDeclStmt {
            return_type,
            name: name_token.value.clone(),
            args,
            body,
            token: name_token,
        }))
    }

    /// `ID ':' (const)? type ('=' expr)?`
    fn parse_argument(&mut self) -> Result<Argument, ParseError> {
        let name_token = self.consume(TokenKind::Id, "identifier")?;
        self.consume(TokenKind::Colon, "':'")?;
        let is_const = self.eat(TokenKind::Const);
        let ty = self.consume_type(is_const)?;
        let default = if self.eat(TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Argument {
            ty,
            name: name_token.value,
            default,
        })
    }

    /// `ID '(' args? ')' ';'`
    pub(crate) fn parse_func_call_stmt(&mut self) -> Result<Stmt, ParseError> {
        let name_token = self.consume(TokenKind::Id, "identifier")?;
        let args = self.parse_call_args()?;
        self.consume(TokenKind::Semicolon, "';'")?;

        Ok(Stmt::FuncCall(FuncCallStmt {
            name: name_token.value.clone(),
            args,
            token: name_token,
        }))
    }

    /// `ID ('=' | '+=' | '-=' | '*=' | '/=' | '%=') expr`
    ///
    /// Compound forms desugar here: `x op= e` becomes `x = x op e` with a
    /// fresh `VarExpr` for the left-hand side. The trailing `';'` is
    /// optional so the `for` header's step clause can reuse this rule.
    pub(crate) fn parse_var_asgn_stmt(
        &mut self,
        require_semicolon: bool,
    ) -> Result<VarAsgnStmt, ParseError> {
        let name_token = self.consume(TokenKind::Id, "identifier")?;
        let op_token = self.advance()?;

        let rhs = self.parse_expr()?;
        let expr = match op_token.kind {
            TokenKind::Eq => rhs,
            TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::MultEq
            | TokenKind::DivEq
            | TokenKind::ModuloEq => {
                let op = match op_token.kind {
                    TokenKind::PlusEq => TokenKind::Plus,
                    TokenKind::MinusEq => TokenKind::Minus,
                    TokenKind::MultEq => TokenKind::Mult,
                    TokenKind::DivEq => TokenKind::Div,
                    _ => TokenKind::Modulo,
                };
                Expr::Binary(BinaryExpr {
                    op,
                    left: Box::new(Expr::Var(VarExpr {
                        name: name_token.value.clone(),
                        token: name_token.clone(),
                    })),
                    right: Box::new(rhs),
                    token: op_token,
                })
            }
            _ => {
                return Err(ParseError::UnsupportedAssignOp {
                    value: op_token.value,
                    span: op_token.span,
                })
            }
        };

        if require_semicolon {
            self.consume(TokenKind::Semicolon, "';'")?;
        }

        Ok(VarAsgnStmt {
            name: name_token.value.clone(),
            expr,
            token: name_token,
        })
    }

    /// `if '(' expr ')' body ('else' body)?`
    pub(crate) fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        self.consume(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.consume(TokenKind::RParen, "')'")?;

        let then_block = self.parse_body()?;
        let else_block = if self.eat(TokenKind::Else) {
            self.parse_body()?
        } else {
            Vec::new()
        };

        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_block,
            token,
        }))
    }

    /// `for '(' init cond ';' step ')' body`
    ///
    /// `init` is a keyword-less variable declaration (spotted by the
    /// `ID ':'` lookahead) or an assignment; both supply their own `';'`.
    /// `step` is an assignment without a trailing `';'`.
    pub(crate) fn parse_for_cycle_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        self.consume(TokenKind::LParen, "'('")?;

        let init = if self.check(TokenKind::Id) && self.peek_kind(1) == Some(TokenKind::Colon) {
            let name_token = self.consume(TokenKind::Id, "identifier")?;
            self.consume(TokenKind::Colon, "':'")?;
            let ty = self.consume_type(false)?;
            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            self.consume(TokenKind::Semicolon, "';'")?;
            Stmt::VarDecl(VarDeclStmt {
                ty,
                name: name_token.value.clone(),
                init,
                token: name_token,
            })
        } else {
            Stmt::VarAsgn(self.parse_var_asgn_stmt(true)?)
        };

        let cond = self.parse_expr()?;
        self.consume(TokenKind::Semicolon, "';'")?;
        let step = Stmt::VarAsgn(self.parse_var_asgn_stmt(false)?);
        self.consume(TokenKind::RParen, "')'")?;

        let body = self.parse_body()?;

        Ok(Stmt::ForCycle(ForCycleStmt {
            init: Box::new(init),
            cond,
            step: Box::new(step),
            body,
            token,
        }))
    }

    /// `while '(' expr ')' body`
    pub(crate) fn parse_while_cycle_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        self.consume(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.consume(TokenKind::RParen, "')'")?;
        let body = self.parse_body()?;

        Ok(Stmt::WhileCycle(WhileCycleStmt { cond, body, token }))
    }

    /// `do body while '(' expr ')' ';'`
    pub(crate) fn parse_do_while_cycle_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        let body = self.parse_body()?;
        self.consume(TokenKind::While, "'while'")?;
        self.consume(TokenKind::LParen, "'('")?;
        let cond = self.parse_expr()?;
        self.consume(TokenKind::RParen, "')'")?;
        self.consume(TokenKind::Semicolon, "';'")?;

        Ok(Stmt::DoWhileCycle(DoWhileCycleStmt { cond, body, token }))
    }

    pub(crate) fn parse_break_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        self.consume(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Break(BreakStmt { token }))
    }

    pub(crate) fn parse_continue_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        self.consume(TokenKind::Semicolon, "';'")?;
        Ok(Stmt::Continue(ContinueStmt { token }))
    }

    /// `return expr? ';'`
    pub(crate) fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let token = self.advance()?;
        let expr = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.consume(TokenKind::Semicolon, "';'")?;

        Ok(Stmt::Return(ReturnStmt { expr, token }))
    }

    /// A `{ … }` block or a single statement.
    fn parse_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.eat(TokenKind::LBrace) {
            let mut stmts = Vec::new();
            while !self.check(TokenKind::RBrace) {
                stmts.push(self.parse_stmt()?);
            }
            self.consume(TokenKind::RBrace, "'}'")?;
            Ok(stmts)
        } else {
            Ok(vec![self.parse_stmt()?])
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ParseError;
    use crate::tests::{parse_ok, parse_source};
    use crate::types::TypeKind;
    use blinkc_lex::TokenKind;

    fn single(source: &str) -> Stmt {
        let mut stmts = parse_ok(source);
        assert_eq!(stmts.len(), 1, "expected exactly one statement");
        stmts.remove(0)
    }

    #[test]
    fn test_var_decl() {
        let Stmt::VarDecl(decl) = single("var x: i32 = 1;") else {
            panic!("expected var decl");
        };
        assert_eq!(decl.name, "x");
        assert_eq!(decl.ty.kind, TypeKind::I32);
        assert!(!decl.ty.is_const);
        assert!(decl.init.is_some());
    }

    #[test]
    fn test_const_decl_sets_flag() {
        let Stmt::VarDecl(decl) = single("const K: u8* = 0;") else {
            panic!("expected var decl");
        };
        assert!(decl.ty.is_const);
        assert!(decl.ty.is_pointer);
        assert!(decl.ty.is_unsigned);
        assert_eq!(decl.ty.kind, TypeKind::U8);
    }

    #[test]
    fn test_decl_without_initializer() {
        let Stmt::VarDecl(decl) = single("var x: f64;") else {
            panic!("expected var decl");
        };
        assert!(decl.init.is_none());
    }

    #[test]
    fn test_func_decl() {
        let Stmt::FuncDecl(func) = single("func add(a: i32, b: const i32): i32 { return a; }")
        else {
            panic!("expected func decl");
        };
        assert_eq!(func.name, "add");
        assert_eq!(func.args.len(), 2);
        assert_eq!(func.args[0].name, "a");
        assert!(func.args[1].ty.is_const);
        assert_eq!(func.return_type.kind, TypeKind::I32);
        assert_eq!(func.body.len(), 1);
    }

    #[test]
    fn test_func_decl_default_arg() {
        let Stmt::FuncDecl(func) = single("func f(a: i32 = 3): nothing { }") else {
            panic!("expected func decl");
        };
        assert!(func.args[0].default.is_some());
        assert_eq!(func.return_type.kind, TypeKind::Nothing);
    }

    #[test]
    fn test_trailing_comma_rejected() {
        let err = parse_source("func f(a: i32,): nothing { }").unwrap_err();
        assert!(matches!(err, ParseError::Expected { what, .. } if what == "identifier"));
    }

    #[test]
    fn test_compound_assign_desugars() {
        // x += 1; parses identically to x = x + 1;
        let Stmt::VarAsgn(plain) = single("x = x + 1;") else {
            panic!("expected assignment");
        };
        let Stmt::VarAsgn(compound) = single("x += 1;") else {
            panic!("expected assignment");
        };

        let Expr::Binary(plain_rhs) = &plain.expr else {
            panic!("expected binary rhs");
        };
        let Expr::Binary(compound_rhs) = &compound.expr else {
            panic!("expected binary rhs");
        };
        assert_eq!(plain_rhs.op, TokenKind::Plus);
        assert_eq!(compound_rhs.op, TokenKind::Plus);
        let (Expr::Var(a), Expr::Var(b)) = (&*plain_rhs.left, &*compound_rhs.left) else {
            panic!("expected var lhs in both");
        };
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn test_all_compound_ops_desugar() {
        for (source, op) in [
            ("x -= 1;", TokenKind::Minus),
            ("x *= 2;", TokenKind::Mult),
            ("x /= 2;", TokenKind::Div),
            ("x %= 2;", TokenKind::Modulo),
        ] {
            let Stmt::VarAsgn(asgn) = single(source) else {
                panic!("expected assignment");
            };
            let Expr::Binary(rhs) = &asgn.expr else {
                panic!("expected binary rhs");
            };
            assert_eq!(rhs.op, op);
        }
    }

    #[test]
    fn test_if_else_single_statement_bodies() {
        let Stmt::If(stmt) = single("if (x > 0) x = 1; else x = 2;") else {
            panic!("expected if");
        };
        assert_eq!(stmt.then_block.len(), 1);
        assert_eq!(stmt.else_block.len(), 1);
    }

    #[test]
    fn test_if_without_else() {
        let Stmt::If(stmt) = single("if (x > 0) { x = 1; }") else {
            panic!("expected if");
        };
        assert!(stmt.else_block.is_empty());
    }

    #[test]
    fn test_else_if_chains_as_nested_if() {
        let Stmt::If(stmt) = single("if (a) x = 1; else if (b) x = 2; else x = 3;") else {
            panic!("expected if");
        };
        assert_eq!(stmt.else_block.len(), 1);
        assert!(matches!(stmt.else_block[0], Stmt::If(_)));
    }

    #[test]
    fn test_for_header_with_declaration() {
        let Stmt::ForCycle(stmt) = single("for (i: i32 = 0; i < 10; i += 1) { x = i; }") else {
            panic!("expected for");
        };
        let Stmt::VarDecl(init) = &*stmt.init else {
            panic!("expected declaration init");
        };
        assert_eq!(init.name, "i");
        assert!(matches!(&*stmt.step, Stmt::VarAsgn(_)));
    }

    #[test]
    fn test_for_header_with_assignment() {
        let Stmt::ForCycle(stmt) = single("for (i = 0; i < 10; i = i + 1) x = i;") else {
            panic!("expected for");
        };
        assert!(matches!(&*stmt.init, Stmt::VarAsgn(_)));
        assert_eq!(stmt.body.len(), 1);
    }

    #[test]
    fn test_while_and_do_while() {
        let Stmt::WhileCycle(_) = single("while (x < 3) x += 1;") else {
            panic!("expected while");
        };
        let Stmt::DoWhileCycle(_) = single("do { x += 1; } while (x < 3);") else {
            panic!("expected do-while");
        };
    }

    #[test]
    fn test_break_continue_return() {
        let stmts = parse_ok("break; continue; return; return 1;");
        assert!(matches!(stmts[0], Stmt::Break(_)));
        assert!(matches!(stmts[1], Stmt::Continue(_)));
        let Stmt::Return(bare) = &stmts[2] else {
            panic!("expected return");
        };
        assert!(bare.expr.is_none());
        let Stmt::Return(with_value) = &stmts[3] else {
            panic!("expected return");
        };
        assert!(with_value.expr.is_some());
    }

    #[test]
    fn test_call_stmt_args() {
        let Stmt::FuncCall(call) = single("printf(\"%d\", x);") else {
            panic!("expected call");
        };
        assert_eq!(call.name, "printf");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_source("var x: i32 = 1").unwrap_err();
        assert!(matches!(err, ParseError::OutOfRange { .. }));
        let err = parse_source("var x: i32 = 1 var").unwrap_err();
        assert!(matches!(err, ParseError::Expected { what, .. } if what == "';'"));
    }
}
