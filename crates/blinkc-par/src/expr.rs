//! Expression parsing.
//!
//! Precedence levels, loosest first: `&&`, `||`, equality, comparison,
//! additive, multiplicative, unary, primary. All binary levels are
//! left-associative loops. Placing `&&` below `||` is deliberate language
//! behavior, unusual as it is next to C.

use blinkc_lex::{Token, TokenKind};

use crate::ast::*;
use crate::error::ParseError;
use crate::types::{Type, TypeKind, Value};
use crate::Parser;

impl Parser {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_l_and()
    }

    fn parse_l_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_l_or()?;
        while self.check(TokenKind::LAnd) {
            let token = self.advance()?;
            let right = self.parse_l_or()?;
            left = binary(TokenKind::LAnd, left, right, token);
        }
        Ok(left)
    }

    fn parse_l_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::LOr) {
            let token = self.advance()?;
            let right = self.parse_equality()?;
            left = binary(TokenKind::LOr, left, right, token);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while matches!(
            self.peek_kind(0),
            Some(TokenKind::EqEq) | Some(TokenKind::NotEq)
        ) {
            let token = self.advance()?;
            let right = self.parse_comparison()?;
            left = binary(token.kind, left, right, token);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while matches!(
            self.peek_kind(0),
            Some(TokenKind::Gt) | Some(TokenKind::GtEq) | Some(TokenKind::Ls) | Some(TokenKind::LsEq)
        ) {
            let token = self.advance()?;
            let right = self.parse_additive()?;
            left = binary(token.kind, left, right, token);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while matches!(
            self.peek_kind(0),
            Some(TokenKind::Plus) | Some(TokenKind::Minus)
        ) {
            let token = self.advance()?;
            let right = self.parse_multiplicative()?;
            left = binary(token.kind, left, right, token);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while matches!(
            self.peek_kind(0),
            Some(TokenKind::Mult) | Some(TokenKind::Div) | Some(TokenKind::Modulo)
        ) {
            let token = self.advance()?;
            let right = self.parse_unary()?;
            left = binary(token.kind, left, right, token);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if matches!(
            self.peek_kind(0),
            Some(TokenKind::Minus) | Some(TokenKind::LNot)
        ) {
            let token = self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr {
                op: token.kind,
                expr: Box::new(operand),
                token,
            }));
        }
        self.parse_primary()
    }

    /// Literal, `ID`, or `ID '(' args ')'`.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek(0)?.clone();
        match token.kind {
            TokenKind::I8Lit => {
                self.advance()?;
                let v = token.value.as_bytes().first().copied().unwrap_or(0) as i8;
                Ok(literal(Value::I8(v), Type::i8(), token))
            }
            TokenKind::I16Lit => {
                self.advance()?;
                let v = parse_number::<i16>(&token, "i16")?;
                Ok(literal(Value::I16(v), Type::i16(), token))
            }
            TokenKind::I32Lit => {
                self.advance()?;
                let v = parse_number::<i32>(&token, "i32")?;
                Ok(literal(Value::I32(v), Type::i32(), token))
            }
            TokenKind::I64Lit => {
                self.advance()?;
                let v = parse_number::<i64>(&token, "i64")?;
                Ok(literal(Value::I64(v), Type::i64(), token))
            }
            TokenKind::F32Lit => {
                self.advance()?;
                let v = parse_number::<f32>(&token, "f32")?;
                Ok(literal(Value::F32(v), Type::f32(), token))
            }
            TokenKind::F64Lit => {
                self.advance()?;
                let v = parse_number::<f64>(&token, "f64")?;
                Ok(literal(Value::F64(v), Type::f64(), token))
            }
            TokenKind::U8Lit => {
                self.advance()?;
                let v = parse_number::<u8>(&token, "u8")?;
                Ok(literal(Value::U8(v), Type::u8(), token))
            }
            TokenKind::U16Lit => {
                self.advance()?;
                let v = parse_number::<u16>(&token, "u16")?;
                Ok(literal(Value::U16(v), Type::u16(), token))
            }
            TokenKind::U32Lit => {
                self.advance()?;
                let v = parse_number::<u32>(&token, "u32")?;
                Ok(literal(Value::U32(v), Type::u32(), token))
            }
            TokenKind::U64Lit => {
                self.advance()?;
                let v = parse_number::<u64>(&token, "u64")?;
                Ok(literal(Value::U64(v), Type::u64(), token))
            }
            TokenKind::BoolLit => {
                self.advance()?;
                let v = token.value == "true";
                Ok(literal(Value::Bool(v), Type::bool_type(), token))
            }
            TokenKind::StringLit => {
                self.advance()?;
                let v = token.value.clone();
                Ok(literal(Value::Str(v), Type::string(), token))
            }
            TokenKind::Id => {
                if self.peek_kind(1) == Some(TokenKind::LParen) {
                    self.advance()?;
                    let args = self.parse_call_args()?;
                    Ok(Expr::FuncCall(FuncCallExpr {
                        name: token.value.clone(),
                        args,
                        token,
                    }))
                } else {
                    self.advance()?;
                    Ok(Expr::Var(VarExpr {
                        name: token.value.clone(),
                        token,
                    }))
                }
            }
            _ => Err(ParseError::UnexpectedToken {
                value: token.value,
                span: token.span,
            }),
        }
    }

    /// `'(' (expr (',' expr)*)? ')'` — the parenthesized argument list of
    /// a call in either statement or expression position.
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.consume(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    /// A primitive type keyword with an optional `*` suffix.
    pub(crate) fn consume_type(&mut self, is_const: bool) -> Result<Type, ParseError> {
        let token = self.peek(0)?;
        let Some(kind) = TypeKind::from_token(token.kind) else {
            return Err(ParseError::Expected {
                what: "type".to_string(),
                span: token.span,
            });
        };
        let token = self.advance()?;
        let is_pointer = self.eat(TokenKind::Mult);
        Ok(Type::with_flags(kind, token.value, is_const, is_pointer))
    }
}

fn binary(op: TokenKind, left: Expr, right: Expr, token: Token) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        token,
    })
}

fn literal(value: Value, ty: Type, token: Token) -> Expr {
    Expr::Literal(Literal { value, ty, token })
}

fn parse_number<T: std::str::FromStr>(token: &Token, kind: &'static str) -> Result<T, ParseError> {
    token.value.parse().map_err(|_| ParseError::InvalidLiteral {
        kind,
        value: token.value.clone(),
        span: token.span,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::error::ParseError;
    use crate::tests::{parse_ok, parse_source};
    use crate::types::{TypeKind, Value};
    use blinkc_lex::TokenKind;

    fn expr_of(source: &str) -> Expr {
        let mut stmts = parse_ok(source);
        let Stmt::VarDecl(decl) = stmts.remove(0) else {
            panic!("expected var decl");
        };
        decl.init.expect("expected initializer")
    }

    fn as_binary(expr: &Expr) -> &BinaryExpr {
        let Expr::Binary(b) = expr else {
            panic!("expected binary expression");
        };
        b
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        // a + b * c  =>  +(a, *(b, c))
        let expr = expr_of("var x: i32 = a + b * c;");
        let add = as_binary(&expr);
        assert_eq!(add.op, TokenKind::Plus);
        assert!(matches!(&*add.left, Expr::Var(v) if v.name == "a"));
        let mul = as_binary(&add.right);
        assert_eq!(mul.op, TokenKind::Mult);
    }

    #[test]
    fn test_equality_binds_tighter_than_logical_and() {
        // a == b && c  =>  &&(==(a, b), c)
        let expr = expr_of("var x: bool = a == b && c;");
        let and = as_binary(&expr);
        assert_eq!(and.op, TokenKind::LAnd);
        let eq = as_binary(&and.left);
        assert_eq!(eq.op, TokenKind::EqEq);
        assert!(matches!(&*and.right, Expr::Var(v) if v.name == "c"));
    }

    #[test]
    fn test_logical_or_binds_tighter_than_logical_and() {
        // a && b || c  =>  &&(a, ||(b, c)) under this grammar
        let expr = expr_of("var x: bool = a && b || c;");
        let and = as_binary(&expr);
        assert_eq!(and.op, TokenKind::LAnd);
        let or = as_binary(&and.right);
        assert_eq!(or.op, TokenKind::LOr);
    }

    #[test]
    fn test_left_associativity() {
        // a - b - c  =>  -(-(a, b), c)
        let expr = expr_of("var x: i32 = a - b - c;");
        let outer = as_binary(&expr);
        assert!(matches!(&*outer.right, Expr::Var(v) if v.name == "c"));
        let inner = as_binary(&outer.left);
        assert!(matches!(&*inner.left, Expr::Var(v) if v.name == "a"));
    }

    #[test]
    fn test_comparison_level() {
        // a < b == c > d  =>  ==(<(a,b), >(c,d))
        let expr = expr_of("var x: bool = a < b == c > d;");
        let eq = as_binary(&expr);
        assert_eq!(eq.op, TokenKind::EqEq);
        assert_eq!(as_binary(&eq.left).op, TokenKind::Ls);
        assert_eq!(as_binary(&eq.right).op, TokenKind::Gt);
    }

    #[test]
    fn test_unary_prefix_chain() {
        let expr = expr_of("var x: i32 = --a;");
        let Expr::Unary(outer) = &expr else {
            panic!("expected unary");
        };
        assert_eq!(outer.op, TokenKind::Minus);
        assert!(matches!(&*outer.expr, Expr::Unary(_)));

        let expr = expr_of("var x: bool = !a;");
        let Expr::Unary(not) = &expr else {
            panic!("expected unary");
        };
        assert_eq!(not.op, TokenKind::LNot);
    }

    #[test]
    fn test_literal_primaries() {
        let Expr::Literal(int) = expr_of("var x: i32 = 42;") else {
            panic!("expected literal");
        };
        assert_eq!(int.value, Value::I32(42));
        assert_eq!(int.ty.kind, TypeKind::I32);

        let Expr::Literal(float) = expr_of("var x: f64 = 2.5;") else {
            panic!("expected literal");
        };
        assert_eq!(float.value, Value::F64(2.5));
        assert_eq!(float.ty.kind, TypeKind::F64);

        let Expr::Literal(ch) = expr_of("var x: i8 = 'A';") else {
            panic!("expected literal");
        };
        assert_eq!(ch.value, Value::I8(65));
        assert_eq!(ch.ty.kind, TypeKind::I8);

        let Expr::Literal(b) = expr_of("var x: bool = true;") else {
            panic!("expected literal");
        };
        assert_eq!(b.value, Value::Bool(true));

        let Expr::Literal(s) = expr_of("var x: i32 = \"hi\";") else {
            panic!("expected literal");
        };
        assert_eq!(s.value, Value::Str("hi".to_string()));
        assert_eq!(s.ty.kind, TypeKind::Str);
    }

    #[test]
    fn test_call_expression_args() {
        let Expr::FuncCall(call) = expr_of("var x: i32 = add(1, y, f());") else {
            panic!("expected call");
        };
        assert_eq!(call.name, "add");
        assert_eq!(call.args.len(), 3);
        assert!(matches!(call.args[2], Expr::FuncCall(_)));
    }

    #[test]
    fn test_parenthesized_grouping_is_not_a_primary() {
        let err = parse_source("var x: i32 = (1 + 2) * 3;").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { value, .. } if value == "("
        ));
    }

    #[test]
    fn test_int_literal_overflow() {
        let err = parse_source("var x: i32 = 99999999999;").unwrap_err();
        assert!(matches!(err, ParseError::InvalidLiteral { kind: "i32", .. }));
    }

    #[test]
    fn test_pointer_type_suffix() {
        let mut stmts = parse_ok("var p: i64* ;");
        let Stmt::VarDecl(decl) = stmts.remove(0) else {
            panic!("expected var decl");
        };
        assert!(decl.ty.is_pointer);
        assert_eq!(decl.ty.kind, TypeKind::I64);
    }

    #[test]
    fn test_expected_type_error() {
        let err = parse_source("var x: blob = 1;").unwrap_err();
        assert!(matches!(err, ParseError::Expected { what, .. } if what == "type"));
    }
}
