//! AST node definitions.
//!
//! Two sum types, one per category: [`Stmt`] and [`Expr`]. Every variant
//! carries its anchor [`Token`] so later stages can report positions
//! without re-touching the source. Blocks own their statements and
//! statements own their sub-expressions; there is no sharing.

use blinkc_lex::{Token, TokenKind};

use crate::types::{Type, Value};

/// Statement node.
#[derive(Clone, Debug)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FuncDecl(FuncDeclStmt),
    FuncCall(FuncCallStmt),
    VarAsgn(VarAsgnStmt),
    If(IfStmt),
    ForCycle(ForCycleStmt),
    WhileCycle(WhileCycleStmt),
    DoWhileCycle(DoWhileCycleStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Return(ReturnStmt),
}

impl Stmt {
    /// Anchor token for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Stmt::VarDecl(s) => &s.token,
            Stmt::FuncDecl(s) => &s.token,
            Stmt::FuncCall(s) => &s.token,
            Stmt::VarAsgn(s) => &s.token,
            Stmt::If(s) => &s.token,
            Stmt::ForCycle(s) => &s.token,
            Stmt::WhileCycle(s) => &s.token,
            Stmt::DoWhileCycle(s) => &s.token,
            Stmt::Break(s) => &s.token,
            Stmt::Continue(s) => &s.token,
            Stmt::Return(s) => &s.token,
        }
    }
}

/// `var`/`const` declaration, or the keyword-less form in a `for` header.
#[derive(Clone, Debug)]
pub struct VarDeclStmt {
    pub ty: Type,
    pub name: String,
    pub init: Option<Expr>,
    pub token: Token,
}

/// Function declaration with its body.
#[derive(Clone, Debug)]
pub struct FuncDeclStmt {
    pub return_type: Type,
    pub name: String,
    pub args: Vec<Argument>,
    pub body: Vec<Stmt>,
    pub token: Token,
}

/// Formal parameter: type, name, and an optional default expression.
#[derive(Clone, Debug)]
pub struct Argument {
    pub ty: Type,
    pub name: String,
    pub default: Option<Expr>,
}

/// Call in statement position.
#[derive(Clone, Debug)]
pub struct FuncCallStmt {
    pub name: String,
    pub args: Vec<Expr>,
    pub token: Token,
}

/// Assignment. Compound forms are desugared at parse time, so the RHS of
/// `x += e` is already `x + e` here.
#[derive(Clone, Debug)]
pub struct VarAsgnStmt {
    pub name: String,
    pub expr: Expr,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Vec<Stmt>,
    pub else_block: Vec<Stmt>,
    pub token: Token,
}

/// `for (init cond; step) body`.
#[derive(Clone, Debug)]
pub struct ForCycleStmt {
    pub init: Box<Stmt>,
    pub cond: Expr,
    pub step: Box<Stmt>,
    pub body: Vec<Stmt>,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct WhileCycleStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct DoWhileCycleStmt {
    pub cond: Expr,
    pub body: Vec<Stmt>,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct BreakStmt {
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct ContinueStmt {
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct ReturnStmt {
    pub expr: Option<Expr>,
    pub token: Token,
}

/// Expression node.
#[derive(Clone, Debug)]
pub enum Expr {
    Literal(Literal),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Var(VarExpr),
    FuncCall(FuncCallExpr),
}

impl Expr {
    /// Anchor token for diagnostics.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Literal(e) => &e.token,
            Expr::Binary(e) => &e.token,
            Expr::Unary(e) => &e.token,
            Expr::Var(e) => &e.token,
            Expr::FuncCall(e) => &e.token,
        }
    }
}

/// A typed literal; the type tag always matches the value payload.
#[derive(Clone, Debug)]
pub struct Literal {
    pub value: Value,
    pub ty: Type,
    pub token: Token,
}

/// Binary operation; `op` is the operator's token tag.
#[derive(Clone, Debug)]
pub struct BinaryExpr {
    pub op: TokenKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub token: Token,
}

/// Prefix operation (`-` or `!`).
#[derive(Clone, Debug)]
pub struct UnaryExpr {
    pub op: TokenKind,
    pub expr: Box<Expr>,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct VarExpr {
    pub name: String,
    pub token: Token,
}

#[derive(Clone, Debug)]
pub struct FuncCallExpr {
    pub name: String,
    pub args: Vec<Expr>,
    pub token: Token,
}
