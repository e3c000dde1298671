//! Token model.
//!
//! The token tag set is closed: primitive type keywords, declaration and
//! control keywords, punctuation, operators, the literal kinds, and plain
//! identifiers. Tokens are cheap values carrying their lexeme and the span
//! they were scanned at; string and char lexemes are stored with escapes
//! already resolved.

use blinkc_util::Span;

/// Token tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Primitive type keywords
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    Nothing,

    // Declaration and control keywords
    Var,
    Const,
    Func,
    Class,
    Enum,
    Sizeof,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Question,

    // Operators
    Plus,
    Minus,
    Mult,
    Div,
    Modulo,
    PlusEq,
    MinusEq,
    MultEq,
    DivEq,
    ModuloEq,
    Eq,
    EqEq,
    LNot,
    BNot,
    NotEq,
    Gt,
    GtEq,
    Ls,
    LsEq,
    LAnd,
    BAnd,
    LOr,
    BOr,
    BXor,
    RShift,
    LShift,

    // Literals
    I8Lit,
    I16Lit,
    I32Lit,
    I64Lit,
    F32Lit,
    F64Lit,
    U8Lit,
    U16Lit,
    U32Lit,
    U64Lit,
    BoolLit,
    StringLit,

    Id,
}

impl TokenKind {
    /// Keyword lookup for a scanned word. `true`/`false` are reserved
    /// identifiers lexed as boolean literals.
    pub fn from_keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "i8" => TokenKind::I8,
            "i16" => TokenKind::I16,
            "i32" => TokenKind::I32,
            "i64" => TokenKind::I64,
            "f32" => TokenKind::F32,
            "f64" => TokenKind::F64,
            "u8" => TokenKind::U8,
            "u16" => TokenKind::U16,
            "u32" => TokenKind::U32,
            "u64" => TokenKind::U64,
            "bool" => TokenKind::Bool,
            "nothing" => TokenKind::Nothing,
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "func" => TokenKind::Func,
            "class" => TokenKind::Class,
            "enum" => TokenKind::Enum,
            "sizeof" => TokenKind::Sizeof,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            "return" => TokenKind::Return,
            "true" | "false" => TokenKind::BoolLit,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this tag is a primitive type keyword.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::I8
                | TokenKind::I16
                | TokenKind::I32
                | TokenKind::I64
                | TokenKind::F32
                | TokenKind::F64
                | TokenKind::U8
                | TokenKind::U16
                | TokenKind::U32
                | TokenKind::U64
                | TokenKind::Bool
                | TokenKind::Nothing
        )
    }

    /// Whether this tag is one of the literal kinds.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::I8Lit
                | TokenKind::I16Lit
                | TokenKind::I32Lit
                | TokenKind::I64Lit
                | TokenKind::F32Lit
                | TokenKind::F64Lit
                | TokenKind::U8Lit
                | TokenKind::U16Lit
                | TokenKind::U32Lit
                | TokenKind::U64Lit
                | TokenKind::BoolLit
                | TokenKind::StringLit
        )
    }
}

/// One lexical unit: tag, lexeme, and source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }
}
