//! Lexical error types.

use blinkc_util::{Diagnostic, Span, Subsystem};
use thiserror::Error;

/// Fatal lexer failure. The first error aborts the whole compilation.
#[derive(Debug, Error)]
pub enum LexError {
    /// A numeric literal with more than one dot.
    #[error("Invalid number literal (twice dot)")]
    InvalidNumber { span: Span },

    /// A `\x` escape outside the supported set.
    #[error("Unsupported escape sequence '\\{ch}'")]
    UnsupportedEscape { ch: char, span: Span },

    /// A character no operator or punctuation rule accepts.
    #[error("Unsupported operator '{ch}'")]
    UnsupportedOperator { ch: char, span: Span },

    /// A `$` directive other than `include`.
    #[error("Unsupported preprocessor directive '{name}'")]
    UnsupportedDirective { name: String, span: Span },

    /// An `include` directive missing its `<name>` part.
    #[error("Malformed include directive, expected `$include <name>`")]
    MalformedInclude { span: Span },

    /// The resolved include path could not be opened.
    #[error("Include file '{path}' does not exist")]
    IncludeNotFound { path: String, span: Span },

    /// A string literal left open at end of input or line.
    #[error("Unterminated string literal")]
    UnterminatedString { span: Span },

    /// A char literal missing its closing quote.
    #[error("Unterminated char literal")]
    UnterminatedChar { span: Span },

    /// Scanning ran past the end of the input.
    #[error("Unexpected end of input")]
    UnexpectedEof { span: Span },
}

impl LexError {
    /// Source position the error is anchored at.
    pub fn span(&self) -> Span {
        match self {
            LexError::InvalidNumber { span }
            | LexError::UnsupportedEscape { span, .. }
            | LexError::UnsupportedOperator { span, .. }
            | LexError::UnsupportedDirective { span, .. }
            | LexError::MalformedInclude { span }
            | LexError::IncludeNotFound { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedChar { span }
            | LexError::UnexpectedEof { span } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(Subsystem::Lexer, self.to_string(), self.span())
    }
}
