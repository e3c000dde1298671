//! Parse error types.

use blinkc_util::{Diagnostic, Span, Subsystem};
use thiserror::Error;

/// Fatal parser failure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token no statement rule accepts in leading position.
    #[error("Unsupported token '{value}'")]
    UnsupportedToken { value: String, span: Span },

    /// A token no primary-expression rule accepts.
    #[error("Unexpected token '{value}'")]
    UnexpectedToken { value: String, span: Span },

    /// A specific construct was required and something else was found.
    #[error("Expected {what}")]
    Expected { what: String, span: Span },

    /// An assignment operator outside `=`, `+=`, `-=`, `*=`, `/=`, `%=`.
    #[error("Unsupported assignment operator '{value}'")]
    UnsupportedAssignOp { value: String, span: Span },

    /// A literal lexeme that does not fit its type.
    #[error("Invalid {kind} literal '{value}'")]
    InvalidLiteral {
        kind: &'static str,
        value: String,
        span: Span,
    },

    /// Token lookahead past the end of the stream.
    #[error("Index out of range: ({index}/{len})")]
    OutOfRange {
        index: usize,
        len: usize,
        span: Span,
    },
}

impl ParseError {
    /// Source position the error is anchored at.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnsupportedToken { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::Expected { span, .. }
            | ParseError::UnsupportedAssignOp { span, .. }
            | ParseError::InvalidLiteral { span, .. }
            | ParseError::OutOfRange { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(Subsystem::Parser, self.to_string(), self.span())
    }
}
