//! Semantic error types.

use blinkc_util::{Diagnostic, Span, Subsystem};
use thiserror::Error;

/// Fatal semantic failure.
#[derive(Debug, Error)]
pub enum SemanticError {
    /// A name already bound in the innermost scope.
    #[error("Variable '{name}' already exist")]
    DuplicateVariable { name: String, span: Span },

    /// A function name already registered; `signature` renders the
    /// existing declaration.
    #[error("Function '{signature}' already exist")]
    DuplicateFunction { signature: String, span: Span },

    /// A name that resolves in no visible scope.
    #[error("Variable '{name}' does not exist")]
    UnresolvedVariable { name: String, span: Span },

    /// A call target with no registered declaration; `args` renders the
    /// inferred argument types.
    #[error("Function '{name}({args})' does not exist")]
    UnresolvedFunction {
        name: String,
        args: String,
        span: Span,
    },

    /// Two types the promotion relation cannot unify.
    #[error("There is no common type between {left} and {right}")]
    NoCommonType {
        left: String,
        right: String,
        span: Span,
    },

    /// A call whose argument count differs from the declaration.
    #[error("Function '{name}' expects {expected} argument(s) but got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("`break` statement must be must be inside the loop")]
    BreakOutsideLoop { span: Span },

    #[error("`continue` statement must be must be inside the loop")]
    ContinueOutsideLoop { span: Span },

    #[error("`return` statement must be inside the function")]
    ReturnOutsideFunction { span: Span },
}

impl SemanticError {
    /// Source position the error is anchored at.
    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateVariable { span, .. }
            | SemanticError::DuplicateFunction { span, .. }
            | SemanticError::UnresolvedVariable { span, .. }
            | SemanticError::UnresolvedFunction { span, .. }
            | SemanticError::NoCommonType { span, .. }
            | SemanticError::ArityMismatch { span, .. }
            | SemanticError::BreakOutsideLoop { span }
            | SemanticError::ContinueOutsideLoop { span }
            | SemanticError::ReturnOutsideFunction { span } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(Subsystem::Semantic, self.to_string(), self.span())
    }
}
