//! Code generation error types.
//!
//! Most of these are defensive: the semantic analyzer is responsible for
//! rejecting programs before they reach this stage, so resolution errors
//! here indicate a walker bug rather than a user mistake. They still
//! render as ordinary diagnostics instead of panicking.

use blinkc_util::{Diagnostic, Span, Subsystem};
use thiserror::Error;

/// Fatal code generation failure.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A variable with no storage handle in any visible frame.
    #[error("Variable '{name}' does not exist")]
    UnresolvedVariable { name: String, span: Span },

    /// A call target with no function handle.
    #[error("Function '{name}' does not exist")]
    UnresolvedFunction { name: String, span: Span },

    /// A source type with no LLVM lowering.
    #[error("Unsupported type")]
    UnsupportedType { span: Span },

    /// A literal whose type tag and payload disagree.
    #[error("Unsupported literal")]
    UnsupportedLiteral { span: Span },

    /// Operand types the codegen-level promotion cannot reconcile.
    #[error("There is no common type between {left} and {right}")]
    NoCommonType {
        left: String,
        right: String,
        span: Span,
    },

    /// An implicit cast outside the supported conversions.
    #[error("Unknown type to implicitly cast ({from} to {to})")]
    InvalidCast {
        from: String,
        to: String,
        span: Span,
    },

    /// A module-scope initializer that is not compile-time foldable.
    #[error("Global variable '{name}' initializer must be a constant expression")]
    NonConstantGlobalInit { name: String, span: Span },

    /// A void-returning call used where a value is required.
    #[error("Function '{name}' does not return a value")]
    VoidCall { name: String, span: Span },

    /// An `inkwell` builder failure while emitting an instruction.
    #[error("LLVM builder error: {message}")]
    Builder { message: String, span: Span },

    /// Invariant violation inside the generator itself.
    #[error("Internal error: {message}")]
    Internal { message: String, span: Span },
}

impl CodegenError {
    /// Source position the error is anchored at.
    pub fn span(&self) -> Span {
        match self {
            CodegenError::UnresolvedVariable { span, .. }
            | CodegenError::UnresolvedFunction { span, .. }
            | CodegenError::UnsupportedType { span }
            | CodegenError::UnsupportedLiteral { span }
            | CodegenError::NoCommonType { span, .. }
            | CodegenError::InvalidCast { span, .. }
            | CodegenError::NonConstantGlobalInit { span, .. }
            | CodegenError::VoidCall { span, .. }
            | CodegenError::Builder { span, .. }
            | CodegenError::Internal { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(Subsystem::Codegen, self.to_string(), self.span())
    }
}
