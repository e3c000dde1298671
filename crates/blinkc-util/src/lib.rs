//! blinkc-util - Foundation types shared by every compiler stage.
//!
//! This crate holds the pieces the four pipeline stages have in common:
//! source positions ([`Span`], [`FileId`]), the registry of loaded files
//! ([`SourceMap`]), the lexical scope stack ([`ScopeStack`]) used by the
//! semantic analyzer and the code generator, and the terminal diagnostic
//! rendering ([`Diagnostic`]).

pub mod diagnostic;
pub mod scope;
pub mod source_map;
pub mod span;

pub use diagnostic::{Diagnostic, Subsystem};
pub use scope::ScopeStack;
pub use source_map::{SourceFile, SourceMap};
pub use span::{FileId, Span};
