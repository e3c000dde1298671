//! blinkc-gen - LLVM IR generation for the Blink compiler.
//!
//! Consumes the validated statement list and produces an in-memory LLVM
//! module via `inkwell`: an external `printf` declaration, one global per
//! module-scope variable, and one function per declaration. The module is
//! handed off to the caller, who serializes or lowers it further.

pub mod error;
pub mod llvm;
pub mod types;


pub use error::CodegenError;
pub use llvm::{CodeGenerator, VarBinding};
pub use types::TypeLowering;
