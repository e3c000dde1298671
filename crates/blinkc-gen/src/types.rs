//! Source type → LLVM type lowering.

use inkwell::context::Context;
use inkwell::types::{BasicType, BasicTypeEnum};
use inkwell::AddressSpace;

use blinkc_par::types::{Type, TypeKind};
use blinkc_util::Span;

use crate::error::CodegenError;

/// Maps source types onto LLVM types.
///
/// The integer widths lower to their same-width LLVM integers with no
/// signedness distinction (LLVM integers are signless), `bool` to `i1`,
/// the floats to `float`/`double`, and a pointer flag wraps the lowered
/// type. `nothing` only exists as a return type; lowering it as a value
/// type is an error, as is any tag past the numeric/bool range.
pub struct TypeLowering<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> TypeLowering<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    /// Lowers a value type. Fails on `nothing`, `string`, and the
    /// reserved nominal tags.
    pub fn lower_basic(&self, ty: &Type, span: Span) -> Result<BasicTypeEnum<'ctx>, CodegenError> {
        let base: BasicTypeEnum<'ctx> = match ty.kind {
            TypeKind::I8 | TypeKind::U8 => self.context.i8_type().into(),
            TypeKind::I16 | TypeKind::U16 => self.context.i16_type().into(),
            TypeKind::I32 | TypeKind::U32 => self.context.i32_type().into(),
            TypeKind::I64 | TypeKind::U64 => self.context.i64_type().into(),
            TypeKind::F32 => self.context.f32_type().into(),
            TypeKind::F64 => self.context.f64_type().into(),
            TypeKind::Bool => self.context.bool_type().into(),
            TypeKind::Str | TypeKind::Nothing | TypeKind::Class | TypeKind::Enum => {
                return Err(CodegenError::UnsupportedType { span })
            }
        };
        if ty.is_pointer {
            Ok(base.ptr_type(AddressSpace::default()).into())
        } else {
            Ok(base)
        }
    }

    /// Lowers a return type; `None` stands for `void`.
    pub fn lower_return(
        &self,
        ty: &Type,
        span: Span,
    ) -> Result<Option<BasicTypeEnum<'ctx>>, CodegenError> {
        if ty.kind == TypeKind::Nothing {
            Ok(None)
        } else {
            self.lower_basic(ty, span).map(Some)
        }
    }
}
