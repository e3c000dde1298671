//! The common-type relation.
//!
//! Types are ordered by tag: the signed/float ladder `I8..F64`, the
//! unsigned ladder `U8..U64`, then `BOOL`, `STRING`, and the reserved
//! nominal tags. Unification picks the higher rung within a ladder and
//! aligns an unsigned width against its same-width signed/float sibling by
//! offsetting the unsigned tag by 6. Anything at `STRING` or above never
//! unifies with a different type.
//!
//! The relation is used for expression type inference, declared-versus-
//! initializer checks, formal-versus-actual argument checks, and return
//! type checks.

use blinkc_par::types::Type;
use blinkc_util::Span;

use crate::error::SemanticError;

const F64_TAG: i32 = 5;
const STRING_TAG: i32 = 11;

/// Computes the common type of `left` and `right`, or fails with the
/// no-common-type diagnostic anchored at `span`.
pub fn common_type(left: &Type, right: &Type, span: Span) -> Result<Type, SemanticError> {
    if left == right {
        return Ok(left.clone());
    }

    let l = left.kind.tag() as i32;
    let r = right.kind.tag() as i32;
    let no_common = || SemanticError::NoCommonType {
        left: left.to_string(),
        right: right.to_string(),
        span,
    };

    if l <= F64_TAG {
        if r <= F64_TAG {
            Ok(if l > r { left.clone() } else { right.clone() })
        } else if r >= STRING_TAG {
            Err(no_common())
        } else {
            Ok(if l > r - 6 { left.clone() } else { right.clone() })
        }
    } else if l >= STRING_TAG || r >= STRING_TAG {
        Err(no_common())
    } else if r <= F64_TAG {
        Ok(if l - 6 >= r { left.clone() } else { right.clone() })
    } else {
        Ok(if l > r { left.clone() } else { right.clone() })
    }
}
