//! Implicit-cast checking (spec §4.4 `canFit`, §7 `TypeMismatch`).
//!
//! Non-integral casts (class upcasts, alias resolution, etc.) are not
//! VRP's concern and are out of scope for this glue layer — it only
//! answers the question VRP exists to answer: "does this integer
//! expression's statically known range fit in the narrower target type
//! without truncation?"

use sdc_core::Span;

use crate::error::{Result, SemaError};
use crate::ty::Type;
use crate::vrp::{mask_for_type, ValueRange};

/// Whether `range` (the VRP-computed range of some expression) fits
/// inside `target` without truncation.
pub fn can_fit(range: &ValueRange, target: &Type) -> bool {
    if !target.is_integral() && !target.is_bool() {
        return false;
    }
    range.can_fit(mask_for_type(target))
}

/// Check an implicit narrowing cast, raising `TypeMismatch` when VRP
/// cannot prove it safe.
pub fn check_implicit_cast(range: &ValueRange, target: &Type, span: Span) -> Result<()> {
    if can_fit(range, target) {
        Ok(())
    } else {
        Err(SemaError::TypeMismatch { span })
    }
}
