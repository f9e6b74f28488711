//! Base conversion for the `bin` keypad action.
//!
//! This path bypasses the evaluator entirely and operates on integers only;
//! fractional input is a gated error, never silently truncated.

use crate::error::CalcError;

/// The record of a base conversion: the operation as text plus its result,
/// e.g. `dec_to_bin(12)` → `1100`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseConversion {
    pub record: String,
    pub result: String,
}

/// Convert a decimal value to its binary representation.
pub fn dec_to_bin(value: f64) -> Result<BaseConversion, CalcError> {
    if !value.is_finite() {
        return Err(CalcError::Conversion("value is not a finite number".into()));
    }
    if value.fract() != 0.0 {
        return Err(CalcError::Conversion(format!(
            "{value} is not an integer"
        )));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range, so
    // the upper bound must be exclusive. -2^63 is exact and valid.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(CalcError::Conversion(format!("{value} is out of range")));
    }

    let n = value as i64;
    let result = if n < 0 {
        format!("-{:b}", n.unsigned_abs())
    } else {
        format!("{n:b}")
    };

    Ok(BaseConversion {
        record: format!("dec_to_bin({n})"),
        result,
    })
}
