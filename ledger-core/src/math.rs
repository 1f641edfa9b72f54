//! Checked conversion arithmetic
//!
//! All value conversions are `value * numerator / denominator` with the
//! division truncating toward zero. Rounding down on every step means a
//! conversion can leak a bounded sliver of value to the reserve but can
//! never create value.

use crate::{Error, Result};

/// Compute `value * numerator / denominator`, rounding down
///
/// Fails with [`Error::Arithmetic`] on multiplication overflow or a zero
/// denominator.
pub fn mul_div_floor(value: u128, numerator: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return Err(Error::Arithmetic("division by zero".to_string()));
    }
    let product = value.checked_mul(numerator).ok_or_else(|| {
        Error::Arithmetic(format!("{} * {} overflows u128", value, numerator))
    })?;
    Ok(product / denominator)
}
