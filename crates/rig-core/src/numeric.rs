//! Float guards applied at every user-facing setter.

use crate::RigError;

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, RigError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RigError::NonFinite { what, value: v })
    }
}

/// Finite and not negative. Pressures, resistances and rates all obey this.
pub fn ensure_non_negative(v: f64, what: &'static str) -> Result<f64, RigError> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(RigError::InvalidArg { what });
    }
    Ok(v)
}
