use crate::GtError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, GtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(GtError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, GtError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(GtError::InvalidArg { what })
    }
}

/// Straight-line interpolation through `(x_low, y_low)` and `(x_hi, y_hi)`.
///
/// Extrapolates when `x` lies outside the pair. Returns `y_low` exactly when
/// `x == x_low`.
#[inline]
pub fn interpolate(x: Real, x_hi: Real, x_low: Real, y_hi: Real, y_low: Real) -> Real {
    (x - x_low) / (x_hi - x_low) * (y_hi - y_low) + y_low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "zero").is_err());
        assert!(ensure_positive(-1.0, "negative").is_err());
        assert_eq!(ensure_positive(2.5, "ok").unwrap(), 2.5);
    }

    #[test]
    fn interpolate_hits_endpoints_and_midpoint() {
        assert_eq!(interpolate(0.0, 1.0, 0.0, 20.0, 10.0), 10.0);
        assert_eq!(interpolate(0.5, 1.0, 0.0, 20.0, 10.0), 15.0);
        assert!((interpolate(1.0, 1.0, 0.0, 20.0, 10.0) - 20.0).abs() < 1e-12);
        // outside the pair the line is extended
        assert!((interpolate(2.0, 1.0, 0.0, 20.0, 10.0) - 30.0).abs() < 1e-12);
    }
}
