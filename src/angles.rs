//! Degree/radian conversions and angle wrapping shared by every transform.

use crate::constants::{Degree, Radian, RADEG};
use crate::skyplan_errors::SkyplanError;

/// Degrees → radians
#[inline]
pub fn to_radians(angle: Degree) -> Radian {
    angle * RADEG
}

/// Radians → degrees
#[inline]
pub fn to_degrees(angle: Radian) -> Degree {
    angle / RADEG
}

/// Reduce an angle in degrees to the half-open interval [0, 360).
///
/// `rem_euclid` can return exactly `360.0` when the input is a tiny negative number
/// (the true result rounds up to the modulus), so that case is folded back to zero.
#[inline]
pub fn wrap_360(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Reduce an angle in degrees to the half-open interval [-180, 180).
#[inline]
pub fn wrap_180(angle: Degree) -> Degree {
    wrap_360(angle + 180.0) - 180.0
}

/// Signed shortest angular separation `a - b`, in degrees, within [-180, 180).
#[inline]
pub fn angular_difference(a: Degree, b: Degree) -> Degree {
    wrap_180(a - b)
}

/// Clamp a sine/cosine argument to [-1, 1] before an inverse trig call.
///
/// Spherical-triangle products can land one ulp outside the domain, which would turn
/// `asin`/`acos` into NaN.
#[inline]
pub(crate) fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

/// Check that a latitude-like angle (Galactic latitude, Declination, observer latitude,
/// altitude) is finite and lies in [-90, 90].
///
/// Arguments
/// ---------
/// * `name`: label used in the error message
/// * `value`: angle in degrees
///
/// Return
/// ------
/// * the unchanged angle, or [`SkyplanError::DomainError`]
pub fn check_latitude(name: &str, value: Degree) -> Result<Degree, SkyplanError> {
    if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
        return Err(SkyplanError::DomainError(format!(
            "{name} must be within [-90, 90] degrees, got {value}"
        )));
    }
    Ok(value)
}

/// Check that a longitude-like angle is finite and reduce it to [0, 360).
pub fn check_longitude(name: &str, value: Degree) -> Result<Degree, SkyplanError> {
    if !value.is_finite() {
        return Err(SkyplanError::DomainError(format!(
            "{name} must be a finite number of degrees, got {value}"
        )));
    }
    Ok(wrap_360(value))
}
