//! # Galactic → Equatorial → Horizontal transforms
//!
//! Closed-form spherical-trigonometry transforms between the three sky frames used by the
//! scheduler, plus the immutable value types that carry a direction and an observing site.
//!
//! ## Frames & conventions
//!
//! - **Galactic** `(l, b)`: longitude in [0, 360), latitude in [-90, 90].
//! - **Equatorial** `(α, δ)`: Right Ascension in [0, 360), Declination in [-90, 90], both in
//!   degrees, referred to the pole constants in [`crate::constants`].
//! - **Horizontal** `(A, h)`: azimuth in [0, 360) measured from **North** through East,
//!   altitude in [-90, 90]. No refraction, parallax or precession is applied.
//!
//! ## Singularities
//!
//! Both forward transforms divide by `cos δ` (or use `tan δ`), which vanishes at the celestial
//! poles. Any declination whose cosine is below
//! [`POLE_COS_TOLERANCE`](crate::constants::POLE_COS_TOLERANCE) is reported as
//! [`SkyplanError::SingularityError`] instead of leaking infinities or NaNs into the tables.
use hifitime::Epoch;
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::angles::{check_latitude, check_longitude, clamp_unit};
use crate::angles::{to_degrees, to_radians, wrap_360};
use crate::constants::{Degree, Radian, NGP_DEC, NGP_L, NGP_RA, POLE_COS_TOLERANCE};
use crate::skyplan_errors::SkyplanError;
use crate::time::local_sidereal_time;

/// Sky reference frame of a [`SkyDirection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Galactic,
    Equatorial,
    Horizontal,
}

impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frame::Galactic => write!(f, "galactic"),
            Frame::Equatorial => write!(f, "equatorial"),
            Frame::Horizontal => write!(f, "horizontal"),
        }
    }
}

/// A direction on the sky, as a (longitude, latitude) pair in degrees in a named frame.
///
/// The longitude is Galactic longitude, Right Ascension or azimuth depending on the frame;
/// the latitude is Galactic latitude, Declination or altitude. Values are validated and the
/// longitude normalized to [0, 360) on construction. Every conversion returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyDirection {
    frame: Frame,
    longitude: Degree,
    latitude: Degree,
}

impl SkyDirection {
    pub fn new(frame: Frame, longitude: Degree, latitude: Degree) -> Result<Self, SkyplanError> {
        Ok(SkyDirection {
            frame,
            longitude: check_longitude(&format!("{frame} longitude"), longitude)?,
            latitude: check_latitude(&format!("{frame} latitude"), latitude)?,
        })
    }

    /// Galactic direction `(l, b)`.
    pub fn galactic(l: Degree, b: Degree) -> Result<Self, SkyplanError> {
        Self::new(Frame::Galactic, l, b)
    }

    /// Equatorial direction `(ra, dec)`.
    pub fn equatorial(ra: Degree, dec: Degree) -> Result<Self, SkyplanError> {
        Self::new(Frame::Equatorial, ra, dec)
    }

    /// Horizontal direction `(azimuth, altitude)`.
    pub fn horizontal(azimuth: Degree, altitude: Degree) -> Result<Self, SkyplanError> {
        Self::new(Frame::Horizontal, azimuth, altitude)
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    /// Express this direction in the equatorial frame.
    ///
    /// Horizontal directions cannot be converted back without an observer and an epoch and
    /// yield a [`SkyplanError::DomainError`].
    pub fn to_equatorial(&self) -> Result<SkyDirection, SkyplanError> {
        match self.frame {
            Frame::Equatorial => Ok(*self),
            Frame::Galactic => {
                let (ra, dec) = galactic_to_equatorial(self.longitude, self.latitude)?;
                SkyDirection::equatorial(ra, dec)
            }
            Frame::Horizontal => Err(SkyplanError::DomainError(
                "a horizontal direction has no equatorial counterpart without a site and epoch"
                    .into(),
            )),
        }
    }

    /// Express this direction in the galactic frame.
    pub fn to_galactic(&self) -> Result<SkyDirection, SkyplanError> {
        match self.frame {
            Frame::Galactic => Ok(*self),
            Frame::Equatorial => {
                let (l, b) = equatorial_to_galactic(self.longitude, self.latitude)?;
                SkyDirection::galactic(l, b)
            }
            Frame::Horizontal => Err(SkyplanError::DomainError(
                "a horizontal direction has no galactic counterpart without a site and epoch"
                    .into(),
            )),
        }
    }

    /// Altitude/azimuth of this direction seen from `observer` at the UTC `epoch`.
    pub fn to_horizontal(
        &self,
        observer: &ObserverLocation,
        epoch: &Epoch,
    ) -> Result<SkyDirection, SkyplanError> {
        if self.frame == Frame::Horizontal {
            return Ok(*self);
        }
        let eq = self.to_equatorial()?;
        let (alt, az) = equatorial_to_horizontal(
            eq.longitude,
            eq.latitude,
            observer.latitude,
            observer.east_longitude,
            epoch,
        )?;
        SkyDirection::horizontal(az, alt)
    }
}

/// Geodetic position of a ground observer.
///
/// Longitude is **east positive**, stored in [0, 360) to match the sidereal time convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverLocation {
    latitude: Degree,
    east_longitude: Degree,
}

impl ObserverLocation {
    pub fn new(latitude: Degree, east_longitude: Degree) -> Result<Self, SkyplanError> {
        Ok(ObserverLocation {
            latitude: check_latitude("observer latitude", latitude)?,
            east_longitude: check_longitude("observer east longitude", east_longitude)?,
        })
    }

    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    pub fn east_longitude(&self) -> Degree {
        self.east_longitude
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Z,
}

/// Active right-handed rotation of a vector by `alpha` radians around a principal axis.
fn axis_rotation(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation matrix taking equatorial unit vectors to galactic unit vectors.
///
/// Built as three frame rotations: about Z onto the ascending node of the galactic plane
/// (`α_NGP + 90°`), about the node line to tilt the pole (`90° − δ_NGP`), then about the
/// galactic pole so that longitudes are counted from the galactic centre (`90° − l_NCP`).
/// Frame rotations are the inverse of [`axis_rotation`], hence the negated angles.
pub fn galactic_rotation() -> Matrix3<f64> {
    axis_rotation(-to_radians(90.0 - NGP_L), Axis::Z)
        * axis_rotation(-to_radians(90.0 - NGP_DEC), Axis::X)
        * axis_rotation(-to_radians(NGP_RA + 90.0), Axis::Z)
}

/// Unit vector of a spherical direction given in degrees.
fn unit_vector(longitude: Degree, latitude: Degree) -> Vector3<f64> {
    let (lon, lat) = (to_radians(longitude), to_radians(latitude));
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Convert Galactic coordinates to Equatorial coordinates.
///
/// Declination follows from the spherical triangle (pole, galactic pole, target):
///
/// ```text
/// sin δ = cos(l − l_NCP)·cos b·cos δ_NGP + sin b·sin δ_NGP
/// ```
///
/// Right Ascension is recovered from the sine/cosine pair of `α − α_NGP`:
///
/// ```text
/// cos δ · sin(α − α_NGP) = sin(l_NCP − l)·cos b
/// cos δ · cos(α − α_NGP) = (sin δ·cos δ_NGP − cos(l_NCP − l)·cos b) / sin δ_NGP
/// ```
///
/// The principal angle `ra_s ∈ [-90°, 90°]` only sees the sine, so the sign of the cosine
/// picks the half-plane: when `ra_cos < 0` the true angle is `180° − ra_s`.
///
/// Arguments
/// ---------
/// * `l`: Galactic longitude in degrees
/// * `b`: Galactic latitude in degrees, within [-90, 90]
///
/// Return
/// ------
/// * `(ra, dec)` in degrees, `ra` in [0, 360)
///
/// Errors
/// ------
/// * [`SkyplanError::DomainError`] for a non-finite longitude or an out-of-range latitude
/// * [`SkyplanError::SingularityError`] when the target maps onto a celestial pole
pub fn galactic_to_equatorial(l: Degree, b: Degree) -> Result<(Degree, Degree), SkyplanError> {
    let l = to_radians(check_longitude("galactic longitude", l)?);
    let b = to_radians(check_latitude("galactic latitude", b)?);

    let l_ngp = to_radians(NGP_L);
    let dec_ngp = to_radians(NGP_DEC);

    let dec_sin = (l - l_ngp).cos() * b.cos() * dec_ngp.cos() + b.sin() * dec_ngp.sin();
    let dec = clamp_unit(dec_sin).asin();
    let cos_dec = dec.cos();
    if cos_dec < POLE_COS_TOLERANCE {
        return Err(SkyplanError::SingularityError(format!(
            "galactic ({}, {}) lies on the celestial pole, right ascension is undefined",
            to_degrees(l),
            to_degrees(b)
        )));
    }

    let ra_sin = (l_ngp - l).sin() * b.cos() / cos_dec;
    let ra_cos =
        (dec_sin * dec_ngp.cos() - (l_ngp - l).cos() * b.cos()) / (cos_dec * dec_ngp.sin());

    // arcsin(ra_sin), evaluated through atan2 to keep precision near ±90°
    let ra_s = to_degrees(ra_sin.atan2(ra_cos.abs()));
    let offset = if ra_cos < 0.0 { 180.0 - ra_s } else { ra_s };

    Ok((wrap_360(offset + NGP_RA), to_degrees(dec)))
}

/// Convert Equatorial coordinates to Galactic coordinates.
///
/// Inverse of [`galactic_to_equatorial`], evaluated as a rotation of the unit vector with
/// [`galactic_rotation`]. At the galactic poles the longitude is degenerate and the value
/// returned by `atan2` is kept.
pub fn equatorial_to_galactic(ra: Degree, dec: Degree) -> Result<(Degree, Degree), SkyplanError> {
    let ra = check_longitude("right ascension", ra)?;
    let dec = check_latitude("declination", dec)?;

    let g = galactic_rotation() * unit_vector(ra, dec);
    let b = g.z.atan2(g.x.hypot(g.y));
    let l = g.y.atan2(g.x);

    Ok((wrap_360(to_degrees(l)), to_degrees(b)))
}

/// Hour angle `H = (LST − α) mod 360`, positive toward the West.
#[inline]
pub fn hour_angle(lst: Degree, ra: Degree) -> Degree {
    wrap_360(lst - ra)
}

/// Altitude and azimuth from an hour angle, a declination and a site latitude.
///
/// ```text
/// sin h = sin δ·sin φ + cos δ·cos φ·cos H
/// A_S   = atan2(sin H, cos H·sin φ − tan δ·cos φ)     (from South, toward West)
/// A     = (A_S + 180°) mod 360                       (from North)
/// ```
pub fn horizontal_from_hour_angle(
    hour_angle: Degree,
    dec: Degree,
    latitude: Degree,
) -> Result<(Degree, Degree), SkyplanError> {
    let dec = check_latitude("declination", dec)?;
    let lat = to_radians(check_latitude("observer latitude", latitude)?);
    let h = to_radians(check_longitude("hour angle", hour_angle)?);

    let dec_rad = to_radians(dec);
    if dec_rad.cos() < POLE_COS_TOLERANCE {
        return Err(SkyplanError::SingularityError(format!(
            "declination {dec} is a celestial pole, azimuth is undefined"
        )));
    }

    let sin_alt = dec_rad.sin() * lat.sin() + dec_rad.cos() * lat.cos() * h.cos();
    let alt = clamp_unit(sin_alt).asin();

    let y = h.sin();
    let x = h.cos() * lat.sin() - dec_rad.tan() * lat.cos();
    let az = wrap_360(to_degrees(y.atan2(x)) + 180.0);

    Ok((to_degrees(alt), az))
}

/// Convert Equatorial coordinates to Horizontal coordinates for a site and UTC instant.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: Right Ascension and Declination in degrees
/// * `latitude`: observer latitude in degrees
/// * `east_longitude`: observer longitude in degrees, east positive
/// * `epoch`: UTC instant used for the local sidereal time
///
/// Return
/// ------
/// * `(altitude, azimuth)` in degrees; azimuth from North in [0, 360)
pub fn equatorial_to_horizontal(
    ra: Degree,
    dec: Degree,
    latitude: Degree,
    east_longitude: Degree,
    epoch: &Epoch,
) -> Result<(Degree, Degree), SkyplanError> {
    let ra = check_longitude("right ascension", ra)?;
    let east_longitude = check_longitude("observer east longitude", east_longitude)?;

    let lst = local_sidereal_time(east_longitude, epoch);
    horizontal_from_hour_angle(hour_angle(lst, ra), dec, latitude)
}

#[cfg(test)]
mod coordinates_test {
    use super::*;
    use crate::angles::angular_difference;
    use crate::time::parse_utc_epoch;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_galactic_to_equatorial_reference_points() {
        let (ra, dec) = galactic_to_equatorial(18.0, 0.0).unwrap();
        assert_abs_diff_eq!(ra, 275.8829834105328, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, -13.316859109566929, epsilon = 1e-9);

        // galactic centre direction
        let (ra, dec) = galactic_to_equatorial(0.0, 0.0).unwrap();
        assert_abs_diff_eq!(ra, 266.3524364280962, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, -28.992928016260468, epsilon = 1e-9);

        // anticentre: exercises the ra_cos < 0 branch
        let (ra, dec) = galactic_to_equatorial(180.0, 0.0).unwrap();
        assert_abs_diff_eq!(ra, 86.35243642809621, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, 28.992928016260475, epsilon = 1e-9);

        let (ra, dec) = galactic_to_equatorial(270.0, 0.0).unwrap();
        assert_abs_diff_eq!(ra, 137.92910364716306, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, -48.27734667383918, epsilon = 1e-9);
    }

    #[test]
    fn test_galactic_pole_maps_to_pole_constants() {
        let (ra, dec) = galactic_to_equatorial(42.0, 90.0).unwrap();
        assert_abs_diff_eq!(ra, NGP_RA, epsilon = 1e-9);
        assert_abs_diff_eq!(dec, NGP_DEC, epsilon = 1e-9);
    }

    #[test]
    fn test_galactic_to_equatorial_singularity() {
        // (l_NCP, δ_NGP) is the north celestial pole
        assert!(matches!(
            galactic_to_equatorial(NGP_L, NGP_DEC),
            Err(SkyplanError::SingularityError(_))
        ));
        assert!(matches!(
            galactic_to_equatorial(NGP_L + 180.0, -NGP_DEC),
            Err(SkyplanError::SingularityError(_))
        ));
    }

    #[test]
    fn test_galactic_to_equatorial_domain() {
        assert!(matches!(
            galactic_to_equatorial(10.0, 95.0),
            Err(SkyplanError::DomainError(_))
        ));
        assert!(matches!(
            galactic_to_equatorial(f64::NAN, 0.0),
            Err(SkyplanError::DomainError(_))
        ));
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let m = galactic_rotation();
        let residual = (m * m.transpose() - Matrix3::identity()).norm();
        assert_abs_diff_eq!(residual, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_equatorial_to_galactic_reference_points() {
        let (l, b) = equatorial_to_galactic(275.8829834105328, -13.316859109566929).unwrap();
        assert_abs_diff_eq!(angular_difference(l, 18.0), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(b, 0.0, epsilon = 1e-9);

        let (_, b) = equatorial_to_galactic(NGP_RA, NGP_DEC).unwrap();
        assert_abs_diff_eq!(b, 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hour_angle() {
        assert_eq!(hour_angle(10.0, 20.0), 350.0);
        assert_eq!(hour_angle(291.5, 275.5), 16.0);
    }

    #[test]
    fn test_horizontal_cardinal_points() {
        // culminating south of the zenith
        let (alt, az) = horizontal_from_hour_angle(0.0, -13.0, 13.61).unwrap();
        assert_abs_diff_eq!(alt, 90.0 - 26.61, epsilon = 1e-9);
        assert_abs_diff_eq!(az, 180.0, epsilon = 1e-9);

        // culminating north of the zenith
        let (alt, az) = horizontal_from_hour_angle(0.0, 60.0, 13.61).unwrap();
        assert_abs_diff_eq!(alt, 90.0 - 46.39, epsilon = 1e-9);
        assert_abs_diff_eq!(angular_difference(az, 0.0), 0.0, epsilon = 1e-9);

        // equatorial star rising due East for an equatorial observer
        let (alt, az) = horizontal_from_hour_angle(270.0, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(alt, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(az, 90.0, epsilon = 1e-9);

        // and setting due West
        let (_, az) = horizontal_from_hour_angle(90.0, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(az, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_equatorial_to_horizontal_reference() {
        let epoch = parse_utc_epoch("2026-02-24T04:00:00 UTC").unwrap();
        let (ra, dec) = (275.8829834105328, -13.316859109566929);
        let (alt, az) = equatorial_to_horizontal(ra, dec, 13.61, 77.51, &epoch).unwrap();
        assert_abs_diff_eq!(alt, 58.91495676294923, epsilon = 1e-8);
        assert_abs_diff_eq!(az, 210.6163653600355, epsilon = 1e-8);
    }

    #[test]
    fn test_equatorial_to_horizontal_pole_is_singular() {
        let epoch = parse_utc_epoch("2026-02-24T04:00:00 UTC").unwrap();
        assert!(matches!(
            equatorial_to_horizontal(0.0, 90.0, 13.61, 77.51, &epoch),
            Err(SkyplanError::SingularityError(_))
        ));
        assert!(matches!(
            equatorial_to_horizontal(123.0, -90.0, -33.0, 18.0, &epoch),
            Err(SkyplanError::SingularityError(_))
        ));
    }

    #[test]
    fn test_equatorial_to_horizontal_domain() {
        let epoch = parse_utc_epoch("2026-02-24T04:00:00 UTC").unwrap();
        assert!(matches!(
            equatorial_to_horizontal(10.0, 10.0, 91.0, 77.51, &epoch),
            Err(SkyplanError::DomainError(_))
        ));
        assert!(matches!(
            equatorial_to_horizontal(10.0, -90.5, 13.61, 77.51, &epoch),
            Err(SkyplanError::DomainError(_))
        ));
    }

    #[test]
    fn test_sky_direction_conversions() {
        let target = SkyDirection::galactic(-342.0, 0.0).unwrap();
        assert_eq!(target.frame(), Frame::Galactic);
        assert_abs_diff_eq!(target.longitude(), 18.0, epsilon = 1e-12);

        let eq = target.to_equatorial().unwrap();
        assert_eq!(eq.frame(), Frame::Equatorial);
        assert_abs_diff_eq!(eq.latitude(), -13.316859109566929, epsilon = 1e-9);

        let back = eq.to_galactic().unwrap();
        let dl = angular_difference(back.longitude(), 18.0);
        assert_abs_diff_eq!(dl, 0.0, epsilon = 1e-9);

        let site = ObserverLocation::new(13.61, 77.51).unwrap();
        let epoch = parse_utc_epoch("2026-02-24T04:00:00 UTC").unwrap();
        let hor = target.to_horizontal(&site, &epoch).unwrap();
        assert_eq!(hor.frame(), Frame::Horizontal);
        assert_abs_diff_eq!(hor.latitude(), 58.91495676294923, epsilon = 1e-8);
        assert_abs_diff_eq!(hor.longitude(), 210.6163653600355, epsilon = 1e-8);

        assert!(matches!(
            hor.to_equatorial(),
            Err(SkyplanError::DomainError(_))
        ));
    }

    #[test]
    fn test_observer_location() {
        let site = ObserverLocation::new(13.61, -282.49).unwrap();
        assert_abs_diff_eq!(site.east_longitude(), 77.51, epsilon = 1e-12);
        assert!(ObserverLocation::new(-91.0, 0.0).is_err());
    }

    proptest! {
        #[test]
        fn prop_galactic_round_trip(l in 0.0..360.0f64, b in -89.9..89.9f64) {
            let forward = galactic_to_equatorial(l, b);
            prop_assume!(forward.is_ok());
            let (ra, dec) = forward.unwrap();
            let (l2, b2) = equatorial_to_galactic(ra, dec).unwrap();
            prop_assert!(angular_difference(l2, l).abs() < 1e-9);
            prop_assert!((b2 - b).abs() < 1e-9);
        }

        #[test]
        fn prop_horizontal_ranges(
            ra in 0.0..360.0f64,
            dec in -89.9..89.9f64,
            lat in -90.0..=90.0f64,
            east_long in -180.0..360.0f64,
            offset_s in 0.0..3.0e8f64,
        ) {
            let epoch = parse_utc_epoch("2000-01-01T12:00:00 UTC").unwrap()
                + hifitime::Duration::from_seconds(offset_s);
            let (alt, az) = equatorial_to_horizontal(ra, dec, lat, east_long, &epoch).unwrap();
            prop_assert!((0.0..360.0).contains(&az));
            prop_assert!((-90.0..=90.0).contains(&alt));
        }
    }
}
