//! # Constants and type definitions for skyplan
//!
//! This module centralizes the **astronomical constants**, **conversion factors**, and
//! **type aliases** shared by the time keeping, coordinate and scheduling modules.
//!
//! ## Overview
//!
//! - Julian Day reference points and sidereal-rate polynomial coefficients
//! - North Galactic Pole orientation used by the Galactic ↔ Equatorial transform
//! - 21 cm line and speed-of-light constants for the Doppler utility
//! - Unit aliases (degrees, radians, Julian Day, …) used in signatures across the crate
//!
//! ## Reference epoch of the Galactic pole
//!
//! The pole values (`α = 192.85°`, `δ = 27.133°`, `l_NCP = 123.0°`) are a mixed set: the Right
//! Ascension and Declination are the J2000.0 values rounded to 0.01°/0.001°, while
//! `123.0°` is the rounded B1950 IAU 1958 longitude of the celestial pole (the J2000 value is
//! `122.932°`). They are kept as-is so the tables agree with the historical observing sheets;
//! expect an absolute frame error of order 0.1° against a strict J2000/ICRS transform.

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Length of one mean sidereal day in SI seconds
pub const SIDEREAL_DAY_SECONDS: f64 = 86_164.0905;

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00:00)
pub const J2000_JD: f64 = 2_451_545.0;

/// Number of days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

// -------------------------------------------------------------------------------------------------
// IAU mean sidereal time polynomial (degrees)
// -------------------------------------------------------------------------------------------------

/// GMST at J2000.0, in degrees
pub const GMST_AT_J2000: f64 = 280.460_618_37;

/// Mean sidereal rotation, degrees per day elapsed since J2000.0
pub const GMST_RATE_PER_DAY: f64 = 360.985_647_366_29;

/// Quadratic coefficient on Julian centuries
pub const GMST_T2: f64 = 0.000_387_933;

/// Divisor of the cubic term on Julian centuries
pub const GMST_T3_DIVISOR: f64 = 38_710_000.0;

// -------------------------------------------------------------------------------------------------
// North Galactic Pole
// -------------------------------------------------------------------------------------------------

/// Galactic longitude of the North Celestial Pole (ascending node reference), degrees
pub const NGP_L: Degree = 123.0;

/// Declination of the North Galactic Pole, degrees
pub const NGP_DEC: Degree = 27.133;

/// Right Ascension of the North Galactic Pole, degrees
pub const NGP_RA: Degree = 192.85;

/// Declinations whose cosine falls below this value are treated as the celestial pole.
///
/// `1e-7` corresponds to roughly 0.02 arcsec from the pole, which is below the round-off floor
/// of `arcsin` when it is evaluated at exactly ±1.
pub const POLE_COS_TOLERANCE: f64 = 1e-7;

// -------------------------------------------------------------------------------------------------
// Spectroscopy
// -------------------------------------------------------------------------------------------------

/// Rest frequency of the neutral hydrogen 21 cm hyperfine line, MHz
pub const HI_REST_FREQUENCY_MHZ: MegaHertz = 1420.405751;

/// Rounded speed of light used by the historical radial-velocity sheets, m/s
pub const SPEED_OF_LIGHT_ROUNDED: MeterPerSecond = 3e8;

/// Speed of light (exact SI definition), m/s
pub const SPEED_OF_LIGHT: MeterPerSecond = 299_792_458.0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Continuous day count (Julian Day)
pub type JulianDay = f64;
/// Frequency in megahertz
pub type MegaHertz = f64;
/// Velocity in metres per second
pub type MeterPerSecond = f64;
/// Velocity in kilometres per second
pub type KilometerPerSecond = f64;
