//! # 21 cm radial velocity
//!
//! Line-of-sight velocity of a neutral-hydrogen cloud from the observed frequency of the
//! 21 cm line, using the non-relativistic (radio) Doppler relation
//!
//! ```text
//! v_r = c · (f_rest − f_obs) / f_rest
//! ```
//!
//! A positive velocity means the cloud is receding (redshift). The default calculator uses
//! the rounded `c = 3e8 m/s` of the historical observing sheets; switch to the exact SI value
//! with [`RadialVelocityCalculator::with_exact_speed_of_light`]. The two differ by about 0.07%.
use crate::constants::{
    KilometerPerSecond, MegaHertz, MeterPerSecond, HI_REST_FREQUENCY_MHZ, SPEED_OF_LIGHT,
    SPEED_OF_LIGHT_ROUNDED,
};
use crate::skyplan_errors::SkyplanError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialVelocityCalculator {
    pub rest_frequency_mhz: MegaHertz,
    pub speed_of_light: MeterPerSecond,
}

impl Default for RadialVelocityCalculator {
    fn default() -> Self {
        RadialVelocityCalculator {
            rest_frequency_mhz: HI_REST_FREQUENCY_MHZ,
            speed_of_light: SPEED_OF_LIGHT_ROUNDED,
        }
    }
}

impl RadialVelocityCalculator {
    pub fn with_exact_speed_of_light(self) -> Self {
        RadialVelocityCalculator {
            speed_of_light: SPEED_OF_LIGHT,
            ..self
        }
    }

    /// Radial velocity in m/s for an observed frequency in MHz.
    pub fn velocity_m_s(&self, observed_mhz: MegaHertz) -> MeterPerSecond {
        let shift = self.rest_frequency_mhz - observed_mhz;
        self.speed_of_light * (shift / self.rest_frequency_mhz)
    }

    /// Radial velocity in km/s, rounded to two decimals.
    ///
    /// Shifts too small to survive the rounding give `+0.0`, never `-0.0`.
    pub fn velocity_km_s(&self, observed_mhz: MegaHertz) -> KilometerPerSecond {
        (self.velocity_m_s(observed_mhz) / 1000.0 * 100.0).round() / 100.0 + 0.0
    }

    /// Human-readable result line for an observed frequency.
    pub fn report(&self, observed_mhz: MegaHertz) -> String {
        format!(
            "Radial velocity of the gas cloud is: {:.2} km/s",
            self.velocity_km_s(observed_mhz)
        )
    }
}

/// Parse an observed frequency in MHz typed by a user.
///
/// Return
/// ------
/// * the frequency, or [`SkyplanError::InputParseError`] when the text is not a finite number
pub fn parse_frequency_mhz(input: &str) -> Result<MegaHertz, SkyplanError> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| {
        SkyplanError::InputParseError(format!("'{trimmed}' is not a frequency in MHz"))
    })?;
    if !value.is_finite() {
        return Err(SkyplanError::InputParseError(format!(
            "'{trimmed}' is not a finite frequency"
        )));
    }
    Ok(value)
}
