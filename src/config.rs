//! # Run configuration
//!
//! [`ObservationConfig`] is the external, serde-backed description of a scheduling run. It is
//! read from TOML, keeps times as **naive civil timestamps** plus an explicit zone, and is
//! turned into a validated, UTC-only [`SchedulePlan`] by [`ObservationConfig::resolve`].
//!
//! ## Example
//!
//! ```toml
//! start = "2026-02-24T04:00:00"
//! end = "2026-02-24T09:00:00"
//! input_zone = "UTC"
//! display_zone = "Asia/Kolkata"
//! galactic_latitude = 0.0
//! step_minutes = 15.0
//! file_prefix = "obs_l"
//! on_error = "abort"
//! targets = [18.0, 24.0, 30.0]
//!
//! [observer]
//! latitude = 13.61
//! east_longitude = 77.51
//! ```
//!
//! `targets` also accepts a half-open range table: `[targets] start = 18.0, stop = 90.0,
//! step = 6.0` gives `18, 24, …, 84`.
//!
//! ## Defaults
//!
//! Every field is optional; missing ones take the values of [`ObservationConfig::default`],
//! which reproduce the reference survey run (2026-02-24 04:00–09:00 UTC, site 13.61° N
//! 77.51° E, `l = 18..90 step 6`, `b = 0`, 15 minute cadence, rows labelled in
//! `Asia/Kolkata`).
use std::fs;
use std::path::{Path, PathBuf};

use hifitime::Duration;
use serde::{Deserialize, Serialize};

use crate::angles::check_latitude;
use crate::constants::Degree;
use crate::coordinates::ObserverLocation;
use crate::scheduler::{ObservationWindow, SamplePolicy, SchedulePlan};
use crate::skyplan_errors::SkyplanError;
use crate::time::{civil_to_utc, parse_naive, parse_zone};

/// Upper bound on the number of targets a range may expand to.
const MAX_TARGETS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservationConfig {
    /// First sampling instant, naive civil time in `input_zone`
    pub start: String,
    /// End of the window (excluded), naive civil time in `input_zone`
    pub end: String,
    /// IANA zone of `start`/`end`
    pub input_zone: String,
    /// IANA zone of the date/time columns of the output rows
    pub display_zone: String,
    pub galactic_latitude: Degree,
    pub step_minutes: f64,
    pub output_dir: PathBuf,
    pub file_prefix: String,
    pub on_error: SamplePolicy,
    // tables last, so the rendered TOML keeps plain keys above them
    pub observer: ObserverConfig,
    pub targets: TargetLongitudes,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverConfig {
    pub latitude: Degree,
    pub east_longitude: Degree,
}

/// Galactic longitudes to schedule: an explicit list or a half-open range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetLongitudes {
    List(Vec<Degree>),
    Range {
        start: Degree,
        stop: Degree,
        step: Degree,
    },
}

impl TargetLongitudes {
    /// Expand into the ordered list of longitudes.
    ///
    /// A range yields `start + k·step` for every `k` keeping the value strictly below `stop`.
    pub fn expand(&self) -> Result<Vec<Degree>, SkyplanError> {
        let longitudes = match *self {
            TargetLongitudes::List(ref list) => list.clone(),
            TargetLongitudes::Range { start, stop, step } => {
                if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step <= 0.0 {
                    return Err(SkyplanError::ConfigError(format!(
                        "target range {start}..{stop} step {step} needs finite bounds, step > 0"
                    )));
                }
                let count = ((stop - start) / step).ceil().max(0.0);
                if count > MAX_TARGETS as f64 {
                    return Err(SkyplanError::ConfigError(format!(
                        "target range {start}..{stop} step {step} exceeds {MAX_TARGETS} targets"
                    )));
                }
                (0..count as usize)
                    .map(|k| start + k as f64 * step)
                    .filter(|l| *l < stop)
                    .collect()
            }
        };

        if longitudes.is_empty() {
            return Err(SkyplanError::ConfigError(
                "no target longitude to schedule".into(),
            ));
        }
        if let Some(bad) = longitudes.iter().find(|l| !l.is_finite()) {
            return Err(SkyplanError::DomainError(format!(
                "galactic longitude must be finite, got {bad}"
            )));
        }
        Ok(longitudes)
    }
}

impl Default for ObservationConfig {
    fn default() -> Self {
        ObservationConfig {
            start: "2026-02-24T04:00:00".into(),
            end: "2026-02-24T09:00:00".into(),
            input_zone: "UTC".into(),
            display_zone: "Asia/Kolkata".into(),
            galactic_latitude: 0.0,
            step_minutes: 15.0,
            output_dir: PathBuf::from("."),
            file_prefix: "obs_l".into(),
            on_error: SamplePolicy::Abort,
            observer: ObserverConfig {
                latitude: 13.61,
                east_longitude: 77.51,
            },
            targets: TargetLongitudes::Range {
                start: 18.0,
                stop: 90.0,
                step: 6.0,
            },
        }
    }
}

impl ObservationConfig {
    /// Parse a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, SkyplanError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SkyplanError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, SkyplanError> {
        toml::to_string_pretty(self).map_err(|e| SkyplanError::ConfigError(e.to_string()))
    }

    /// Validate the configuration and convert it into a UTC [`SchedulePlan`].
    ///
    /// Return
    /// ------
    /// * the plan, or the first error among: unknown zone, malformed/ambiguous/non-existent
    ///   civil time ([`SkyplanError::TimeConversionError`]), empty window or non-positive
    ///   step ([`SkyplanError::InvalidWindow`]), out-of-range site or target
    ///   ([`SkyplanError::DomainError`]), bad target list ([`SkyplanError::ConfigError`]).
    pub fn resolve(&self) -> Result<SchedulePlan, SkyplanError> {
        let input_zone = parse_zone(&self.input_zone)?;
        let display_zone = parse_zone(&self.display_zone)?;

        let start = civil_to_utc(&parse_naive(&self.start)?, input_zone)?;
        let end = civil_to_utc(&parse_naive(&self.end)?, input_zone)?;

        if !self.step_minutes.is_finite() || self.step_minutes <= 0.0 {
            return Err(SkyplanError::InvalidWindow(format!(
                "step must be a positive number of minutes, got {}",
                self.step_minutes
            )));
        }
        let step = Duration::from_seconds(self.step_minutes * 60.0);
        let window = ObservationWindow::new(start, end, step)?;
        let site = &self.observer;
        let observer = ObserverLocation::new(site.latitude, site.east_longitude)?;

        Ok(SchedulePlan {
            window,
            observer,
            target_longitudes: self.targets.expand()?,
            galactic_latitude: check_latitude("galactic latitude", self.galactic_latitude)?,
            display_zone,
            policy: self.on_error,
        })
    }
}
