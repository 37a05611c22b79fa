//! # Visibility scheduling
//!
//! Samples the horizontal position of a set of Galactic targets over an observing window.
//!
//! For every target longitude the Galactic → Equatorial transform runs **once** (it does not
//! depend on time); the window is then walked at a fixed cadence and each UTC instant is
//! turned into an [`EphemerisRow`] through [`equatorial_to_horizontal`]. The local date/time
//! columns of a row are the only place where the display zone is used.
//!
//! ```text
//! for l in targets:
//!     (α, δ) = galactic_to_equatorial(l, b)
//!     for t in [start, end) step Δt:            ← ObservationWindow::epochs
//!         (h, A) = equatorial_to_horizontal(α, δ, site, t)
//!         row(t → display zone, α, δ, h, A)
//! ```
//!
//! ## Error policy
//!
//! Every error is local to the sample being computed. A target whose equatorial position
//! cannot be resolved (a celestial pole) fails on each of its samples, not up front.
//! [`SamplePolicy`] decides what happens next: `Abort` (default) returns the first error,
//! `Skip` logs it with `tracing::warn!`, counts it in [`TargetSchedule::skipped`] and moves on.
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use hifitime::{Duration, Epoch};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::Degree;
use crate::coordinates::{equatorial_to_horizontal, galactic_to_equatorial, ObserverLocation};
use crate::skyplan_errors::SkyplanError;
use crate::time::utc_to_civil;

/// What to do when a target or a sample cannot be computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Stop the run and return the error.
    #[default]
    Abort,
    /// Log the failure and continue with the next sample or target.
    Skip,
}

/// Half-open UTC interval `[start, end)` walked with a fixed positive step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationWindow {
    start: Epoch,
    end: Epoch,
    step: Duration,
}

impl ObservationWindow {
    pub fn new(start: Epoch, end: Epoch, step: Duration) -> Result<Self, SkyplanError> {
        if start >= end {
            return Err(SkyplanError::InvalidWindow(format!(
                "start {start} must be before end {end}"
            )));
        }
        if step.to_seconds() <= 0.0 {
            return Err(SkyplanError::InvalidWindow(format!(
                "step must be positive, got {step}"
            )));
        }
        Ok(ObservationWindow { start, end, step })
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Sampling instants `start, start + step, …` strictly before `end`.
    pub fn epochs(&self) -> WindowEpochs {
        WindowEpochs {
            next: self.start,
            end: self.end,
            step: self.step,
        }
    }

    /// Number of instants produced by [`epochs`](Self::epochs).
    pub fn sample_count(&self) -> usize {
        self.epochs().count()
    }
}

/// Lazy iterator over the instants of an [`ObservationWindow`].
#[derive(Debug, Clone)]
pub struct WindowEpochs {
    next: Epoch,
    end: Epoch,
    step: Duration,
}

impl Iterator for WindowEpochs {
    type Item = Epoch;

    fn next(&mut self) -> Option<Epoch> {
        if self.next < self.end {
            let current = self.next;
            self.next = current + self.step;
            Some(current)
        } else {
            None
        }
    }
}

/// One sample of a target: local date/time label, equatorial and horizontal coordinates.
///
/// Serialized (CSV) in the column order `date,time,ra,dec,alt,az`; the generating UTC
/// epoch is kept alongside for ordering but not exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EphemerisRow {
    #[serde(rename = "date")]
    pub local_date: NaiveDate,
    #[serde(rename = "time")]
    pub local_time: NaiveTime,
    pub ra: Degree,
    pub dec: Degree,
    pub alt: Degree,
    pub az: Degree,
    #[serde(skip)]
    pub epoch: Epoch,
}

/// Lazy, restartable sequence of rows for one target.
///
/// Cloning the iterator (or calling [`VisibilityScheduler::rows`] again) replays the same
/// samples: every row is a pure function of its instant.
#[derive(Debug, Clone)]
pub struct EphemerisIter {
    observer: ObserverLocation,
    display_zone: Tz,
    target: TargetPosition,
    epochs: WindowEpochs,
}

/// Equatorial position of the target, or the Galactic input that failed to resolve.
#[derive(Debug, Clone, Copy)]
enum TargetPosition {
    Resolved { ra: Degree, dec: Degree },
    Unresolved { l: Degree, b: Degree },
}

impl TargetPosition {
    fn resolve(l: Degree, b: Degree) -> Self {
        match galactic_to_equatorial(l, b) {
            Ok((ra, dec)) => {
                debug!(l, b, ra, dec, "target resolved to equatorial coordinates");
                TargetPosition::Resolved { ra, dec }
            }
            Err(err) => {
                debug!(l, b, error = %err, "target has no usable equatorial position");
                TargetPosition::Unresolved { l, b }
            }
        }
    }

    fn equatorial(&self) -> Result<(Degree, Degree), SkyplanError> {
        match *self {
            TargetPosition::Resolved { ra, dec } => Ok((ra, dec)),
            // same error on every sample
            TargetPosition::Unresolved { l, b } => galactic_to_equatorial(l, b),
        }
    }
}

impl Iterator for EphemerisIter {
    type Item = Result<EphemerisRow, SkyplanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let epoch = self.epochs.next()?;
        let (ra, dec) = match self.target.equatorial() {
            Ok(position) => position,
            Err(err) => return Some(Err(err)),
        };
        let row = ephemeris_row(ra, dec, &self.observer, self.display_zone, epoch);
        Some(row)
    }
}

/// Build the row of one `(target, instant)` pair.
///
/// Arguments
/// ---------
/// * `ra`, `dec`: equatorial position of the target in degrees
/// * `observer`: observing site
/// * `display_zone`: zone used for the date/time columns only
/// * `epoch`: UTC sampling instant
pub fn ephemeris_row(
    ra: Degree,
    dec: Degree,
    observer: &ObserverLocation,
    display_zone: Tz,
    epoch: Epoch,
) -> Result<EphemerisRow, SkyplanError> {
    let (alt, az) = equatorial_to_horizontal(
        ra,
        dec,
        observer.latitude(),
        observer.east_longitude(),
        &epoch,
    )?;
    let local = utc_to_civil(&epoch, display_zone)?;

    Ok(EphemerisRow {
        local_date: local.date_naive(),
        local_time: local.time(),
        ra,
        dec,
        alt,
        az,
        epoch,
    })
}

/// Rows computed for one Galactic target.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSchedule {
    pub galactic_longitude: Degree,
    pub galactic_latitude: Degree,
    pub rows: Vec<EphemerisRow>,
    /// Samples dropped under [`SamplePolicy::Skip`].
    pub skipped: usize,
}

impl TargetSchedule {
    /// Rows where the target is above the geometric horizon.
    pub fn visible_rows(&self) -> impl Iterator<Item = &EphemerisRow> {
        self.rows.iter().filter(|row| row.alt > 0.0)
    }
}

/// Everything a scheduling run needs, already validated and expressed in UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePlan {
    pub window: ObservationWindow,
    pub observer: ObserverLocation,
    pub target_longitudes: Vec<Degree>,
    pub galactic_latitude: Degree,
    pub display_zone: Tz,
    pub policy: SamplePolicy,
}

/// Drives the Galactic → Horizontal pipeline over a [`SchedulePlan`].
#[derive(Debug, Clone)]
pub struct VisibilityScheduler {
    plan: SchedulePlan,
}

impl VisibilityScheduler {
    pub fn new(plan: SchedulePlan) -> Self {
        VisibilityScheduler { plan }
    }

    pub fn plan(&self) -> &SchedulePlan {
        &self.plan
    }

    /// Lazy rows of the target at Galactic longitude `l` (latitude from the plan).
    ///
    /// The equatorial position is computed here, once. When it cannot be resolved (a target
    /// on a celestial pole, an out-of-range latitude) every sample yields that error.
    pub fn rows(&self, l: Degree) -> EphemerisIter {
        EphemerisIter {
            observer: self.plan.observer,
            display_zone: self.plan.display_zone,
            target: TargetPosition::resolve(l, self.plan.galactic_latitude),
            epochs: self.plan.window.epochs(),
        }
    }

    /// Materialize the rows of one target, applying the sample policy.
    pub fn schedule_target(&self, l: Degree) -> Result<TargetSchedule, SkyplanError> {
        let mut rows = Vec::with_capacity(self.plan.window.sample_count());
        let mut skipped = 0;

        for row in self.rows(l) {
            match row {
                Ok(row) => rows.push(row),
                Err(err) => match self.plan.policy {
                    SamplePolicy::Abort => return Err(err),
                    SamplePolicy::Skip => {
                        warn!(l, error = %err, "skipping sample");
                        skipped += 1;
                    }
                },
            }
        }

        Ok(TargetSchedule {
            galactic_longitude: l,
            galactic_latitude: self.plan.galactic_latitude,
            rows,
            skipped,
        })
    }

    /// Materialize every target of the plan, in plan order.
    pub fn run(&self) -> Result<Vec<TargetSchedule>, SkyplanError> {
        let mut schedules = Vec::with_capacity(self.plan.target_longitudes.len());

        for &l in &self.plan.target_longitudes {
            let schedule = self.schedule_target(l)?;
            if schedule.skipped > 0 {
                warn!(l, skipped = schedule.skipped, "target has skipped samples");
            }
            schedules.push(schedule);
        }

        info!(
            targets = schedules.len(),
            skipped = schedules.iter().map(|s| s.skipped).sum::<usize>(),
            samples_per_target = self.plan.window.sample_count(),
            "visibility schedule computed"
        );
        Ok(schedules)
    }
}
