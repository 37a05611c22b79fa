//! # skyplan
//!
//! Visibility tables for ground-based radio observations of the Galactic plane, and the
//! 21 cm radial velocity utility that goes with them.
//!
//! The pipeline is one-way and pure:
//!
//! ```text
//! ObservationConfig ──resolve──▶ SchedulePlan ──▶ VisibilityScheduler
//!                                                   │  galactic_to_equatorial   (once per target)
//!                                                   │  local_sidereal_time      (per instant)
//!                                                   │  equatorial_to_horizontal (per instant)
//!                                                   ▼
//!                                       TargetSchedule { rows: Vec<EphemerisRow> }
//!                                                   │
//!                                                   ▼ export::export_schedules
//!                                            obs_l18.csv, obs_l24.csv, …
//! ```
//!
//! ```rust
//! use skyplan::config::ObservationConfig;
//! use skyplan::scheduler::VisibilityScheduler;
//!
//! let plan = ObservationConfig::default().resolve()?;
//! let scheduler = VisibilityScheduler::new(plan);
//! let schedule = scheduler.schedule_target(18.0)?;
//! assert_eq!(schedule.rows.len(), 20);
//! # Ok::<(), skyplan::skyplan_errors::SkyplanError>(())
//! ```
pub mod angles;
pub mod config;
pub mod constants;
pub mod coordinates;
pub mod export;
pub mod radial_velocity;
pub mod scheduler;
pub mod skyplan_errors;
pub mod time;
