//! CSV export of target schedules: one file per Galactic longitude.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::Degree;
use crate::scheduler::{EphemerisRow, TargetSchedule};
use crate::skyplan_errors::SkyplanError;

/// File name of a target table, e.g. `obs_l18.csv` for prefix `obs_l` and `l = 18`.
pub fn target_file_name(prefix: &str, l: Degree) -> String {
    format!("{prefix}{l}.csv")
}

/// Write rows as CSV with the header `date,time,ra,dec,alt,az`, replacing any existing file.
///
/// The header is written even when `rows` is empty.
pub fn write_ephemeris_csv(path: &Path, rows: &[EphemerisRow]) -> Result<(), SkyplanError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(["date", "time", "ra", "dec", "alt", "az"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every schedule under `dir` (created if missing) and return the written paths, in
/// schedule order.
pub fn export_schedules(
    dir: &Path,
    prefix: &str,
    schedules: &[TargetSchedule],
) -> Result<Vec<PathBuf>, SkyplanError> {
    fs::create_dir_all(dir)?;

    schedules
        .iter()
        .map(|schedule| {
            let path = dir.join(target_file_name(prefix, schedule.galactic_longitude));
            write_ephemeris_csv(&path, &schedule.rows)?;
            info!(
                path = %path.display(),
                rows = schedule.rows.len(),
                "ephemeris table written"
            );
            Ok(path)
        })
        .collect()
}
