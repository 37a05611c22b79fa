mod common;

use approx::assert_abs_diff_eq;
use chrono::{NaiveDate, NaiveTime};
use common::{assert_row_close, reference_plan};

use skyplan::config::{ObservationConfig, TargetLongitudes};
use skyplan::coordinates::{equatorial_to_horizontal, galactic_to_equatorial};
use skyplan::export::export_schedules;
use skyplan::scheduler::{EphemerisRow, VisibilityScheduler};
use skyplan::time::parse_utc_epoch;

fn single_instant_row() -> EphemerisRow {
    let config = ObservationConfig {
        end: "2026-02-24T04:15:00".into(),
        targets: TargetLongitudes::List(vec![18.0]),
        ..ObservationConfig::default()
    };
    let scheduler = VisibilityScheduler::new(config.resolve().unwrap());
    let schedule = scheduler.schedule_target(18.0).unwrap();
    assert_eq!(schedule.rows.len(), 1);
    schedule.rows[0].clone()
}

#[test]
fn test_end_to_end_single_instant() {
    let row = single_instant_row();
    let epoch = parse_utc_epoch("2026-02-24T04:00:00 UTC").unwrap();

    let (ra, dec) = galactic_to_equatorial(18.0, 0.0).unwrap();
    assert_eq!(row.ra, ra);
    assert_eq!(row.dec, dec);

    let (alt, az) = equatorial_to_horizontal(ra, dec, 13.61, 77.51, &epoch).unwrap();
    assert_eq!(row.alt, alt);
    assert_eq!(row.az, az);
    assert_eq!(row.epoch, epoch);

    let expected = EphemerisRow {
        local_date: NaiveDate::from_ymd_opt(2026, 2, 24).unwrap(),
        local_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        ra: 275.8829834105328,
        dec: -13.316859109566929,
        alt: 58.91495676294923,
        az: 210.6163653600355,
        epoch,
    };
    assert_row_close(&row, &expected, 1e-8);
}

#[test]
fn test_end_to_end_is_bit_reproducible() {
    let first = single_instant_row();
    let second = single_instant_row();

    assert_eq!(first.ra.to_bits(), second.ra.to_bits());
    assert_eq!(first.dec.to_bits(), second.dec.to_bits());
    assert_eq!(first.alt.to_bits(), second.alt.to_bits());
    assert_eq!(first.az.to_bits(), second.az.to_bits());
}

#[test]
fn test_reference_window_has_twenty_rows() {
    let plan = reference_plan(&[18.0]);
    let end = plan.window.end();
    let schedule = VisibilityScheduler::new(plan)
        .schedule_target(18.0)
        .unwrap();

    assert_eq!(schedule.rows.len(), 20);
    assert!(schedule.rows.windows(2).all(|w| w[0].epoch < w[1].epoch));
    assert!(schedule.rows.iter().all(|row| row.epoch < end));

    let last = schedule.rows.last().unwrap();
    assert_eq!(last.local_time, NaiveTime::from_hms_opt(14, 15, 0).unwrap());
    assert_abs_diff_eq!(last.alt, -0.3848249238866971, epsilon = 1e-8);
    assert_abs_diff_eq!(last.az, 256.38656637312135, epsilon = 1e-8);
}

#[test]
fn test_default_run_covers_all_targets() {
    let plan = ObservationConfig::default().resolve().unwrap();
    let schedules = VisibilityScheduler::new(plan).run().unwrap();

    assert_eq!(schedules.len(), 12);
    assert_eq!(schedules[0].galactic_longitude, 18.0);
    assert_eq!(schedules[11].galactic_longitude, 84.0);
    for schedule in &schedules {
        assert_eq!(schedule.rows.len(), 20);
        assert_eq!(schedule.skipped, 0);
        for row in &schedule.rows {
            assert!((0.0..360.0).contains(&row.az));
            assert!((-90.0..=90.0).contains(&row.alt));
        }
    }
}

#[test]
fn test_export_reference_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("tables");

    let schedules = VisibilityScheduler::new(reference_plan(&[18.0, 24.0]))
        .run()
        .unwrap();
    let paths = export_schedules(&out, "obs_l", &schedules).unwrap();

    let expected = vec![out.join("obs_l18.csv"), out.join("obs_l24.csv")];
    assert_eq!(paths, expected);

    for (path, schedule) in paths.iter().zip(&schedules) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["date", "time", "ra", "dec", "alt", "az"]
        );

        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), 20);

        for (record, row) in records.iter().zip(&schedule.rows) {
            assert_eq!(&record[0], row.local_date.to_string());
            assert_eq!(&record[1], row.local_time.to_string());
            assert_eq!(record[2].parse::<f64>().unwrap(), row.ra);
            assert_eq!(record[3].parse::<f64>().unwrap(), row.dec);
            assert_eq!(record[4].parse::<f64>().unwrap(), row.alt);
            assert_eq!(record[5].parse::<f64>().unwrap(), row.az);
        }
    }
}
