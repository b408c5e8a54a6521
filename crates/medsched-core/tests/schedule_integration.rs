//! Integration tests for dose schedules.
//!
//! This test file verifies:
//! - Gradual tapers built once and resolved per day
//! - Custom day ranges with base-dose fallback
//! - Projection of both onto a calendar window
//! - Entries surviving a JSON snapshot unchanged

use chrono::{NaiveDate, TimeZone, Utc};
use medsched_core::{
    project, resolve, CustomRanges, DateRange, Dose, DoseChange, DoseRange, GradualSchedule,
    MedicationEntry, ProjectionOptions, Provenance, ScheduleDefinition, TimeSlot,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(name: &str, base: f64) -> MedicationEntry {
    MedicationEntry::new(
        name,
        Dose::new(base, "mg"),
        [TimeSlot::Morning],
        Provenance::Verified,
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
    )
}

fn taper() -> MedicationEntry {
    entry("Prednisone", 20.0).with_schedule(ScheduleDefinition::Gradual(
        GradualSchedule::new(20.0, 5.0, 5.0, 7).unwrap(),
    ))
}

fn ranges() -> MedicationEntry {
    entry("Variable", 2.0).with_schedule(ScheduleDefinition::Custom(CustomRanges::new(vec![
        DoseRange::new(1, 7, 10.0).unwrap(),
        DoseRange::new(8, 14, 5.0).unwrap(),
    ])))
}

#[test]
fn test_taper_breakpoints_and_resolution() {
    let med = taper();
    let Some(ScheduleDefinition::Gradual(gradual)) = &med.schedule else {
        panic!("expected gradual schedule");
    };
    let points: Vec<(i64, f64)> = gradual
        .breakpoints()
        .iter()
        .map(|bp| (bp.day, bp.dose))
        .collect();
    assert_eq!(points, vec![(0, 20.0), (7, 15.0), (14, 10.0), (21, 5.0)]);

    assert_eq!(resolve(&med, 10), 15.0);
    assert_eq!(resolve(&med, 25), 5.0);
    assert_eq!(resolve(&med, -3), 20.0);
}

#[test]
fn test_custom_ranges_resolution() {
    let med = ranges();
    assert_eq!(resolve(&med, 0), 10.0);
    assert_eq!(resolve(&med, 6), 10.0);
    assert_eq!(resolve(&med, 7), 5.0);
    assert_eq!(resolve(&med, 13), 5.0);
    assert_eq!(resolve(&med, 20), 2.0);
}

#[test]
fn test_three_week_window_tracks_both_schedules() {
    let today = date(2026, 10, 19);
    let entries = vec![taper(), ranges()];
    let grid = project(
        &entries,
        DateRange::window(today, 22),
        today,
        &ProjectionOptions::default(),
    );

    let doses = |index: usize| -> Vec<f64> {
        grid.days
            .iter()
            .map(|day| day.slots[0].placements[index].dose)
            .collect()
    };
    let taper_doses = doses(0);
    assert_eq!(taper_doses[0], 20.0);
    assert_eq!(taper_doses[7], 15.0);
    assert_eq!(taper_doses[14], 10.0);
    assert_eq!(taper_doses[21], 5.0);

    let range_doses = doses(1);
    assert_eq!(range_doses[6], 10.0);
    assert_eq!(range_doses[7], 5.0);
    assert_eq!(range_doses[14], 2.0);

    let changes: Vec<Option<DoseChange>> = grid
        .days
        .iter()
        .map(|day| day.slots[0].placements[1].change)
        .collect();
    assert_eq!(changes[0], None);
    assert_eq!(changes[7], Some(DoseChange::Decreased));
    assert_eq!(changes[8], Some(DoseChange::Unchanged));
    assert_eq!(changes[14], Some(DoseChange::Decreased));
}

#[test]
fn test_snapshot_roundtrip_keeps_schedule() {
    let entries = vec![taper(), ranges()];
    let json = serde_json::to_string(&entries).unwrap();
    let restored: Vec<MedicationEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, entries);
    for day in 0..30 {
        assert_eq!(resolve(&restored[0], day), resolve(&entries[0], day));
        assert_eq!(resolve(&restored[1], day), resolve(&entries[1], day));
    }
}
