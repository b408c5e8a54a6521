//! Medication list commands for CLI.

use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use medsched_core::{
    CustomRanges, Dose, DoseRange, GradualSchedule, MedicationEntry, Provenance,
    ScheduleDefinition, TimeSlot, ValidationError,
};
use std::path::PathBuf;
use uuid::Uuid;

use super::{load_entries, save_entries};

#[derive(Subcommand)]
pub enum MedAction {
    /// Add a medication to the list
    Add {
        /// Medication list (JSON)
        file: PathBuf,
        /// Medication name
        #[arg(long)]
        name: String,
        /// Base dose
        #[arg(long, allow_negative_numbers = true)]
        dose: f64,
        /// Dose unit
        #[arg(long, default_value = "mg")]
        unit: String,
        /// Time slot: morning, noon, evening or bedtime (repeatable)
        #[arg(long = "slot", required = true, value_delimiter = ',')]
        slots: Vec<TimeSlot>,
        /// Mark as a manual entry not taken from a reference database
        #[arg(long)]
        unverified: bool,
        /// Gradual schedule
        #[arg(
            long,
            num_args = 4,
            value_names = ["START", "TARGET", "STEP", "EVERY"],
            conflicts_with = "ranges"
        )]
        taper: Option<Vec<f64>>,
        /// Fixed dose for a 1-based day range (repeatable)
        #[arg(long = "range", value_name = "FROM:TO:DOSE")]
        ranges: Vec<DoseRange>,
        /// Day 0 of the schedule (default: today)
        #[arg(long)]
        anchor: Option<NaiveDate>,
    },
    /// Remove a medication by id
    Remove {
        /// Medication list (JSON)
        file: PathBuf,
        /// Medication ID
        id: Uuid,
    },
    /// List medications
    List {
        /// Medication list (JSON)
        file: PathBuf,
        /// Print the raw entries as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: MedAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        MedAction::Add {
            file,
            name,
            dose,
            unit,
            slots,
            unverified,
            taper,
            ranges,
            anchor,
        } => {
            if name.trim().is_empty() {
                return Err("medication name must not be empty".into());
            }
            let provenance = if unverified {
                Provenance::Unverified
            } else {
                Provenance::Verified
            };
            let mut entry = MedicationEntry::new(
                name.trim(),
                Dose::try_new(dose, unit)?,
                slots,
                provenance,
                Utc::now(),
            );
            if let Some(taper) = taper {
                entry = entry.with_schedule(ScheduleDefinition::Gradual(gradual_from_args(&taper)?));
            } else if !ranges.is_empty() {
                entry = entry.with_schedule(ScheduleDefinition::Custom(CustomRanges::new(ranges)));
            }
            if let Some(anchor) = anchor {
                entry = entry.with_anchor(anchor);
            }

            let mut entries = load_entries(&file)?;
            entries.push(entry.clone());
            save_entries(&file, &entries)?;
            println!("Medication added: {}", entry.id);
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        MedAction::Remove { file, id } => {
            let mut entries = load_entries(&file)?;
            let before = entries.len();
            entries.retain(|entry| entry.id != id);
            if entries.len() == before {
                return Err(format!("no medication with id {id}").into());
            }
            save_entries(&file, &entries)?;
            println!("Medication removed: {id}");
        }
        MedAction::List { file, json } => {
            let entries = load_entries(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No medications.");
            } else {
                for entry in &entries {
                    println!("{}", list_line(entry));
                }
            }
        }
    }
    Ok(())
}

fn gradual_from_args(args: &[f64]) -> Result<GradualSchedule, ValidationError> {
    let &[start, target, step, every] = args else {
        return Err(ValidationError::InvalidValue {
            field: "taper".into(),
            message: "expected START TARGET STEP EVERY".into(),
        });
    };
    if every.fract() != 0.0 || every < 0.0 || every > f64::from(u32::MAX) {
        return Err(ValidationError::InvalidValue {
            field: "every".into(),
            message: format!("step interval must be a whole number of days, got {every}"),
        });
    }
    GradualSchedule::new(start, target, step, every as u32)
}

fn list_line(entry: &MedicationEntry) -> String {
    let slots = entry
        .slots
        .iter()
        .map(TimeSlot::name)
        .collect::<Vec<_>>()
        .join(", ");
    let manual = if entry.provenance.is_verified() {
        ""
    } else {
        " (Manual)"
    };
    format!(
        "{}  {}{manual}  {}  [{slots}]",
        entry.id,
        entry.name,
        entry.dose_summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        action: MedAction,
    }

    fn parse(args: &[&str]) -> Result<MedAction, clap::Error> {
        let mut argv = vec!["med"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).map(|cli| cli.action)
    }

    #[test]
    fn add_parses_slots_and_taper() {
        let action = parse(&[
            "add", "meds.json", "--name", "Prednisone", "--dose", "20", "--slot", "Morning",
            "--slot", "bedtime", "--taper", "20", "5", "5", "7",
        ])
        .unwrap();
        let MedAction::Add { slots, taper, ranges, unit, .. } = action else {
            panic!("expected add");
        };
        assert_eq!(slots, vec![TimeSlot::Morning, TimeSlot::Bedtime]);
        assert_eq!(taper, Some(vec![20.0, 5.0, 5.0, 7.0]));
        assert!(ranges.is_empty());
        assert_eq!(unit, "mg");
    }

    #[test]
    fn add_parses_ranges() {
        let action = parse(&[
            "add", "meds.json", "--name", "X", "--dose", "10", "--slot", "noon,evening",
            "--range", "1:7:10", "--range", "8:14:5",
        ])
        .unwrap();
        let MedAction::Add { slots, ranges, .. } = action else {
            panic!("expected add");
        };
        assert_eq!(slots, vec![TimeSlot::Noon, TimeSlot::Evening]);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].start_day(), 8);
    }

    #[test]
    fn add_rejects_bad_input() {
        // No slot.
        assert!(parse(&["add", "m.json", "--name", "X", "--dose", "1"]).is_err());
        // Unknown slot.
        assert!(parse(&["add", "m.json", "--name", "X", "--dose", "1", "--slot", "lunch"]).is_err());
        // Taper and ranges together.
        assert!(parse(&[
            "add", "m.json", "--name", "X", "--dose", "1", "--slot", "noon", "--taper", "20", "5",
            "5", "7", "--range", "1:7:10",
        ])
        .is_err());
        // Inverted range.
        assert!(parse(&[
            "add", "m.json", "--name", "X", "--dose", "1", "--slot", "noon", "--range", "7:1:10",
        ])
        .is_err());
    }

    #[test]
    fn taper_args_are_validated() {
        assert!(gradual_from_args(&[20.0, 5.0, 5.0, 7.0]).is_ok());
        assert!(matches!(
            gradual_from_args(&[20.0, 5.0, 0.0, 7.0]),
            Err(ValidationError::NonPositiveStep(_))
        ));
        assert!(matches!(
            gradual_from_args(&[20.0, 5.0, 5.0, 0.0]),
            Err(ValidationError::IntervalTooShort(0))
        ));
        assert!(gradual_from_args(&[20.0, 5.0, 5.0, 1.5]).is_err());
    }

    #[test]
    fn add_then_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("meds.json");
        run(parse(&[
            "add",
            file.to_str().unwrap(),
            "--name",
            "Aspirin",
            "--dose",
            "81",
            "--slot",
            "morning",
        ])
        .unwrap())
        .unwrap();
        let entries = load_entries(&file).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Aspirin");

        let id = entries[0].id.to_string();
        run(parse(&["remove", file.to_str().unwrap(), &id]).unwrap()).unwrap();
        assert!(load_entries(&file).unwrap().is_empty());

        // Second removal finds nothing.
        assert!(run(parse(&["remove", file.to_str().unwrap(), &id]).unwrap()).is_err());
    }

    #[test]
    fn add_rejects_unusable_base_dose() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("meds.json");
        let path = file.to_str().unwrap();
        for dose in ["NaN", "-5", "inf"] {
            let action = parse(&[
                "add", path, "--name", "Aspirin", "--dose", dose, "--slot", "morning",
            ])
            .unwrap();
            let err = run(action).unwrap_err().to_string();
            assert!(err.contains("'dose'"), "{err}");
        }
        assert!(!file.exists());
    }

    #[test]
    fn list_line_marks_manual_entries() {
        let entry = MedicationEntry::new(
            "Tea",
            Dose::new(1.0, "cup"),
            [TimeSlot::Evening, TimeSlot::Morning],
            Provenance::Unverified,
            Utc::now(),
        );
        let line = list_line(&entry);
        assert!(line.contains("Tea (Manual)  1 cup  [Morning, Evening]"));
    }
}
