//! Dosage-change regimens attached to a medication entry.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::dosing::builder::{self, GradualPlan};
use crate::error::ValidationError;

/// A day offset at which a gradual schedule's dose changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub day: i64,
    pub dose: f64,
}

/// Direction of a gradual schedule, derived from its start and target doses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Taper,
    Increase,
}

impl Direction {
    /// Taper when the dose goes down, increase otherwise.
    pub fn infer(start_dose: f64, target_dose: f64) -> Self {
        if start_dose > target_dose {
            Direction::Taper
        } else {
            Direction::Increase
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Taper => "↓",
            Direction::Increase => "↑",
        }
    }
}

/// Taper or increase by a fixed amount every N days.
///
/// Breakpoints are computed once, at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradualSchedule {
    start_dose: f64,
    target_dose: f64,
    step_amount: f64,
    step_interval_days: u32,
    breakpoints: Vec<Breakpoint>,
}

impl GradualSchedule {
    /// Validate the parameters and build the breakpoints.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for non-positive steps, intervals shorter
    /// than a day, invalid doses, or plans with too many steps.
    pub fn new(
        start_dose: f64,
        target_dose: f64,
        step_amount: f64,
        step_interval_days: u32,
    ) -> Result<Self, ValidationError> {
        let plan = GradualPlan::new(start_dose, target_dose, step_amount, step_interval_days)?;
        Ok(Self::from_plan(&plan))
    }

    pub fn from_plan(plan: &GradualPlan) -> Self {
        Self {
            start_dose: plan.start_dose(),
            target_dose: plan.target_dose(),
            step_amount: plan.step_amount(),
            step_interval_days: plan.step_interval_days(),
            breakpoints: builder::build(plan),
        }
    }

    pub fn start_dose(&self) -> f64 {
        self.start_dose
    }

    pub fn target_dose(&self) -> f64 {
        self.target_dose
    }

    pub fn step_amount(&self) -> f64 {
        self.step_amount
    }

    pub fn step_interval_days(&self) -> u32 {
        self.step_interval_days
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn direction(&self) -> Direction {
        Direction::infer(self.start_dose, self.target_dose)
    }
}

/// A dose held for an inclusive span of 1-based days (day 1 = anchor day).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseRange {
    start_day: u32,
    end_day: u32,
    dose: f64,
}

impl DoseRange {
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRange`] if `start_day` is 0, the range
    /// ends before it starts, or the dose is negative or not finite.
    pub fn new(start_day: u32, end_day: u32, dose: f64) -> Result<Self, ValidationError> {
        let invalid = |message: &str| ValidationError::InvalidRange {
            start_day,
            end_day,
            message: message.into(),
        };
        if start_day == 0 {
            return Err(invalid("days are numbered from 1"));
        }
        if end_day < start_day {
            return Err(invalid("range ends before it starts"));
        }
        if !dose.is_finite() || dose < 0.0 {
            return Err(invalid("dose must be a non-negative number"));
        }
        Ok(Self {
            start_day,
            end_day,
            dose,
        })
    }

    pub fn start_day(&self) -> u32 {
        self.start_day
    }

    pub fn end_day(&self) -> u32 {
        self.end_day
    }

    pub fn dose(&self) -> f64 {
        self.dose
    }

    /// Whether the 1-based `day_number` falls inside the range.
    pub fn contains(&self, day_number: i64) -> bool {
        i64::from(self.start_day) <= day_number && day_number <= i64::from(self.end_day)
    }
}

/// Parses `FROM:TO:DOSE`, e.g. `1:7:10`.
impl FromStr for DoseRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::InvalidValue {
            field: "range".into(),
            message: format!("expected FROM:TO:DOSE, got '{s}'"),
        };
        let mut parts = s.split(':').map(str::trim);
        let (Some(from), Some(to), Some(dose), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        let start_day = from.parse::<u32>().map_err(|_| malformed())?;
        let end_day = to.parse::<u32>().map_err(|_| malformed())?;
        let dose = dose.parse::<f64>().map_err(|_| malformed())?;
        DoseRange::new(start_day, end_day, dose)
    }
}

/// Explicit doses for explicit day ranges, checked in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRanges {
    ranges: Vec<DoseRange>,
}

impl CustomRanges {
    pub fn new(ranges: Vec<DoseRange>) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &[DoseRange] {
        &self.ranges
    }
}

/// How the dose of an entry changes over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleDefinition {
    Gradual(GradualSchedule),
    Custom(CustomRanges),
}

impl ScheduleDefinition {
    /// False for data the resolver can only answer with the base dose:
    /// a gradual schedule without ascending breakpoints, or custom ranges
    /// that are empty or out of order.
    pub fn is_coherent(&self) -> bool {
        match self {
            ScheduleDefinition::Gradual(gradual) => {
                let points = gradual.breakpoints();
                !points.is_empty() && points.windows(2).all(|w| w[0].day < w[1].day)
            }
            ScheduleDefinition::Custom(custom) => {
                !custom.ranges().is_empty()
                    && custom
                        .ranges()
                        .iter()
                        .all(|r| r.start_day >= 1 && r.start_day <= r.end_day)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_inferred() {
        assert_eq!(Direction::infer(20.0, 5.0), Direction::Taper);
        assert_eq!(Direction::infer(5.0, 20.0), Direction::Increase);
    }

    #[test]
    fn range_parsing() {
        let range: DoseRange = "8:14:2.5".parse().unwrap();
        assert_eq!(range.start_day(), 8);
        assert_eq!(range.end_day(), 14);
        assert_eq!(range.dose(), 2.5);

        assert!("8:14".parse::<DoseRange>().is_err());
        assert!("8:14:2:1".parse::<DoseRange>().is_err());
        assert!("0:3:1".parse::<DoseRange>().is_err());
        assert!("9:3:1".parse::<DoseRange>().is_err());
        assert!("1:3:-1".parse::<DoseRange>().is_err());
    }

    #[test]
    fn range_contains_is_inclusive() {
        let range = DoseRange::new(8, 14, 5.0).unwrap();
        assert!(!range.contains(7));
        assert!(range.contains(8));
        assert!(range.contains(14));
        assert!(!range.contains(15));
    }

    #[test]
    fn schedule_serializes_with_type_tag() {
        let schedule = ScheduleDefinition::Custom(CustomRanges::new(vec![
            DoseRange::new(1, 7, 10.0).unwrap(),
        ]));
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["type"], "custom");
        assert_eq!(json["ranges"][0]["end_day"], 7);
    }

    #[test]
    fn malformed_schedules_are_detected() {
        let empty_gradual: ScheduleDefinition = serde_json::from_str(
            r#"{"type":"gradual","start_dose":20,"target_dose":5,"step_amount":5,"step_interval_days":7,"breakpoints":[]}"#,
        )
        .unwrap();
        assert!(!empty_gradual.is_coherent());

        let inverted: ScheduleDefinition = serde_json::from_str(
            r#"{"type":"custom","ranges":[{"start_day":9,"end_day":3,"dose":1}]}"#,
        )
        .unwrap();
        assert!(!inverted.is_coherent());

        let fine = ScheduleDefinition::Gradual(GradualSchedule::new(20.0, 5.0, 5.0, 7).unwrap());
        assert!(fine.is_coherent());
    }
}
