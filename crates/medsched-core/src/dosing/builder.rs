//! Breakpoint construction for gradual (taper/increase) schedules.
//!
//! Inputs are validated into a [`GradualPlan`] first; [`build`] only accepts
//! a plan, so a zero or negative step can never reach the stepping loop.

use crate::error::ValidationError;
use crate::medication::{format_dose, Breakpoint, Direction};

/// Upper bound on the number of breakpoints a single schedule may have.
pub const MAX_BREAKPOINTS: usize = 1000;

/// Largest dose accepted for a gradual schedule.
pub const MAX_DOSE: f64 = 1_000_000.0;

/// Relative tolerance for deciding that a step has reached the target.
const TARGET_EPSILON: f64 = 1e-9;

/// Number of steps shown by [`preview_text`] before summarizing.
const PREVIEW_STEPS: usize = 5;

/// Validated parameters of a gradual schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradualPlan {
    start_dose: f64,
    target_dose: f64,
    step_amount: f64,
    step_interval_days: u32,
}

impl GradualPlan {
    /// # Errors
    ///
    /// - [`ValidationError::InvalidValue`] if a dose is negative, not finite,
    ///   or above [`MAX_DOSE`]
    /// - [`ValidationError::NonPositiveStep`] if `step_amount` is not > 0
    /// - [`ValidationError::IntervalTooShort`] if `step_interval_days` is 0
    /// - [`ValidationError::TooManySteps`] if reaching the target would need
    ///   more than [`MAX_BREAKPOINTS`] breakpoints
    pub fn new(
        start_dose: f64,
        target_dose: f64,
        step_amount: f64,
        step_interval_days: u32,
    ) -> Result<Self, ValidationError> {
        check_dose("start_dose", start_dose)?;
        check_dose("target_dose", target_dose)?;
        if !step_amount.is_finite() || step_amount <= 0.0 {
            return Err(ValidationError::NonPositiveStep(step_amount));
        }
        if step_interval_days < 1 {
            return Err(ValidationError::IntervalTooShort(step_interval_days));
        }

        let needed = ((start_dose - target_dose).abs() / step_amount).ceil() as u64;
        // One extra breakpoint for day 0.
        if needed.saturating_add(1) > MAX_BREAKPOINTS as u64 {
            return Err(ValidationError::TooManySteps {
                needed,
                limit: MAX_BREAKPOINTS,
            });
        }

        Ok(Self {
            start_dose,
            target_dose,
            step_amount,
            step_interval_days,
        })
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

    pub fn direction(&self) -> Direction {
        Direction::infer(self.start_dose, self.target_dose)
    }
}

pub(crate) fn check_dose(field: &str, dose: f64) -> Result<(), ValidationError> {
    if !dose.is_finite() || dose < 0.0 || dose > MAX_DOSE {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("must be between 0 and {MAX_DOSE}, got {dose}"),
        });
    }
    Ok(())
}

/// Compute the breakpoints of a gradual schedule.
///
/// Starts at day 0 with the start dose and moves one step toward the target
/// every interval. The step that would reach or pass the target emits the
/// target itself, so the sequence never overshoots and always ends exactly on
/// the target. Equal start and target give a single breakpoint.
pub fn build(plan: &GradualPlan) -> Vec<Breakpoint> {
    let target = plan.target_dose;
    let mut breakpoints = vec![Breakpoint {
        day: 0,
        dose: plan.start_dose,
    }];
    if plan.start_dose == target {
        return breakpoints;
    }

    let direction = plan.direction();
    let interval = i64::from(plan.step_interval_days);
    // Absorbs float noise around the target.
    let tolerance = TARGET_EPSILON * target.abs().max(1.0);
    let mut previous = plan.start_dose;

    for k in 1..MAX_BREAKPOINTS {
        let day = k as i64 * interval;
        // Computed from the start each time so rounding does not accumulate.
        let moved = k as f64 * plan.step_amount;
        let next = match direction {
            Direction::Taper => plan.start_dose - moved,
            Direction::Increase => plan.start_dose + moved,
        };
        let reached = match direction {
            Direction::Taper => next <= target + tolerance,
            Direction::Increase => next >= target - tolerance,
        };
        // A step below float resolution would stall; finish on the target.
        if reached || next == previous {
            breakpoints.push(Breakpoint { day, dose: target });
            return breakpoints;
        }
        breakpoints.push(Breakpoint { day, dose: next });
        previous = next;
    }

    breakpoints.push(Breakpoint {
        day: MAX_BREAKPOINTS as i64 * interval,
        dose: target,
    });
    breakpoints
}

/// Short human-readable summary shown when a schedule is being set up:
/// `Day 1: 20mg → Day 8: 15mg → ...`.
pub fn preview_text(breakpoints: &[Breakpoint], unit: &str) -> String {
    let mut text = breakpoints
        .iter()
        .take(PREVIEW_STEPS)
        .map(|bp| format!("Day {}: {}{}", bp.day + 1, format_dose(bp.dose), unit))
        .collect::<Vec<_>>()
        .join(" → ");
    if breakpoints.len() > PREVIEW_STEPS {
        text.push_str(&format!(" → ... ({} steps total)", breakpoints.len()));
    }
    text
}
