use clap::Subcommand;
use medsched_core::{build, preview_text, GradualPlan};

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Preview the steps of a gradual schedule without saving it
    Preview {
        /// Starting dose
        #[arg(long)]
        start: f64,
        /// Final dose
        #[arg(long)]
        target: f64,
        /// Dose change per step
        #[arg(long)]
        step: f64,
        /// Days between steps
        #[arg(long)]
        every: u32,
        /// Dose unit
        #[arg(long, default_value = "mg")]
        unit: String,
        /// Print every breakpoint as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Preview {
            start,
            target,
            step,
            every,
            unit,
            json,
        } => {
            let plan = GradualPlan::new(start, target, step, every)?;
            let breakpoints = build(&plan);
            if json {
                println!("{}", serde_json::to_string_pretty(&breakpoints)?);
            } else {
                println!("{}", preview_text(&breakpoints, &unit));
            }
        }
    }
    Ok(())
}
