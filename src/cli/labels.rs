use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use portside::{Config, Snapshot, engine, report};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the label updates that would reconcile changes with their verdicts")]
pub struct Labels {
    /// Path to the snapshot file (JSON or YAML)
    snapshot: PathBuf,

    /// Evaluate release support as of this date (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Suppress the human-readable summary on stderr
    #[arg(long)]
    quiet: bool,
}

impl Labels {
    #[instrument(level = "debug", skip(self, config), fields(snapshot = %self.snapshot.display()))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let snapshot = Snapshot::load(&self.snapshot)?;
        let today = self
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let inputs = snapshot.into_inputs(today);

        let aggregate = engine::run(
            &inputs.catalog,
            &inputs.changes,
            &inputs.heads,
            &inputs.bases,
            &inputs.inventory,
            config,
        )?;
        let reports = report::build(&inputs.changes, &aggregate, false);
        let plan = report::label_plan(&reports);

        println!("{}", serde_json::to_string_pretty(&plan)?);

        if !self.quiet {
            if plan.is_empty() {
                eprintln!("{}", format!("No '{}' updates needed.", config.label()).dim());
            } else {
                eprintln!(
                    "{}",
                    format!(
                        "'{}': add to {} change(s), remove from {} change(s)",
                        config.label(),
                        plan.add_label.len(),
                        plan.remove_label.len(),
                    )
                    .warning()
                );
            }
        }

        Ok(())
    }
}
