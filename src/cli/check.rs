use std::{path::PathBuf, process};

use chrono::NaiveDate;
use clap::Parser;
use portside::{ChangeReport, Config, Snapshot, engine, report};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Determine forward-port status for every open change")]
pub struct Check {
    /// Path to the snapshot file (JSON or YAML)
    snapshot: PathBuf,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Include per-release comparison evidence in the output
    #[arg(long)]
    detail: bool,

    /// Evaluate release support as of this date (defaults to today)
    #[arg(long, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Check {
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
        let reports = report::build(&inputs.changes, &aggregate, self.detail);

        if reports.is_empty() {
            println!("No changes target a supported release.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&reports);
                } else {
                    Self::output_table(&reports, self.detail);
                }
            }
        }

        // Exit with a non-zero code when any change needs attention.
        let missing = reports.iter().filter(|r| !r.forward_ported).count();
        if missing > 0 {
            process::exit(2);
        }

        Ok(())
    }

    fn output_quiet(reports: &[ChangeReport]) {
        for report in reports {
            let status = if report.forward_ported { "ok" } else { "missing" };
            println!("{} {} {}", report.number, status, report.base_ref);
        }
    }

    fn output_table(reports: &[ChangeReport], detail: bool) {
        let missing = reports.iter().filter(|r| !r.forward_ported).count();

        println!("Forward-port status ({} changes)", reports.len());
        println!("{}", "─".repeat(60).dim());

        for report in reports {
            if report.forward_ported {
                println!(
                    "#{:<6} {}  {} ({})",
                    report.number,
                    "ported ".success(),
                    report.title,
                    report.base_ref.dim(),
                );
            } else {
                println!(
                    "#{:<6} {}  {} ({})",
                    report.number,
                    "missing".warning(),
                    report.title,
                    report.base_ref.dim(),
                );
                for (version, covering) in &report.forward_ports {
                    if covering.is_empty() {
                        println!("        {version}: no covering change");
                    } else {
                        let numbers: Vec<String> =
                            covering.iter().map(|n| format!("#{n}")).collect();
                        println!("        {version}: partial, see {}", numbers.join(", "));
                    }
                }
            }

            if detail {
                Self::output_detail(report);
            }
        }

        println!();
        if missing == 0 {
            println!("All changes are forward-ported. {}", "✅".success());
        } else {
            println!(
                "{}",
                format!("{missing} change(s) missing a forward port ⚠️").warning()
            );
            println!("{}", "Run 'fpt labels' to plan label updates.".dim());
        }
    }

    fn output_detail(report: &ChangeReport) {
        let Some(details) = &report.details else {
            return;
        };

        for (version, detail) in details {
            println!("        {} required: {}", version, joined(&detail.slices));
            if !detail.discontinued.is_empty() {
                println!(
                    "        {} discontinued: {}",
                    version,
                    joined(&detail.discontinued)
                );
            }
            for comparison in &detail.comparisons {
                if comparison.forward_ported {
                    println!("          #{} covers it", comparison.newer);
                } else {
                    println!(
                        "          #{} lacks: {}",
                        comparison.newer,
                        joined(&comparison.missing)
                    );
                }
            }
        }
    }
}

fn joined(set: &std::collections::BTreeSet<String>) -> String {
    set.iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
