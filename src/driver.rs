use crate::analyzer::ForkAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::fork::ForkRecord;
use crate::github::client::Transport;
use crate::report;
use std::io::Write;

const BANNER_WIDTH: usize = 60;

pub async fn run<T: Transport>(
    config: &Config,
    analyzer: &ForkAnalyzer<T>,
) -> Result<Vec<ForkRecord>> {
    run_with_output(config, analyzer, &mut std::io::stdout()).await
}

/// Console progress and the closing summary go to `out`; write or flush
/// failures there are returned as `Io` errors.
pub async fn run_with_output<T: Transport, W: Write>(
    config: &Config,
    analyzer: &ForkAnalyzer<T>,
    out: &mut W,
) -> Result<Vec<ForkRecord>> {
    let banner = "=".repeat(BANNER_WIDTH);
    writeln!(out, "{banner}")?;
    writeln!(out, "{} Fork Analysis", config.project)?;
    writeln!(out, "{banner}")?;
    writeln!(out, "Analyzing {} forks...", config.owners.len())?;
    writeln!(out)?;

    let mut records = Vec::with_capacity(config.owners.len());
    for owner in &config.owners {
        write!(out, "Analyzing {owner}...")?;
        out.flush()?;

        let record = analyzer.analyze(owner).await;
        match &record.error {
            None => writeln!(out, " ✓")?,
            Some(e) => writeln!(out, " ✗ ({e})")?,
        }
        records.push(record);
    }

    writeln!(out)?;
    writeln!(out, "Generating report...")?;

    let text = report::generate(&records, &config.project);
    std::fs::write(&config.output_path, text)?;
    tracing::info!(path = %config.output_path.display(), "report written");

    writeln!(out, "Report saved to: {}", config.output_path.display())?;
    writeln!(out)?;
    writeln!(out, "{}", report::console_summary(&records))?;
    out.flush()?;

    Ok(records)
}
