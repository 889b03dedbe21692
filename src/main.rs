mod analyzer;
mod config;
mod driver;
mod error;
mod fork;
mod github;
mod report;
#[cfg(test)]
mod test_utils;

use analyzer::ForkAnalyzer;
use clap::Parser;
use config::Config;
use github::client::ApiClient;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fork-scout", about = "Rank the forks of a GitHub project")]
struct Cli {
    #[arg(long, short, help = "Path to config file")]
    config: Option<PathBuf>,

    #[arg(long, short, help = "Where to write the Markdown report")]
    output: Option<PathBuf>,

    #[arg(long = "owner", help = "Fork owner to analyze (repeatable, replaces the configured list)")]
    owners: Vec<String>,

    #[arg(long, help = "Print the resolved configuration as TOML and exit")]
    print_config: bool,
}

// Requests are strictly sequential, so a single-threaded runtime is all that's needed
#[tokio::main(flavor = "current_thread")]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config);
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if !cli.owners.is_empty() {
        config.owners = cli.owners;
    }
    config.validate()?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let client = ApiClient::from_config(&config)?;
    let analyzer = ForkAnalyzer::new(client, &config);
    driver::run(&config, &analyzer).await?;

    Ok(())
}
