mod cli;
mod config;
mod delegate;
mod download;
mod extract;
mod harvest;
mod merge;
mod release;
mod types;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::{Aggregator, ExtractionPolicy, HarvestConfig};
use release::ReleaseRef;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;

    match cli.command {
        Commands::Version => {
            println!("relharvest v{}", env!("CARGO_PKG_VERSION"));
        }

        Commands::Run {
            release_url,
            out_dir,
            keep_archives,
            strict,
            delegate,
            interpreter,
        } => {
            let reference = match ReleaseRef::parse(&release_url) {
                Ok(reference) => reference,
                Err(e) => {
                    tracing::error!("{}", e);
                    eprintln!(
                        "Usage: relharvest run https://github.com/<owner>/<repo>/releases/tag/<tag>"
                    );
                    std::process::exit(1);
                }
            };

            let mut config = HarvestConfig::from_env();
            if let Some(dir) = out_dir {
                config.output_dir = dir;
            }
            if keep_archives {
                config.keep_archives = true;
            }
            if strict {
                config.extraction = ExtractionPolicy::Strict;
            }
            if let Some(script) = delegate {
                config.aggregator = Aggregator::Delegate {
                    script,
                    interpreter,
                };
            }

            eprintln!("Harvesting {}...", reference);
            match harvest::run(&config, &reference).await {
                Ok(final_csv) => {
                    eprintln!("Harvest complete");
                    println!("{}", final_csv.display());
                }
                Err(e) => {
                    tracing::error!("Harvest of {} failed: {:#}", reference, e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Merge { dir, output } => match merge::merge_results(&dir, &output) {
            Ok(summary) => {
                eprintln!(
                    "Merged {} result file(s), {} data row(s)",
                    summary.files, summary.data_rows
                );
                println!("{}", output.display());
            }
            Err(e) => {
                tracing::error!("Merge failed: {:#}", e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}
