use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caption_scribe::cli::{Cli, Commands};
use caption_scribe::config::Config;
use caption_scribe::pipeline::{TranscriptPipeline, TranscriptRequest};
use caption_scribe::utils;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "capscribe=debug,caption_scribe=debug"
    } else {
        "capscribe=info,caption_scribe=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().await?;

    match cli.command {
        Commands::Generate {
            reference,
            language,
            punctuate,
            output,
            filename,
            open,
        } => {
            let pipeline = TranscriptPipeline::new(&config)?.with_quiet(cli.quiet);

            let request = TranscriptRequest {
                reference,
                language: language.unwrap_or_else(|| config.app.default_language.clone()),
                punctuate,
                file_name: filename,
            };

            let outcome = match pipeline.generate(&request).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    eprintln!("{} {}", console::style("error:").red().bold(), err);
                    std::process::exit(1);
                }
            };

            if let Some(warning) = &outcome.punctuation_warning {
                eprintln!("{} {}", console::style("warning:").yellow().bold(), warning);
            }

            let output_dir = output.unwrap_or_else(|| config.app.output_dir.clone());
            let published = match outcome.artifact.publish_to(&output_dir) {
                Ok(path) => path,
                Err(err) => {
                    eprintln!("{} {}", console::style("error:").red().bold(), err);
                    std::process::exit(1);
                }
            };

            println!("Transcript saved to: {}", published.display());

            if open {
                utils::open_file(&published).await?;
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                config.interactive_setup().await?;
            }
        }
    }

    Ok(())
}
