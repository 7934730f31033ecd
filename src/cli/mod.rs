use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "capscribe",
    about = "Caption Scribe - Fetch YouTube caption tracks and turn them into readable transcripts",
    version,
    long_about = "A CLI tool that downloads the caption track of a YouTube video, assembles it into continuous text, optionally restores punctuation and capitalization through an external model, and saves the result as a Markdown file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a transcript for a video
    Generate {
        /// Video URL or bare video id
        #[arg(value_name = "URL_OR_ID")]
        reference: String,

        /// Language code for the caption track
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,

        /// Restore punctuation and capitalization with the configured model
        #[arg(short, long)]
        punctuate: bool,

        /// Directory the transcript file is written into
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Custom file name, without extension (defaults to the video title)
        #[arg(short, long, value_name = "NAME")]
        filename: Option<String>,

        /// Open the generated file with the default application
        #[arg(short = 'a', long)]
        open: bool,
    },

    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}
