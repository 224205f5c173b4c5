use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Srt,
}

#[derive(Parser)]
#[command(
    name = "ytcap",
    about = "YouTube caption extractor",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Preferred caption language code, or "auto" to fall back across
    /// common languages (default: auto)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Output format: text (default), json, srt
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overall deadline for one extraction, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Show video metadata and extraction details
    #[arg(short, long)]
    pub verbose: bool,
}
