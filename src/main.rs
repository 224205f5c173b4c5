use std::io::{self, BufRead};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytcap.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytcap")
        .join("logs")
}

fn build_after_help() -> String {
    let log_path = log_dir().join("ytcap.log");
    format!("Logs are written to: {}", log_path.display())
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    <OutputFormat as clap::ValueEnum>::from_str(s, true).ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let mut config = ytcap::config::Config::load().unwrap_or_default();
    if let Some(secs) = cli.timeout {
        config.extract_timeout_secs = secs;
    }

    // Apply config defaults (CLI flags take priority)
    let lang = cli
        .lang
        .clone()
        .or_else(|| config.default_lang.clone())
        .unwrap_or_else(|| "auto".to_string());
    let preference = ytcap::LanguagePreference::parse(&lang);

    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(parse_format))
        .unwrap_or(OutputFormat::Text);

    if cli.verbose {
        let config_path = ytcap::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        if let Some(ref default_lang) = config.default_lang {
            debug!("Config default_lang: {default_lang}");
        }
    }

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let extractor = ytcap::Extractor::with_client(client.clone(), &config);

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.is_empty() {
        bail!("no URL or video ID provided\n\nUsage: ytcap <URL>\n       echo <URL> | ytcap");
    }

    for url_input in &urls {
        let url_input = url_input.trim().to_string();
        if url_input.is_empty() {
            continue;
        }

        let video_id = ytcap::VideoId::parse(&url_input)
            .map_err(|e| eyre::eyre!("{e}\n\nSupported formats:\n  https://www.youtube.com/watch?v=ID\n  https://youtu.be/ID\n  https://www.youtube.com/embed/ID\n  https://www.youtube.com/v/ID\n  https://www.youtube.com/shorts/ID\n  <11-character video ID>"))?;
        debug!("Resolved video id {video_id} from {url_input}");

        let info = ytcap::video_info::fetch_video_info(&client, &config, &video_id).await;

        let transcript = tokio::time::timeout(
            config.extract_timeout(),
            extractor.extract(&video_id, &preference),
        )
        .await
        .map_err(|_| {
            eyre::eyre!(
                "extraction timed out after {}s for {video_id}",
                config.extract_timeout_secs
            )
        })??;

        if cli.verbose {
            eprintln!(
                "Video: {} ({})\nChannel: {}\nSource: {}\nLanguage: {}\nSegments: {}",
                info.title,
                transcript.video_id,
                info.channel,
                transcript.source,
                transcript.language,
                transcript.segments.len(),
            );
        }

        let rendered = match format {
            OutputFormat::Text => ytcap::output::render_text(&transcript),
            OutputFormat::Json => ytcap::output::render_json(&transcript, &info)?,
            OutputFormat::Srt => ytcap::output::render_srt(&transcript),
        };

        if let Some(ref path) = cli.output {
            std::fs::write(path, &rendered)?;
            if cli.verbose {
                eprintln!("Output written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }
    }

    Ok(())
}
