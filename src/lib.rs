pub mod config;
pub mod error;
pub mod merge;
pub mod orchestrator;
pub mod output;
pub mod sources;
pub mod srt;
pub mod timecode;
pub mod video_info;
pub mod xml;

use std::fmt;

use serde::Serialize;

pub use crate::error::{ExtractError, SourceError};
pub use crate::orchestrator::Extractor;

/// A validated 11-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoId(String);

impl VideoId {
    /// Extract a video id from various YouTube URL formats or accept a
    /// bare 11-character id.
    pub fn parse(input: &str) -> Result<Self, ExtractError> {
        let input = input.trim();

        // Bare 11-character video ID
        if regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap().is_match(input) {
            return Ok(VideoId(input.to_string()));
        }

        // youtube.com/watch?v=ID
        if let Some(caps) = regex::Regex::new(r"(?:youtube\.com/watch\?.*v=)([a-zA-Z0-9_-]{11})")
            .unwrap()
            .captures(input)
        {
            return Ok(VideoId(caps[1].to_string()));
        }

        // youtu.be/ID
        if let Some(caps) = regex::Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})")
            .unwrap()
            .captures(input)
        {
            return Ok(VideoId(caps[1].to_string()));
        }

        // youtube.com/embed/ID
        if let Some(caps) = regex::Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{11})")
            .unwrap()
            .captures(input)
        {
            return Ok(VideoId(caps[1].to_string()));
        }

        // youtube.com/v/ID
        if let Some(caps) = regex::Regex::new(r"youtube\.com/v/([a-zA-Z0-9_-]{11})")
            .unwrap()
            .captures(input)
        {
            return Ok(VideoId(caps[1].to_string()));
        }

        // youtube.com/shorts/ID
        if let Some(caps) = regex::Regex::new(r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})")
            .unwrap()
            .captures(input)
        {
            return Ok(VideoId(caps[1].to_string()));
        }

        Err(ExtractError::InvalidVideoId(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Requested caption language: a concrete code, or automatic fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguagePreference {
    Auto,
    Specific(String),
}

impl LanguagePreference {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            LanguagePreference::Auto
        } else {
            LanguagePreference::Specific(s.to_string())
        }
    }

    /// The language string sources receive; `"auto"` for the automatic mode.
    pub fn code(&self) -> &str {
        match self {
            LanguagePreference::Auto => "auto",
            LanguagePreference::Specific(code) => code,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, LanguagePreference::Auto)
    }
}

impl fmt::Display for LanguagePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single timed caption cue as parsed from a source payload.
///
/// Cue sequences keep the order they appeared in the payload, which is not
/// guaranteed to be monotonic in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawCue {
    /// Sequence number when the source format carries one.
    pub index: Option<u32>,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    pub text: String,
}

impl RawCue {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A reading-optimized paragraph merged from one or more adjacent cues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedSegment {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    pub text: String,
    /// The cues this segment was built from, in order.
    pub cues: Vec<RawCue>,
}

/// Which caption source produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    DataApi,
    TimedText,
    Mirror,
    WatchPage,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::DataApi => write!(f, "data-api"),
            SourceKind::TimedText => write!(f, "timedtext"),
            SourceKind::Mirror => write!(f, "mirror"),
            SourceKind::WatchPage => write!(f, "watch-page"),
        }
    }
}

/// Merged transcript for a video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: VideoId,
    /// The language candidate that won; `"auto"` when the final page
    /// extraction state produced the transcript.
    pub language: String,
    pub source: SourceKind,
    pub segments: Vec<MergedSegment>,
}
