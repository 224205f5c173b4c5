use thiserror::Error;

/// Failures visible to callers of [`crate::orchestrator::Extractor::extract`].
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input did not contain a recognizable 11-character video id.
    #[error("not a valid YouTube URL or video id: {0}")]
    InvalidVideoId(String),

    /// Every source and language candidate was exhausted without captions.
    #[error("no captions found for video {0}")]
    NoCaptionsFound(String),
}

/// Failures of a single caption source attempt. The orchestrator recovers
/// from all of these by advancing to the next source or language.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source answered but has no captions for this video/language.
    #[error("no captions available")]
    NoCaptionsFound,

    /// The source responded with something unusable.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Transport-level failure reaching the source.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl SourceError {
    pub fn is_no_captions(&self) -> bool {
        matches!(self, SourceError::NoCaptionsFound)
    }
}

/// A timestamp string that does not match `HH:MM:SS,mmm`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed SRT timestamp: {0:?}")]
pub struct MalformedTimestamp(pub String);
