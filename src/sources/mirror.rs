use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::config::Config;
use crate::error::SourceError;
use crate::sources::{CaptionSource, USER_AGENT};
use crate::{RawCue, SourceKind, VideoId, timecode};

/// Phrase the mirror answers with when a video has no transcript.
const NO_CAPTIONS_SENTINEL: &str = "no captions";

/// Third-party transcript mirror answering with a JSON array of
/// `{start, duration, text}` entries. Language is whatever the mirror has;
/// the requested candidate is not forwarded.
pub struct MirrorSource {
    client: reqwest::Client,
    mirror_base: String,
}

impl MirrorSource {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        MirrorSource {
            client,
            mirror_base: config.mirror_base.clone(),
        }
    }
}

#[async_trait]
impl CaptionSource for MirrorSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Mirror
    }

    async fn fetch(&self, video_id: &VideoId, _lang: &str) -> Result<Vec<RawCue>, SourceError> {
        let url = format!("{}/?server_vid={}", self.mirror_base, video_id);
        debug!("querying transcript mirror: {url}");

        let body = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        cues_from_body(&body)
    }
}

fn cues_from_body(body: &str) -> Result<Vec<RawCue>, SourceError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        if body.to_lowercase().contains(NO_CAPTIONS_SENTINEL) {
            return Err(SourceError::NoCaptionsFound);
        }
        return Err(SourceError::Upstream("mirror returned a non-JSON response".to_string()));
    };

    let Some(items) = value.as_array() else {
        return Err(SourceError::Upstream("mirror response is not an array".to_string()));
    };

    let cues: Vec<RawCue> = items.iter().filter_map(cue_from_item).collect();
    if cues.is_empty() {
        return Err(SourceError::NoCaptionsFound);
    }
    Ok(cues)
}

fn cue_from_item(item: &Value) -> Option<RawCue> {
    let start = number_field(item, "start")?;
    let duration = number_field(item, "duration")?;
    if start < 0.0 || duration < 0.0 {
        return None;
    }
    let text = item.get("text")?.as_str()?.trim().to_string();
    if text.is_empty() {
        return None;
    }

    Some(RawCue {
        index: None,
        start,
        end: timecode::end_seconds(start, duration),
        text,
    })
}

/// The mirror is inconsistent about numeric fields: sometimes numbers,
/// sometimes quoted strings.
fn number_field(item: &Value, key: &str) -> Option<f64> {
    let value = item.get(key)?;
    value.as_f64().or_else(|| value.as_str()?.parse().ok())
}
