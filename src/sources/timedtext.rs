use async_trait::async_trait;
use log::debug;

use crate::config::Config;
use crate::error::SourceError;
use crate::sources::{CaptionSource, USER_AGENT};
use crate::{RawCue, SourceKind, VideoId, xml};

/// The public timedtext endpoint: a fixed-shape URL answering with caption
/// XML. Videos without a track in the requested language get an empty body.
pub struct TimedTextSource {
    client: reqwest::Client,
    timedtext_base: String,
}

impl TimedTextSource {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        TimedTextSource {
            client,
            timedtext_base: config.timedtext_base.clone(),
        }
    }
}

#[async_trait]
impl CaptionSource for TimedTextSource {
    fn kind(&self) -> SourceKind {
        SourceKind::TimedText
    }

    async fn fetch(&self, video_id: &VideoId, lang: &str) -> Result<Vec<RawCue>, SourceError> {
        // The endpoint has no automatic mode; English stands in for it.
        let lang = if lang == "auto" { "en" } else { lang };
        let url = format!("{}?lang={}&v={}", self.timedtext_base, lang, video_id);
        debug!("querying timedtext endpoint: {url}");

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
    if body.trim().is_empty() {
        return Err(SourceError::NoCaptionsFound);
    }

    let cues = xml::parse(body);
    if cues.is_empty() {
        return Err(SourceError::NoCaptionsFound);
    }
    Ok(cues)
}
