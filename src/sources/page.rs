use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SourceError;
use crate::sources::{CaptionSource, CaptionTrack, USER_AGENT, select_track};
use crate::{RawCue, SourceKind, VideoId, xml};

static CAPTION_TRACKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""captionTracks":\s*(\[.*?\])"#).unwrap());

#[derive(Debug, Deserialize)]
struct PageTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Last-resort source: scrape the caption track list embedded in the watch
/// page's player JSON, then fetch the selected track's payload URL.
pub struct WatchPageSource {
    client: reqwest::Client,
    watch_base: String,
}

impl WatchPageSource {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        WatchPageSource {
            client,
            watch_base: config.watch_base.clone(),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let body = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl CaptionSource for WatchPageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::WatchPage
    }

    async fn fetch(&self, video_id: &VideoId, lang: &str) -> Result<Vec<RawCue>, SourceError> {
        let url = format!("{}/watch?v={}", self.watch_base, video_id);
        debug!("fetching watch page: {url}");
        let html = self.get_text(&url).await?;

        let tracks = extract_caption_tracks(&html)?;
        let track = select_track(&tracks, lang).ok_or(SourceError::NoCaptionsFound)?;
        debug!("watch page picked track {}", track.language_code);

        let payload = self.get_text(&track.handle).await?;
        let cues = xml::parse(&payload);
        if cues.is_empty() {
            return Err(SourceError::NoCaptionsFound);
        }
        Ok(cues)
    }
}

/// Locate and decode the embedded `"captionTracks": [...]` list.
///
/// The capture must parse as JSON against a typed track shape. The one
/// tolerated variant is backslash-escaped quotes, which appear when the
/// list sits inside a quoted script string. Anything else fails closed as
/// an upstream error; no text-level repair is attempted on this data.
fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, SourceError> {
    let Some(caps) = CAPTION_TRACKS.captures(html) else {
        return Err(SourceError::NoCaptionsFound);
    };
    let raw = &caps[1];

    let parsed: Vec<PageTrack> = serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(&raw.replace("\\\"", "\"")))
        .map_err(|e| SourceError::Upstream(format!("embedded caption track data unparseable: {e}")))?;

    if parsed.is_empty() {
        return Err(SourceError::NoCaptionsFound);
    }

    Ok(parsed
        .into_iter()
        .map(|track| CaptionTrack {
            language_code: track.language_code,
            handle: track.base_url,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caption_tracks() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","vssId":".en","languageCode":"en","kind":"asr"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=fr","vssId":".fr","languageCode":"fr"}]}}};</script>"#;
        let tracks = extract_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(
            tracks[0].handle,
            "https://www.youtube.com/api/timedtext?v=abc&lang=en"
        );
        assert_eq!(tracks[1].language_code, "fr");
    }

    #[test]
    fn test_extract_escaped_caption_tracks() {
        let html = r#"data = "{"captionTracks": [{\"baseUrl\":\"https://yt.example/tt?lang=en\",\"languageCode\":\"en\"}]}""#;
        let tracks = extract_caption_tracks(html).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].handle, "https://yt.example/tt?lang=en");
    }

    #[test]
    fn test_missing_marker_means_no_captions() {
        let html = "<html><body>nothing embedded here</body></html>";
        assert!(matches!(
            extract_caption_tracks(html),
            Err(SourceError::NoCaptionsFound)
        ));
    }

    #[test]
    fn test_unparseable_capture_fails_closed() {
        // Single-quoted pseudo-JSON must not be repaired into a parse.
        let html = r#""captionTracks": [{'baseUrl': 'x', 'languageCode': 'en'}]"#;
        assert!(matches!(
            extract_caption_tracks(html),
            Err(SourceError::Upstream(_))
        ));
    }

    #[test]
    fn test_empty_track_list_means_no_captions() {
        let html = r#""captionTracks": []"#;
        assert!(matches!(
            extract_caption_tracks(html),
            Err(SourceError::NoCaptionsFound)
        ));
    }
}
