use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

use crate::config::Config;
use crate::error::SourceError;
use crate::sources::{CaptionSource, CaptionTrack, select_track};
use crate::{RawCue, SourceKind, VideoId, srt};

#[derive(Debug, Deserialize)]
struct CaptionListResponse {
    #[serde(default)]
    items: Vec<CaptionItem>,
}

#[derive(Debug, Deserialize)]
struct CaptionItem {
    id: String,
    snippet: CaptionSnippet,
}

#[derive(Debug, Deserialize)]
struct CaptionSnippet {
    language: String,
}

/// Caption lookup through the YouTube Data API v3: list the video's caption
/// tracks, pick one by language, download it in SRT form.
///
/// Requires an API key; without one this source reports an upstream error
/// so the chain moves on immediately.
pub struct DataApiSource {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
}

impl DataApiSource {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        DataApiSource {
            client,
            api_base: config.api_base.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn list_tracks(&self, video_id: &VideoId, key: &str) -> Result<Vec<CaptionTrack>, SourceError> {
        let url = format!(
            "{}/captions?part=snippet&videoId={}&key={}",
            self.api_base, video_id, key
        );
        let response: CaptionListResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(tracks_from_response(response))
    }

    async fn download_srt(&self, caption_id: &str, key: &str) -> Result<String, SourceError> {
        let url = format!("{}/captions/{}?tfmt=srt&key={}", self.api_base, caption_id, key);
        let payload = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(payload)
    }
}

#[async_trait]
impl CaptionSource for DataApiSource {
    fn kind(&self) -> SourceKind {
        SourceKind::DataApi
    }

    async fn fetch(&self, video_id: &VideoId, lang: &str) -> Result<Vec<RawCue>, SourceError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(SourceError::Upstream("no API key configured".to_string()));
        };

        let tracks = self.list_tracks(video_id, key).await?;
        if tracks.is_empty() {
            return Err(SourceError::NoCaptionsFound);
        }

        let track = select_track(&tracks, lang).ok_or(SourceError::NoCaptionsFound)?;
        debug!("data api picked caption {} ({})", track.handle, track.language_code);

        let payload = self.download_srt(&track.handle, key).await?;
        let cues = srt::parse(&payload);
        if cues.is_empty() {
            return Err(SourceError::NoCaptionsFound);
        }
        Ok(cues)
    }
}

fn tracks_from_response(response: CaptionListResponse) -> Vec<CaptionTrack> {
    response
        .items
        .into_iter()
        .map(|item| CaptionTrack {
            language_code: item.snippet.language,
            handle: item.id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_list_deserialization() {
        let body = r#"{
            "kind": "youtube#captionListResponse",
            "items": [
                {
                    "kind": "youtube#caption",
                    "id": "cap-id-1",
                    "snippet": {"videoId": "dQw4w9WgXcQ", "language": "en", "trackKind": "standard"}
                },
                {
                    "kind": "youtube#caption",
                    "id": "cap-id-2",
                    "snippet": {"videoId": "dQw4w9WgXcQ", "language": "zh-Hans", "trackKind": "asr"}
                }
            ]
        }"#;
        let response: CaptionListResponse = serde_json::from_str(body).unwrap();
        let tracks = tracks_from_response(response);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].handle, "cap-id-1");
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(tracks[1].language_code, "zh-Hans");
    }

    #[test]
    fn test_caption_list_without_items() {
        let response: CaptionListResponse = serde_json::from_str("{}").unwrap();
        assert!(tracks_from_response(response).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_without_api_key() {
        let config = Config::default();
        let source = DataApiSource::new(reqwest::Client::new(), &config);
        let video_id = VideoId::parse("dQw4w9WgXcQ").unwrap();

        let err = source.fetch(&video_id, "en").await.unwrap_err();
        assert!(matches!(err, SourceError::Upstream(_)));
    }
}
