use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::VideoId;
use crate::config::Config;
use crate::error::SourceError;
use crate::sources::USER_AGENT;

static OG_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<meta property="og:title" content="([^"]*)""#).unwrap());
static OG_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<meta property="og:description" content="([^"]*)""#).unwrap());
static CHANNEL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<link itemprop="name" content="([^"]*)""#).unwrap());

/// Display metadata for a video. Purely informational; extraction never
/// depends on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub description: String,
}

impl VideoInfo {
    /// Stand-in when every lookup failed. The thumbnail URL is derivable
    /// from the id alone, so at least that field is real.
    pub fn placeholder(video_id: &VideoId) -> Self {
        VideoInfo {
            title: String::new(),
            channel: String::new(),
            thumbnail: thumbnail_url(video_id),
            description: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Best-effort metadata lookup: the Data API when a key is configured,
/// then the watch page's meta tags, then a placeholder. Never fails.
pub async fn fetch_video_info(client: &reqwest::Client, config: &Config, video_id: &VideoId) -> VideoInfo {
    if let Some(key) = config.api_key.as_deref() {
        match fetch_via_api(client, &config.api_base, key, video_id).await {
            Ok(info) => return info,
            Err(e) => debug!("video info via data api failed: {e}"),
        }
    }

    match fetch_via_page(client, &config.watch_base, video_id).await {
        Ok(info) => info,
        Err(e) => {
            warn!("video info lookup failed for {video_id}: {e}");
            VideoInfo::placeholder(video_id)
        }
    }
}

async fn fetch_via_api(
    client: &reqwest::Client,
    api_base: &str,
    key: &str,
    video_id: &VideoId,
) -> Result<VideoInfo, SourceError> {
    let url = format!("{api_base}/videos?part=snippet&id={video_id}&key={key}");
    let response: VideoListResponse = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::Upstream("video not found".to_string()))?;

    Ok(info_from_snippet(item.snippet, video_id))
}

async fn fetch_via_page(
    client: &reqwest::Client,
    watch_base: &str,
    video_id: &VideoId,
) -> Result<VideoInfo, SourceError> {
    let url = format!("{watch_base}/watch?v={video_id}");
    let html = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    Ok(info_from_page(&html, video_id))
}

fn info_from_snippet(snippet: VideoSnippet, video_id: &VideoId) -> VideoInfo {
    let thumbnail = snippet
        .thumbnails
        .high
        .map(|t| t.url)
        .unwrap_or_else(|| thumbnail_url(video_id));

    VideoInfo {
        title: snippet.title,
        channel: snippet.channel_title,
        thumbnail,
        description: snippet.description,
    }
}

fn info_from_page(html: &str, video_id: &VideoId) -> VideoInfo {
    let capture = |re: &Regex| {
        re.captures(html)
            .map(|caps| html_escape::decode_html_entities(&caps[1]).into_owned())
            .unwrap_or_default()
    };

    VideoInfo {
        title: capture(&OG_TITLE),
        channel: capture(&CHANNEL_NAME),
        thumbnail: thumbnail_url(video_id),
        description: capture(&OG_DESCRIPTION),
    }
}

fn thumbnail_url(video_id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg")
}
