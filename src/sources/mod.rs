use async_trait::async_trait;

use crate::error::SourceError;
use crate::{RawCue, SourceKind, VideoId};

pub mod api;
pub mod mirror;
pub mod page;
pub mod timedtext;

pub use api::DataApiSource;
pub use mirror::MirrorSource;
pub use page::WatchPageSource;
pub use timedtext::TimedTextSource;

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// One strategy for acquiring raw caption cues from an upstream source.
///
/// Implementations surface every internal fault as a [`SourceError`] so the
/// chain can decide whether to advance; they never panic on bad payloads.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Which source this is, for priority bookkeeping and reporting.
    fn kind(&self) -> SourceKind;

    /// Fetch cues for a video in the given language candidate. `"auto"` is
    /// a valid candidate and each source interprets it its own way.
    async fn fetch(&self, video_id: &VideoId, lang: &str) -> Result<Vec<RawCue>, SourceError>;
}

/// A selectable caption track before its payload has been fetched.
///
/// `handle` is whatever the source needs to retrieve the payload: a caption
/// id for the Data API, a payload URL for page-embedded tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub handle: String,
}

/// Pick a track for the requested language.
///
/// `auto` and `en` accept any English variant; `zh` accepts the Chinese
/// track codes YouTube uses (`zh-*`, `cmn`, `yue`); anything else matches
/// by substring, so `pt` finds `pt-BR`. `auto` falls back to the first
/// listed track when nothing matches.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str) -> Option<&'a CaptionTrack> {
    let matched = match lang {
        "auto" | "en" => tracks.iter().find(|t| t.language_code.contains("en")),
        "zh" => tracks
            .iter()
            .find(|t| ["zh", "cmn", "yue"].iter().any(|code| t.language_code.contains(code))),
        _ => tracks.iter().find(|t| t.language_code.contains(lang)),
    };

    match matched {
        Some(track) => Some(track),
        None if lang == "auto" => tracks.first(),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str) -> CaptionTrack {
        CaptionTrack {
            language_code: code.to_string(),
            handle: format!("handle-{code}"),
        }
    }

    #[test]
    fn test_select_english_for_auto() {
        let tracks = vec![track("fr"), track("en-US"), track("de")];
        assert_eq!(select_track(&tracks, "auto").unwrap().language_code, "en-US");
    }

    #[test]
    fn test_select_english_variant_for_en() {
        let tracks = vec![track("ja"), track("en-GB")];
        assert_eq!(select_track(&tracks, "en").unwrap().language_code, "en-GB");
    }

    #[test]
    fn test_select_chinese_variants() {
        let tracks = vec![track("en"), track("zh-Hans")];
        assert_eq!(select_track(&tracks, "zh").unwrap().language_code, "zh-Hans");

        let tracks = vec![track("cmn-Hans-CN"), track("fr")];
        assert_eq!(select_track(&tracks, "zh").unwrap().language_code, "cmn-Hans-CN");

        let tracks = vec![track("yue"), track("fr")];
        assert_eq!(select_track(&tracks, "zh").unwrap().language_code, "yue");
    }

    #[test]
    fn test_select_by_substring() {
        let tracks = vec![track("en"), track("pt-BR")];
        assert_eq!(select_track(&tracks, "pt").unwrap().language_code, "pt-BR");
    }

    #[test]
    fn test_auto_falls_back_to_first_track() {
        let tracks = vec![track("fr"), track("de")];
        assert_eq!(select_track(&tracks, "auto").unwrap().language_code, "fr");
    }

    #[test]
    fn test_specific_language_missing_is_none() {
        let tracks = vec![track("fr"), track("de")];
        assert!(select_track(&tracks, "ko").is_none());
    }

    #[test]
    fn test_empty_track_list() {
        assert!(select_track(&[], "auto").is_none());
        assert!(select_track(&[], "en").is_none());
    }
}
