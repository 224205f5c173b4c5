use log::{debug, info, warn};

use crate::config::Config;
use crate::error::{ExtractError, SourceError};
use crate::merge;
use crate::sources::{self, CaptionSource};
use crate::{LanguagePreference, RawCue, SourceKind, Transcript, VideoId};

/// Language candidates probed, in order, when the preference is automatic
/// and English yielded nothing.
pub const FALLBACK_LANGUAGES: [&str; 8] = ["en", "zh", "es", "fr", "de", "ja", "ko", "ru"];

/// Drives the prioritized source chain and the language fallback ladder.
///
/// One `extract` call walks: the requested language across every source,
/// then (automatic mode only) English, then each fallback candidate, then
/// the watch page alone with no language constraint. The first source
/// returning a non-empty cue sequence wins. A source failure advances to
/// the next source, never aborts the walk.
pub struct Extractor {
    sources: Vec<Box<dyn CaptionSource>>,
}

impl Extractor {
    /// Build the production chain: Data API, timedtext endpoint, transcript
    /// mirror, watch page scrape, in that priority order.
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(SourceError::Network)?;
        Ok(Self::with_client(client, config))
    }

    /// Build the production chain around an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self::with_sources(vec![
            Box::new(sources::DataApiSource::new(client.clone(), config)),
            Box::new(sources::TimedTextSource::new(client.clone(), config)),
            Box::new(sources::MirrorSource::new(client.clone(), config)),
            Box::new(sources::WatchPageSource::new(client, config)),
        ])
    }

    /// Build a chain from explicit sources, kept in the given order.
    pub fn with_sources(sources: Vec<Box<dyn CaptionSource>>) -> Self {
        Extractor { sources }
    }

    /// Resolve captions for a video and merge them into a transcript.
    ///
    /// Fails only once every language candidate and every source has been
    /// exhausted.
    pub async fn extract(
        &self,
        video_id: &VideoId,
        preference: &LanguagePreference,
    ) -> Result<Transcript, ExtractError> {
        info!("extracting captions for {video_id} (language: {preference})");

        if let Some(win) = self.try_language(video_id, preference.code()).await {
            return Ok(build_transcript(video_id, preference.code(), win));
        }

        if preference.is_auto() {
            debug!("requested language yielded nothing, trying English");
            if let Some(win) = self.try_language(video_id, "en").await {
                return Ok(build_transcript(video_id, "en", win));
            }

            debug!("English yielded nothing, walking fallback candidates");
            for lang in FALLBACK_LANGUAGES {
                if let Some(win) = self.try_language(video_id, lang).await {
                    return Ok(build_transcript(video_id, lang, win));
                }
            }
        }

        debug!("language candidates exhausted, trying page extraction alone");
        if let Some(win) = self.try_page_extraction(video_id).await {
            return Ok(build_transcript(video_id, "auto", win));
        }

        warn!("all caption sources exhausted for {video_id}");
        Err(ExtractError::NoCaptionsFound(video_id.to_string()))
    }

    /// Run the full source chain for one language candidate.
    async fn try_language(&self, video_id: &VideoId, lang: &str) -> Option<(Vec<RawCue>, SourceKind)> {
        for source in &self.sources {
            match source.fetch(video_id, lang).await {
                Ok(cues) if !cues.is_empty() => {
                    info!("{} produced {} cues for language {lang}", source.kind(), cues.len());
                    return Some((cues, source.kind()));
                }
                Ok(_) => debug!("{} returned no cues for language {lang}", source.kind()),
                Err(e) if e.is_no_captions() => {
                    debug!("{} has no captions for language {lang}", source.kind());
                }
                Err(e) => warn!("{} failed for language {lang}: {e}", source.kind()),
            }
        }
        None
    }

    /// Final state: the watch page sources alone, no language constraint.
    async fn try_page_extraction(&self, video_id: &VideoId) -> Option<(Vec<RawCue>, SourceKind)> {
        for source in &self.sources {
            if source.kind() != SourceKind::WatchPage {
                continue;
            }
            match source.fetch(video_id, "auto").await {
                Ok(cues) if !cues.is_empty() => return Some((cues, source.kind())),
                Ok(_) => debug!("page extraction returned no cues"),
                Err(e) => debug!("page extraction failed: {e}"),
            }
        }
        None
    }
}

fn build_transcript(video_id: &VideoId, language: &str, win: (Vec<RawCue>, SourceKind)) -> Transcript {
    let (cues, source) = win;
    Transcript {
        video_id: video_id.clone(),
        language: language.to_string(),
        source,
        segments: merge::merge_cues(cues),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    enum Script {
        /// Succeed with these cues for any language.
        Cues(Vec<RawCue>),
        /// Succeed only when asked for this language.
        CuesForLang(&'static str, Vec<RawCue>),
        /// Report no captions.
        NoCaptions,
        /// Fail with an upstream error.
        Fail,
        /// Succeed with an empty cue list.
        Empty,
    }

    struct FakeSource {
        kind: SourceKind,
        script: Script,
        calls: Arc<AtomicUsize>,
    }

    impl FakeSource {
        fn boxed(kind: SourceKind, script: Script) -> (Box<dyn CaptionSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = FakeSource {
                kind,
                script,
                calls: calls.clone(),
            };
            (Box::new(source), calls)
        }
    }

    #[async_trait]
    impl CaptionSource for FakeSource {
        fn kind(&self) -> SourceKind {
            self.kind
        }

        async fn fetch(&self, _video_id: &VideoId, lang: &str) -> Result<Vec<RawCue>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                Script::Cues(cues) => Ok(cues.clone()),
                Script::CuesForLang(code, cues) if *code == lang => Ok(cues.clone()),
                Script::CuesForLang(..) => Err(SourceError::NoCaptionsFound),
                Script::NoCaptions => Err(SourceError::NoCaptionsFound),
                Script::Fail => Err(SourceError::Upstream("scripted failure".to_string())),
                Script::Empty => Ok(Vec::new()),
            }
        }
    }

    fn sample_cues() -> Vec<RawCue> {
        vec![
            RawCue {
                index: Some(1),
                start: 0.0,
                end: 1.0,
                text: "Hi".to_string(),
            },
            RawCue {
                index: Some(2),
                start: 1.5,
                end: 2.5,
                text: "there".to_string(),
            },
        ]
    }

    fn video_id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    #[tokio::test]
    async fn test_first_successful_source_wins() {
        let (api, api_calls) = FakeSource::boxed(SourceKind::DataApi, Script::Fail);
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::Cues(sample_cues()));
        let (mirror, mirror_calls) = FakeSource::boxed(SourceKind::Mirror, Script::Cues(sample_cues()));
        let (page, page_calls) = FakeSource::boxed(SourceKind::WatchPage, Script::Cues(sample_cues()));

        let extractor = Extractor::with_sources(vec![api, timedtext, mirror, page]);
        let transcript = extractor
            .extract(&video_id(), &LanguagePreference::Specific("en".to_string()))
            .await
            .unwrap();

        assert_eq!(transcript.source, SourceKind::TimedText);
        assert_eq!(transcript.language, "en");
        assert_eq!(api_calls.load(Ordering::SeqCst), 1);
        assert_eq!(mirror_calls.load(Ordering::SeqCst), 0);
        assert_eq!(page_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_advances_to_next_source() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::Fail);
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::Fail);
        let (mirror, _) = FakeSource::boxed(SourceKind::Mirror, Script::Cues(sample_cues()));

        let extractor = Extractor::with_sources(vec![api, timedtext, mirror]);
        let transcript = extractor
            .extract(&video_id(), &LanguagePreference::Specific("en".to_string()))
            .await
            .unwrap();

        assert_eq!(transcript.source, SourceKind::Mirror);
    }

    #[tokio::test]
    async fn test_empty_success_advances_to_next_source() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::Empty);
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::Cues(sample_cues()));

        let extractor = Extractor::with_sources(vec![api, timedtext]);
        let transcript = extractor
            .extract(&video_id(), &LanguagePreference::Specific("en".to_string()))
            .await
            .unwrap();

        assert_eq!(transcript.source, SourceKind::TimedText);
    }

    #[tokio::test]
    async fn test_auto_falls_back_to_english() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::CuesForLang("en", sample_cues()));
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::NoCaptions);

        let extractor = Extractor::with_sources(vec![api, timedtext]);
        let transcript = extractor.extract(&video_id(), &LanguagePreference::Auto).await.unwrap();

        assert_eq!(transcript.language, "en");
        assert_eq!(transcript.source, SourceKind::DataApi);
    }

    #[tokio::test]
    async fn test_auto_walks_fallback_candidates() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::CuesForLang("ja", sample_cues()));
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::NoCaptions);

        let extractor = Extractor::with_sources(vec![api, timedtext]);
        let transcript = extractor.extract(&video_id(), &LanguagePreference::Auto).await.unwrap();

        assert_eq!(transcript.language, "ja");
    }

    #[tokio::test]
    async fn test_specific_preference_skips_language_ladder() {
        let (api, api_calls) = FakeSource::boxed(SourceKind::DataApi, Script::NoCaptions);
        let (page, page_calls) = FakeSource::boxed(SourceKind::WatchPage, Script::CuesForLang("auto", sample_cues()));

        let extractor = Extractor::with_sources(vec![api, page]);
        let transcript = extractor
            .extract(&video_id(), &LanguagePreference::Specific("fr".to_string()))
            .await
            .unwrap();

        // Only the requested language, then the final page pass.
        assert_eq!(api_calls.load(Ordering::SeqCst), 1);
        assert_eq!(page_calls.load(Ordering::SeqCst), 2);
        assert_eq!(transcript.language, "auto");
        assert_eq!(transcript.source, SourceKind::WatchPage);
    }

    #[tokio::test]
    async fn test_exhaustion_reports_no_captions() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::Fail);
        let (timedtext, _) = FakeSource::boxed(SourceKind::TimedText, Script::NoCaptions);
        let (mirror, _) = FakeSource::boxed(SourceKind::Mirror, Script::Fail);
        let (page, page_calls) = FakeSource::boxed(SourceKind::WatchPage, Script::NoCaptions);

        let extractor = Extractor::with_sources(vec![api, timedtext, mirror, page]);
        let err = extractor.extract(&video_id(), &LanguagePreference::Auto).await.unwrap_err();

        assert!(matches!(err, ExtractError::NoCaptionsFound(id) if id == "dQw4w9WgXcQ"));
        // The final state still gave the page source its own chance.
        assert!(page_calls.load(Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn test_cues_are_merged_into_segments() {
        let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::Cues(sample_cues()));

        let extractor = Extractor::with_sources(vec![api]);
        let transcript = extractor
            .extract(&video_id(), &LanguagePreference::Specific("en".to_string()))
            .await
            .unwrap();

        assert_eq!(transcript.segments.len(), 1);
        assert_eq!(transcript.segments[0].text, "Hi there");
        assert_eq!(transcript.segments[0].cues.len(), 2);
    }

    #[tokio::test]
    async fn test_extraction_is_deterministic() {
        let build = || {
            let (api, _) = FakeSource::boxed(SourceKind::DataApi, Script::Cues(sample_cues()));
            Extractor::with_sources(vec![api])
        };

        let first = build()
            .extract(&video_id(), &LanguagePreference::Auto)
            .await
            .unwrap();
        let second = build()
            .extract(&video_id(), &LanguagePreference::Auto)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
