use eyre::Result;
use serde::Serialize;

use crate::timecode;
use crate::video_info::VideoInfo;
use crate::Transcript;

/// Render merged segments as plain text, one paragraph per segment.
pub fn render_text(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render merged segments back out as SRT, one entry per segment.
pub fn render_srt(transcript: &Transcript) -> String {
    let mut out = String::new();
    for (i, segment) in transcript.segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            timecode::format_srt_timestamp(segment.start),
            timecode::format_srt_timestamp(segment.end),
            segment.text
        ));
    }
    out
}

#[derive(Serialize)]
struct Report<'a> {
    video: &'a VideoInfo,
    transcript: &'a Transcript,
}

/// Render video metadata plus the transcript as pretty-printed JSON.
pub fn render_json(transcript: &Transcript, info: &VideoInfo) -> Result<String> {
    let report = Report {
        video: info,
        transcript,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
