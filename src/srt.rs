use log::debug;

use crate::RawCue;
use crate::timecode;

/// Parse an SRT payload into cues.
///
/// Blocks open with a numeric index line followed by a `start --> end`
/// timestamp line. Malformed blocks are skipped rather than failing the
/// whole parse; an input with no usable blocks yields an empty vec.
/// Multi-line cue text is collapsed to a single space-separated line.
pub fn parse(payload: &str) -> Vec<RawCue> {
    let mut cues = Vec::new();
    let mut lines = payload.lines().peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Ok(index) = line.parse::<u32>() else {
            debug!("skipping non-index line in SRT payload: {line:?}");
            continue;
        };

        let Some((start, end)) = lines.next().and_then(parse_time_line) else {
            debug!("skipping SRT block {index}: missing or malformed timestamp line");
            continue;
        };

        let mut text = String::new();
        while let Some(next) = lines.peek() {
            let next = next.trim();
            if next.is_empty() {
                lines.next();
                break;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(next);
            lines.next();
        }

        cues.push(RawCue {
            index: Some(index),
            start,
            end,
            text,
        });
    }

    cues
}

fn parse_time_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    let start = timecode::parse_srt_timestamp(start.trim()).ok()?;
    let end = timecode::parse_srt_timestamp(end.trim()).ok()?;
    if end < start {
        return None;
    }
    Some((start, end))
}
