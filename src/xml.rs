use log::warn;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::RawCue;
use crate::timecode;

/// Parse a YouTube timedtext XML payload into cues.
///
/// Cue elements are `<text start=".." dur="..">` with fractional-second
/// attributes; the format carries no sequence numbers, so indices are
/// assigned in parse order. Payload text is frequently double-escaped, so
/// XML unescaping is followed by an HTML entity decode. Elements missing
/// either attribute, or carrying negative times, are skipped; a reader
/// error ends the parse with whatever was collected so far.
pub fn parse(payload: &str) -> Vec<RawCue> {
    let mut reader = Reader::from_str(payload);
    let mut cues = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value)
                                .parse::<f64>()
                                .ok()
                                .filter(|s| *s >= 0.0);
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value)
                                .parse::<f64>()
                                .ok()
                                .filter(|d| *d >= 0.0);
                        }
                        _ => {}
                    }
                }
                current_start = start;
                current_dur = dur;
            }
            Ok(Event::Empty(_)) => {
                // Self-closing <text .../> with no content — skip
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(dur)) = (current_start.take(), current_dur.take()) {
                    let raw = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw).trim().to_string();
                    if !text.is_empty() {
                        cues.push(RawCue {
                            index: Some(cues.len() as u32 + 1),
                            start,
                            end: timecode::end_seconds(start, dur),
                            text,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                warn!("stopping timedtext parse on XML error: {e}");
                break;
            }
            _ => {}
        }
    }

    cues
}
