use crate::{MergedSegment, RawCue};

/// Largest silence between cues, in seconds, that still merges them.
pub const MAX_MERGE_GAP_SECS: f64 = 2.0;

/// Combined text length, in chars, at which a segment stops growing.
pub const MAX_SEGMENT_CHARS: usize = 200;

/// Merge adjacent cues into reading-friendly paragraphs.
///
/// Cues are stably sorted by start time first since some sources emit
/// tracks out of time order. A cue joins the open segment when the gap
/// from the segment's end is under [`MAX_MERGE_GAP_SECS`] and the combined
/// text stays under [`MAX_SEGMENT_CHARS`]; otherwise the segment is closed
/// and a new one opens. Joined texts are separated by a single space and
/// the segment's end time tracks the latest merged cue.
pub fn merge_cues(mut cues: Vec<RawCue>) -> Vec<MergedSegment> {
    cues.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut segments = Vec::new();
    let mut cues = cues.into_iter();
    let Some(first) = cues.next() else {
        return segments;
    };

    let mut open = OpenSegment::new(first);
    for cue in cues {
        let gap = cue.start - open.end;
        if gap < MAX_MERGE_GAP_SECS && open.chars + cue.text.chars().count() < MAX_SEGMENT_CHARS {
            open.push(cue);
        } else {
            segments.push(open.close());
            open = OpenSegment::new(cue);
        }
    }
    segments.push(open.close());

    segments
}

struct OpenSegment {
    start: f64,
    end: f64,
    text: String,
    /// Char count of `text`, tracked so the length check is O(1).
    chars: usize,
    cues: Vec<RawCue>,
}

impl OpenSegment {
    fn new(cue: RawCue) -> Self {
        OpenSegment {
            start: cue.start,
            end: cue.end,
            text: cue.text.clone(),
            chars: cue.text.chars().count(),
            cues: vec![cue],
        }
    }

    fn push(&mut self, cue: RawCue) {
        self.end = cue.end;
        self.text.push(' ');
        self.text.push_str(&cue.text);
        self.chars += 1 + cue.text.chars().count();
        self.cues.push(cue);
    }

    fn close(self) -> MergedSegment {
        MergedSegment {
            start: self.start,
            end: self.end,
            duration: self.end - self.start,
            text: self.text,
            cues: self.cues,
        }
    }
}
