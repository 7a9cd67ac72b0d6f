//! Two-level oscillation detection over recent level history.

use crate::session::{AssessmentSession, OscillationPattern};

/// Number of trailing history entries inspected.
pub const OSCILLATION_WINDOW: usize = 6;

/// A back-and-forth pattern found at the end of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OscillationDetection {
    pub pattern: OscillationPattern,
    /// Whether this continues the previously recorded pattern.
    pub repeat: bool,
}

impl OscillationDetection {
    /// Fold this detection into the session's oscillation counters.
    pub fn apply(self, session: &mut AssessmentSession) {
        if self.repeat {
            session.oscillation_count += 1;
        } else {
            session.oscillation_count = 1;
        }
        session.last_oscillation_levels = Some(self.pattern);
    }
}

/// Look for A-B-A-B, then A-B-A-B-A-B, at the end of `history`.
///
/// Returns `None` with fewer than four entries; the caller leaves its
/// oscillation counters untouched in that case.
pub fn detect(history: &[u8], last: Option<OscillationPattern>) -> Option<OscillationDetection> {
    let recent = window(history);
    if recent.len() < 4 {
        return None;
    }
    detect_simple(recent, last).or_else(|| detect_extended(recent))
}

fn window(history: &[u8]) -> &[u8] {
    let start = history.len().saturating_sub(OSCILLATION_WINDOW);
    &history[start..]
}

/// A-B-A-B over the last four entries.
pub fn detect_simple(
    recent: &[u8],
    last: Option<OscillationPattern>,
) -> Option<OscillationDetection> {
    let n = recent.len();
    if n < 4 {
        return None;
    }
    let (a, b, c, d) = (recent[n - 4], recent[n - 3], recent[n - 2], recent[n - 1]);
    if a == c && b == d && a != b {
        let pattern = OscillationPattern::new(a, b);
        return Some(OscillationDetection {
            pattern,
            repeat: last == Some(pattern),
        });
    }
    None
}

/// A-B-A-B-A-B over the last six entries.
///
/// Always reported as a repeat, whatever pattern was recorded before.
pub fn detect_extended(recent: &[u8]) -> Option<OscillationDetection> {
    let n = recent.len();
    if n < 6 {
        return None;
    }
    let tail = &recent[n - 6..];
    let (a, b) = (tail[0], tail[1]);
    let alternating = a != b
        && tail.iter().step_by(2).all(|&x| x == a)
        && tail.iter().skip(1).step_by(2).all(|&x| x == b);
    alternating.then(|| OscillationDetection {
        pattern: OscillationPattern::new(a, b),
        repeat: true,
    })
}
