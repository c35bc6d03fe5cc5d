//! Acquisition directives and the time-lapse timeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use camlapse_common::clock::EpochSecs;

use crate::event::Event;

/// One scheduled unit of media acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Directive {
    /// A single image at a sample instant.
    StillFrame { time: EpochSecs },

    /// A short clip anchored at an event.
    EventClip { event: Event, frame_count: u32 },
}

impl Directive {
    /// The timeline position this directive resolves to.
    pub fn resolved_time(&self) -> EpochSecs {
        match self {
            Self::StillFrame { time } => *time,
            Self::EventClip { event, .. } => event.time,
        }
    }

    pub fn is_still_frame(&self) -> bool {
        matches!(self, Self::StillFrame { .. })
    }

    pub fn is_event_clip(&self) -> bool {
        matches!(self, Self::EventClip { .. })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StillFrame { time } => write!(f, "still frame at {time}"),
            Self::EventClip { event, frame_count } => write!(
                f,
                "event {} clip ({frame_count} frames) at {}",
                event.id, event.time
            ),
        }
    }
}

/// Ordered sequence of directives, non-decreasing in resolved time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timeline {
    directives: Vec<Directive>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            directives: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    pub fn as_slice(&self) -> &[Directive] {
        &self.directives
    }

    /// Number of still-frame directives.
    pub fn still_frames(&self) -> usize {
        self.directives.iter().filter(|d| d.is_still_frame()).count()
    }

    /// Number of event-clip directives.
    pub fn event_clips(&self) -> usize {
        self.directives.iter().filter(|d| d.is_event_clip()).count()
    }

    /// Resolved times in timeline order.
    pub fn resolved_times(&self) -> Vec<EpochSecs> {
        self.directives.iter().map(Directive::resolved_time).collect()
    }

    /// Whether resolved times never decrease.
    pub fn is_non_decreasing(&self) -> bool {
        self.directives
            .windows(2)
            .all(|pair| pair[0].resolved_time() <= pair[1].resolved_time())
    }
}

impl IntoIterator for Timeline {
    type Item = Directive;
    type IntoIter = std::vec::IntoIter<Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.into_iter()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

impl FromIterator<Directive> for Timeline {
    fn from_iter<I: IntoIterator<Item = Directive>>(iter: I) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}

/// Outcome of resolving one directive to media bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub directive: Directive,
    pub payload: Option<Vec<u8>>,
    pub ok: bool,
}

impl FetchResult {
    /// A successful fetch. Empty payloads count as missing.
    pub fn fetched(directive: Directive, payload: Vec<u8>) -> Self {
        if payload.is_empty() {
            return Self::missing(directive);
        }
        Self {
            directive,
            payload: Some(payload),
            ok: true,
        }
    }

    /// A fetch that produced no usable media.
    pub fn missing(directive: Directive) -> Self {
        Self {
            directive,
            payload: None,
            ok: false,
        }
    }

    /// Payload length in bytes (0 when missing).
    pub fn payload_len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_time() {
        let still = Directive::StillFrame { time: 50.0 };
        let clip = Directive::EventClip {
            event: Event::motion("e1", 100.0, "cam"),
            frame_count: 9,
        };
        assert_eq!(still.resolved_time(), 50.0);
        assert_eq!(clip.resolved_time(), 100.0);
        assert!(still.is_still_frame());
        assert!(clip.is_event_clip());
    }

    #[test]
    fn test_timeline_counts_and_order() {
        let timeline: Timeline = vec![
            Directive::StillFrame { time: 1.0 },
            Directive::EventClip {
                event: Event::motion("e1", 2.0, "cam"),
                frame_count: 5,
            },
            Directive::StillFrame { time: 3.0 },
        ]
        .into_iter()
        .collect();

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.still_frames(), 2);
        assert_eq!(timeline.event_clips(), 1);
        assert_eq!(timeline.resolved_times(), vec![1.0, 2.0, 3.0]);
        assert!(timeline.is_non_decreasing());
    }

    #[test]
    fn test_detects_out_of_order_timeline() {
        let timeline: Timeline = vec![
            Directive::StillFrame { time: 5.0 },
            Directive::StillFrame { time: 4.0 },
        ]
        .into_iter()
        .collect();
        assert!(!timeline.is_non_decreasing());
    }

    #[test]
    fn test_empty_payload_is_missing() {
        let result = FetchResult::fetched(Directive::StillFrame { time: 1.0 }, Vec::new());
        assert!(!result.ok);
        assert_eq!(result.payload, None);
        assert_eq!(result.payload_len(), 0);

        let result = FetchResult::fetched(Directive::StillFrame { time: 1.0 }, vec![0xFF, 0xD8]);
        assert!(result.ok);
        assert_eq!(result.payload_len(), 2);
    }

    #[test]
    fn test_directive_display() {
        let clip = Directive::EventClip {
            event: Event::motion("e7", 100.0, "cam"),
            frame_count: 9,
        };
        assert_eq!(clip.to_string(), "event e7 clip (9 frames) at 100");
    }
}
