//! Event filtering.
//!
//! Narrows a camera's raw event feed to the time-lapse-eligible events:
//! motion (or combined) events inside the requested range and category,
//! in strictly increasing time order, capped at `max_events`.

use camlapse_camera_model::{Event, TimelapseParams};
use camlapse_common::clock::EpochSecs;
use camlapse_common::error::{CamlapseError, CamlapseResult};

/// Predicates applied to raw events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    /// Inclusive lower bound.
    pub start_time: Option<EpochSecs>,

    /// Inclusive upper bound.
    pub end_time: Option<EpochSecs>,

    /// Required classifier category.
    pub category: Option<String>,

    /// Cap on retained events (0 = uncapped).
    pub max_events: usize,
}

impl EventFilter {
    pub fn from_params(params: &TimelapseParams) -> Self {
        Self {
            start_time: params.start_time,
            end_time: params.end_time,
            category: params.category.clone(),
            max_events: params.max_events,
        }
    }

    /// Whether a single event passes the kind, range and category predicates.
    pub fn accepts(&self, event: &Event) -> bool {
        if !event.kind.is_timelapse_eligible() {
            return false;
        }
        if self.start_time.is_some_and(|start| event.time < start) {
            return false;
        }
        if self.end_time.is_some_and(|end| event.time > end) {
            return false;
        }
        match &self.category {
            Some(wanted) => event.category.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }
}

/// Filter, order and cap a raw event list.
///
/// Events sharing a timestamp collapse to the first one seen so the result
/// is strictly increasing.
pub fn filter_events(raw: &[Event], filter: &EventFilter) -> Vec<Event> {
    let mut events: Vec<Event> = raw
        .iter()
        .filter(|event| event.time.is_finite() && filter.accepts(event))
        .cloned()
        .collect();

    events.sort_by(|a, b| a.time.total_cmp(&b.time));
    events.dedup_by(|later, earlier| later.time == earlier.time);

    if filter.max_events > 0 {
        events.truncate(filter.max_events);
    }

    tracing::debug!(
        raw = raw.len(),
        eligible = events.len(),
        category = ?filter.category,
        "Filtered events"
    );
    events
}

/// Like [`filter_events`], but an empty result is an error.
pub fn eligible_events(raw: &[Event], filter: &EventFilter) -> CamlapseResult<Vec<Event>> {
    let events = filter_events(raw, filter);
    if events.is_empty() {
        return Err(CamlapseError::NoEligibleEvents);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camlapse_camera_model::EventKind;
    use proptest::prelude::*;

    fn event(id: &str, time: f64, kind: EventKind, category: Option<&str>) -> Event {
        Event::new(id, time, kind, category.map(str::to_string), "cam")
    }

    #[test]
    fn test_drops_sound_only_events() {
        let raw = vec![
            event("a", 10.0, EventKind::Sound, None),
            event("b", 20.0, EventKind::Motion, None),
            event("c", 30.0, EventKind::Combined, None),
        ];
        let kept = filter_events(&raw, &EventFilter::default());
        let ids: Vec<_> = kept.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let raw = vec![
            event("a", 10.0, EventKind::Motion, None),
            event("b", 20.0, EventKind::Motion, None),
            event("c", 30.0, EventKind::Motion, None),
            event("d", 40.0, EventKind::Motion, None),
        ];
        let filter = EventFilter {
            start_time: Some(20.0),
            end_time: Some(30.0),
            ..EventFilter::default()
        };
        let ids: Vec<_> = filter_events(&raw, &filter)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_category_filter() {
        let raw = vec![
            event("a", 10.0, EventKind::Motion, Some("humans")),
            event("b", 20.0, EventKind::Motion, Some("cars")),
            event("c", 30.0, EventKind::Motion, None),
        ];
        let filter = EventFilter {
            category: Some("humans".to_string()),
            ..EventFilter::default()
        };
        let kept = filter_events(&raw, &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "a");
    }

    #[test]
    fn test_sorts_unordered_input_then_caps() {
        let raw = vec![
            event("late", 300.0, EventKind::Motion, None),
            event("early", 100.0, EventKind::Motion, None),
            event("mid", 200.0, EventKind::Motion, None),
        ];
        let filter = EventFilter {
            max_events: 2,
            ..EventFilter::default()
        };
        let ids: Vec<_> = filter_events(&raw, &filter)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["early", "mid"]);
    }

    #[test]
    fn test_duplicate_times_collapse_to_first() {
        let raw = vec![
            event("first", 100.0, EventKind::Motion, None),
            event("second", 100.0, EventKind::Combined, None),
        ];
        let kept = filter_events(&raw, &EventFilter::default());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "first");
    }

    #[test]
    fn test_no_eligible_events_is_an_error() {
        let raw = vec![event("a", 10.0, EventKind::Sound, None)];
        assert!(matches!(
            eligible_events(&raw, &EventFilter::default()),
            Err(CamlapseError::NoEligibleEvents)
        ));
        assert!(matches!(
            eligible_events(&[], &EventFilter::default()),
            Err(CamlapseError::NoEligibleEvents)
        ));
    }

    fn arb_kind() -> impl Strategy<Value = EventKind> {
        prop_oneof![
            Just(EventKind::Motion),
            Just(EventKind::Sound),
            Just(EventKind::Combined),
        ]
    }

    fn arb_event() -> impl Strategy<Value = Event> {
        (
            0u32..10_000,
            arb_kind(),
            proptest::option::of(prop_oneof![Just("humans"), Just("cars")]),
        )
            .prop_map(|(t, kind, category)| {
                event(&format!("e{t}"), f64::from(t), kind, category)
            })
    }

    proptest! {
        #[test]
        fn prop_output_is_ordered_capped_and_accepted(
            raw in proptest::collection::vec(arb_event(), 0..60),
            start in proptest::option::of(0u32..5_000),
            span in 0u32..6_000,
            category in proptest::option::of(prop_oneof![Just("humans"), Just("cars")]),
            max_events in 0usize..20,
        ) {
            let filter = EventFilter {
                start_time: start.map(f64::from),
                end_time: start.map(|s| f64::from(s + span)),
                category: category.map(str::to_string),
                max_events,
            };
            let kept = filter_events(&raw, &filter);

            prop_assert!(kept.windows(2).all(|w| w[0].time < w[1].time));
            if max_events > 0 {
                prop_assert!(kept.len() <= max_events);
            }
            for e in &kept {
                prop_assert!(filter.accepts(e));
                prop_assert!(raw.contains(e));
            }
        }
    }
}
