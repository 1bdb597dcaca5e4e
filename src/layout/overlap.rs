//! Overlap ("cross") detection for events sharing a day column.
//!
//! Every event is compared against the whole column using its tolerant
//! interval `[start, end - offset_event]`; the size of the matching subset
//! drives the width division of the crossing blocks.

use std::collections::HashMap;

use crate::models::event::Event;

/// Closed time interval in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTime {
    pub start: i64,
    pub end: i64,
}

/// Overlap group sizing for one event, keyed by its start timestamp.
///
/// Recomputed per column per layout pass. Events whose start timestamps
/// collide share a single entry (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossEvent {
    pub time: EventTime,
    pub count: usize,
}

/// Partition a column's events into interval-overlap groups.
///
/// `offset_event` doubles as the overlap tolerance, interpreted in seconds
/// against event end times, so blocks that merely touch at a boundary are
/// not treated as crossing.
pub fn calculate_cross_events(
    events: &[Event],
    offset_event: f32,
) -> HashMap<i64, CrossEvent> {
    let tolerance = offset_event as i64;
    let mut cross_events = HashMap::with_capacity(events.len());

    for event in events {
        let start = event.start.timestamp();
        let end = event.end.timestamp();
        let mut cross = CrossEvent {
            time: EventTime { start, end },
            count: 1,
        };

        let tolerant_end = end - tolerance;
        if tolerant_end <= start {
            // Degenerate tolerant interval: the event keeps its own column.
            log::debug!(
                "event {} collapses under overlap tolerance, skipping cross scan",
                event.id
            );
            cross_events.insert(start, cross);
            continue;
        }

        let matching = events
            .iter()
            .filter(|item| {
                let item_start = item.start.timestamp();
                let item_end = item.end.timestamp() - tolerance;
                if item_end <= item_start {
                    return false;
                }

                (item_start..=item_end).contains(&start)
                    || (item_start..=item_end).contains(&tolerant_end)
                    || (start..=tolerant_end).contains(&item_start)
                    || (start..=tolerant_end).contains(&item_end)
            })
            .count();
        if matching > 0 {
            cross.count = matching;
        }

        cross_events.insert(start, cross);
    }

    cross_events
}
