// Recurrence materialization
// Expands a recurring event definition into a concrete occurrence anchored
// to a target date

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::event::{Event, RecurringType};
use crate::utils::date::{in_zone, midnight_in};

mod daily;
mod monthly;
mod weekly;
mod yearly;

/// Materialize a recurring event for the target date.
///
/// Returns `None` unless the target date lies strictly after the event's
/// original start and no concrete event with the same ID is already
/// scheduled that day. The dedupe is by ID only, not by materialized time.
/// The recurrence frequency decides whether the target date is eligible at
/// all (weekly needs a matching weekday, and so on).
pub fn materialize(
    event: &Event,
    target: NaiveDate,
    same_day_events: &[Event],
    zone: Tz,
) -> Option<Event> {
    if same_day_events.iter().any(|existing| existing.id == event.id) {
        return None;
    }

    let target_midnight = midnight_in(target, zone)?;
    if target_midnight.with_timezone(&Utc) <= event.start {
        return None;
    }

    let applies = match event.recurring_type {
        RecurringType::None => false,
        RecurringType::Daily => daily::applies(event, target, zone),
        RecurringType::Weekly => weekly::applies(event, target, zone),
        RecurringType::Monthly => monthly::applies(event, target, zone),
        RecurringType::Yearly => yearly::applies(event, target, zone),
    };
    if !applies {
        return None;
    }

    shift_to_date(event, target, zone)
}

/// Copy the event onto `target`, keeping its local time-of-day and
/// duration. An unresolvable local time (DST gap) yields `None`.
fn shift_to_date(event: &Event, target: NaiveDate, zone: Tz) -> Option<Event> {
    let start_local = in_zone(event.start, zone);
    let new_start = zone
        .from_local_datetime(&target.and_time(start_local.time()))
        .earliest()?;

    let mut occurrence = event.clone();
    occurrence.start = new_start.with_timezone(&Utc);
    occurrence.end = occurrence.start + event.duration();
    Some(occurrence)
}
