use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::models::event::Event;
use crate::utils::date::local_date;

/// A weekly event lands on dates sharing the start's weekday in the
/// display timezone.
pub(super) fn applies(event: &Event, target: NaiveDate, zone: Tz) -> bool {
    local_date(event.start, zone).weekday() == target.weekday()
}
