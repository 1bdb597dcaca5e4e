use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::models::event::Event;
use crate::utils::date::local_date;

/// A monthly event lands on dates sharing the start's day of month. Months
/// without that day (a 31st, the 29th outside leap years) simply produce
/// no occurrence.
pub(super) fn applies(event: &Event, target: NaiveDate, zone: Tz) -> bool {
    local_date(event.start, zone).day() == target.day()
}
