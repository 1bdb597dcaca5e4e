use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::models::event::Event;

/// A daily event lands on every later date.
pub(super) fn applies(_event: &Event, _target: NaiveDate, _zone: Tz) -> bool {
    true
}
