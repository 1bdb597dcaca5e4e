// Date utility functions
// Display-timezone conversion and field access for layout

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Convert an absolute instant into the given display timezone.
pub fn in_zone(date: DateTime<Utc>, zone: Tz) -> DateTime<Tz> {
    date.with_timezone(&zone)
}

/// Convert a zoned instant to another timezone.
pub fn convert(date: DateTime<Tz>, to: Tz) -> DateTime<Tz> {
    date.with_timezone(&to)
}

/// The calendar date an instant falls on in the display timezone.
pub fn local_date(date: DateTime<Utc>, zone: Tz) -> NaiveDate {
    in_zone(date, zone).date_naive()
}

pub fn is_same_day(date1: DateTime<Utc>, date2: DateTime<Utc>, zone: Tz) -> bool {
    local_date(date1, zone) == local_date(date2, zone)
}

/// Midnight at the start of `date` in the display timezone.
///
/// Returns `None` if the local midnight does not exist (DST gap); an
/// ambiguous midnight resolves to the earlier instant.
pub fn midnight_in(date: NaiveDate, zone: Tz) -> Option<DateTime<Tz>> {
    zone.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}
