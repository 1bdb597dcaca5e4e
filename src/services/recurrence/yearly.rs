use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;

use crate::models::event::Event;
use crate::utils::date::local_date;

/// A yearly event lands on dates sharing the start's month and day.
pub(super) fn applies(event: &Event, target: NaiveDate, zone: Tz) -> bool {
    let start_date = local_date(event.start, zone);
    start_date.month() == target.month() && start_date.day() == target.day()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn event() -> Event {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap();
        Event::new(1, "leap day", start, start + Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_matches_anniversary() {
        let next_leap = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert!(applies(&event(), next_leap, chrono_tz::UTC));
    }

    #[test]
    fn test_rejects_non_anniversary() {
        let feb_28 = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let march_29 = NaiveDate::from_ymd_opt(2025, 3, 29).unwrap();
        assert!(!applies(&event(), feb_28, chrono_tz::UTC));
        assert!(!applies(&event(), march_29, chrono_tz::UTC));
    }
}
