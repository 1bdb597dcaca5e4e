// Test fixtures - reusable test data
// Provides consistent test data across all test files
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use timegrid::models::event::{Event, RecurringType};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Tuesday June 10 2025
    pub fn june_10() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    /// Wednesday June 11 2025
    pub fn june_11() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
    }

    /// An instant on a June 2025 day, UTC
    pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn timed(id: i64, day: u32, start: (u32, u32), end: (u32, u32)) -> Event {
        Event::new(
            id,
            format!("event {id}"),
            dates::at(day, start.0, start.1),
            dates::at(day, end.0, end.1),
        )
        .unwrap()
    }

    pub fn all_day(id: i64, day: u32) -> Event {
        let mut event = timed(id, day, (0, 0), (23, 0));
        event.is_all_day = true;
        event
    }

    pub fn daily(id: i64, day: u32, start: (u32, u32), end: (u32, u32)) -> Event {
        let mut event = timed(id, day, start, end);
        event.recurring_type = RecurringType::Daily;
        event
    }

    /// Spans 23:00 on `day` to 01:00 the next day
    pub fn overnight(id: i64, day: u32) -> Event {
        Event::new(
            id,
            format!("overnight {id}"),
            dates::at(day, 23, 0),
            dates::at(day + 1, 1, 0),
        )
        .unwrap()
    }
}
