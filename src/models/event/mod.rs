// Event module
// Timeline event model with recurrence support

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::utils::date::local_date;

/// How an event repeats across the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Per-event layout overrides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EventStyle {
    /// Fixed block height, bypassing duration-based height computation.
    pub default_height: Option<f32>,
}

/// A calendar event as consumed by the layout engine.
///
/// Events are immutable values; recurrence materialization produces a copy
/// with shifted start/end rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_all_day: bool,
    pub recurring_type: RecurringType,
    pub style: Option<EventStyle>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `id` - Stable event identifier
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    ///
    /// # Returns
    /// Returns `Result<Event, String>` with validation
    pub fn new(
        id: i64,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, String> {
        let title = title.into();

        if title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if end <= start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(Self {
            id,
            title,
            start,
            end,
            is_all_day: false,
            recurring_type: RecurringType::None,
            style: None,
        })
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }

        Ok(())
    }

    /// Check if this is a recurring event
    pub fn is_recurring(&self) -> bool {
        self.recurring_type != RecurringType::None
    }

    /// Get the duration of the event
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// True if the event starts on `date` in the display timezone.
    pub fn starts_on(&self, date: chrono::NaiveDate, zone: Tz) -> bool {
        local_date(self.start, zone) == date
    }

    /// True if the event ends on `date` in the display timezone.
    pub fn ends_on(&self, date: chrono::NaiveDate, zone: Tz) -> bool {
        local_date(self.end, zone) == date
    }

    /// True if a multi-day event covers `date` (start and end on different
    /// days, with `date` inside the covered range).
    pub fn spans_over(&self, date: chrono::NaiveDate, zone: Tz) -> bool {
        let start_date = local_date(self.start, zone);
        let end_date = local_date(self.end, zone);
        start_date != end_date && start_date <= date && date <= end_date
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<i64>,
    title: Option<String>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    is_all_day: bool,
    recurring_type: RecurringType,
    style: Option<EventStyle>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            start: None,
            end: None,
            is_all_day: false,
            recurring_type: RecurringType::None,
            style: None,
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.is_all_day = all_day;
        self
    }

    pub fn recurring(mut self, recurring_type: RecurringType) -> Self {
        self.recurring_type = recurring_type;
        self
    }

    /// Set a fixed block height for this event
    pub fn default_height(mut self, height: f32) -> Self {
        self.style = Some(EventStyle {
            default_height: Some(height),
        });
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let id = self.id.ok_or("Event id is required")?;
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let event = Event {
            id,
            title,
            start,
            end,
            is_all_day: self.is_all_day,
            recurring_type: self.recurring_type,
            style: self.style,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
