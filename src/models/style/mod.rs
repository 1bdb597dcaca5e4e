// Timeline style configuration
// Geometry constants, policies and the display timezone for layout passes

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to parse style document: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid style: {0}")]
    Invalid(String),
}

/// Visibility policy for the current-time line, evaluated against the set
/// of visible dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrentLineMode {
    Always,
    #[default]
    Today,
    Never,
}

impl CurrentLineMode {
    pub fn applies(&self, dates: &[NaiveDate], today: NaiveDate) -> bool {
        match self {
            CurrentLineMode::Always => true,
            CurrentLineMode::Today => dates.contains(&today),
            CurrentLineMode::Never => false,
        }
    }
}

/// Style of the all-day strip pinned above the time grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllDayStyle {
    /// Height of one all-day row.
    pub height: f32,
    /// Cap for the reserved strip when many all-day events pile up.
    pub max_height: f32,
    pub is_pinned: bool,
}

impl Default for AllDayStyle {
    fn default() -> Self {
        Self {
            height: 25.0,
            max_height: 70.0,
            is_pinned: false,
        }
    }
}

/// Configuration for timeline layout passes.
///
/// Loaded from a TOML document or constructed in code; the defaults mirror
/// the classic day/week layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineStyle {
    /// Height of one hour row (the time label height).
    pub row_height: f32,
    /// Vertical gap between consecutive hour rows.
    pub offset_time_y: f32,
    /// Left inset of the time label column.
    pub offset_time_x: f32,
    /// Width of the time label column.
    pub width_time: f32,
    /// Gap between the label column and the first day column.
    pub offset_line_left: f32,
    /// Horizontal gap between crossing event blocks. Also the overlap
    /// tolerance, applied in seconds to event end times.
    pub offset_event: f32,
    /// Smallest height an event block may be resized to.
    pub minimal_height: f32,
    /// Height of the current-time indicator line view.
    pub indicator_height: f32,
    /// Fallback first visible hour when starting from the first event.
    pub start_hour: u32,
    /// Derive the first visible hour from the earliest event instead of
    /// starting at midnight.
    pub start_from_first_event: bool,
    /// Display timezone all hour/minute/day fields are computed in.
    pub timezone: Tz,
    pub show_current_line: CurrentLineMode,
    pub scroll_to_current_line: CurrentLineMode,
    /// Global fixed block height, overriding duration-based heights.
    pub event_default_height: Option<f32>,
    pub all_day: AllDayStyle,
}

impl Default for TimelineStyle {
    fn default() -> Self {
        Self {
            row_height: 25.0,
            offset_time_y: 50.0,
            offset_time_x: 10.0,
            width_time: 40.0,
            offset_line_left: 10.0,
            offset_event: 3.0,
            minimal_height: 20.0,
            indicator_height: 15.0,
            start_hour: 0,
            start_from_first_event: false,
            timezone: chrono_tz::UTC,
            show_current_line: CurrentLineMode::Today,
            scroll_to_current_line: CurrentLineMode::Today,
            event_default_height: None,
            all_day: AllDayStyle::default(),
        }
    }
}

impl TimelineStyle {
    /// Total left inset before the first day column.
    pub fn left_offset(&self) -> f32 {
        self.width_time + self.offset_time_x + self.offset_line_left
    }

    /// Parse a style from a TOML document and validate it.
    pub fn from_toml_str(doc: &str) -> Result<Self, StyleError> {
        let style: Self = toml::from_str(doc)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        if self.row_height <= 0.0 {
            return Err(StyleError::Invalid("row_height must be positive".into()));
        }
        if self.offset_time_y < 0.0 || self.offset_event < 0.0 {
            return Err(StyleError::Invalid("offsets must be non-negative".into()));
        }
        if self.start_hour > 23 {
            return Err(StyleError::Invalid(format!(
                "start_hour must be 0..=23, got {}",
                self.start_hour
            )));
        }
        if self.all_day.max_height < self.all_day.height {
            return Err(StyleError::Invalid(
                "all_day.max_height must be at least all_day.height".into(),
            ));
        }
        Ok(())
    }
}
