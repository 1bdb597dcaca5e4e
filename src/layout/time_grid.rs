//! Hour rows for the scrollable time grid.
//!
//! Maps the configured day-hour range to an ordered sequence of row frames
//! and converts (hour, minute) pairs into pixel offsets.

use serde::Serialize;

use super::geometry::Rect;
use super::ElementRole;
use crate::models::style::TimelineStyle;
use crate::utils::value_hash;

/// Hour value of the trailing midnight-wrap row in a full-day grid.
pub const MIDNIGHT: u32 = 24;

/// One horizontal hour row.
///
/// `tag` is the sequential row index from the configured start hour; `hour`
/// is the displayed hour value (0..=23, or 24 for the midnight wrap).
/// Rows are rebuilt wholesale on every layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRow {
    pub tag: u32,
    pub hour: u32,
    pub frame: Rect,
    pub value_hash: u64,
    pub role: ElementRole,
}

/// Vertical geometry of the time grid for one layout pass.
#[derive(Debug, Clone)]
pub struct TimeGrid {
    row_height: f32,
    row_offset: f32,
    rows: Vec<TimeRow>,
}

impl TimeGrid {
    /// Build rows for the hours `start_hour..=24`.
    pub fn create(style: &TimelineStyle, start_hour: u32) -> Self {
        let step = style.offset_time_y + style.row_height;
        let rows = (start_hour..=MIDNIGHT)
            .enumerate()
            .map(|(idx, hour)| {
                let tag = idx as u32;
                TimeRow {
                    tag,
                    hour,
                    frame: Rect::new(
                        style.offset_time_x,
                        tag as f32 * step,
                        style.width_time,
                        style.row_height,
                    ),
                    value_hash: value_hash(&hour),
                    role: ElementRole::TimeLabel,
                }
            })
            .collect();

        Self {
            row_height: style.row_height,
            row_offset: style.offset_time_y,
            rows,
        }
    }

    pub fn rows(&self) -> &[TimeRow] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&TimeRow> {
        self.rows.first()
    }

    /// Look up the row displaying `hour` by its value hash.
    pub fn row_for_hour(&self, hour: u32) -> Option<&TimeRow> {
        let hash = value_hash(&hour);
        self.rows.iter().find(|row| row.value_hash == hash)
    }

    fn step(&self) -> f32 {
        self.row_offset + self.row_height
    }

    /// The row's vertical center, where minute 0 sits.
    pub fn baseline_y(&self, row: &TimeRow) -> f32 {
        row.tag as f32 * self.step() + self.row_height / 2.0
    }

    /// Interpolated Y for a minute within a row.
    ///
    /// The `59.0 / minute` divisor is the historical interpolation curve;
    /// existing layouts depend on these exact values, so it is not the
    /// straight minute/60 proportion. Minute 0 (and anything out of 1..=59)
    /// returns the baseline unmodified.
    pub fn point_y(&self, minute: u32, row: &TimeRow) -> f32 {
        if (1..=59).contains(&minute) {
            let minute_percent = 59.0 / minute as f32;
            self.baseline_y(row) + self.step() / minute_percent
        } else {
            self.baseline_y(row)
        }
    }

    /// Total scrollable height: every row plus the inter-row gap, minus the
    /// trailing gap.
    pub fn content_height(&self) -> f32 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows
            .iter()
            .map(|row| row.frame.height + self.row_offset)
            .sum::<f32>()
            - self.row_offset
    }
}
