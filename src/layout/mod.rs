//! Timeline layout engine.
//!
//! Headless geometry for day/week timeline views: hour rows, per-column
//! event placement with overlap resolution, the live current-time line and
//! interactive resize previews. Nothing in here draws; consumers feed the
//! produced frames to whatever renders them.

use serde::Serialize;

pub mod current_line;
pub mod geometry;
pub mod overlap;
pub mod placer;
pub mod resize;
pub mod time_grid;
pub mod timeline;

pub use geometry::Rect;
pub use timeline::{CalendarMode, LayoutPass, TimelineLayout, TimelineObserver};

/// Role of a produced layout element.
///
/// Consumers dispatch on this instead of the magic integer view tags the
/// layout historically used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementRole {
    TimeLabel,
    VerticalLine,
    CurrentHourLine,
    EventBlock,
    AllDayArea,
}
