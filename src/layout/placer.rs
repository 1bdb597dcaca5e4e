//! Per-column event placement.
//!
//! Consumes a date column's sorted events plus the time grid and cross
//! groups, and produces one final rectangle per event. The single mutable
//! frame threaded through the loop is deliberate: branches that do not
//! fire inherit the previous event's value, which existing layouts depend
//! on.

use chrono::{NaiveDate, Timelike};
use serde::Serialize;
use std::collections::HashMap;

use super::geometry::Rect;
use super::overlap::CrossEvent;
use super::time_grid::{TimeGrid, MIDNIGHT};
use super::ElementRole;
use crate::models::event::Event;
use crate::models::style::TimelineStyle;
use crate::utils::date::in_zone;
use crate::utils::value_hash;

/// An event with its resolved rectangle, ordered as the column's events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedEvent {
    pub event: Event,
    pub frame: Rect,
    pub role: ElementRole,
}

/// Geometry of the day column being placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnContext {
    pub date: NaiveDate,
    pub origin_x: f32,
    pub width: f32,
    /// Full scrollable height; the initial frame height before any event
    /// computes its own.
    pub height: f32,
    pub start_hour: u32,
}

/// Place a column's events, sorted by start time, against the grid.
pub fn place_column(
    ctx: &ColumnContext,
    events: &[Event],
    cross_events: &HashMap<i64, CrossEvent>,
    grid: &TimeGrid,
    style: &TimelineStyle,
) -> Vec<PlacedEvent> {
    let zone = style.timezone;
    let mut placed: Vec<PlacedEvent> = Vec::with_capacity(events.len());
    let mut frame = Rect::new(0.0, 0.0, 0.0, ctx.height);

    for event in events {
        let start_local = in_zone(event.start, zone);
        let end_local = in_zone(event.end, zone);
        let starts_today = start_local.date_naive() == ctx.date;
        let ends_today = end_local.date_naive() == ctx.date;
        let start_hour_hash = value_hash(&start_local.hour());
        let end_hour_hash = value_hash(&end_local.hour());

        for row in grid.rows() {
            // position 'y'
            if row.value_hash == start_hour_hash && starts_today {
                if row.hour == MIDNIGHT {
                    if let Some(first) = grid.row_for_hour(0) {
                        frame.y = grid.point_y(start_local.minute(), first);
                    }
                } else {
                    frame.y = grid.point_y(start_local.minute(), row);
                }
            } else if !starts_today {
                if let Some(first) = grid.row_for_hour(ctx.start_hour) {
                    // Continuation of a multi-day event: anchor at the
                    // column's first visible hour. The start hour doubles as
                    // the minute argument, preserving the historical offset.
                    frame.y = grid.point_y(ctx.start_hour, first);
                }
            }

            // 'height'
            if let Some(height) = event.style.and_then(|s| s.default_height) {
                frame.height = height;
            } else if let Some(height) = style.event_default_height {
                frame.height = height;
            } else if row.value_hash == end_hour_hash && ends_today {
                let row_temp = if row.hour == MIDNIGHT {
                    grid.row_for_hour(0).unwrap_or(row)
                } else {
                    row
                };
                let summ_height = grid.baseline_y(row_temp) - frame.y;
                let minute_percent = 59.0 / end_local.minute() as f32;
                let minute_y = (style.offset_time_y + row_temp.frame.height) / minute_percent;
                frame.height = summ_height + minute_y - style.offset_event;
            } else if !ends_today {
                // Runs past the day boundary; the last row wins the
                // iteration, filling the remainder of the visible day.
                frame.height = grid.baseline_y(row) - frame.y;
            }
        }

        // width and position 'x'
        let mut point_x = ctx.origin_x;
        if let Some(cross) = cross_events.get(&event.start.timestamp()) {
            frame.width = ctx.width / cross.count as f32 - style.offset_event;

            if cross.count > 1 && !placed.is_empty() {
                for page in &placed {
                    let mut candidate = Rect::new(point_x, frame.y, frame.width, frame.height);
                    while page.frame.intersects(&candidate) {
                        let shift = (page.frame.width + style.offset_event).round();
                        if shift <= 0.0 {
                            break;
                        }
                        point_x += shift;
                        candidate.x = point_x;
                    }
                }
            }
        }
        frame.x = point_x;

        placed.push(PlacedEvent {
            event: event.clone(),
            frame,
            role: ElementRole::EventBlock,
        });
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::overlap::calculate_cross_events;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn style() -> TimelineStyle {
        TimelineStyle::default()
    }

    fn step(style: &TimelineStyle) -> f32 {
        style.row_height + style.offset_time_y
    }

    fn column(date: NaiveDate, style: &TimelineStyle, grid: &TimeGrid) -> ColumnContext {
        ColumnContext {
            date,
            origin_x: style.left_offset(),
            width: 200.0,
            height: grid.content_height(),
            start_hour: 0,
        }
    }

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, h, m, 0).unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn place(
        events: &[Event],
        ctx: &ColumnContext,
        grid: &TimeGrid,
        style: &TimelineStyle,
    ) -> Vec<PlacedEvent> {
        let cross = calculate_cross_events(events, style.offset_event);
        place_column(ctx, events, &cross, grid, style)
    }

    #[test]
    fn test_single_event_on_the_hour() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![Event::new(1, "standup", at(10, 9, 0), at(10, 10, 0)).unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        assert_eq!(placed.len(), 1);

        let frame = placed[0].frame;
        let row9 = grid.row_for_hour(9).unwrap();
        assert_eq!(frame.y, grid.baseline_y(row9));
        // End minute 0 adds nothing; one full hour step minus the event gap.
        assert_eq!(frame.height, step(&style) - style.offset_event);
        assert_eq!(frame.x, ctx.origin_x);
        assert_eq!(frame.width, ctx.width - style.offset_event);
    }

    #[test]
    fn test_start_minute_uses_interpolation_curve() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![Event::new(1, "call", at(10, 9, 30), at(10, 10, 0)).unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        let row9 = grid.row_for_hour(9).unwrap();
        assert_eq!(placed[0].frame.y, grid.point_y(30, row9));
    }

    #[test]
    fn test_per_event_height_override_wins() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![Event::builder()
            .id(1)
            .title("pinned height")
            .start(at(10, 9, 0))
            .end(at(10, 12, 0))
            .default_height(42.0)
            .build()
            .unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        assert_eq!(placed[0].frame.height, 42.0);
    }

    #[test]
    fn test_global_default_height_applies() {
        let mut style = style();
        style.event_default_height = Some(33.0);
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![Event::new(1, "short", at(10, 9, 0), at(10, 11, 0)).unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        assert_eq!(placed[0].frame.height, 33.0);
    }

    #[test]
    fn test_continuation_anchors_at_start_hour() {
        // Spans 23:00 day 10 to 01:00 day 11, laid out in day 11's column.
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(11), &style, &grid);
        let events = vec![Event::new(1, "overnight", at(10, 23, 0), at(11, 1, 0)).unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        let first = grid.first_row().unwrap();
        assert_eq!(placed[0].frame.y, grid.point_y(ctx.start_hour, first));

        // Ends at 01:00 on the column date.
        let row1 = grid.row_for_hour(1).unwrap();
        let expected_height =
            grid.baseline_y(row1) - placed[0].frame.y - style.offset_event;
        assert_eq!(placed[0].frame.height, expected_height);
    }

    #[test]
    fn test_event_running_past_day_end_fills_remainder() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![Event::new(1, "overnight", at(10, 22, 0), at(11, 2, 0)).unwrap()];

        let placed = place(&events, &ctx, &grid, &style);
        let row22 = grid.row_for_hour(22).unwrap();
        let last = grid.rows().last().unwrap();
        assert_eq!(placed[0].frame.y, grid.baseline_y(row22));
        assert_eq!(
            placed[0].frame.height,
            grid.baseline_y(last) - grid.baseline_y(row22)
        );
    }

    #[test]
    fn test_crossing_events_split_the_column() {
        let mut style = style();
        style.offset_event = 0.0;
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![
            Event::new(1, "first", at(10, 9, 0), at(10, 10, 0)).unwrap(),
            Event::new(2, "second", at(10, 9, 30), at(10, 10, 30)).unwrap(),
        ];

        let placed = place(&events, &ctx, &grid, &style);
        let half = ctx.width / 2.0;
        assert_eq!(placed[0].frame.width, half);
        assert_eq!(placed[1].frame.width, half);
        assert_eq!(placed[0].frame.x, ctx.origin_x);
        assert!(placed[1].frame.x >= placed[0].frame.x + placed[0].frame.width);
        assert!(
            placed[0].frame.width + placed[1].frame.width <= ctx.width,
            "split widths must fit the column"
        );
    }

    #[test]
    fn test_non_overlapping_events_keep_full_width() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![
            Event::new(1, "morning", at(10, 9, 0), at(10, 10, 0)).unwrap(),
            Event::new(2, "afternoon", at(10, 14, 0), at(10, 15, 0)).unwrap(),
        ];

        let placed = place(&events, &ctx, &grid, &style);
        assert_eq!(placed[0].frame.width, ctx.width - style.offset_event);
        assert_eq!(placed[1].frame.width, ctx.width - style.offset_event);
        assert_eq!(placed[1].frame.x, ctx.origin_x);
    }

    #[test]
    fn test_three_crossing_events_shift_right() {
        let mut style = style();
        style.offset_event = 0.0;
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        let events = vec![
            Event::new(1, "a", at(10, 9, 0), at(10, 10, 0)).unwrap(),
            Event::new(2, "b", at(10, 9, 10), at(10, 10, 10)).unwrap(),
            Event::new(3, "c", at(10, 9, 20), at(10, 10, 20)).unwrap(),
        ];

        let placed = place(&events, &ctx, &grid, &style);
        let third = ctx.width / 3.0;
        for p in &placed {
            assert_eq!(p.frame.width, third);
        }
        let mut xs: Vec<f32> = placed.iter().map(|p| p.frame.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!(xs[1] >= xs[0] + third);
        assert!(xs[2] >= xs[1] + third);
    }

    #[test]
    fn test_empty_column() {
        let style = style();
        let grid = TimeGrid::create(&style, 0);
        let ctx = column(date(10), &style, &grid);
        assert!(place(&[], &ctx, &grid, &style).is_empty());
    }
}
