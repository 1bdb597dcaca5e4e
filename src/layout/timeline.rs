//! Timeline layout orchestration.
//!
//! [`TimelineLayout::create`] is the whole-pass rebuild: it filters events
//! for the visible dates, materializes recurring occurrences, places every
//! day column and refreshes the current-time indicator. All derived state
//! from the previous pass is discarded first; nothing is diffed
//! incrementally, so a new pass atomically supersedes the old one.

use chrono::{NaiveDate, Timelike, Utc};
use serde::Serialize;

use super::current_line::{Clock, IndicatorUpdate, LiveClockScheduler};
use super::geometry::Rect;
use super::overlap::calculate_cross_events;
use super::placer::{place_column, ColumnContext, PlacedEvent};
use super::resize::{GestureState, ResizeController, ResizeHandle, ResizeNotice};
use super::time_grid::{TimeGrid, TimeRow};
use super::ElementRole;
use crate::models::event::Event;
use crate::models::style::TimelineStyle;
use crate::services::recurrence;
use crate::utils::date::{in_zone, midnight_in};

/// Which timeline flavor is being laid out. Day mode additionally adopts
/// events that span fully across a visible date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalendarMode {
    Day,
    Week,
}

/// Sink for layout notifications. All methods default to no-ops so
/// observers implement only what they consume.
pub trait TimelineObserver {
    fn did_display_events(&mut self, _events: &[Event], _dates: &[NaiveDate]) {}
    fn did_resize(&mut self, _notice: &ResizeNotice) {}
    fn did_deselect_event(&mut self, _event: &Event) {}
}

/// Separator between two day columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerticalLine {
    pub date: NaiveDate,
    pub x: f32,
    pub role: ElementRole,
}

/// All-day events aggregated per date for the pinned strip renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllDayBucket {
    pub date: NaiveDate,
    pub events: Vec<Event>,
    pub x_offset: f32,
    pub width: f32,
    pub role: ElementRole,
}

/// One day column's placed events, paired 1:1 with its sorted event list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnLayout {
    pub date: NaiveDate,
    pub events: Vec<PlacedEvent>,
}

const LAYOUT_SCHEMA_VERSION: u32 = 1;

/// Complete geometry of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPass {
    pub start_hour: u32,
    pub content_width: f32,
    pub content_height: f32,
    pub rows: Vec<TimeRow>,
    pub vertical_lines: Vec<VerticalLine>,
    pub columns: Vec<ColumnLayout>,
    pub all_day: Vec<AllDayBucket>,
    /// Top inset reserved for the all-day strip.
    pub all_day_offset_y: f32,
    /// Whether the all-day strip stays pinned above the scrolling grid.
    pub all_day_pinned: bool,
    /// Scroll target when the scroll-to-current policy applies.
    pub scroll_to_y: Option<f32>,
    pub indicator: Option<IndicatorUpdate>,
}

#[derive(Serialize)]
struct LayoutSnapshot<'a> {
    schema_version: u32,
    #[serde(flatten)]
    pass: &'a LayoutPass,
}

impl LayoutPass {
    /// Versioned JSON snapshot of the pass, for debugging and golden tests.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&LayoutSnapshot {
            schema_version: LAYOUT_SCHEMA_VERSION,
            pass: self,
        })
    }
}

/// The layout orchestrator for one timeline widget.
///
/// Owns the live-clock scheduler and any active resize session; both are
/// reset by the next `create` call.
pub struct TimelineLayout {
    mode: CalendarMode,
    style: TimelineStyle,
    viewport: Rect,
    scheduler: LiveClockScheduler,
    observers: Vec<Box<dyn TimelineObserver>>,
    resize: Option<ResizeController>,
    grid: Option<TimeGrid>,
    scroll_inset_top: f32,
    dates: Vec<NaiveDate>,
    events: Vec<Event>,
    selected_date: Option<NaiveDate>,
}

impl TimelineLayout {
    pub fn new(mode: CalendarMode, style: TimelineStyle, viewport: Rect) -> Self {
        let scheduler = LiveClockScheduler::new(style.timezone, style.indicator_height);
        Self::with_scheduler(mode, style, viewport, scheduler)
    }

    /// Inject a clock, making every pass and tick deterministic.
    pub fn with_clock(
        mode: CalendarMode,
        style: TimelineStyle,
        viewport: Rect,
        clock: Box<dyn Clock>,
    ) -> Self {
        let scheduler =
            LiveClockScheduler::with_clock(clock, style.timezone, style.indicator_height);
        Self::with_scheduler(mode, style, viewport, scheduler)
    }

    fn with_scheduler(
        mode: CalendarMode,
        style: TimelineStyle,
        viewport: Rect,
        scheduler: LiveClockScheduler,
    ) -> Self {
        Self {
            mode,
            style,
            viewport,
            scheduler,
            observers: Vec::new(),
            resize: None,
            grid: None,
            scroll_inset_top: 0.0,
            dates: Vec::new(),
            events: Vec::new(),
            selected_date: None,
        }
    }

    pub fn style(&self) -> &TimelineStyle {
        &self.style
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn add_observer(&mut self, observer: Box<dyn TimelineObserver>) {
        self.observers.push(observer);
    }

    /// Rebuild the full layout for the visible dates.
    pub fn create(
        &mut self,
        dates: &[NaiveDate],
        events: &[Event],
        selected_date: Option<NaiveDate>,
    ) -> LayoutPass {
        let zone = self.style.timezone;

        // A new pass supersedes any in-flight interaction state.
        self.resize = None;
        for observer in &mut self.observers {
            observer.did_display_events(events, dates);
        }

        self.dates = dates.to_vec();
        self.events = events.to_vec();
        self.selected_date = selected_date;

        // filter events
        let recurring_events: Vec<&Event> =
            events.iter().filter(|event| event.is_recurring()).collect();
        let all_events_for_dates: Vec<&Event> = events
            .iter()
            .filter(|event| {
                dates.iter().any(|date| {
                    event.starts_on(*date, zone)
                        || event.ends_on(*date, zone)
                        || (event.spans_over(*date, zone) && self.mode == CalendarMode::Day)
                })
            })
            .collect();
        let filtered_events: Vec<Event> = all_events_for_dates
            .iter()
            .filter(|event| !event.is_all_day)
            .map(|event| (*event).clone())
            .collect();
        let filtered_all_day_events: Vec<&Event> = all_events_for_dates
            .iter()
            .filter(|event| event.is_all_day)
            .copied()
            .collect();

        let start_hour = self.calculate_start_hour(&filtered_events, dates.len(), selected_date);

        let grid = TimeGrid::create(&self.style, start_hour);
        let content_height = grid.content_height();
        let left_offset = self.style.left_offset();
        let width_page = if dates.is_empty() {
            0.0
        } else {
            (self.viewport.width - left_offset) / dates.len() as f32
        };

        let mut vertical_lines = Vec::with_capacity(dates.len());
        let mut columns = Vec::with_capacity(dates.len());
        let mut all_day = Vec::with_capacity(dates.len());

        for (idx, date) in dates.iter().enumerate() {
            let point_x = idx as f32 * width_page + left_offset;
            vertical_lines.push(VerticalLine {
                date: *date,
                x: point_x,
                role: ElementRole::VerticalLine,
            });

            let events_by_date: Vec<Event> = filtered_events
                .iter()
                .filter(|event| {
                    event.starts_on(*date, zone)
                        || event.ends_on(*date, zone)
                        || event.spans_over(*date, zone)
                })
                .cloned()
                .collect();

            // All-day events are snapped to the column's date so the strip
            // renderer treats every bucket uniformly.
            let all_day_for_date: Vec<Event> = filtered_all_day_events
                .iter()
                .filter(|event| event.starts_on(*date, zone) || event.ends_on(*date, zone))
                .map(|event| snap_to_date(event, *date, &self.style))
                .collect();

            let recurring_by_date: Vec<Event> = recurring_events
                .iter()
                .filter_map(|event| {
                    recurrence::materialize(event, *date, &events_by_date, zone)
                })
                .collect();
            let (recurring_all_day, recurring_timed): (Vec<Event>, Vec<Event>) = recurring_by_date
                .into_iter()
                .partition(|event| event.is_all_day);

            let mut sorted_events = events_by_date;
            sorted_events.extend(recurring_timed);
            sorted_events.sort_by(|a, b| a.start.cmp(&b.start));

            let mut bucket_events = all_day_for_date;
            bucket_events.extend(recurring_all_day);
            all_day.push(AllDayBucket {
                date: *date,
                events: bucket_events,
                x_offset: point_x - left_offset,
                width: width_page,
                role: ElementRole::AllDayArea,
            });

            let cross_events = calculate_cross_events(&sorted_events, self.style.offset_event);
            let ctx = ColumnContext {
                date: *date,
                origin_x: point_x,
                width: width_page,
                height: content_height,
                start_hour,
            };
            let placed = place_column(&ctx, &sorted_events, &cross_events, &grid, &self.style);
            columns.push(ColumnLayout {
                date: *date,
                events: placed,
            });
        }

        let max_all_day = all_day
            .iter()
            .map(|bucket| bucket.events.len())
            .max()
            .unwrap_or(0);
        if max_all_day > 0 {
            self.update_scroll_inset(max_all_day);
        }

        let scroll_to_y = self.scroll_to_current(&grid, dates);
        let indicator = self.scheduler.refresh(
            &grid,
            self.style.show_current_line,
            dates,
            self.viewport.width,
        );

        log::debug!(
            "layout pass: {} dates, {} events, start hour {}, indicator {}",
            dates.len(),
            events.len(),
            start_hour,
            indicator.is_some()
        );

        let pass = LayoutPass {
            start_hour,
            content_width: self.viewport.width,
            content_height,
            rows: grid.rows().to_vec(),
            vertical_lines,
            columns,
            all_day,
            all_day_offset_y: self.scroll_inset_top,
            all_day_pinned: self.style.all_day.is_pinned,
            scroll_to_y,
            indicator,
        };
        self.grid = Some(grid);
        pass
    }

    /// Cooperative per-minute step; forward from the host run loop.
    pub fn tick(&mut self) -> Option<IndicatorUpdate> {
        let grid = self.grid.as_ref()?;
        self.scheduler.tick(grid, self.viewport.width)
    }

    pub fn is_clock_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Enter resize mode for a selected event's placed rectangle.
    ///
    /// Ignored while another resize session exists; `create` always leaves
    /// resize mode.
    pub fn start_resize(&mut self, event: Event, frame: Rect) {
        if self.resize.is_some() {
            log::debug!("resize already in progress, ignoring start request");
            return;
        }
        self.resize = Some(ResizeController::new(
            event,
            frame,
            self.style.minimal_height,
        ));
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    /// The current padded resize preview frame, if resize mode is active.
    pub fn resize_frame(&self) -> Option<Rect> {
        self.resize.as_ref().map(|controller| controller.frame())
    }

    /// Feed a resize gesture sample; observers receive the resulting
    /// notice.
    pub fn resize_gesture(
        &mut self,
        handle: ResizeHandle,
        state: GestureState,
    ) -> Option<ResizeNotice> {
        let notice = self.resize.as_mut()?.handle_gesture(handle, state)?;
        for observer in &mut self.observers {
            observer.did_resize(&notice);
        }
        Some(notice)
    }

    /// Leave resize mode without a gesture (tap outside, view dismissed).
    pub fn cancel_resize(&mut self) {
        self.resize = None;
    }

    /// Report a deselection to observers.
    pub fn force_deselect(&mut self, event: &Event) {
        for observer in &mut self.observers {
            observer.did_deselect_event(event);
        }
    }

    fn calculate_start_hour(
        &self,
        filtered_events: &[Event],
        date_count: usize,
        selected_date: Option<NaiveDate>,
    ) -> u32 {
        if !self.style.start_from_first_event {
            return 0;
        }

        let zone = self.style.timezone;
        let hours = filtered_events.iter().filter_map(|event| {
            if date_count > 1 {
                Some(in_zone(event.start, zone).hour())
            } else {
                let on_selected =
                    selected_date.is_some_and(|date| event.starts_on(date, zone));
                on_selected.then(|| in_zone(event.start, zone).hour())
            }
        });
        hours.min().unwrap_or(self.style.start_hour)
    }

    fn update_scroll_inset(&mut self, all_day_count: usize) {
        let offset_y = if (3..=4).contains(&all_day_count) {
            self.style.all_day.height * 2.0
        } else if all_day_count > 4 {
            self.style.all_day.max_height
        } else {
            self.style.all_day.height
        };

        match self.mode {
            CalendarMode::Day => self.scroll_inset_top = offset_y,
            CalendarMode::Week if self.scroll_inset_top < offset_y => {
                self.scroll_inset_top = offset_y;
            }
            CalendarMode::Week => {}
        }
    }

    fn scroll_to_current(&self, grid: &TimeGrid, dates: &[NaiveDate]) -> Option<f32> {
        let now = self.scheduler.now();
        if !self
            .style
            .scroll_to_current_line
            .applies(dates, now.date_naive())
        {
            return None;
        }
        match grid.row_for_hour(now.hour()) {
            Some(row) => Some(row.frame.y - 10.0),
            None => Some(0.0),
        }
    }
}

/// Copy an all-day event with start and end snapped to the bucket date.
fn snap_to_date(event: &Event, date: NaiveDate, style: &TimelineStyle) -> Event {
    let mut snapped = event.clone();
    if let Some(midnight) = midnight_in(date, style.timezone) {
        let instant = midnight.with_timezone(&Utc);
        snapped.start = instant;
        snapped.end = instant;
    }
    snapped
}
