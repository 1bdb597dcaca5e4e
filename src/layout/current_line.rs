//! Live current-time indicator scheduling.
//!
//! The scheduler owns the per-minute repositioning loop for the "now" line.
//! It is cooperative: the host run loop calls [`LiveClockScheduler::tick`]
//! between frames, and the injected [`Clock`] makes every tick
//! deterministic under test.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::geometry::Rect;
use super::time_grid::TimeGrid;
use super::ElementRole;
use crate::models::style::CurrentLineMode;
use crate::utils::value_hash;

/// Source of "now", injected so ticks are deterministic under test.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Visibility toggle for an hour label crowded by the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelVisibility {
    pub hour: u32,
    pub hidden: bool,
}

/// A repositioned current-time indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorUpdate {
    pub frame: Rect,
    pub timestamp: DateTime<Tz>,
    pub role: ElementRole,
    /// Hour labels whose frames now collide (or no longer collide) with
    /// the indicator.
    pub labels: Vec<LabelVisibility>,
}

/// Per-minute scheduler for the current-time line.
///
/// `start` and `stop` are idempotent; `tick` is a no-op while stopped and
/// skips redundant work when the minute has not changed since the last
/// reposition.
pub struct LiveClockScheduler {
    clock: Box<dyn Clock>,
    timezone: Tz,
    indicator_height: f32,
    running: bool,
    minute_hash: Option<u64>,
}

impl LiveClockScheduler {
    pub fn new(timezone: Tz, indicator_height: f32) -> Self {
        Self::with_clock(Box::new(SystemClock), timezone, indicator_height)
    }

    pub fn with_clock(clock: Box<dyn Clock>, timezone: Tz, indicator_height: f32) -> Self {
        Self {
            clock,
            timezone,
            indicator_height,
            running: false,
            minute_hash: None,
        }
    }

    /// The current instant in the display timezone.
    pub fn now(&self) -> DateTime<Tz> {
        self.clock.now().with_timezone(&self.timezone)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        log::debug!("current-time scheduler started");
        self.running = true;
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        log::debug!("current-time scheduler stopped");
        self.running = false;
        self.minute_hash = None;
    }

    /// One cooperative step of the per-minute loop.
    ///
    /// Returns the new indicator geometry, or `None` while stopped, when
    /// the minute is unchanged, or when the current hour has no row in the
    /// grid.
    pub fn tick(&mut self, grid: &TimeGrid, content_width: f32) -> Option<IndicatorUpdate> {
        if !self.running {
            return None;
        }

        let now = self.now();
        let minute_hash = value_hash(&now.minute());
        if self.minute_hash == Some(minute_hash) {
            return None;
        }
        let row = grid.row_for_hour(now.hour())?;

        let point_y = grid.point_y(now.minute(), row);
        self.minute_hash = Some(minute_hash);

        let frame = Rect::new(
            0.0,
            point_y - self.indicator_height / 2.0,
            content_width,
            self.indicator_height,
        );

        let mut labels = vec![LabelVisibility {
            hour: row.hour,
            hidden: row.frame.intersects(&frame),
        }];
        if let Some(next) = grid.row_for_hour(now.hour() + 1) {
            labels.push(LabelVisibility {
                hour: next.hour,
                hidden: next.frame.intersects(&frame),
            });
        }

        Some(IndicatorUpdate {
            frame,
            timestamp: now,
            role: ElementRole::CurrentHourLine,
            labels,
        })
    }

    /// Re-evaluate the indicator after a full layout rebuild.
    ///
    /// The previous indicator is always discarded. When the visibility
    /// policy rejects the visible dates, or the current hour has no row,
    /// the scheduler stops; otherwise it (re)starts and repositions
    /// immediately.
    pub fn refresh(
        &mut self,
        grid: &TimeGrid,
        mode: CurrentLineMode,
        dates: &[NaiveDate],
        content_width: f32,
    ) -> Option<IndicatorUpdate> {
        self.minute_hash = None;

        let now = self.now();
        if !mode.applies(dates, now.date_naive()) {
            self.stop();
            return None;
        }
        if grid.row_for_hour(now.hour()).is_none() {
            self.stop();
            return None;
        }

        self.start();
        self.tick(grid, content_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::style::TimelineStyle;
    use chrono::TimeZone;

    fn fixed_clock(h: u32, m: u32) -> Box<MockClock> {
        let mut clock = MockClock::new();
        clock
            .expect_now()
            .returning(move || Utc.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap());
        Box::new(clock)
    }

    fn scheduler(h: u32, m: u32) -> LiveClockScheduler {
        LiveClockScheduler::with_clock(fixed_clock(h, m), chrono_tz::UTC, 15.0)
    }

    fn grid() -> TimeGrid {
        TimeGrid::create(&TimelineStyle::default(), 0)
    }

    #[test]
    fn test_start_is_idempotent() {
        let grid = grid();
        let mut scheduler = scheduler(9, 41);
        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        // One tick source: a single reposition for the minute, not two.
        assert!(scheduler.tick(&grid, 800.0).is_some());
        assert!(scheduler.tick(&grid, 800.0).is_none());
    }

    #[test]
    fn test_stop_is_idempotent_and_start_resumes() {
        let grid = grid();
        let mut scheduler = scheduler(9, 41);
        scheduler.start();
        assert!(scheduler.tick(&grid, 800.0).is_some());

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(scheduler.tick(&grid, 800.0).is_none());

        scheduler.start();
        assert!(scheduler.tick(&grid, 800.0).is_some());
    }

    #[test]
    fn test_tick_skips_unchanged_minute() {
        let grid = grid();
        let mut scheduler = scheduler(14, 30);
        scheduler.start();

        assert!(scheduler.tick(&grid, 800.0).is_some());
        assert!(scheduler.tick(&grid, 800.0).is_none());
        assert!(scheduler.tick(&grid, 800.0).is_none());
    }

    #[test]
    fn test_tick_positions_indicator_on_interpolated_minute() {
        let grid = grid();
        let mut scheduler = scheduler(14, 30);
        scheduler.start();

        let update = scheduler.tick(&grid, 800.0).unwrap();
        let row = grid.row_for_hour(14).unwrap();
        let expected_y = grid.point_y(30, row) - 15.0 / 2.0;
        assert_eq!(update.frame.y, expected_y);
        assert_eq!(update.frame.width, 800.0);
        assert_eq!(update.role, ElementRole::CurrentHourLine);
    }

    #[test]
    fn test_tick_hides_label_under_indicator() {
        let grid = grid();
        let mut scheduler = scheduler(14, 0);
        scheduler.start();

        // Minute 0 centers the line on the label itself.
        let update = scheduler.tick(&grid, 800.0).unwrap();
        let current = update.labels.iter().find(|l| l.hour == 14).unwrap();
        let next = update.labels.iter().find(|l| l.hour == 15).unwrap();
        assert!(current.hidden);
        assert!(!next.hidden);
    }

    #[test]
    fn test_tick_mid_hour_leaves_labels_visible() {
        let grid = grid();
        let mut scheduler = scheduler(14, 30);
        scheduler.start();

        let update = scheduler.tick(&grid, 800.0).unwrap();
        assert!(update.labels.iter().all(|l| !l.hidden));
    }

    #[test]
    fn test_tick_none_when_hour_has_no_row() {
        // Grid starting at 8 has no row for 6 o'clock.
        let grid = TimeGrid::create(&TimelineStyle::default(), 8);
        let mut scheduler = scheduler(6, 15);
        scheduler.start();
        assert!(scheduler.tick(&grid, 800.0).is_none());
        // The miss must not consume the minute.
        let full_grid = TimeGrid::create(&TimelineStyle::default(), 0);
        assert!(scheduler.tick(&full_grid, 800.0).is_some());
    }

    #[test]
    fn test_refresh_stops_when_policy_rejects() {
        let grid = grid();
        let mut scheduler = scheduler(9, 0);
        scheduler.start();

        let other_day = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        let update = scheduler.refresh(&grid, CurrentLineMode::Today, &[other_day], 800.0);
        assert!(update.is_none());
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_refresh_starts_and_positions_for_today() {
        let grid = grid();
        let mut scheduler = scheduler(9, 15);
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        let update = scheduler.refresh(&grid, CurrentLineMode::Today, &[today], 800.0);
        assert!(update.is_some());
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_refresh_never_mode() {
        let grid = grid();
        let mut scheduler = scheduler(9, 15);
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        assert!(scheduler
            .refresh(&grid, CurrentLineMode::Never, &[today], 800.0)
            .is_none());
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_refresh_repositions_after_previous_tick() {
        let grid = grid();
        let mut scheduler = scheduler(9, 15);
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        assert!(scheduler
            .refresh(&grid, CurrentLineMode::Today, &[today], 800.0)
            .is_some());
        // A rebuild discards the dedupe state, so the same minute
        // repositions again.
        assert!(scheduler
            .refresh(&grid, CurrentLineMode::Today, &[today], 800.0)
            .is_some());
    }

    #[test]
    fn test_display_timezone_shifts_the_row() {
        let berlin: Tz = "Europe/Berlin".parse().unwrap();
        let grid = grid();
        let mut scheduler =
            LiveClockScheduler::with_clock(fixed_clock(9, 0), berlin, 15.0);
        scheduler.start();

        // 09:00 UTC is 11:00 in Berlin (June, DST).
        let update = scheduler.tick(&grid, 800.0).unwrap();
        let row11 = grid.row_for_hour(11).unwrap();
        assert_eq!(update.frame.y, grid.baseline_y(row11) - 7.5);
    }
}
