use crate::error::{BonusBallError, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Weekly draw timing, evaluated in a fixed local offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSchedule {
    pub weekday: Weekday,
    /// Time of day every draw date is pinned to.
    pub draw_time: NaiveTime,
    /// On draw day, at or after this time the draw counts as done and the
    /// next occurrence moves a week ahead.
    pub late_cutoff: NaiveTime,
    pub utc_offset_minutes: i32,
}

impl Default for DrawSchedule {
    fn default() -> Self {
        Self {
            weekday: Weekday::Sat,
            draw_time: NaiveTime::from_hms_opt(19, 45, 0).unwrap_or_default(),
            late_cutoff: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
            utc_offset_minutes: 0,
        }
    }
}

impl DrawSchedule {
    pub fn validate(&self) -> Result<()> {
        if FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).is_none() {
            return Err(BonusBallError::config(format!(
                "UTC offset of {} minutes is out of range",
                self.utc_offset_minutes
            )));
        }

        if self.late_cutoff < self.draw_time {
            return Err(BonusBallError::config(
                "Late cutoff must not be earlier than the draw time",
            ));
        }

        Ok(())
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    /// `at` expressed in the schedule's local offset, for display.
    pub fn local(&self, at: DateTime<Utc>) -> DateTime<FixedOffset> {
        at.with_timezone(&self.offset())
    }

    /// Next draw at or after `from`: the same day if `from` falls on the draw
    /// weekday before the late cutoff, otherwise the following matching
    /// weekday. Time of day is pinned to `draw_time`.
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let offset = self.offset();
        let local = from.with_timezone(&offset);

        let target = i64::from(self.weekday.num_days_from_sunday());
        let current = i64::from(local.weekday().num_days_from_sunday());
        let days_ahead = (target - current + 7) % 7;

        let mut date = local.date_naive() + Duration::days(days_ahead);
        if days_ahead == 0 && local.time() >= self.late_cutoff {
            date += Duration::days(7);
        }

        let pinned = date.and_time(self.draw_time);
        (pinned - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc()
    }

    /// Draw following the one just settled on `settled`. Settled dates are
    /// already pinned occurrences, so this is exactly one week later.
    pub fn following_draw(&self, settled: DateTime<Utc>) -> DateTime<Utc> {
        settled + Duration::days(7)
    }
}
