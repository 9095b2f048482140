use crate::error::{BonusBallError, Result};
use crate::types::Slot;
use chrono::{DateTime, Duration, Utc};

/// Extends `slot` by whole weeks from whichever is later: its current
/// paid-through date or the next draw. Time already paid for is never lost.
pub fn extend(slot: &Slot, weeks: i64, next_draw_date: DateTime<Utc>) -> Result<Slot> {
    if weeks <= 0 {
        return Err(BonusBallError::InvalidDuration { weeks });
    }

    let anchor = slot.paid_through.max(next_draw_date);
    let paid_through = Duration::try_weeks(weeks)
        .and_then(|span| anchor.checked_add_signed(span))
        .ok_or(BonusBallError::InvalidDuration { weeks })?;

    Ok(Slot {
        paid_through,
        ..slot.clone()
    })
}
