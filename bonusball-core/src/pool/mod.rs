//! Pool state and the pure transitions applied to it.
//!
//! Every transition takes the current [`PoolState`] by reference and returns a
//! new value, so a caller can apply it against its store as a single
//! compare-and-swap.

pub mod draw;
pub mod ledger;
pub mod payment;
pub mod schedule;

pub use draw::{DrawEngine, DrawOutcome};
pub use ledger::PoolLedger;
pub use schedule::DrawSchedule;

use crate::config::PoolRules;
use crate::error::{BonusBallError, Result};
use crate::types::{Announcement, ExternalResult, Money, Settlement, Slot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub(crate) slots: Vec<Slot>,
    pub(crate) price_per_slot: Money,
    pub(crate) rollover_balance: Money,
    pub(crate) next_draw_date: DateTime<Utc>,
    /// Most recent first.
    pub(crate) history: Vec<Settlement>,
    pub(crate) admin_password_hash: String,
    #[serde(default)]
    pub(crate) last_announcement: Option<Announcement>,
    #[serde(default)]
    pub(crate) recent_results: Vec<ExternalResult>,
}

impl PoolState {
    /// Fresh pool: every slot open, no rollover, next draw per the schedule.
    pub fn new(rules: &PoolRules, admin_password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            slots: (1..=rules.total_slots).map(|n| Slot::new(n, now)).collect(),
            price_per_slot: rules.price_per_slot,
            rollover_balance: Money::ZERO,
            next_draw_date: rules.schedule.next_occurrence(now),
            history: Vec::new(),
            admin_password_hash,
            last_announcement: None,
            recent_results: Vec::new(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn total_slots(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn price_per_slot(&self) -> Money {
        self.price_per_slot
    }

    pub fn rollover_balance(&self) -> Money {
        self.rollover_balance
    }

    pub fn next_draw_date(&self) -> DateTime<Utc> {
        self.next_draw_date
    }

    pub fn history(&self) -> &[Settlement] {
        &self.history
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.history.first()
    }

    pub fn admin_password_hash(&self) -> &str {
        &self.admin_password_hash
    }

    pub fn last_announcement(&self) -> Option<&Announcement> {
        self.last_announcement.as_ref()
    }

    pub fn recent_results(&self) -> &[ExternalResult] {
        &self.recent_results
    }

    pub(crate) fn slot_index(&self, number: u32) -> Result<usize> {
        let total = self.total_slots();
        if number == 0 || number > total {
            return Err(BonusBallError::InvalidSelection { number, total });
        }
        Ok((number - 1) as usize)
    }

    pub fn slot(&self, number: u32) -> Result<&Slot> {
        let index = self.slot_index(number)?;
        Ok(&self.slots[index])
    }

    pub(crate) fn next_settlement_id(&self) -> u64 {
        self.history.first().map_or(1, |s| s.id + 1)
    }

    /// Slot numbers must be exactly `1..=N` in order.
    pub fn check_invariants(&self) -> Result<()> {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.number as usize != index + 1 {
                return Err(BonusBallError::internal(format!(
                    "Slot at position {} has number {}",
                    index + 1,
                    slot.number
                )));
            }
        }
        Ok(())
    }

    /// Sets the owner of a slot. A blank name leaves the slot unowned.
    pub fn assign_owner(&self, number: u32, name: &str) -> Result<PoolState> {
        let index = self.slot_index(number)?;
        let name = name.trim();

        let mut next = self.clone();
        next.slots[index].owner = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };

        tracing::info!("Ball {} owner set to {:?}", number, next.slots[index].owner);
        Ok(next)
    }

    pub fn clear_owner(&self, number: u32) -> Result<PoolState> {
        self.assign_owner(number, "")
    }

    pub fn with_price(&self, price: Money) -> Result<PoolState> {
        if price.is_zero() {
            return Err(BonusBallError::config("Price per slot must be greater than 0"));
        }
        if price.checked_mul(self.slots.len() as u64).is_none() {
            return Err(BonusBallError::config(format!("Price per slot {} is too large", price)));
        }

        let mut next = self.clone();
        next.price_per_slot = price;
        tracing::info!("Price per ball set to {}", price);
        Ok(next)
    }

    /// Extends a slot's paid-through date; see [`payment::extend`].
    pub fn extend_payment(&self, number: u32, weeks: i64) -> Result<PoolState> {
        let index = self.slot_index(number)?;

        let mut next = self.clone();
        next.slots[index] = payment::extend(&self.slots[index], weeks, self.next_draw_date)?;

        tracing::info!(
            "Ball {} paid through {}",
            number,
            next.slots[index].paid_through
        );
        Ok(next)
    }

    pub fn with_admin_password_hash(&self, hash: String) -> PoolState {
        let mut next = self.clone();
        next.admin_password_hash = hash;
        next
    }

    pub fn with_recent_results(&self, results: Vec<ExternalResult>) -> PoolState {
        let mut next = self.clone();
        next.recent_results = results;
        next
    }

    /// Records a new announcement; ids increase by one each time.
    pub fn announce(
        &self,
        title: &str,
        body: &str,
        now: DateTime<Utc>,
    ) -> (PoolState, Announcement) {
        let announcement = Announcement {
            id: self.last_announcement.as_ref().map_or(1, |a| a.id + 1),
            title: title.to_string(),
            body: body.to_string(),
            created_at: now,
        };

        let mut next = self.clone();
        next.last_announcement = Some(announcement.clone());
        (next, announcement)
    }

    /// Case-insensitive match on ball number or owner name.
    pub fn filter_slots(&self, query: &str) -> Vec<&Slot> {
        let query = query.trim().to_lowercase();
        self.slots
            .iter()
            .filter(|slot| {
                query.is_empty()
                    || slot.number.to_string().contains(&query)
                    || slot
                        .owner
                        .as_ref()
                        .is_some_and(|owner| owner.to_lowercase().contains(&query))
            })
            .collect()
    }
}
