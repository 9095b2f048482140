use crate::config::PrizeRules;
use crate::pool::PoolState;
use crate::types::{LedgerStats, Money};

/// Read-only prize math over a pool for its upcoming draw.
#[derive(Debug, Clone, Copy)]
pub struct PoolLedger<'a> {
    state: &'a PoolState,
    rules: &'a PrizeRules,
}

impl<'a> PoolLedger<'a> {
    pub fn new(state: &'a PoolState, rules: &'a PrizeRules) -> Self {
        Self { state, rules }
    }

    pub fn paid_count(&self) -> usize {
        let draw_date = self.state.next_draw_date;
        self.state
            .slots
            .iter()
            .filter(|slot| slot.is_paid_for(draw_date))
            .count()
    }

    pub fn assigned_count(&self) -> usize {
        self.state.slots.iter().filter(|slot| slot.is_owned()).count()
    }

    pub fn collected(&self) -> Money {
        self.state.price_per_slot * self.paid_count() as u64
    }

    pub fn is_under_threshold(&self) -> bool {
        self.collected() < self.rules.prize_target
    }

    pub fn base_prize(&self) -> Money {
        if self.is_under_threshold() {
            self.collected().min(self.rules.under_target_prize)
        } else {
            self.rules.prize_target
        }
    }

    pub fn projected_prize(&self) -> Money {
        self.base_prize() + self.state.rollover_balance
    }

    pub fn projected_charity(&self) -> Money {
        if self.is_under_threshold() {
            Money::ZERO
        } else {
            self.collected().saturating_sub(self.rules.prize_target)
        }
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            assigned: self.assigned_count(),
            paid: self.paid_count(),
            collected: self.collected(),
            rollover: self.state.rollover_balance,
            projected_prize: self.projected_prize(),
            projected_charity: self.projected_charity(),
            under_threshold: self.is_under_threshold(),
        }
    }
}
