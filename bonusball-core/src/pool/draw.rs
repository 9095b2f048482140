use crate::config::PoolRules;
use crate::error::Result;
use crate::pool::{PoolLedger, PoolState};
use crate::types::{DrawWinner, Money, Settlement};

/// Result of settling a draw: the new pool and the record appended to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome {
    pub state: PoolState,
    pub settlement: Settlement,
}

/// Settles weekly draws against a pool.
#[derive(Debug, Clone, Copy)]
pub struct DrawEngine<'a> {
    rules: &'a PoolRules,
}

impl<'a> DrawEngine<'a> {
    pub fn new(rules: &'a PoolRules) -> Self {
        Self { rules }
    }

    /// Settles the upcoming draw for `winning_number`.
    ///
    /// - Unsold ball: no prize, collection split 50/50 between charity and rollover.
    /// - Owned but unpaid: prize forfeited, whole collection to charity.
    /// - Owned and paid: projected prize and charity; rollover resets to zero.
    pub fn settle(&self, state: &PoolState, winning_number: u32) -> Result<DrawOutcome> {
        let slot = state.slot(winning_number)?;
        let ledger = PoolLedger::new(state, &self.rules.prize);
        let collected = ledger.collected();
        let paid = slot.is_paid_for(state.next_draw_date);

        let (winner, prize, charity, rollover_carry) = match (&slot.owner, paid) {
            (None, _) => {
                let (charity, carry) = collected.split_half();
                (DrawWinner::Unsold, Money::ZERO, charity, carry)
            }
            (Some(_), false) => (DrawWinner::Unpaid, Money::ZERO, collected, Money::ZERO),
            (Some(owner), true) => (
                DrawWinner::Owner(owner.clone()),
                ledger.projected_prize(),
                ledger.projected_charity(),
                Money::ZERO,
            ),
        };

        let settlement = Settlement {
            id: state.next_settlement_id(),
            winning_number,
            winner,
            prize,
            charity,
            rollover_carry,
            draw_date: state.next_draw_date,
        };

        let mut next = state.clone();
        next.history.insert(0, settlement.clone());
        next.rollover_balance = if paid {
            Money::ZERO
        } else {
            state.rollover_balance + rollover_carry
        };
        next.next_draw_date = self.rules.schedule.following_draw(state.next_draw_date);

        tracing::info!(
            "Draw {} settled: ball {} -> {} (prize {}, charity {}, rollover now {})",
            settlement.id,
            winning_number,
            settlement.winner_name(),
            prize,
            charity,
            next.rollover_balance
        );

        Ok(DrawOutcome {
            state: next,
            settlement,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BonusBallError;
    use crate::pool::ledger::tests::pool_with_paid;
    use chrono::Duration;

    fn rules() -> PoolRules {
        PoolRules::default()
    }

    #[test]
    fn test_paid_winner_target_met() {
        let rules = rules();
        let state = pool_with_paid(50, Money::ZERO);
        let outcome = DrawEngine::new(&rules).settle(&state, 7).unwrap();
        let s = &outcome.settlement;

        assert_eq!(s.winner, DrawWinner::Owner("Player 7".to_string()));
        assert_eq!(s.prize, Money::from_pounds(80));
        assert_eq!(s.charity, Money::from_pounds(20));
        assert_eq!(s.rollover_carry, Money::ZERO);
        assert_eq!(outcome.state.rollover_balance(), Money::ZERO);
    }

    #[test]
    fn test_paid_winner_conserves_money() {
        let rules = rules();
        for (paid, rollover) in [(40, 0), (41, 12), (50, 7), (59, 100)] {
            let rollover = Money::from_pounds(rollover);
            let state = pool_with_paid(paid, rollover);
            let collected = Money::from_pounds(2) * paid as u64;
            let s = DrawEngine::new(&rules).settle(&state, 1).unwrap().settlement;
            assert_eq!(s.prize + s.charity, collected + rollover);
        }
    }

    #[test]
    fn test_paid_winner_under_threshold() {
        let rules = rules();
        let state = pool_with_paid(30, Money::from_pounds(10));
        let outcome = DrawEngine::new(&rules).settle(&state, 30).unwrap();

        assert_eq!(outcome.settlement.prize, Money::from_pounds(70));
        assert_eq!(outcome.settlement.charity, Money::ZERO);
        assert_eq!(outcome.state.rollover_balance(), Money::ZERO);
    }

    #[test]
    fn test_unpaid_owner_forfeits_to_charity() {
        let rules = rules();
        let state = pool_with_paid(20, Money::from_pounds(15))
            .assign_owner(45, "Late Larry")
            .unwrap();
        let outcome = DrawEngine::new(&rules).settle(&state, 45).unwrap();
        let s = &outcome.settlement;

        assert_eq!(s.winner, DrawWinner::Unpaid);
        assert_eq!(s.winner_name(), "Unpaid");
        assert_eq!(s.prize, Money::ZERO);
        assert_eq!(s.charity, Money::from_pounds(40));
        assert_eq!(s.rollover_carry, Money::ZERO);
        // rollover is neither reset nor grown
        assert_eq!(outcome.state.rollover_balance(), Money::from_pounds(15));
    }

    #[test]
    fn test_unsold_ball_splits_collection() {
        let rules = rules();
        let state = pool_with_paid(20, Money::from_pounds(5));
        let outcome = DrawEngine::new(&rules).settle(&state, 59).unwrap();
        let s = &outcome.settlement;

        assert_eq!(s.winner, DrawWinner::Unsold);
        assert_eq!(s.prize, Money::ZERO);
        assert_eq!(s.charity, Money::from_pounds(20));
        assert_eq!(s.rollover_carry, Money::from_pounds(20));
        assert_eq!(outcome.state.rollover_balance(), Money::from_pounds(25));
    }

    #[test]
    fn test_empty_pool_draw_moves_no_money() {
        let rules = rules();
        let state = pool_with_paid(0, Money::ZERO);
        let s = DrawEngine::new(&rules).settle(&state, 12).unwrap().settlement;

        assert_eq!(s.prize, Money::ZERO);
        assert_eq!(s.charity, Money::ZERO);
        assert_eq!(s.rollover_carry, Money::ZERO);
    }

    #[test]
    fn test_rollover_accumulates_then_pays_out() {
        let rules = rules();
        let engine = DrawEngine::new(&rules);
        let state = pool_with_paid(20, Money::ZERO);

        // unsold ball: £20 carried
        let first = engine.settle(&state, 58).unwrap();
        assert_eq!(first.state.rollover_balance(), Money::from_pounds(20));

        // everyone pays for the next draw as well
        let mut state = first.state;
        for n in 1..=20 {
            state = state.extend_payment(n, 1).unwrap();
        }

        let second = engine.settle(&state, 4).unwrap();
        assert_eq!(second.settlement.prize, Money::from_pounds(60));
        assert_eq!(second.state.rollover_balance(), Money::ZERO);
    }

    #[test]
    fn test_history_and_draw_dates() {
        let rules = rules();
        let engine = DrawEngine::new(&rules);
        let state = pool_with_paid(10, Money::ZERO);
        let first_draw = state.next_draw_date();

        let one = engine.settle(&state, 1).unwrap();
        let two = engine.settle(&one.state, 2).unwrap();

        assert_eq!(one.settlement.id, 1);
        assert_eq!(one.settlement.draw_date, first_draw);
        assert_eq!(two.settlement.id, 2);
        assert_eq!(two.settlement.draw_date, first_draw + Duration::days(7));
        assert_eq!(two.state.next_draw_date(), first_draw + Duration::days(14));

        let ids: Vec<u64> = two.state.history().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(two.state.history()[1], one.settlement);
    }

    #[test]
    fn test_invalid_winning_number() {
        let rules = rules();
        let state = pool_with_paid(10, Money::ZERO);
        let engine = DrawEngine::new(&rules);

        assert!(matches!(
            engine.settle(&state, 0),
            Err(BonusBallError::InvalidSelection { .. })
        ));
        assert!(matches!(
            engine.settle(&state, 60),
            Err(BonusBallError::InvalidSelection { number: 60, total: 59 })
        ));
    }
}
