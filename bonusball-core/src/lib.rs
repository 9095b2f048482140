//! Bonus Ball - core library for a club lottery tracker
//!
//! Holds the numbered pool of balls, the prize rules that settle each weekly
//! draw, and the collaborators around them: a SQLite document store, a
//! best-effort official result lookup and push announcements.

pub mod admin;
pub mod config;
pub mod error;
pub mod lookup;
pub mod manager;
pub mod notify;
pub mod pool;
pub mod storage;
pub mod types;

pub use config::{PoolConfig, PoolRules, PrizeRules};
pub use error::{BonusBallError, Result};
pub use lookup::{GeminiLookup, ResultLookup};
pub use manager::PoolManager;
pub use notify::{Broadcaster, DeliveryReport, Notifier};
pub use pool::{DrawEngine, DrawOutcome, DrawSchedule, PoolLedger, PoolState};
pub use storage::{PoolRepository, PoolSnapshot, PoolStore, Storage};
pub use types::{
    Announcement, DrawWinner, ExternalResult, LedgerStats, Money, Settlement, Slot, SlotStatus,
};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_season_of_draws() {
        let temp_dir = tempdir().unwrap();
        let manager = PoolManager::new(temp_dir.path()).await.unwrap();

        for n in 1..=45 {
            manager.assign_owner(n, &format!("Member {}", n)).await.unwrap();
            manager.extend_payment(n, 1).await.unwrap();
        }

        // week one: nobody holds 50, half the £90 rolls over
        let (first, _) = manager.run_draw(50).await.unwrap();
        assert_eq!(first.winner, DrawWinner::Unsold);
        assert_eq!(first.charity, Money::from_pounds(45));
        assert_eq!(manager.stats().await.unwrap().rollover, Money::from_pounds(45));

        // week two: a paid member wins target plus rollover
        let (second, _) = manager.run_draw(12).await.unwrap();
        assert_eq!(second.winner, DrawWinner::Owner("Member 12".to_string()));
        assert_eq!(second.prize, Money::from_pounds(125));
        assert_eq!(second.charity, Money::from_pounds(10));

        // week three: everyone's payment has lapsed
        let stats = manager.stats().await.unwrap();
        assert_eq!(stats.paid, 0);
        assert_eq!(stats.rollover, Money::ZERO);

        let (third, _) = manager.run_draw(3).await.unwrap();
        assert_eq!(third.winner, DrawWinner::Unpaid);
        assert_eq!(third.charity, Money::ZERO);

        let state = manager.state().await.unwrap();
        let ids: Vec<u64> = state.history().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }
}
