use crate::admin::{hash_password, verify_password};
use crate::config::PoolConfig;
use crate::error::{BonusBallError, Result};
use crate::lookup::ResultLookup;
use crate::notify::{settlement_message, Broadcaster, DeliveryReport, LogNotifier, WebhookNotifier};
use crate::pool::{DrawEngine, PoolLedger, PoolState};
use crate::storage::{PoolRepository, PoolSnapshot, PoolStore, Storage};
use crate::types::{Announcement, ExternalResult, LedgerStats, Money, Settlement};
use chrono::Utc;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

pub const DATABASE_FILE: &str = "bonusball.db";

/// Loads the pool, applies one transition and writes it back compare-and-swap.
pub struct PoolManager {
    config: PoolConfig,
    repository: Arc<dyn PoolRepository>,
    broadcaster: Broadcaster,
    cache: RwLock<Option<PoolSnapshot>>,
}

impl PoolManager {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        let config = PoolConfig::load_or_default(data_dir).await?;
        Self::with_config(data_dir, config).await
    }

    pub async fn with_config(data_dir: &Path, config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let storage = Arc::new(Storage::new(&data_dir.join(DATABASE_FILE)).await?);
        let repository: Arc<dyn PoolRepository> = Arc::new(PoolStore::new(storage));

        let mut broadcaster = Broadcaster::new().with(Arc::new(LogNotifier));
        if let Some(url) = &config.notify.webhook_url {
            broadcaster = broadcaster.with(Arc::new(WebhookNotifier::new(url.clone())));
        }

        Ok(Self::from_parts(config, repository, broadcaster))
    }

    pub fn from_parts(
        config: PoolConfig,
        repository: Arc<dyn PoolRepository>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            config,
            repository,
            broadcaster,
            cache: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Current pool, creating and storing a fresh one on first use.
    pub async fn snapshot(&self) -> Result<PoolSnapshot> {
        let stored_version = self.repository.version().await?;

        if let (Some(version), Some(cached)) = (stored_version, self.cache.read().as_ref()) {
            if cached.version == version {
                return Ok(cached.clone());
            }
        }

        let snapshot = match self.repository.load().await? {
            Some(snapshot) => snapshot,
            None => self.initialise().await?,
        };

        *self.cache.write() = Some(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn state(&self) -> Result<PoolState> {
        Ok(self.snapshot().await?.state)
    }

    async fn initialise(&self) -> Result<PoolSnapshot> {
        let state = PoolState::new(
            &self.config.rules,
            hash_password(&self.config.default_admin_password),
            Utc::now(),
        );

        let version = match self.repository.save(&state, None).await {
            Ok(version) => version,
            // another process initialised first; use theirs
            Err(BonusBallError::StaleState { .. }) => {
                return self
                    .repository
                    .load()
                    .await?
                    .ok_or_else(|| BonusBallError::internal("Pool vanished after initialisation"));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            "Initialised pool with {} balls, first draw {}",
            state.total_slots(),
            state.next_draw_date()
        );
        Ok(PoolSnapshot { version, state })
    }

    /// Applies `transition` to the latest stored pool. A concurrent write
    /// between load and save surfaces as `StaleState`; nothing is applied.
    pub async fn update<T, F>(&self, transition: F) -> Result<T>
    where
        F: FnOnce(&PoolState) -> Result<(PoolState, T)>,
    {
        let current = self.snapshot().await?;
        let (state, output) = transition(&current.state)?;

        let version = self.repository.save(&state, Some(current.version)).await?;
        *self.cache.write() = Some(PoolSnapshot { version, state });

        Ok(output)
    }

    pub async fn stats(&self) -> Result<LedgerStats> {
        let state = self.state().await?;
        Ok(PoolLedger::new(&state, &self.config.rules.prize).stats())
    }

    pub async fn verify_admin(&self, password: &str) -> Result<()> {
        let state = self.state().await?;
        verify_password(state.admin_password_hash(), password)
    }

    pub async fn set_admin_password(&self, current: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(BonusBallError::config("Admin password cannot be empty"));
        }

        self.update(|state| {
            verify_password(state.admin_password_hash(), current)?;
            Ok((state.with_admin_password_hash(hash_password(new_password)), ()))
        })
        .await?;

        tracing::info!("Admin password changed");
        Ok(())
    }

    pub async fn assign_owner(&self, number: u32, name: &str) -> Result<()> {
        self.update(|state| Ok((state.assign_owner(number, name)?, ())))
            .await
    }

    pub async fn clear_owner(&self, number: u32) -> Result<()> {
        self.update(|state| Ok((state.clear_owner(number)?, ())))
            .await
    }

    pub async fn extend_payment(&self, number: u32, weeks: i64) -> Result<()> {
        self.update(|state| Ok((state.extend_payment(number, weeks)?, ())))
            .await
    }

    pub async fn set_price(&self, price: Money) -> Result<()> {
        self.update(|state| Ok((state.with_price(price)?, ())))
            .await
    }

    /// Settles the upcoming draw and records the settlement announcement.
    pub async fn run_draw(&self, winning_number: u32) -> Result<(Settlement, Announcement)> {
        let engine = DrawEngine::new(&self.config.rules);
        let title = self.config.notify.default_title.clone();

        self.update(|state| {
            let outcome = engine.settle(state, winning_number)?;
            let (state, announcement) = outcome.state.announce(
                &title,
                &settlement_message(&outcome.settlement),
                Utc::now(),
            );
            Ok((state, (outcome.settlement, announcement)))
        })
        .await
    }

    pub async fn announce(&self, title: Option<&str>, body: &str) -> Result<Announcement> {
        let title = title
            .unwrap_or(self.config.notify.default_title.as_str())
            .to_string();
        self.update(|state| Ok(state.announce(&title, body, Utc::now())))
            .await
    }

    pub async fn broadcast(&self, announcement: &Announcement) -> DeliveryReport {
        self.broadcaster.broadcast(announcement).await
    }

    /// Fetches recent official results and caches them in the pool.
    pub async fn refresh_recent_results(
        &self,
        lookup: &dyn ResultLookup,
    ) -> Result<Vec<ExternalResult>> {
        let results = lookup.recent_results().await?;
        tracing::info!("Fetched {} recent official results", results.len());

        let cached = results.clone();
        self.update(|state| Ok((state.with_recent_results(cached), ())))
            .await?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrawWinner;
    use async_trait::async_trait;
    use tempfile::tempdir;

    async fn manager(dir: &Path) -> PoolManager {
        PoolManager::with_config(dir, PoolConfig::default()).await.unwrap()
    }

    struct FixedLookup;

    #[async_trait]
    impl ResultLookup for FixedLookup {
        async fn latest_number(&self) -> Result<Option<u32>> {
            Ok(Some(17))
        }

        async fn recent_results(&self) -> Result<Vec<ExternalResult>> {
            Ok(vec![ExternalResult {
                date: "10/10/2026".to_string(),
                number: 17,
            }])
        }
    }

    #[tokio::test]
    async fn test_first_use_initialises_pool() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;

        let snapshot = manager.snapshot().await.unwrap();
        assert_eq!(snapshot.version, 1);
        assert_eq!(snapshot.state.total_slots(), 59);

        // a second manager on the same directory sees the same pool
        let other = PoolManager::with_config(temp_dir.path(), PoolConfig::default())
            .await
            .unwrap();
        assert_eq!(other.snapshot().await.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn test_slot_management_persists() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;

        manager.assign_owner(8, "Gina").await.unwrap();
        manager.extend_payment(8, 3).await.unwrap();

        let reopened = PoolManager::with_config(temp_dir.path(), PoolConfig::default())
            .await
            .unwrap();
        let state = reopened.state().await.unwrap();
        let slot = state.slot(8).unwrap();
        assert_eq!(slot.owner.as_deref(), Some("Gina"));
        assert_eq!(
            slot.paid_through,
            state.next_draw_date() + chrono::Duration::weeks(3)
        );

        let stats = reopened.stats().await.unwrap();
        assert_eq!(stats.assigned, 1);
        assert_eq!(stats.paid, 1);
        assert_eq!(stats.collected, Money::from_pounds(2));
    }

    #[tokio::test]
    async fn test_failed_transition_changes_nothing() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;
        let before = manager.snapshot().await.unwrap();

        assert!(matches!(
            manager.extend_payment(8, 0).await,
            Err(BonusBallError::InvalidDuration { weeks: 0 })
        ));
        assert!(matches!(
            manager.run_draw(99).await,
            Err(BonusBallError::InvalidSelection { .. })
        ));

        assert_eq!(manager.snapshot().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_run_draw_records_settlement_and_announcement() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;

        manager.assign_owner(23, "Alice").await.unwrap();
        manager.extend_payment(23, 1).await.unwrap();
        let first_draw = manager.state().await.unwrap().next_draw_date();

        let (settlement, announcement) = manager.run_draw(23).await.unwrap();
        assert_eq!(settlement.winner, DrawWinner::Owner("Alice".to_string()));
        assert_eq!(settlement.prize, Money::from_pounds(2));
        assert_eq!(settlement.draw_date, first_draw);
        assert_eq!(announcement.id, 1);
        assert_eq!(announcement.body, "Ball 23 drawn! Alice wins £2.00");

        let state = manager.state().await.unwrap();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.last_announcement(), Some(&announcement));
        assert_eq!(state.next_draw_date(), first_draw + chrono::Duration::days(7));

        let report = manager.broadcast(&announcement).await;
        assert_eq!(report.delivered, 1);
    }

    /// Lets another writer commit just before the first save goes through.
    struct InterleavedRepository {
        inner: PoolStore,
        raced: tokio::sync::Mutex<bool>,
    }

    #[async_trait]
    impl PoolRepository for InterleavedRepository {
        async fn load(&self) -> Result<Option<PoolSnapshot>> {
            self.inner.load().await
        }

        async fn version(&self) -> Result<Option<u64>> {
            self.inner.version().await
        }

        async fn save(&self, state: &PoolState, expected: Option<u64>) -> Result<u64> {
            let mut raced = self.raced.lock().await;
            if !*raced && expected.is_some() {
                *raced = true;
                if let Some(current) = self.inner.load().await? {
                    let other = current.state.assign_owner(2, "Fast")?;
                    self.inner.save(&other, Some(current.version)).await?;
                }
            }
            self.inner.save(state, expected).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_writer_is_detected() {
        let temp_dir = tempdir().unwrap();
        let storage = Arc::new(Storage::new(&temp_dir.path().join(DATABASE_FILE)).await.unwrap());
        let repository = Arc::new(InterleavedRepository {
            inner: PoolStore::new(storage),
            raced: tokio::sync::Mutex::new(false),
        });
        let manager = PoolManager::from_parts(PoolConfig::default(), repository, Broadcaster::new());
        manager.snapshot().await.unwrap();

        let result = manager.assign_owner(1, "Slow").await;

        assert!(matches!(result, Err(BonusBallError::StaleState { .. })));
        let state = manager.state().await.unwrap();
        assert_eq!(state.slot(1).unwrap().owner, None);
        assert_eq!(state.slot(2).unwrap().owner.as_deref(), Some("Fast"));
    }


    #[tokio::test]
    async fn test_admin_password() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;

        assert!(manager.verify_admin("changeme").await.is_ok());
        assert!(matches!(
            manager.verify_admin("guess").await,
            Err(BonusBallError::AccessDenied)
        ));

        assert!(manager.set_admin_password("guess", "new").await.is_err());
        manager.set_admin_password("changeme", "s3cret").await.unwrap();
        assert!(manager.verify_admin("s3cret").await.is_ok());
        assert!(manager.verify_admin("changeme").await.is_err());
    }

    #[tokio::test]
    async fn test_announcements_and_recent_results() {
        let temp_dir = tempdir().unwrap();
        let manager = manager(temp_dir.path()).await;

        let first = manager.announce(None, "Pay your subs").await.unwrap();
        let second = manager.announce(Some("Reminder"), "Draw tonight").await.unwrap();
        assert_eq!(first.title, "Bonus Ball Update");
        assert_eq!(second.id, first.id + 1);

        let results = manager.refresh_recent_results(&FixedLookup).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(manager.state().await.unwrap().recent_results(), results.as_slice());
        assert_eq!(FixedLookup.latest_number().await.unwrap(), Some(17));
    }
}
