use crate::error::{BonusBallError, Result};
use crate::pool::schedule::DrawSchedule;
use crate::types::Money;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TOTAL_SLOTS: u32 = 59;
pub const PRICE_PER_SLOT: Money = Money::from_pounds(2);
pub const PRIZE_TARGET: Money = Money::from_pounds(80);
pub const UNDER_TARGET_PRIZE: Money = Money::from_pounds(76);

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub rules: PoolRules,
    pub lookup: LookupConfig,
    pub notify: NotifyConfig,
    /// Only used when the pool document is first created.
    pub default_admin_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRules {
    pub total_slots: u32,
    pub price_per_slot: Money,
    pub prize: PrizeRules,
    pub schedule: DrawSchedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRules {
    pub prize_target: Money,
    /// Cap on the prize when collection falls below `prize_target`.
    pub under_target_prize: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    pub api_url: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub default_title: String,
}

impl Default for PrizeRules {
    fn default() -> Self {
        Self {
            prize_target: PRIZE_TARGET,
            under_target_prize: UNDER_TARGET_PRIZE,
        }
    }
}

impl Default for PoolRules {
    fn default() -> Self {
        Self {
            total_slots: TOTAL_SLOTS,
            price_per_slot: PRICE_PER_SLOT,
            prize: PrizeRules::default(),
            schedule: DrawSchedule::default(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            default_title: "Bonus Ball Update".to_string(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            rules: PoolRules::default(),
            lookup: LookupConfig::default(),
            notify: NotifyConfig::default(),
            default_admin_password: "changeme".to_string(),
        }
    }
}

impl PoolConfig {
    /// Reads `config.json` from the data directory, falling back to defaults.
    pub async fn load_or_default(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !tokio::fs::try_exists(&path).await? {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let config: PoolConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        tokio::fs::create_dir_all(data_dir).await?;
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(data_dir.join(CONFIG_FILE), content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.rules.validate()?;

        if self.lookup.api_url.is_empty() {
            return Err(BonusBallError::config("Lookup API URL cannot be empty"));
        }

        if self.lookup.model.is_empty() {
            return Err(BonusBallError::config("Lookup model cannot be empty"));
        }

        if let Some(url) = &self.notify.webhook_url {
            if url.is_empty() {
                return Err(BonusBallError::config("Webhook URL cannot be empty"));
            }
        }

        if self.default_admin_password.is_empty() {
            return Err(BonusBallError::config("Admin password cannot be empty"));
        }

        Ok(())
    }
}

impl PoolRules {
    pub fn validate(&self) -> Result<()> {
        if self.total_slots == 0 {
            return Err(BonusBallError::config("Pool must have at least one slot"));
        }

        if self.price_per_slot.is_zero() {
            return Err(BonusBallError::config("Price per slot must be greater than 0"));
        }

        if self.price_per_slot.checked_mul(u64::from(self.total_slots)).is_none() {
            return Err(BonusBallError::config(format!(
                "Price per slot {} is too large",
                self.price_per_slot
            )));
        }

        if self.prize.under_target_prize >= self.prize.prize_target {
            return Err(BonusBallError::config(format!(
                "Under-target prize {} must be below the prize target {}",
                self.prize.under_target_prize, self.prize.prize_target
            )));
        }

        self.schedule.validate()
    }
}
