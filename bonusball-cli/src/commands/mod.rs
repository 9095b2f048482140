pub mod admin;
pub mod draw;
pub mod pool;
pub mod slot;

pub use admin::{handle_admin_command, AdminCommands};
pub use draw::{handle_draw_command, DrawCommands};
pub use pool::{init, show_board, show_stats};
pub use slot::{handle_slot_command, SlotCommands};

use anyhow::Result;
use bonusball_core::PoolManager;
use chrono::{DateTime, Utc};
use dialoguer::Password;
use std::path::PathBuf;

const PASSWORD_ENV: &str = "BONUSBALL_ADMIN_PASSWORD";

pub struct Context {
    pub manager: PoolManager,
    pub data_dir: PathBuf,
    pub password: Option<String>,
}

impl Context {
    /// Admin password from the flag, the environment, or an interactive prompt.
    fn admin_password(&self) -> Result<String> {
        if let Some(password) = &self.password {
            return Ok(password.clone());
        }
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            return Ok(password);
        }
        Ok(Password::new().with_prompt("Admin password").interact()?)
    }

    /// Verifies the admin password and returns it.
    pub async fn require_admin(&self) -> Result<String> {
        let password = self.admin_password()?;
        self.manager.verify_admin(&password).await?;
        Ok(password)
    }

    pub fn format_date(&self, at: DateTime<Utc>) -> String {
        self.manager
            .config()
            .rules
            .schedule
            .local(at)
            .format("%a %d %b %Y %H:%M")
            .to_string()
    }

    pub fn format_day(&self, at: DateTime<Utc>) -> String {
        self.manager
            .config()
            .rules
            .schedule
            .local(at)
            .format("%d %b")
            .to_string()
    }
}
