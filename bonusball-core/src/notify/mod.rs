pub mod webhook;

pub use webhook::WebhookNotifier;

use crate::error::Result;
use crate::types::{Announcement, DrawWinner, Settlement};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &str;

    async fn notify(&self, announcement: &Announcement) -> Result<()>;
}

/// Writes announcements to the log only.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, announcement: &Announcement) -> Result<()> {
        tracing::info!(
            "Announcement #{}: {} - {}",
            announcement.id,
            announcement.title,
            announcement.body
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Sends each announcement to every notifier; one failure never stops the rest.
#[derive(Clone, Default)]
pub struct Broadcaster {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub async fn broadcast(&self, announcement: &Announcement) -> DeliveryReport {
        let results = join_all(self.notifiers.iter().map(|n| n.notify(announcement))).await;

        let mut report = DeliveryReport::default();
        for (notifier, result) in self.notifiers.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!("Push via {} failed: {}", notifier.name(), e);
                    report.failed += 1;
                }
            }
        }
        report
    }
}

/// Short announcement text for a settled draw.
pub fn settlement_message(settlement: &Settlement) -> String {
    let ball = settlement.winning_number;
    match &settlement.winner {
        DrawWinner::Owner(name) if settlement.charity.is_zero() => {
            format!("Ball {} drawn! {} wins {}", ball, name, settlement.prize)
        }
        DrawWinner::Owner(name) => format!(
            "Ball {} drawn! {} wins {}, {} goes to charity",
            ball, name, settlement.prize, settlement.charity
        ),
        DrawWinner::Unpaid => format!(
            "Ball {} drawn but its owner had not paid. {} goes to charity",
            ball, settlement.charity
        ),
        DrawWinner::Unsold => format!(
            "Ball {} was unsold. {} to charity, {} rolls over to next week",
            ball, settlement.charity, settlement.rollover_carry
        ),
    }
}
