use crate::commands::Context;
use anyhow::{bail, Result};
use bonusball_core::Money;
use clap::Subcommand;
use dialoguer::Password;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Set the price per ball (e.g. 2 or 2.50)
    Price {
        /// Price in pounds
        amount: String,
    },
    /// Change the shared admin password
    Password,
    /// Push an announcement to members
    Announce {
        /// Message body
        body: String,
        /// Message title
        #[arg(short, long)]
        title: Option<String>,
    },
}

pub async fn handle_admin_command(cmd: AdminCommands, ctx: &Context) -> Result<()> {
    match cmd {
        AdminCommands::Price { amount } => {
            let price: Money = amount.parse()?;
            ctx.require_admin().await?;
            ctx.manager.set_price(price).await?;
            println!("Price per ball set to {}.", price);
        }

        AdminCommands::Password => {
            let current = ctx.require_admin().await?;
            let new_password = Password::new()
                .with_prompt("New admin password")
                .with_confirmation("Confirm new password", "Passwords do not match")
                .interact()?;

            if new_password.is_empty() {
                bail!("Admin password cannot be empty");
            }

            ctx.manager
                .set_admin_password(&current, &new_password)
                .await?;
            println!("Admin password changed.");
        }

        AdminCommands::Announce { body, title } => {
            ctx.require_admin().await?;
            let announcement = ctx.manager.announce(title.as_deref(), &body).await?;
            let report = ctx.manager.broadcast(&announcement).await;

            println!(
                "Announcement #{} sent ({} delivered, {} failed).",
                announcement.id, report.delivered, report.failed
            );
        }
    }

    Ok(())
}
