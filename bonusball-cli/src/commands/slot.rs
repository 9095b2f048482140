use crate::commands::Context;
use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum SlotCommands {
    /// Show one ball
    Show {
        /// Ball number
        number: u32,
    },
    /// Assign an owner to a ball
    Assign {
        /// Ball number
        number: u32,
        /// Owner name (an empty name clears the ball)
        name: String,
    },
    /// Clear a ball's owner
    Clear {
        /// Ball number
        number: u32,
    },
    /// Record a payment covering a number of weeks
    Pay {
        /// Ball number
        number: u32,
        /// Weeks paid for
        #[arg(allow_hyphen_values = true)]
        weeks: i64,
    },
    /// Follow a ball on this device
    Follow {
        /// Ball number
        number: u32,
    },
    /// Stop following a ball
    Unfollow,
}

pub async fn handle_slot_command(cmd: SlotCommands, ctx: &Context) -> Result<()> {
    match cmd {
        SlotCommands::Show { number } => {
            let state = ctx.manager.state().await?;
            let slot = state.slot(number)?;
            let followed = CliConfig::load(&ctx.data_dir)?.followed_slot == Some(number);

            println!("Ball {}{}:", number, if followed { " (followed)" } else { "" });
            match &slot.owner {
                Some(owner) => {
                    println!("  Owner: {}", owner);
                    println!("  Paid through: {}", ctx.format_date(slot.paid_through));
                    println!("  Status: {}", slot.status(state.next_draw_date()));
                }
                None => println!("  Open slot"),
            }
        }

        SlotCommands::Assign { number, name } => {
            ctx.require_admin().await?;
            ctx.manager.assign_owner(number, &name).await?;

            if name.trim().is_empty() {
                println!("Ball {} is now open.", number);
            } else {
                println!("Ball {} assigned to {}.", number, name.trim());
            }
        }

        SlotCommands::Clear { number } => {
            ctx.require_admin().await?;
            ctx.manager.clear_owner(number).await?;
            println!("Ball {} is now open.", number);
        }

        SlotCommands::Pay { number, weeks } => {
            ctx.require_admin().await?;
            ctx.manager.extend_payment(number, weeks).await?;

            let state = ctx.manager.state().await?;
            let slot = state.slot(number)?;
            println!(
                "Ball {} paid through {}.",
                number,
                ctx.format_date(slot.paid_through)
            );
        }

        SlotCommands::Follow { number } => {
            // validates the number
            ctx.manager.state().await?.slot(number)?;

            let mut config = CliConfig::load(&ctx.data_dir)?;
            config.followed_slot = Some(number);
            config.save(&ctx.data_dir)?;
            println!("Following ball {}.", number);
        }

        SlotCommands::Unfollow => {
            let mut config = CliConfig::load(&ctx.data_dir)?;
            match config.followed_slot.take() {
                Some(number) => {
                    config.save(&ctx.data_dir)?;
                    println!("Stopped following ball {}.", number);
                }
                None => println!("Not following any ball."),
            }
        }
    }

    Ok(())
}
