use crate::commands::Context;
use anyhow::{bail, Result};
use bonusball_core::{GeminiLookup, ResultLookup, Settlement};
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::Confirm;

#[derive(Subcommand)]
pub enum DrawCommands {
    /// Settle the upcoming draw with a winning number
    Run {
        /// Winning bonus ball
        number: u32,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Look up the latest official bonus ball, then settle with it
    Lookup {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Fetch recent official results
    Recent,
    /// Show past winners
    History,
}

pub async fn handle_draw_command(cmd: DrawCommands, ctx: &Context) -> Result<()> {
    match cmd {
        DrawCommands::Run { number, yes } => {
            ctx.require_admin().await?;
            settle(ctx, number, yes).await?;
        }

        DrawCommands::Lookup { yes } => {
            ctx.require_admin().await?;
            let lookup = GeminiLookup::from_env(&ctx.manager.config().lookup)?;

            println!("Looking up the latest bonus ball...");
            let Some(number) = lookup.latest_number().await? else {
                bail!("Could not find the latest bonus ball; use 'bonusball draw run <number>'");
            };

            println!("Lookup suggests ball {}.", number);
            settle(ctx, number, yes).await?;
        }

        DrawCommands::Recent => {
            let lookup = GeminiLookup::from_env(&ctx.manager.config().lookup)?;
            let results = ctx.manager.refresh_recent_results(&lookup).await?;

            if results.is_empty() {
                println!("No recent official results found.");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Date", "Bonus Ball"]);
            for result in &results {
                table.add_row(vec![result.date.clone(), result.number.to_string()]);
            }
            println!("Recent official results:");
            println!("{}", table);
        }

        DrawCommands::History => {
            let state = ctx.manager.state().await?;

            if state.history().is_empty() {
                println!("No winners recorded yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Date", "Ball", "Winner", "Prize", "Charity", "Rollover"]);
            for settlement in state.history() {
                table.add_row(vec![
                    settlement.id.to_string(),
                    ctx.format_day(settlement.draw_date),
                    settlement.winning_number.to_string(),
                    settlement.winner_name().to_string(),
                    settlement.prize.to_string(),
                    settlement.charity.to_string(),
                    settlement.rollover_carry.to_string(),
                ]);
            }
            println!("Hall of winners (latest first):");
            println!("{}", table);
        }
    }

    Ok(())
}

async fn settle(ctx: &Context, number: u32, yes: bool) -> Result<()> {
    let state = ctx.manager.state().await?;
    let slot = state.slot(number)?;

    if !yes {
        let holder = slot.owner.as_deref().unwrap_or("nobody");
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Settle the {} draw with ball {} (held by {})? This cannot be undone.",
                ctx.format_day(state.next_draw_date()),
                number,
                holder
            ))
            .default(false)
            .interact()?;

        if !confirm {
            println!("Draw cancelled.");
            return Ok(());
        }
    }

    let (settlement, announcement) = ctx.manager.run_draw(number).await?;
    print_settlement(&settlement);

    let report = ctx.manager.broadcast(&announcement).await;
    if report.failed > 0 {
        println!(
            "Announcement sent to {} of {} channels.",
            report.delivered,
            report.delivered + report.failed
        );
    }

    let next = ctx.manager.state().await?.next_draw_date();
    println!("Next draw: {}", ctx.format_date(next));
    Ok(())
}

fn print_settlement(settlement: &Settlement) {
    println!("Draw {} settled:", settlement.id);
    println!("  Winning ball: {}", settlement.winning_number);
    println!("  Winner: {}", settlement.winner_name());
    println!("  Prize: {}", settlement.prize);
    println!("  Charity: {}", settlement.charity);
    if !settlement.rollover_carry.is_zero() {
        println!("  Rolled over: {}", settlement.rollover_carry);
    }
}
