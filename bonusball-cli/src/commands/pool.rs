use crate::commands::Context;
use crate::config::CliConfig;
use anyhow::Result;
use bonusball_core::config::CONFIG_FILE;
use bonusball_core::{PoolLedger, SlotStatus};
use comfy_table::{presets::UTF8_FULL, Table};

pub async fn init(ctx: &Context) -> Result<()> {
    let config_path = ctx.data_dir.join(CONFIG_FILE);
    if config_path.exists() {
        println!("Using existing config: {}", config_path.display());
    } else {
        ctx.manager.config().save(&ctx.data_dir).await?;
        println!("Wrote default config: {}", config_path.display());
    }

    let snapshot = ctx.manager.snapshot().await?;
    println!("Pool ready:");
    println!("  Balls: {}", snapshot.state.total_slots());
    println!("  Price per ball: {}", snapshot.state.price_per_slot());
    println!("  Next draw: {}", ctx.format_date(snapshot.state.next_draw_date()));
    if snapshot.version == 1 && snapshot.state.history().is_empty() {
        println!();
        println!("Change the default admin password with: bonusball admin password");
    }

    Ok(())
}

pub async fn show_board(ctx: &Context, search: Option<&str>, unpaid_only: bool) -> Result<()> {
    let state = ctx.manager.state().await?;
    let followed = CliConfig::load(&ctx.data_dir)?.followed_slot;
    let draw_date = state.next_draw_date();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Ball", "Owner", "Paid through", "Status", ""]);

    let mut shown = 0;
    for slot in state.filter_slots(search.unwrap_or("")) {
        let status = slot.status(draw_date);
        if unpaid_only && status != SlotStatus::Unpaid {
            continue;
        }

        let paid_through = if slot.is_owned() {
            ctx.format_day(slot.paid_through)
        } else {
            String::new()
        };
        let marker = if followed == Some(slot.number) { "★" } else { "" };

        table.add_row(vec![
            slot.number.to_string(),
            slot.owner.clone().unwrap_or_else(|| "Open Slot".to_string()),
            paid_through,
            status.to_string(),
            marker.to_string(),
        ]);
        shown += 1;
    }

    if shown == 0 {
        println!("No balls match.");
        return Ok(());
    }

    if !state.recent_results().is_empty() {
        let recent: Vec<String> = state
            .recent_results()
            .iter()
            .map(|r| format!("{} ({})", r.number, r.date))
            .collect();
        println!("Recent official results: {}", recent.join(", "));
    }

    println!("Next draw: {}", ctx.format_date(draw_date));
    println!("{}", table);
    Ok(())
}

pub async fn show_stats(ctx: &Context) -> Result<()> {
    let state = ctx.manager.state().await?;
    let prize_rules = &ctx.manager.config().rules.prize;
    let stats = PoolLedger::new(&state, prize_rules).stats();

    println!("Pot status for {}:", ctx.format_date(state.next_draw_date()));
    println!("  Balls assigned: {} / {}", stats.assigned, state.total_slots());
    println!("  Paid for this draw: {}", stats.paid);
    println!("  Total collected: {}", stats.collected);
    println!("  Previous rollover: {}", stats.rollover);
    println!();

    if stats.under_threshold {
        println!("Limited draw: est. prize {}", stats.projected_prize);
        println!(
            "  Collection is below {}. Winner takes the whole pot (capped at {}) plus rollover. Charity gets nothing this week.",
            prize_rules.prize_target, prize_rules.under_target_prize
        );
    } else {
        println!("Standard draw: est. prize {}", stats.projected_prize);
        println!(
            "  Target met! Winner takes {} plus any rollover. {} goes to charity.",
            prize_rules.prize_target, stats.projected_charity
        );
    }

    println!();
    println!("Rules:");
    println!(
        "  Collection {}+: winner gets {} + rollover, charity gets the rest.",
        prize_rules.prize_target, prize_rules.prize_target
    );
    println!(
        "  Collection under {}: charity is paused, winner gets the collection (max {}) + rollover.",
        prize_rules.prize_target, prize_rules.under_target_prize
    );
    println!("  Unsold ball: 50% to charity, 50% rolls over to next week.");
    println!("  Unpaid owner: prize is forfeited and 100% goes to charity.");

    if let Some(last) = state.last_settlement() {
        println!();
        println!(
            "Last draw ({}): ball {}, {} won {}",
            ctx.format_day(last.draw_date),
            last.winning_number,
            last.winner_name(),
            last.prize
        );
    }

    if let Some(announcement) = state.last_announcement() {
        println!();
        println!("Latest announcement: {} - {}", announcement.title, announcement.body);
    }

    Ok(())
}
