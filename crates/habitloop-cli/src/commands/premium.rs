use clap::Subcommand;
use habitloop_core::{Config, Entitlement};

use super::{open_service, CmdResult};

#[derive(Subcommand)]
pub enum PremiumAction {
    /// Show the current plan
    Status,
    /// Unlock unlimited habits
    Enable,
    /// Return to the free plan (existing habits are kept)
    Disable,
}

pub async fn run(action: PremiumAction) -> CmdResult {
    let config = Config::load_or_default();
    let handle = open_service(&config).await?;
    let limit = config.habits.free_tier_limit;

    let entitlement = match action {
        PremiumAction::Status => handle.entitlement().await?,
        PremiumAction::Enable => handle.set_premium(true).await?,
        PremiumAction::Disable => handle.set_premium(false).await?,
    };
    print_plan(entitlement, limit, handle.summary().await?.total);
    Ok(())
}

fn print_plan(entitlement: Entitlement, free_limit: usize, total: usize) {
    match entitlement.habit_limit(free_limit) {
        None => println!("Plan: premium ({total} habits, no limit)"),
        Some(limit) => println!("Plan: free ({total}/{limit} habits)"),
    }
}
