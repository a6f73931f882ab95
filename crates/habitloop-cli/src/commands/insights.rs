use clap::Subcommand;
use habitloop_core::credentials;
use habitloop_core::insights::{GeminiClient, InsightService, InsightSource, Tone, API_KEY_ENTRY};
use habitloop_core::Config;

use super::{open_service, unlock, CmdResult};

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Three observations about your habits
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Enter the PIN so private habits are described by name
        #[arg(long)]
        unlock: bool,
    },
    /// One sentence of encouragement
    Praise {
        #[arg(long)]
        unlock: bool,
    },
    /// One sentence of teasing
    Roast {
        #[arg(long)]
        unlock: bool,
    },
    /// Store the API key in the OS keyring
    SetKey { key: String },
    /// Remove the stored API key
    ClearKey,
}

fn insight_service(config: &Config) -> InsightService {
    if !config.insights.enabled {
        return InsightService::offline();
    }
    match GeminiClient::from_config(&config.insights) {
        Ok(client) => InsightService::new(Box::new(client)),
        Err(e) => {
            tracing::info!("Insights offline: {e}");
            InsightService::offline()
        }
    }
}

pub async fn run(action: InsightsAction) -> CmdResult {
    let (tone, want_unlock) = match action {
        InsightsAction::SetKey { key } => {
            credentials::set(API_KEY_ENTRY, key.trim())?;
            println!("API key saved");
            return Ok(());
        }
        InsightsAction::ClearKey => {
            credentials::delete(API_KEY_ENTRY)?;
            println!("API key removed");
            return Ok(());
        }
        InsightsAction::Show { json, unlock } => {
            return show(json, unlock).await;
        }
        InsightsAction::Praise { unlock } => (Tone::Praise, unlock),
        InsightsAction::Roast { unlock } => (Tone::Roast, unlock),
    };

    let config = Config::load_or_default();
    let handle = open_service(&config).await?;
    if want_unlock {
        unlock(&handle).await?;
    }
    let snapshot = handle.snapshot().await?;
    let verdict = insight_service(&config)
        .verdict(&snapshot.habits, tone, snapshot.unlocked)
        .await;
    println!("{}", verdict.text);
    Ok(())
}

async fn show(json: bool, want_unlock: bool) -> CmdResult {
    let config = Config::load_or_default();
    let handle = open_service(&config).await?;
    if want_unlock {
        unlock(&handle).await?;
    }
    let snapshot = handle.snapshot().await?;
    let report = insight_service(&config)
        .insights(&snapshot.habits, snapshot.unlocked)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if report.source == InsightSource::Fallback {
        eprintln!("(showing general tips; generated insights unavailable)");
    }
    for insight in &report.insights {
        println!("{} {}", insight.icon, insight.title);
        println!("   {}", insight.description);
    }
    Ok(())
}
