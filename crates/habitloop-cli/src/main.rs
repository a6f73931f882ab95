use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habitloop-cli", version, about = "Habitloop CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Habit tracking
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Private habit lock and PIN
    Privacy {
        #[command(subcommand)]
        action: commands::privacy::PrivacyAction,
    },
    /// Premium entitlement
    Premium {
        #[command(subcommand)]
        action: commands::premium::PremiumAction,
    },
    /// Generated insights and verdicts
    Insights {
        #[command(subcommand)]
        action: commands::insights::InsightsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Habit { action } => commands::habit::run(action).await,
        Commands::Privacy { action } => commands::privacy::run(action).await,
        Commands::Premium { action } => commands::premium::run(action).await,
        Commands::Insights { action } => commands::insights::run(action).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
