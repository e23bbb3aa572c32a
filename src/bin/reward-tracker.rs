//! reward-tracker CLI: runs the bot, or executes one command locally.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use reward_tracker::auth::{AdminGate, CallerId};
use reward_tracker::config::Config;
use reward_tracker::health;
use reward_tracker::messages;
use reward_tracker::storage::LedgerStore;
use reward_tracker::telegram::{Bot, BotConfig, TelegramClient};
use reward_tracker::telemetry::{TelemetryConfig, init_telemetry};
use reward_tracker::tracker::Tracker;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "reward-tracker", about = "Work and payment ledger bot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Telegram bot and the liveness endpoint
    Serve,
    /// Run one bot command against the ledger file and print the reply
    Exec {
        /// Caller identity (defaults to the configured admin)
        #[arg(long)]
        caller: Option<i64>,
        /// Command line, e.g. `add alice 5`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        line: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Serve => cmd_serve(config).await,
        Command::Exec { caller, line } => cmd_exec(config, caller, line),
    }
}

fn build_tracker(config: &Config) -> Tracker {
    Tracker::new(
        LedgerStore::open(&config.data_file),
        AdminGate::new(config.admin_id),
    )
}

async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "reward-tracker".to_string(),
        default_filter: config.log_level.clone(),
    })?;

    let tracker = Arc::new(build_tracker(&config));
    let client = Arc::new(TelegramClient::new(
        &config.telegram_api_url,
        &config.bot_token,
        config.poll_timeout_secs,
    )?);
    // Fails fast on a bad token, and yields the name used in /verb@name.
    let me = client.get_me().await?;
    info!(bot_id = me.id, username = ?me.username, "authenticated with Telegram");

    let bot = Bot::new(
        client,
        tracker,
        BotConfig {
            poll_timeout_secs: config.poll_timeout_secs,
            bot_username: me.username,
            ..BotConfig::default()
        },
    );

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    let health_stop = Arc::new(tokio::sync::Notify::new());
    let stop = Arc::clone(&health_stop);
    let health_task = tokio::spawn(health::serve(listener, async move {
        stop.notified().await;
    }));

    let ctrl = bot.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        ctrl.shutdown();
    });

    info!(data_file = %config.data_file.display(), "reward-tracker running");
    bot.run().await?;

    health_stop.notify_one();
    health_task.await??;
    Ok(())
}

fn cmd_exec(config: Config, caller: Option<i64>, line: Vec<String>) -> anyhow::Result<()> {
    let tracker = build_tracker(&config);
    let caller = caller.map(CallerId).unwrap_or(config.admin_id);

    let result = tracker.handle_line(caller, &line.join(" "));
    let text = messages::render(&result);
    match result {
        Ok(_) => {
            println!("{text}");
            Ok(())
        }
        Err(e) => {
            eprintln!("{text}");
            Err(e.into())
        }
    }
}
