//! Telegram transport: long-polls for commands, hands them to the
//! [`Tracker`], and replies with the rendered text.

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use opentelemetry::KeyValue;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::auth::CallerId;
use crate::command;
use crate::error::{Error, Result};
use crate::messages;
use crate::telemetry::metrics;
use crate::tracker::Tracker;

pub use api::{Message, TelegramClient, Update};

/// Configuration for the polling loop.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Server-side long-poll timeout for getUpdates.
    pub poll_timeout_secs: u64,
    /// Pause after a failed getUpdates before trying again.
    pub retry_backoff: Duration,
    /// The bot's username from getMe. Commands addressed to any other
    /// `@username` are ignored; with `None`, every addressed command is.
    pub bot_username: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            retry_backoff: Duration::from_secs(5),
            bot_username: None,
        }
    }
}

/// A command pulled out of an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub chat_id: i64,
    pub caller: CallerId,
    pub text: String,
}

impl Incoming {
    /// Only text messages from a known sender that start with `/` are
    /// commands; everything else is ignored. A `/verb@username` command
    /// counts only when `username` is `bot_username`, ignoring case.
    pub fn from_message(message: &Message, bot_username: Option<&str>) -> Option<Self> {
        let text = message.text.as_deref()?.trim();
        let from = message.from.as_ref()?;
        let addressed_elsewhere = command::addressee(text)
            .is_some_and(|to| !bot_username.is_some_and(|me| me.eq_ignore_ascii_case(to)));
        if !text.starts_with('/') || addressed_elsewhere {
            return None;
        }
        Some(Self {
            chat_id: message.chat.id,
            caller: CallerId(from.id),
            text: text.to_string(),
        })
    }
}

/// The polling loop. Cheap to clone; clones share the shutdown signal.
#[derive(Clone)]
pub struct Bot {
    client: Arc<TelegramClient>,
    tracker: Arc<Tracker>,
    config: BotConfig,
    shutdown: Arc<Notify>,
}

impl Bot {
    pub fn new(client: Arc<TelegramClient>, tracker: Arc<Tracker>, config: BotConfig) -> Self {
        Self {
            client,
            tracker,
            config,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Signal the polling loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    /// Poll until shutdown. Transport errors are logged, never fatal.
    pub async fn run(&self) -> Result<()> {
        info!("bot started, polling for updates");
        let mut offset: Option<i64> = None;

        loop {
            let polled = tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("bot shutting down");
                    return Ok(());
                }
                polled = self.client.get_updates(offset, self.config.poll_timeout_secs) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {e}, retrying in {:?}", self.config.retry_backoff);
                    tokio::select! {
                        _ = self.shutdown.notified() => return Ok(()),
                        _ = tokio::time::sleep(self.config.retry_backoff) => {}
                    }
                    continue;
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                if let Err(e) = self.process_update(&update).await {
                    error!(update_id = update.update_id, "failed to answer update: {e}");
                }
            }
        }
    }

    /// Handle one update and send the reply, if it warrants one.
    pub async fn process_update(&self, update: &Update) -> Result<()> {
        let bot_username = self.config.bot_username.as_deref();
        let incoming = update
            .message
            .as_ref()
            .and_then(|message| Incoming::from_message(message, bot_username));
        metrics::telegram_updates().add(
            1,
            &[KeyValue::new("handled", incoming.is_some().to_string())],
        );

        let Some(incoming) = incoming else {
            debug!(update_id = update.update_id, "ignoring non-command update");
            return Ok(());
        };

        let Some(reply) = self.answer(&incoming).await else {
            return Ok(());
        };
        self.client.send_message(incoming.chat_id, &reply).await
    }

    /// Run the command and render the reply text. `None` for verbs the bot
    /// does not know, which stay unanswered.
    pub async fn answer(&self, incoming: &Incoming) -> Option<String> {
        let tracker = Arc::clone(&self.tracker);
        let caller = incoming.caller;
        let text = incoming.text.clone();

        let result = tokio::task::spawn_blocking(move || tracker.handle_line(caller, &text))
            .await
            .unwrap_or_else(|e| Err(Error::Other(format!("command task panicked: {e}"))));

        if let Err(Error::UnknownCommand(verb)) = &result {
            debug!(verb = %verb, "ignoring unknown command");
            return None;
        }
        Some(messages::render(&result))
    }
}
