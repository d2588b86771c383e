// src/commands.rs
//! On-demand trigger: the Telegram long-poll loop consuming inbound
//! commands. A `/digest` run delivers to whoever asked, passed straight
//! through as the run's destination; the configured default is untouched.

use std::sync::Arc;

use crate::notify::telegram::TelegramBot;
use crate::notify::ChatId;
use crate::pipeline::DigestPipeline;

const POLL_TIMEOUT_SECS: u64 = 50;
const ERROR_BACKOFF_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Report the caller's chat id (diagnostic, used to configure the
    /// default destination).
    Start,
    /// Generate a digest now, delivered to the caller.
    Digest,
}

/// Match the leading token of a message against the known commands,
/// tolerating the `@BotName` suffix used in group chats.
pub fn parse_command(text: &str) -> Option<Command> {
    let first = text.split_whitespace().next()?;
    let bare = first.split('@').next().unwrap_or(first);
    match bare {
        "/start" => Some(Command::Start),
        "/digest" | "/test" => Some(Command::Digest),
        _ => None,
    }
}

/// Poll for updates forever. Transport errors back off briefly and keep
/// the loop alive; a failed reply is logged and dropped.
pub async fn run_command_loop(bot: TelegramBot, pipeline: Arc<DigestPipeline>) {
    let mut offset: Option<i64> = None;

    loop {
        let updates = match bot.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(error = ?e, "getUpdates failed, backing off");
                tokio::time::sleep(std::time::Duration::from_secs(ERROR_BACKOFF_SECS)).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else { continue };
            let Some(text) = message.text.as_deref() else { continue };
            let caller = ChatId(message.chat.id);

            match parse_command(text) {
                Some(Command::Start) => {
                    let reply = format!("Your chat id is: `{caller}`");
                    if let Err(e) = bot.send_message(caller, &reply).await {
                        tracing::warn!(error = ?e, %caller, "start reply failed");
                    }
                }
                Some(Command::Digest) => {
                    let ack = "🔍 Generating the trending digest...";
                    if let Err(e) = bot.send_message(caller, ack).await {
                        tracing::warn!(error = ?e, %caller, "digest ack failed");
                    }
                    let outcome = pipeline.run(caller).await;
                    tracing::info!(?outcome, %caller, "on-demand digest run finished");
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command("/digest"), Some(Command::Digest));
        assert_eq!(parse_command("/test"), Some(Command::Digest));
    }

    #[test]
    fn bot_name_suffix_and_arguments_are_tolerated() {
        assert_eq!(parse_command("/digest@TrendingBot"), Some(Command::Digest));
        assert_eq!(parse_command("/start please"), Some(Command::Start));
    }

    #[test]
    fn other_text_is_ignored() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("/unknown"), None);
    }
}
