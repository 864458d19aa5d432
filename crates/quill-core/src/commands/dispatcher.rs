//! Command dispatcher
//!
//! Subscribes once to the gateway, spawns an independent handling task per
//! incoming message, and contains every invocation failure so the event loop
//! survives anything a handler does. Each event is attempted at most once;
//! there is no retry and no timeout for a running handler.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::error::QuillResult;
use crate::gateway::{Gateway, GatewayEvent, Message, ReplySink, UserRef};

use super::args::tokenize;
use super::registry::CommandRegistry;
use super::reporter;
use super::types::{CommandContext, CommandErrorContext};

/// Bot account that runs with the primary prefix; every other account gets
/// the secondary one.
const CANONICAL_ACCOUNT_ID: u64 = 412_336_510_150_246_400;

const PRIMARY_PREFIX: char = '/';
const SECONDARY_PREFIX: char = '?';

/// Currently active prefix, readable by collaborators (help text and the
/// like). Re-derived idempotently from constant inputs on every event.
static ACTIVE_PREFIX: Lazy<RwLock<Option<char>>> = Lazy::new(|| RwLock::new(None));

/// Select the command prefix for a bot account id
pub fn prefix_for(account_id: u64) -> char {
    if account_id == CANONICAL_ACCOUNT_ID {
        PRIMARY_PREFIX
    } else {
        SECONDARY_PREFIX
    }
}

/// The currently active command prefix, as a string
///
/// `None` until a dispatcher has been constructed.
pub fn active_prefix() -> Option<String> {
    ACTIVE_PREFIX.read().as_ref().map(|c| c.to_string())
}

/// Per-event command dispatcher
pub struct Dispatcher {
    account: UserRef,
    registry: Arc<CommandRegistry>,
    sink: Arc<dyn ReplySink>,
}

impl Dispatcher {
    /// Create a dispatcher for the given bot account
    pub fn new(account: UserRef, registry: Arc<CommandRegistry>, sink: Arc<dyn ReplySink>) -> Self {
        *ACTIVE_PREFIX.write() = Some(prefix_for(account.id));
        Self {
            account,
            registry,
            sink,
        }
    }

    /// Subscribe to the gateway and process events until the bus closes
    ///
    /// Every message event is handled on its own spawned task, so a slow or
    /// hung handler never blocks the loop. Failures surface as error reports
    /// inside the task; nothing a handler does can stop this loop.
    pub async fn run(self: Arc<Self>, gateway: Gateway) {
        let mut events = gateway.subscribe();
        // Keep only the receiving side so the loop ends when the last
        // publisher goes away.
        drop(gateway);
        info!(account = %self.account.name, "command dispatcher subscribed");

        loop {
            match events.recv().await {
                Ok(GatewayEvent::MessageCreated(message)) => {
                    let dispatcher = Arc::clone(&self);
                    tokio::spawn(async move {
                        if let Err(err) = dispatcher.handle_message(message).await {
                            // Reply delivery failed; the triggering event is
                            // already lost, so record it and move on.
                            error!(error = %err, "error report delivery failed");
                        }
                    });
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dispatcher lagged behind the gateway");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        info!("gateway closed, dispatcher stopping");
    }

    /// Handle a single message event, single pass
    ///
    /// Invocation failures never escape: they are converted into a structured
    /// error report and delivered back into the originating channel. The only
    /// error this returns is a failure of that delivery itself.
    pub async fn handle_message(&self, message: Message) -> QuillResult<()> {
        if !message.is_user_authored() {
            return Ok(());
        }

        let prefix = prefix_for(self.account.id);
        *ACTIVE_PREFIX.write() = Some(prefix);

        let Some(invocation) = strip_marker(&message.content, prefix, &self.account) else {
            return Ok(());
        };
        let (name, raw_args) = split_command(invocation);

        // Unknown commands are ignored without a trace.
        let Some(command) = self.registry.lookup(name) else {
            return Ok(());
        };

        let tokens = tokenize(raw_args);
        let ctx = CommandContext::new(message, Arc::clone(&command), tokens);
        let report_ctx = ctx.clone();

        match command.execute(ctx).await {
            Ok(()) => {
                info!(
                    user = %report_ctx.message.author.name,
                    user_id = report_ctx.message.author.id,
                    command = %command.name,
                    guild = %report_ctx.message.guild.name,
                    guild_id = report_ctx.message.guild.id,
                    "command executed"
                );
                Ok(())
            }
            Err(err) => {
                let report = CommandErrorContext::new(report_ctx, err);
                reporter::report(self.sink.as_ref(), report).await
            }
        }
    }
}

/// Strip the prefix character or an explicit bot mention from the content
///
/// Returns the invocation text after the marker, or `None` when the message
/// is not addressed to the bot.
fn strip_marker<'a>(content: &'a str, prefix: char, account: &UserRef) -> Option<&'a str> {
    if let Some(rest) = content.strip_prefix(prefix) {
        return Some(rest);
    }

    let mention = format!("<@{}>", account.id);
    let nick_mention = format!("<@!{}>", account.id);
    content
        .strip_prefix(&mention)
        .or_else(|| content.strip_prefix(&nick_mention))
        .map(str::trim_start)
}

/// Split an invocation into the command-name token and the raw argument text
fn split_command(invocation: &str) -> (&str, &str) {
    match invocation.find(' ') {
        Some(index) => (&invocation[..index], invocation[index..].trim()),
        None => (invocation, ""),
    }
}
