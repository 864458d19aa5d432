//! Local console session
//!
//! Stands in for the chat transport: stdin lines are published into the
//! gateway as messages from a synthetic console user, and replies render to
//! stdout.

use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

use quill_core::commands::{Dispatcher, active_prefix, bootstrap};
use quill_core::error::QuillResult;
use quill_core::gateway::{
    ChannelRef, Embed, Gateway, GatewayEvent, GuildRef, Message, ReplySink, UserRef,
};
use quill_core::settings::Settings;
use quill_plugins::{stock_checkers, stock_modules};

use crate::args::Cli;

/// Reply sink that renders embeds to stdout
struct ConsoleSink;

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn send_embed(&self, channel: &ChannelRef, embed: Embed) -> QuillResult<()> {
        debug!(
            payload = %serde_json::to_string(&embed).unwrap_or_default(),
            "delivering embed"
        );

        println!("{}", format!("#{}", channel.name).dimmed());
        if let Some(title) = &embed.title {
            println!("{}", title.red().bold());
        }
        if let Some(description) = &embed.description {
            println!("{description}");
        }
        for field in &embed.fields {
            println!("{}: {}", field.name.yellow(), field.value);
        }
        if let Some(author) = &embed.author {
            println!("{}", format!("— {}", author.name).dimmed());
        }
        Ok(())
    }
}

/// Run the console session until stdin closes
pub async fn run(cli: Cli) -> QuillResult<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_path(path)?,
        None => Settings::load()?,
    };
    settings.operators.extend(cli.operators.iter().copied());

    let (commands, checkers) = bootstrap(stock_modules(), stock_checkers(&settings.operators))?;
    info!(
        commands = commands.count(),
        checkers = checkers.count(),
        "registries ready"
    );

    let account = UserRef::bot(settings.account_id, settings.account_name.clone());
    let gateway = Gateway::default();
    let dispatcher = Arc::new(Dispatcher::new(
        account,
        Arc::new(commands),
        Arc::new(ConsoleSink),
    ));
    let runner = tokio::spawn(Arc::clone(&dispatcher).run(gateway.clone()));

    // Lines published before the dispatcher subscribes would be lost, which
    // matters when stdin is piped.
    while gateway.subscriber_count() == 0 {
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let prefix = active_prefix().unwrap_or_default();
    println!(
        "{}",
        format!("quill console session; command prefix '{prefix}', Ctrl-D to quit").dimmed()
    );

    // The console user owns the local guild, so owner-gated commands work
    // out of the box.
    let author = UserRef::new(100, "console");
    let channel = ChannelRef::new(1, "console");
    let guild = GuildRef::new(1, "local", author.id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut next_id: u64 = 1;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        gateway.publish(GatewayEvent::MessageCreated(Message::regular(
            next_id,
            author.clone(),
            channel.clone(),
            guild.clone(),
            line,
        )));
        next_id += 1;
    }

    drop(gateway);
    if let Err(err) = runner.await {
        error!(error = %err, "dispatcher task panicked");
    }
    Ok(())
}
