//! Utility commands

use std::sync::Arc;

use tracing::info;

use quill_core::commands::{
    CommandContext, CommandError, CommandHandler, CommandModule, CommandParameter, CommandSpec,
};

/// Everyday commands with no permission gate
pub struct UtilityModule;

impl CommandModule for UtilityModule {
    fn name(&self) -> &str {
        "utility"
    }

    fn handlers(self: Arc<Self>) -> Vec<CommandHandler> {
        vec![
            CommandHandler::new(
                CommandSpec::new("ping", "Check that the bot is alive"),
                ping,
            ),
            CommandHandler::new(
                CommandSpec::new("echo", "Repeat the given text")
                    .with_aliases("say;repeat")
                    .with_parameter(
                        CommandParameter::required(1, "text", "The text to repeat").catch_all(),
                    ),
                echo,
            ),
            CommandHandler::new(
                CommandSpec::new("whoami", "Show who the bot thinks you are"),
                whoami,
            ),
        ]
    }
}

async fn ping(ctx: CommandContext) -> Result<(), CommandError> {
    info!(
        user = %ctx.message.author.name,
        channel = %ctx.message.channel.name,
        "pong"
    );
    Ok(())
}

async fn echo(ctx: CommandContext) -> Result<(), CommandError> {
    if ctx.raw_arguments.is_empty() {
        let usage = ctx
            .command
            .as_deref()
            .map(|c| c.usage())
            .unwrap_or_default();
        return Err(CommandError::invalid_arguments(usage));
    }

    info!(
        user = %ctx.message.author.name,
        text = %ctx.rest(0),
        "echo"
    );
    Ok(())
}

async fn whoami(ctx: CommandContext) -> Result<(), CommandError> {
    info!(
        user = %ctx.message.author.name,
        user_id = ctx.message.author.id,
        guild = %ctx.message.guild.name,
        "whoami"
    );
    Ok(())
}
