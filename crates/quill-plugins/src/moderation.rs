//! Moderation commands
//!
//! All of these are permission-gated; the checker ids resolve against the
//! stock checkers in [`crate::checkers`].

use std::sync::Arc;

use tracing::info;

use quill_core::commands::{
    CommandContext, CommandError, CommandHandler, CommandModule, CommandParameter, CommandSpec,
    Permission,
};

/// Guild moderation commands
pub struct ModerationModule;

impl CommandModule for ModerationModule {
    fn name(&self) -> &str {
        "moderation"
    }

    fn handlers(self: Arc<Self>) -> Vec<CommandHandler> {
        vec![
            CommandHandler::new(
                CommandSpec::new("ban", "Ban a user from the guild")
                    .with_aliases("hammer")
                    .with_checker("guild_owner")
                    .with_permission(Permission::BanMembers)
                    .with_parameter(CommandParameter::required(1, "user", "The user to ban"))
                    .with_parameter(
                        CommandParameter::optional(2, "reason", "Why the user is banned")
                            .catch_all(),
                    ),
                ban,
            ),
            CommandHandler::new(
                CommandSpec::new("kick", "Kick a user from the guild")
                    .with_checker("guild_owner")
                    .with_permission(Permission::KickMembers)
                    .with_parameter(CommandParameter::required(1, "user", "The user to kick")),
                kick,
            ),
            CommandHandler::new(
                CommandSpec::new("prune", "Bulk-delete recent messages")
                    .with_aliases("purge;clear")
                    .with_checker("bot_operator")
                    .with_permission(Permission::ManageMessages)
                    .with_parameter(CommandParameter::required(
                        1,
                        "count",
                        "How many messages to delete",
                    )),
                prune,
            ),
        ]
    }
}

fn usage_of(ctx: &CommandContext) -> String {
    ctx.command
        .as_deref()
        .map(|c| c.usage())
        .unwrap_or_default()
}

async fn ban(ctx: CommandContext) -> Result<(), CommandError> {
    let Some(target) = ctx.arg(0) else {
        return Err(CommandError::invalid_arguments(usage_of(&ctx)));
    };
    let reason = ctx.rest(1);
    let reason = if reason.is_empty() {
        "no reason given".to_string()
    } else {
        reason
    };

    info!(
        moderator = %ctx.message.author.name,
        target = %target,
        guild = %ctx.message.guild.name,
        %reason,
        "ban issued"
    );
    Ok(())
}

async fn kick(ctx: CommandContext) -> Result<(), CommandError> {
    let Some(target) = ctx.arg(0) else {
        return Err(CommandError::invalid_arguments(usage_of(&ctx)));
    };

    info!(
        moderator = %ctx.message.author.name,
        target = %target,
        guild = %ctx.message.guild.name,
        "kick issued"
    );
    Ok(())
}

async fn prune(ctx: CommandContext) -> Result<(), CommandError> {
    let count: u32 = ctx
        .arg(0)
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| CommandError::invalid_arguments(usage_of(&ctx)))?;
    if count == 0 {
        return Err(CommandError::execution("nothing to prune"));
    }

    info!(
        moderator = %ctx.message.author.name,
        channel = %ctx.message.channel.name,
        count,
        "prune issued"
    );
    Ok(())
}
