//! Error reporter
//!
//! Turns a caught invocation failure into one structured reply delivered
//! back into the originating channel. Delivery is awaited by the caller so
//! that an error reply for one event can never interleave with the start of
//! the next event's handling.

use tracing::error;

use crate::error::QuillResult;
use crate::gateway::{Embed, ReplySink};

use super::types::CommandErrorContext;

/// Title literal of every error report
pub const ERROR_TITLE: &str = "Error executing command";

/// Accent color of error reports
pub const ERROR_COLOR: u32 = 0xFF7F00;

/// Branding line on error reports
pub const BRANDING: &str = "Quill, a plugin-powered bot";

const UNKNOWN_COMMAND: &str = "<unknown>";
const UNKNOWN_REASON: &str = "<unknown>";
const UNKNOWN_KIND: &str = "<unknown failure kind>";

/// Format a failure report and deliver it into the originating channel
///
/// Emits a diagnostic log line before attempting delivery. Delivery failures
/// are not handled here; they propagate to the caller.
pub async fn report(sink: &dyn ReplySink, report: CommandErrorContext) -> QuillResult<()> {
    let ctx = &report.context;
    let command_name = ctx
        .command
        .as_deref()
        .map(|c| c.name.as_str())
        .unwrap_or(UNKNOWN_COMMAND);

    let kind = report
        .error
        .as_ref()
        .map(|e| e.kind())
        .unwrap_or(UNKNOWN_KIND);
    let reason = report
        .error
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| UNKNOWN_REASON.to_string());

    error!(
        user = %ctx.message.author.name,
        user_id = ctx.message.author.id,
        command = %command_name,
        guild = %ctx.message.guild.name,
        guild_id = ctx.message.guild.id,
        failure_kind = %kind,
        failure = %reason,
        "command execution failed"
    );
    if let Some(err) = &report.error {
        error!(error = ?err, "failure detail");
    }

    let mut embed = Embed::new()
        .with_title(ERROR_TITLE)
        .with_description(format!(
            "User {} failed to execute command **{}**.",
            ctx.message.author.mention(),
            command_name
        ))
        .with_author(BRANDING, None)
        .with_color(ERROR_COLOR)
        .with_field("Reason", reason.clone());

    if report.error.is_some() {
        embed = embed.with_field("Exception details", format!("**{kind}**: {reason}"));
    }

    sink.send_embed(&ctx.message.channel, embed).await
}
