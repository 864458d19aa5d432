//! Stock plugins for the Quill bot
//!
//! Each module here is an ordinary [`CommandModule`] implementation; nothing
//! in the core treats these differently from externally supplied plugins.

pub mod checkers;
pub mod moderation;
pub mod utility;

pub use checkers::{BotOperatorChecker, GuildOwnerChecker};
pub use moderation::ModerationModule;
pub use utility::UtilityModule;

use std::sync::Arc;

use quill_core::commands::CommandModule;
use quill_core::permissions::PermissionChecker;

/// The stock command modules, in registration order
pub fn stock_modules() -> Vec<Arc<dyn CommandModule>> {
    vec![Arc::new(UtilityModule), Arc::new(ModerationModule)]
}

/// The stock permission checkers
pub fn stock_checkers(operators: &[u64]) -> Vec<Arc<dyn PermissionChecker>> {
    vec![
        Arc::new(GuildOwnerChecker),
        Arc::new(BotOperatorChecker::new(operators.to_vec())),
    ]
}
