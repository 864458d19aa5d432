//! Stock permission checkers

use quill_core::gateway::{GuildRef, UserRef};
use quill_core::permissions::PermissionChecker;

/// Authorizes only the owner of the guild the command was issued in
pub struct GuildOwnerChecker;

impl PermissionChecker for GuildOwnerChecker {
    fn id(&self) -> &str {
        "guild_owner"
    }

    fn check(&self, actor: &UserRef, scope: &GuildRef) -> bool {
        actor.id == scope.owner_id
    }
}

/// Authorizes a fixed set of bot operator accounts, regardless of guild
pub struct BotOperatorChecker {
    operators: Vec<u64>,
}

impl BotOperatorChecker {
    /// Create a checker for the given operator account ids
    pub fn new(operators: Vec<u64>) -> Self {
        Self { operators }
    }
}

impl PermissionChecker for BotOperatorChecker {
    fn id(&self) -> &str {
        "bot_operator"
    }

    fn check(&self, actor: &UserRef, _scope: &GuildRef) -> bool {
        self.operators.contains(&actor.id)
    }
}
