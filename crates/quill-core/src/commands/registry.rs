//! Command registry
//!
//! Built exactly once at boot from plugin-contributed modules, then treated
//! as read-only. The registry is a multi-key index: a command is reachable
//! under its canonical name and every alias that was still free at
//! registration time, but all keys resolve to the same descriptor identity.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::QuillResult;
use crate::permissions::{CheckerRegistry, PermissionChecker};

use super::module::CommandModule;
use super::types::{Command, CommandParameter, CommandSpec};

/// Registry mapping command names and aliases to command descriptors
pub struct CommandRegistry {
    commands: HashMap<String, Arc<Command>>,
}

impl CommandRegistry {
    /// Build the registry from plugin-contributed modules
    ///
    /// Modules are processed in the supplied order, handlers in declaration
    /// order. A handler whose canonical name is already taken is dropped
    /// entirely (none of its keys bind); an already-taken alias is skipped
    /// individually while the handler's remaining keys still bind. Neither
    /// outcome aborts processing of later handlers or modules.
    pub fn build(modules: Vec<Arc<dyn CommandModule>>, checkers: &CheckerRegistry) -> Self {
        let mut commands: HashMap<String, Arc<Command>> = HashMap::new();

        for module in modules {
            let module_name = module.name().to_string();
            debug!(module = %module_name, "registering command module");

            for handler in Arc::clone(&module).handlers() {
                let spec = handler.spec;

                if let Err(reason) = validate_parameters(&spec.parameters) {
                    warn!(
                        command = %spec.name,
                        module = %module_name,
                        %reason,
                        "invalid parameter metadata, skipping handler"
                    );
                    continue;
                }

                let checker = resolve_checker(&spec, checkers);
                let command = Arc::new(Command::new(
                    &spec,
                    checker,
                    Arc::clone(&module),
                    handler.invoke,
                ));

                if commands.contains_key(&command.name) {
                    warn!(
                        command = %command.name,
                        module = %module_name,
                        "command name is already registered, skipping"
                    );
                    continue;
                }

                for key in std::iter::once(&command.name).chain(command.aliases.iter()) {
                    if commands.contains_key(key) {
                        warn!(
                            alias = %key,
                            command = %command.name,
                            "alias is already taken, skipping"
                        );
                    } else {
                        commands.insert(key.clone(), Arc::clone(&command));
                    }
                }
                info!(command = %command.name, module = %module_name, "registered command");
            }
        }

        let registry = Self { commands };
        info!(count = registry.count(), "commands registered");
        registry
    }

    /// Look up a command by name or alias (case-sensitive, exact match)
    pub fn lookup(&self, name_or_alias: &str) -> Option<Arc<Command>> {
        self.commands.get(name_or_alias).cloned()
    }

    /// All registered commands, deduplicated by identity
    ///
    /// A command reachable under several keys appears once.
    pub fn commands(&self) -> Vec<Arc<Command>> {
        let mut seen: HashSet<*const Command> = HashSet::new();
        let mut all = Vec::new();
        for command in self.commands.values() {
            if seen.insert(Arc::as_ptr(command)) {
                all.push(Arc::clone(command));
            }
        }
        all
    }

    /// Number of distinct commands (identities, not keys)
    pub fn count(&self) -> usize {
        self.commands
            .values()
            .map(Arc::as_ptr)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Number of registry keys (names plus bound aliases)
    pub fn key_count(&self) -> usize {
        self.commands.len()
    }
}

/// Explicit boot-time construction of both registries
///
/// Checkers are registered first so command metadata can reference them;
/// a duplicate checker id fails the whole bootstrap.
pub fn bootstrap(
    modules: Vec<Arc<dyn CommandModule>>,
    checkers: Vec<Arc<dyn PermissionChecker>>,
) -> QuillResult<(CommandRegistry, CheckerRegistry)> {
    info!("initializing command registries");
    let checker_registry = CheckerRegistry::build(checkers)?;
    let command_registry = CommandRegistry::build(modules, &checker_registry);
    Ok((command_registry, checker_registry))
}

/// Resolve the optional checker reference
///
/// The checker binds only when the metadata requests checking and the id is
/// known; otherwise the command carries no checker and enforcement is
/// silently disabled.
fn resolve_checker(
    spec: &CommandSpec,
    checkers: &CheckerRegistry,
) -> Option<Arc<dyn PermissionChecker>> {
    if !spec.check_permissions {
        return None;
    }
    spec.checker_id
        .as_deref()
        .and_then(|id| checkers.lookup(id))
        .cloned()
}

/// At most one catch-all parameter, and it must carry the highest order
fn validate_parameters(parameters: &[CommandParameter]) -> Result<(), String> {
    let catch_alls = parameters.iter().filter(|p| p.catch_all).count();
    if catch_alls > 1 {
        return Err(format!("{catch_alls} catch-all parameters declared"));
    }
    if catch_alls == 1 {
        let max_order = parameters.iter().map(|p| p.order).max().unwrap_or(0);
        let holder = parameters
            .iter()
            .find(|p| p.catch_all)
            .map(|p| p.order)
            .unwrap_or(0);
        if holder != max_order {
            return Err("catch-all parameter is not the last declared".to_string());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::module::CommandHandler;
    use crate::commands::types::{CommandContext, CommandError, Permission};
    use crate::gateway::{ChannelRef, GuildRef, Message, UserRef};

    struct TestModule {
        name: &'static str,
        specs: Vec<CommandSpec>,
    }

    impl CommandModule for TestModule {
        fn name(&self) -> &str {
            self.name
        }

        fn handlers(self: Arc<Self>) -> Vec<CommandHandler> {
            self.specs
                .iter()
                .cloned()
                .map(|spec| CommandHandler::new(spec, |_ctx| async { Ok(()) }))
                .collect()
        }
    }

    fn module(name: &'static str, specs: Vec<CommandSpec>) -> Arc<dyn CommandModule> {
        Arc::new(TestModule { name, specs })
    }

    struct OwnerOnly;

    impl PermissionChecker for OwnerOnly {
        fn id(&self) -> &str {
            "owner_only"
        }

        fn check(&self, actor: &UserRef, scope: &GuildRef) -> bool {
            actor.id == scope.owner_id
        }
    }

    // Unrelated implementation claiming the same id as OwnerOnly.
    struct OwnerImpostor;

    impl PermissionChecker for OwnerImpostor {
        fn id(&self) -> &str {
            "owner_only"
        }

        fn check(&self, _actor: &UserRef, _scope: &GuildRef) -> bool {
            true
        }
    }

    #[test]
    fn canonical_names_and_aliases_resolve_to_one_identity() {
        let modules = vec![module(
            "utility",
            vec![CommandSpec::new("echo", "Repeat text").with_aliases("say;repeat")],
        )];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        let by_name = registry.lookup("echo").unwrap();
        let by_alias = registry.lookup("say").unwrap();
        let by_other_alias = registry.lookup("repeat").unwrap();
        assert!(Arc::ptr_eq(&by_name, &by_alias));
        assert!(Arc::ptr_eq(&by_name, &by_other_alias));

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.commands().len(), 1);
        assert_eq!(registry.key_count(), 3);
    }

    #[test]
    fn canonical_collision_rejects_whole_command() {
        let modules = vec![
            module("first", vec![CommandSpec::new("ping", "First ping")]),
            module(
                "second",
                vec![CommandSpec::new("ping", "Second ping").with_aliases("pong")],
            ),
        ];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        // The earlier command wins and none of the later command's keys bind.
        let cmd = registry.lookup("ping").unwrap();
        assert_eq!(cmd.description, "First ping");
        assert!(registry.lookup("pong").is_none());
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn taken_alias_is_skipped_individually() {
        let modules = vec![
            module("first", vec![CommandSpec::new("purge", "Bulk delete")]),
            module(
                "second",
                vec![CommandSpec::new("prune", "Prune messages").with_aliases("purge;clear")],
            ),
        ];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        // "purge" stays with the earlier command, but "prune" and "clear"
        // still bind for the later one.
        let purge = registry.lookup("purge").unwrap();
        assert_eq!(purge.name, "purge");

        let prune = registry.lookup("prune").unwrap();
        assert_eq!(prune.name, "prune");
        let clear = registry.lookup("clear").unwrap();
        assert!(Arc::ptr_eq(&prune, &clear));

        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn lookup_is_case_sensitive_and_exact() {
        let modules = vec![module("m", vec![CommandSpec::new("ping", "")])];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        assert!(registry.lookup("Ping").is_none());
        assert!(registry.lookup("pin").is_none());
        assert!(registry.lookup("ping ").is_none());
    }

    #[test]
    fn known_checker_binds_unknown_is_silently_dropped() {
        let checkers = CheckerRegistry::build(vec![Arc::new(OwnerOnly) as _]).unwrap();
        let modules = vec![module(
            "moderation",
            vec![
                CommandSpec::new("ban", "Ban a user").with_checker("owner_only"),
                CommandSpec::new("kick", "Kick a user").with_checker("does_not_exist"),
                CommandSpec::new("ping", "No checking requested"),
            ],
        )];
        let registry = CommandRegistry::build(modules, &checkers);

        assert!(registry.lookup("ban").unwrap().checker.is_some());
        assert!(registry.lookup("kick").unwrap().checker.is_none());
        assert!(registry.lookup("ping").unwrap().checker.is_none());
    }

    #[tokio::test]
    async fn bound_checker_is_enforced_on_execute() {
        let checkers = CheckerRegistry::build(vec![Arc::new(OwnerOnly) as _]).unwrap();
        let modules = vec![module(
            "moderation",
            vec![CommandSpec::new("ban", "Ban a user")
                .with_checker("owner_only")
                .with_permission(Permission::BanMembers)],
        )];
        let registry = CommandRegistry::build(modules, &checkers);
        let ban = registry.lookup("ban").unwrap();

        let guild = GuildRef::new(4, "testers", 1);
        let channel = ChannelRef::new(3, "general");

        let owner_ctx = CommandContext::new(
            Message::regular(10, UserRef::new(1, "owner"), channel.clone(), guild.clone(), "?ban"),
            Arc::clone(&ban),
            Vec::new(),
        );
        assert!(ban.execute(owner_ctx).await.is_ok());

        let other_ctx = CommandContext::new(
            Message::regular(11, UserRef::new(2, "other"), channel, guild, "?ban"),
            Arc::clone(&ban),
            Vec::new(),
        );
        let err = ban.execute(other_ctx).await.unwrap_err();
        assert!(matches!(err, CommandError::PermissionDenied { .. }));
    }

    #[test]
    fn invalid_catch_all_metadata_skips_handler_only() {
        let modules = vec![module(
            "broken",
            vec![
                CommandSpec::new("bad", "Catch-all not last")
                    .with_parameter(CommandParameter::required(1, "text", "").catch_all())
                    .with_parameter(CommandParameter::required(2, "user", "")),
                CommandSpec::new("good", "Fine"),
            ],
        )];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        assert!(registry.lookup("bad").is_none());
        assert!(registry.lookup("good").is_some());
    }

    #[test]
    fn parameters_sorted_by_declared_order() {
        let modules = vec![module(
            "m",
            vec![CommandSpec::new("ban", "")
                .with_parameter(CommandParameter::optional(2, "reason", "").catch_all())
                .with_parameter(CommandParameter::required(1, "user", ""))],
        )];
        let registry = CommandRegistry::build(modules, &CheckerRegistry::empty());

        let ban = registry.lookup("ban").unwrap();
        assert_eq!(ban.parameters[0].name, "user");
        assert_eq!(ban.parameters[1].name, "reason");
        assert_eq!(ban.usage(), "ban <user> [reason...]");
    }

    #[test]
    fn bootstrap_fails_on_duplicate_checker_ids() {
        let result = bootstrap(
            Vec::new(),
            vec![Arc::new(OwnerOnly) as _, Arc::new(OwnerImpostor) as _],
        );
        assert!(result.is_err());
    }

    #[test]
    fn bootstrap_builds_both_registries() {
        let (commands, checkers) = bootstrap(
            vec![module("m", vec![CommandSpec::new("ping", "")])],
            vec![Arc::new(OwnerOnly) as _],
        )
        .unwrap();

        assert_eq!(commands.count(), 1);
        assert_eq!(checkers.count(), 1);
    }
}
