//! Command type definitions
//!
//! This module defines the command descriptor built at registration time,
//! the per-invocation context types, and the failure type handlers raise.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::gateway::Message;
use crate::permissions::PermissionChecker;

use super::module::CommandModule;

/// Permission a command declares it needs
///
/// Descriptive metadata carried on the command; enforcement is the bound
/// checker's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// No particular permission
    #[default]
    None,
    /// Guild administrator
    Administrator,
    /// Manage the guild
    ManageGuild,
    /// Manage messages in the channel
    ManageMessages,
    /// Ban members
    BanMembers,
    /// Kick members
    KickMembers,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Administrator => write!(f, "administrator"),
            Self::ManageGuild => write!(f, "manage guild"),
            Self::ManageMessages => write!(f, "manage messages"),
            Self::BanMembers => write!(f, "ban members"),
            Self::KickMembers => write!(f, "kick members"),
        }
    }
}

/// A declared command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParameter {
    /// Declaration position; defines ordering
    pub order: u32,

    /// Parameter name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Whether the parameter must be supplied
    pub required: bool,

    /// Whether the parameter absorbs all trailing arguments
    pub catch_all: bool,
}

impl CommandParameter {
    /// Create a required parameter
    pub fn required(order: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            order,
            name: name.into(),
            description: description.into(),
            required: true,
            catch_all: false,
        }
    }

    /// Create an optional parameter
    pub fn optional(order: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            order,
            name: name.into(),
            description: description.into(),
            required: false,
            catch_all: false,
        }
    }

    /// Mark the parameter as catch-all
    pub fn catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }
}

/// Declared command metadata, as contributed by a plugin handler
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// Canonical name
    pub name: String,

    /// Optional `;`-delimited alias list
    pub aliases: Option<String>,

    /// Human-readable description
    pub description: String,

    /// Whether permission checking is requested
    pub check_permissions: bool,

    /// Referenced checker id
    pub checker_id: Option<String>,

    /// Required-permission descriptor
    pub required_permission: Permission,

    /// Declared parameters
    pub parameters: Vec<CommandParameter>,
}

impl CommandSpec {
    /// Create a spec with a canonical name and description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the `;`-delimited alias list
    pub fn with_aliases(mut self, aliases: impl Into<String>) -> Self {
        self.aliases = Some(aliases.into());
        self
    }

    /// Request permission checking through the given checker id
    pub fn with_checker(mut self, checker_id: impl Into<String>) -> Self {
        self.check_permissions = true;
        self.checker_id = Some(checker_id.into());
        self
    }

    /// Set the required-permission descriptor
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.required_permission = permission;
        self
    }

    /// Declare a parameter
    pub fn with_parameter(mut self, parameter: CommandParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Split the declared alias list
    pub fn alias_list(&self) -> Vec<String> {
        match &self.aliases {
            Some(aliases) => aliases
                .split(';')
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Boxed handler entry point bound into a [`Command`]
pub type HandlerFn =
    Arc<dyn Fn(CommandContext) -> BoxFuture<'static, Result<(), CommandError>> + Send + Sync>;

/// An immutable command descriptor
///
/// Constructed once at registration time. The registry may index a command
/// under several keys (its canonical name plus aliases); all of them resolve
/// to the same descriptor identity.
pub struct Command {
    /// Canonical name (unique registry key)
    pub name: String,

    /// Declared aliases
    pub aliases: Vec<String>,

    /// Human-readable description
    pub description: String,

    /// Bound permission checker, if the metadata requested one and its id
    /// was known at registration time
    pub checker: Option<Arc<dyn PermissionChecker>>,

    /// Required-permission descriptor
    pub required_permission: Permission,

    /// Declared parameters, in declaration order
    pub parameters: Vec<CommandParameter>,

    /// Owning module instance
    pub module: Arc<dyn CommandModule>,

    /// Bound handler entry point
    invoke: HandlerFn,
}

impl Command {
    /// Construct a command from its pieces
    pub(crate) fn new(
        spec: &CommandSpec,
        checker: Option<Arc<dyn PermissionChecker>>,
        module: Arc<dyn CommandModule>,
        invoke: HandlerFn,
    ) -> Self {
        let mut parameters = spec.parameters.clone();
        parameters.sort_by_key(|p| p.order);

        Self {
            name: spec.name.clone(),
            aliases: spec.alias_list(),
            description: spec.description.clone(),
            checker,
            required_permission: spec.required_permission,
            parameters,
            module,
            invoke,
        }
    }

    /// Execute the bound handler
    ///
    /// Enforces the bound checker first, when one is present. The dispatcher
    /// does not special-case the resulting failure; permission denials flow
    /// through error reporting like any other failure.
    pub async fn execute(&self, ctx: CommandContext) -> Result<(), CommandError> {
        if let Some(checker) = &self.checker {
            if !checker.check(&ctx.message.author, &ctx.message.guild) {
                return Err(CommandError::PermissionDenied {
                    required: self.required_permission,
                });
            }
        }
        (self.invoke)(ctx).await
    }

    /// Render a usage line from the declared parameters
    pub fn usage(&self) -> String {
        let mut usage = self.name.clone();
        for param in &self.parameters {
            let ellipsis = if param.catch_all { "..." } else { "" };
            if param.required {
                usage.push_str(&format!(" <{}{}>", param.name, ellipsis));
            } else {
                usage.push_str(&format!(" [{}{}]", param.name, ellipsis));
            }
        }
        usage
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("module", &self.module.name())
            .field("has_checker", &self.checker.is_some())
            .finish()
    }
}

/// Per-invocation context
///
/// Created fresh for each dispatched event and dropped when its handling
/// completes; never shared across events.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// The originating message
    pub message: Message,

    /// The resolved command, absent only in error paths before resolution
    pub command: Option<Arc<Command>>,

    /// Tokenized raw argument list
    pub raw_arguments: Vec<String>,
}

impl CommandContext {
    /// Create a context for a resolved command
    pub fn new(message: Message, command: Arc<Command>, raw_arguments: Vec<String>) -> Self {
        Self {
            message,
            command: Some(command),
            raw_arguments,
        }
    }

    /// Get an argument by position
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.raw_arguments.get(index).map(String::as_str)
    }

    /// Join all arguments from `from` onward, for catch-all parameters
    pub fn rest(&self, from: usize) -> String {
        if from >= self.raw_arguments.len() {
            return String::new();
        }
        self.raw_arguments[from..].join(" ")
    }
}

/// Ephemeral pairing of a context and the failure it produced
#[derive(Debug)]
pub struct CommandErrorContext {
    /// The invocation context
    pub context: CommandContext,

    /// The causing failure, when one was captured
    pub error: Option<CommandError>,
}

impl CommandErrorContext {
    /// Pair a context with its failure
    pub fn new(context: CommandContext, error: CommandError) -> Self {
        Self {
            context,
            error: Some(error),
        }
    }
}

/// Failure raised by a command invocation
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// The bound checker refused the actor
    #[error("you are not authorized to do that (requires: {required})")]
    PermissionDenied {
        /// The command's declared permission
        required: Permission,
    },

    /// The supplied arguments did not fit the declared parameters
    #[error("invalid arguments; usage: {usage}")]
    InvalidArguments {
        /// Usage line to show the user
        usage: String,
    },

    /// The handler itself failed
    #[error("{0}")]
    Execution(String),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    /// Create an invalid-arguments failure
    pub fn invalid_arguments(usage: impl Into<String>) -> Self {
        Self::InvalidArguments {
            usage: usage.into(),
        }
    }

    /// Create an execution failure
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Get the failure kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => "PermissionDenied",
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::Execution(_) => "Execution",
            Self::Other(_) => "Other",
        }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}
