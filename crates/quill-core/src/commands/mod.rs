//! Command system
//!
//! The heart of the bot: plugin modules contribute handlers, the registry
//! indexes them by name and alias, the dispatcher routes incoming messages
//! to them and contains their failures.

pub mod args;
pub mod dispatcher;
pub mod module;
pub mod registry;
pub mod reporter;
pub mod types;

pub use args::tokenize;
pub use dispatcher::{Dispatcher, active_prefix, prefix_for};
pub use module::{CommandHandler, CommandModule};
pub use registry::{CommandRegistry, bootstrap};
pub use types::{
    Command, CommandContext, CommandError, CommandErrorContext, CommandParameter, CommandSpec,
    HandlerFn, Permission,
};
