//! Quill core library
//!
//! This crate provides the command core of the Quill bot: the plugin-facing
//! command and permission-checker seams, the registries built from them at
//! boot, the argument tokenizer, and the dispatcher that routes incoming
//! chat messages to command handlers without ever letting a handler failure
//! take down the event loop.

pub mod commands;
pub mod error;
pub mod gateway;
pub mod permissions;
pub mod settings;

// Re-export commonly used types
pub use commands::{
    Command, CommandContext, CommandError, CommandErrorContext, CommandHandler, CommandModule,
    CommandParameter, CommandRegistry, CommandSpec, Dispatcher, Permission, active_prefix,
    bootstrap, tokenize,
};
pub use error::{QuillError, QuillResult};
pub use gateway::{Embed, Gateway, GatewayEvent, Message, ReplySink};
pub use permissions::{CheckerRegistry, PermissionChecker};
pub use settings::Settings;
