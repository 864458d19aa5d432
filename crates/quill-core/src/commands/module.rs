//! The command-module capability seam
//!
//! Any plugin type can contribute commands by implementing [`CommandModule`]
//! and handing its handlers over as data. Registration is an explicit call
//! performed at boot; there is no type scanning.

use std::future::Future;
use std::sync::Arc;

use super::types::{CommandContext, CommandError, CommandSpec, HandlerFn};

/// A plugin-contributed unit bundling one or more command handlers
pub trait CommandModule: Send + Sync {
    /// Module name, for logging
    fn name(&self) -> &str;

    /// The handlers this module contributes, with their declared metadata
    fn handlers(self: Arc<Self>) -> Vec<CommandHandler>;
}

/// A declared handler: metadata plus the entry point to invoke
pub struct CommandHandler {
    /// Declared command metadata
    pub spec: CommandSpec,

    /// The entry point
    pub invoke: HandlerFn,
}

impl CommandHandler {
    /// Bundle a spec with an async entry point
    pub fn new<F, Fut>(spec: CommandSpec, handler: F) -> Self
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CommandError>> + Send + 'static,
    {
        Self {
            spec,
            invoke: Arc::new(move |ctx| Box::pin(handler(ctx))),
        }
    }
}
