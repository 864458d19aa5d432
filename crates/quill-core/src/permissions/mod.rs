//! Permission checkers and their registry
//!
//! Plugins contribute [`PermissionChecker`] implementations at boot; commands
//! reference them by id. The registry is built exactly once and is read-only
//! afterwards, so concurrent lookups need no synchronization.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{QuillError, QuillResult};
use crate::gateway::{GuildRef, UserRef};

/// A pluggable authorization predicate
///
/// Checkers are instantiated once at boot and shared. The predicate must be
/// cheap and must not block; anything it needs should be captured at
/// construction.
pub trait PermissionChecker: Send + Sync {
    /// Unique checker id, referenced from command metadata
    fn id(&self) -> &str;

    /// Whether `actor` is authorized within `scope`
    fn check(&self, actor: &UserRef, scope: &GuildRef) -> bool;
}

/// Registry of permission checkers, indexed by id
pub struct CheckerRegistry {
    checkers: HashMap<String, Arc<dyn PermissionChecker>>,
}

impl CheckerRegistry {
    /// Build the registry from plugin-contributed checkers
    ///
    /// Registration order follows the supplied order. Two checkers reporting
    /// the same id is a boot-time fatal condition: the registry must never
    /// silently keep one of them.
    pub fn build(checkers: Vec<Arc<dyn PermissionChecker>>) -> QuillResult<Self> {
        let mut registered: HashMap<String, Arc<dyn PermissionChecker>> = HashMap::new();

        for checker in checkers {
            let id = checker.id().to_string();
            if registered.contains_key(&id) {
                return Err(QuillError::registry(format!(
                    "permission checker id '{id}' is already registered"
                )));
            }
            info!(checker = %id, "registered permission checker");
            registered.insert(id, checker);
        }

        info!(count = registered.len(), "permission checkers registered");
        Ok(Self {
            checkers: registered,
        })
    }

    /// Build an empty registry
    pub fn empty() -> Self {
        Self {
            checkers: HashMap::new(),
        }
    }

    /// Look up a checker by id
    pub fn lookup(&self, id: &str) -> Option<&Arc<dyn PermissionChecker>> {
        self.checkers.get(id)
    }

    /// Check whether an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.checkers.contains_key(id)
    }

    /// Number of registered checkers
    pub fn count(&self) -> usize {
        self.checkers.len()
    }
}
