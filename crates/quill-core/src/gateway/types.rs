//! Chat entity types carried by gateway events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as seen by the chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// Numeric account id (snowflake)
    pub id: u64,

    /// Display name
    pub name: String,

    /// Whether the account is a bot
    pub is_bot: bool,
}

impl UserRef {
    /// Create a reference to a regular user account
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: false,
        }
    }

    /// Create a reference to a bot account
    pub fn bot(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_bot: true,
        }
    }

    /// The mention form of this user, as it appears in message content
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A guild (server) scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildRef {
    /// Numeric guild id
    pub id: u64,

    /// Guild name
    pub name: String,

    /// Account id of the guild owner
    pub owner_id: u64,
}

impl GuildRef {
    /// Create a guild reference
    pub fn new(id: u64, name: impl Into<String>, owner_id: u64) -> Self {
        Self {
            id,
            name: name.into(),
            owner_id,
        }
    }
}

/// A text channel within a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    /// Numeric channel id
    pub id: u64,

    /// Channel name
    pub name: String,
}

impl ChannelRef {
    /// Create a channel reference
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Message kind as classified by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// A regular user-authored text message
    Regular,

    /// System notices, pins, join messages and other non-user content
    System,
}

/// An incoming text message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Numeric message id
    pub id: u64,

    /// Message kind
    pub kind: MessageKind,

    /// Raw text content
    pub content: String,

    /// Author of the message
    pub author: UserRef,

    /// Channel the message was posted in
    pub channel: ChannelRef,

    /// Guild the channel belongs to
    pub guild: GuildRef,

    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a regular user-authored message stamped with the current time
    pub fn regular(
        id: u64,
        author: UserRef,
        channel: ChannelRef,
        guild: GuildRef,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: MessageKind::Regular,
            content: content.into(),
            author,
            channel,
            guild,
            timestamp: Utc::now(),
        }
    }

    /// Check whether this message should reach the command layer at all
    pub fn is_user_authored(&self) -> bool {
        self.kind == MessageKind::Regular && !self.author.is_bot
    }
}
