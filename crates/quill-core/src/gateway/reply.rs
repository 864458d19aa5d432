//! Structured reply payloads and the delivery seam

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::QuillResult;

use super::types::ChannelRef;

/// A single field of an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    /// Field name
    pub name: String,

    /// Field value
    pub value: String,

    /// Whether the field renders inline
    pub inline: bool,
}

/// Author / branding line of an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    /// Author name
    pub name: String,

    /// Optional icon URL
    pub icon_url: Option<String>,
}

/// A structured reply payload
///
/// This is the structural shape only; how it renders is the transport's
/// business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    /// Title line
    pub title: Option<String>,

    /// Body text
    pub description: Option<String>,

    /// Ordered field list
    pub fields: Vec<EmbedField>,

    /// Author / branding
    pub author: Option<EmbedAuthor>,

    /// Accent color, 0xRRGGBB
    pub color: Option<u32>,
}

impl Embed {
    /// Create an empty embed
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the body text
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a non-inline field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    /// Set the author line
    pub fn with_author(mut self, name: impl Into<String>, icon_url: Option<String>) -> Self {
        self.author = Some(EmbedAuthor {
            name: name.into(),
            icon_url,
        });
        self
    }

    /// Set the accent color
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }
}

/// Delivery seam for structured replies
///
/// Implementations address the payload to the scope of an originating
/// message. Delivery is awaited by callers; a slow sink holds up the event
/// that triggered the reply, nothing else.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Deliver an embed to a channel
    async fn send_embed(&self, channel: &ChannelRef, embed: Embed) -> QuillResult<()>;
}
