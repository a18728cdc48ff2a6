// reply.rs - Interaction Replies
// The single response every handled invocation produces. Kept as plain data;
// `SerenityPlatform` turns it into serenity's response builders when sending.

use serenity::model::Timestamp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message { content: String, ephemeral: bool },
    Embed(HelpEmbed),
}

impl Reply {
    /// A reply everyone in the channel can see.
    pub fn public(content: impl Into<String>) -> Self {
        Reply::Message {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// A reply only the invoking user can see.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Reply::Message {
            content: content.into(),
            ephemeral: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Structured reply payload, used by `/help`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEmbed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: String,
    /// Shown next to the footer.
    pub timestamp: Timestamp,
}
