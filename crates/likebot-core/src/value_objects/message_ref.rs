//! MessageRef - how the bot addresses a message it can edit

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ChatId;

/// Identity of a tracked message.
///
/// Messages the bot posted itself are addressed by chat and message id.
/// Messages published through an inline query are only reachable through
/// the opaque inline message id handed out by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageRef {
    Chat { chat_id: ChatId, message_id: i64 },
    Inline { inline_message_id: String },
}

impl MessageRef {
    #[inline]
    pub fn chat(chat_id: ChatId, message_id: i64) -> Self {
        Self::Chat {
            chat_id,
            message_id,
        }
    }

    #[inline]
    pub fn inline(inline_message_id: impl Into<String>) -> Self {
        Self::Inline {
            inline_message_id: inline_message_id.into(),
        }
    }

    /// Resolve the identifiers a callback or update carries.
    ///
    /// The inline id wins when present, since callbacks on inline messages
    /// carry no chat message.
    pub fn from_parts(
        chat_id: Option<ChatId>,
        message_id: Option<i64>,
        inline_message_id: Option<&str>,
    ) -> Option<Self> {
        match (inline_message_id, chat_id, message_id) {
            (Some(inline), _, _) if !inline.is_empty() => Some(Self::inline(inline)),
            (_, Some(chat_id), Some(message_id)) => Some(Self::chat(chat_id, message_id)),
            _ => None,
        }
    }

    pub fn chat_id(&self) -> Option<ChatId> {
        match self {
            Self::Chat { chat_id, .. } => Some(*chat_id),
            Self::Inline { .. } => None,
        }
    }

    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat {
                chat_id,
                message_id,
            } => write!(f, "chat:{chat_id}/{message_id}"),
            Self::Inline { inline_message_id } => write!(f, "inline:{inline_message_id}"),
        }
    }
}
