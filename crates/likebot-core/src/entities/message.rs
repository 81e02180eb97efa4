//! Message entity - a posted message the bot keeps counters for

use chrono::{DateTime, Utc};

use crate::value_objects::{ChatId, MessageRef, Snowflake, UserId};

/// Tracked message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub message_ref: MessageRef,
    /// Author of the original post, `None` for anonymous posts
    pub from_user: Option<UserId>,
    pub forward_from_user: Option<UserId>,
    pub forward_from_chat: Option<ChatId>,
    pub forward_from_message_id: Option<i64>,
    /// Id of the user's message this one was reposted from
    pub original_message_id: Option<i64>,
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: Snowflake, message_ref: MessageRef) -> Self {
        Self {
            id,
            message_ref,
            from_user: None,
            forward_from_user: None,
            forward_from_chat: None,
            forward_from_message_id: None,
            original_message_id: None,
            anonymous: false,
            created_at: Utc::now(),
        }
    }

    /// Attribute the message to its author unless it is anonymous
    #[must_use]
    pub fn with_author(mut self, user_id: UserId) -> Self {
        if !self.anonymous {
            self.from_user = Some(user_id);
        }
        self
    }

    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self.from_user = None;
        self
    }

    #[must_use]
    pub fn with_original(mut self, original_message_id: i64) -> Self {
        self.original_message_id = Some(original_message_id);
        self
    }

    #[must_use]
    pub fn with_forward_origin(
        mut self,
        user: Option<UserId>,
        chat: Option<ChatId>,
        message_id: Option<i64>,
    ) -> Self {
        self.forward_from_user = user;
        self.forward_from_chat = chat;
        self.forward_from_message_id = message_id;
        self
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        self.forward_from_user.is_some() || self.forward_from_chat.is_some()
    }
}
