//! Inbound events
//!
//! What the transport hands to the bot, already decoded into plain data.

use std::fmt;

use serde::{Deserialize, Serialize};

use likebot_core::{ContentKind, MessageRef, PostBody, UserProfile};

use crate::services::GroupPost;

/// Event kinds, one handler each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Inline keyboard button pressed
    CallbackQuery,
    /// Message posted in a group or channel
    GroupPost,
    /// Message sent to the bot in private
    PrivateMessage,
    /// `/start` command, possibly with a deep-link payload
    Start,
    InlineQuery,
    ChosenInlineResult,
}

impl EventKind {
    pub const ALL: [EventKind; 6] = [
        Self::CallbackQuery,
        Self::GroupPost,
        Self::PrivateMessage,
        Self::Start,
        Self::InlineQuery,
        Self::ChosenInlineResult,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CallbackQuery => "callback_query",
            Self::GroupPost => "group_post",
            Self::PrivateMessage => "private_message",
            Self::Start => "start",
            Self::InlineQuery => "inline_query",
            Self::ChosenInlineResult => "chosen_inline_result",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    CallbackQuery {
        query_id: String,
        user: UserProfile,
        message_ref: MessageRef,
        data: String,
    },
    GroupPost(GroupPost),
    PrivateMessage {
        user: UserProfile,
        message_id: i64,
        kind: ContentKind,
        body: PostBody,
    },
    Start {
        user: UserProfile,
        payload: Option<String>,
    },
    InlineQuery {
        query_id: String,
        user: UserProfile,
        query: String,
    },
    ChosenInlineResult {
        user: UserProfile,
        query: String,
        inline_message_id: Option<String>,
    },
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CallbackQuery { .. } => EventKind::CallbackQuery,
            Self::GroupPost(_) => EventKind::GroupPost,
            Self::PrivateMessage { .. } => EventKind::PrivateMessage,
            Self::Start { .. } => EventKind::Start,
            Self::InlineQuery { .. } => EventKind::InlineQuery,
            Self::ChosenInlineResult { .. } => EventKind::ChosenInlineResult,
        }
    }

    /// The user who caused the event
    pub fn user(&self) -> &UserProfile {
        match self {
            Self::GroupPost(post) => &post.from,
            Self::CallbackQuery { user, .. }
            | Self::PrivateMessage { user, .. }
            | Self::Start { user, .. }
            | Self::InlineQuery { user, .. }
            | Self::ChosenInlineResult { user, .. } => user,
        }
    }
}
