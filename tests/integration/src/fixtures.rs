//! Test fixtures and event builders
//!
//! Provides reusable users, chats and inbound events for integration tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use likebot_core::{
    CallbackToken, ChatId, ChatProfile, ContentKind, MessageRef, PostBody, UserId, UserProfile,
    NOOP_TOKEN,
};
use likebot_service::{ForwardOrigin, GroupPost, InboundEvent, PUBLISH_QUERY, REACT_PAYLOAD};

/// Counter for unique test data
static COUNTER: AtomicI64 = AtomicI64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> i64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

pub fn user(id: UserId) -> UserProfile {
    UserProfile::new(id, format!("user{id}"))
}

/// Milliseconds at the first call, so ids differ between test runs
pub fn run_stamp() -> i64 {
    static STAMP: OnceLock<i64> = OnceLock::new();
    *STAMP.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default()
    })
}

/// Group with an id no other test run uses
pub fn unique_group() -> ChatProfile {
    let suffix = unique_suffix();
    ChatProfile::group(-(run_stamp() * 1000 + suffix), format!("group{suffix}"))
}

pub fn press(user_id: UserId, message_ref: &MessageRef, label: &str) -> InboundEvent {
    InboundEvent::CallbackQuery {
        query_id: format!("cb{}", unique_suffix()),
        user: user(user_id),
        message_ref: message_ref.clone(),
        data: CallbackToken::Button(label.to_string()).encode(),
    }
}

pub fn press_noop(user_id: UserId, message_ref: &MessageRef) -> InboundEvent {
    InboundEvent::CallbackQuery {
        query_id: format!("cb{}", unique_suffix()),
        user: user(user_id),
        message_ref: message_ref.clone(),
        data: NOOP_TOKEN.to_string(),
    }
}

/// Plain text post in `chat`
pub fn text_post(chat: &ChatProfile, from: UserId, message_id: i64, text: &str) -> GroupPost {
    GroupPost {
        chat: chat.clone(),
        from: user(from),
        message_id,
        kind: ContentKind::Text,
        body: PostBody::text(text),
        forward: None,
        is_reply: false,
    }
}

/// Text post forwarded from another chat
pub fn forwarded_post(
    chat: &ChatProfile,
    from: UserId,
    message_id: i64,
    origin_chat: ChatId,
    text: &str,
) -> GroupPost {
    GroupPost {
        forward: Some(ForwardOrigin {
            user: None,
            chat: Some(origin_chat),
            message_id: Some(1),
        }),
        ..text_post(chat, from, message_id, text)
    }
}

pub fn private_text(user_id: UserId, text: &str) -> InboundEvent {
    InboundEvent::PrivateMessage {
        user: user(user_id),
        message_id: unique_suffix(),
        kind: ContentKind::Text,
        body: PostBody::text(text),
    }
}

pub fn start(user_id: UserId, payload: Option<String>) -> InboundEvent {
    InboundEvent::Start {
        user: user(user_id),
        payload,
    }
}

/// `/start` from a "react with any emoji" link
pub fn react_link(user_id: UserId, message_id: impl std::fmt::Display) -> InboundEvent {
    start(user_id, Some(format!("{REACT_PAYLOAD}{message_id}")))
}

pub fn publish_query(user_id: UserId) -> InboundEvent {
    InboundEvent::InlineQuery {
        query_id: format!("iq{}", unique_suffix()),
        user: user(user_id),
        query: PUBLISH_QUERY.to_string(),
    }
}

pub fn publish_chosen(user_id: UserId, inline_message_id: &str) -> InboundEvent {
    InboundEvent::ChosenInlineResult {
        user: user(user_id),
        query: PUBLISH_QUERY.to_string(),
        inline_message_id: Some(inline_message_id.to_string()),
    }
}
