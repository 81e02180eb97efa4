//! Message and button database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for messages table
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub chat_id: Option<i64>,
    pub message_id: Option<i64>,
    pub inline_message_id: Option<String>,
    pub from_user_id: Option<i64>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub forward_from_message_id: Option<i64>,
    pub original_message_id: Option<i64>,
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl MessageModel {
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inline_message_id.is_some()
    }
}

/// Database model for buttons table (display columns only)
#[derive(Debug, Clone, FromRow)]
pub struct ButtonModel {
    pub label: String,
    pub count: i32,
}
