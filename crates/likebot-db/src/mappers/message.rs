//! Message and button entity <-> model mapper

use likebot_core::{Button, ButtonSet, DomainError, Message, MessageRef, Snowflake};

use crate::models::{ButtonModel, MessageModel};

/// Convert MessageModel to Message entity
impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let message_ref = MessageRef::from_parts(
            model.chat_id,
            model.message_id,
            model.inline_message_id.as_deref(),
        )
        .ok_or_else(|| {
            DomainError::DatabaseError(format!("message {} has no reference", model.id))
        })?;

        Ok(Message {
            id: Snowflake::new(model.id),
            message_ref,
            from_user: model.from_user_id,
            forward_from_user: model.forward_from_user_id,
            forward_from_chat: model.forward_from_chat_id,
            forward_from_message_id: model.forward_from_message_id,
            original_message_id: model.original_message_id,
            anonymous: model.anonymous,
            created_at: model.created_at,
        })
    }
}

impl From<ButtonModel> for Button {
    fn from(model: ButtonModel) -> Self {
        Button::with_count(model.label, u32::try_from(model.count).unwrap_or(0))
    }
}

/// Rows ordered by position into a set
pub fn button_set(rows: Vec<ButtonModel>) -> ButtonSet {
    ButtonSet::from_buttons(rows.into_iter().map(Button::from).collect())
}

/// Message entity split into insertable columns
pub struct MessageInsert<'a> {
    pub id: i64,
    pub chat_id: Option<i64>,
    pub message_id: Option<i64>,
    pub inline_message_id: Option<&'a str>,
    pub from_user_id: Option<i64>,
    pub forward_from_user_id: Option<i64>,
    pub forward_from_chat_id: Option<i64>,
    pub forward_from_message_id: Option<i64>,
    pub original_message_id: Option<i64>,
    pub anonymous: bool,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        let (chat_id, message_id, inline_message_id) = match &message.message_ref {
            MessageRef::Chat {
                chat_id,
                message_id,
            } => (Some(*chat_id), Some(*message_id), None),
            MessageRef::Inline { inline_message_id } => (None, None, Some(inline_message_id.as_str())),
        };

        Self {
            id: message.id.into_inner(),
            chat_id,
            message_id,
            inline_message_id,
            from_user_id: message.from_user,
            forward_from_user_id: message.forward_from_user,
            forward_from_chat_id: message.forward_from_chat,
            forward_from_message_id: message.forward_from_message_id,
            original_message_id: message.original_message_id,
            anonymous: message.anonymous,
        }
    }
}
