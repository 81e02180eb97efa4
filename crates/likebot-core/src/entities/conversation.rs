//! Conversation state - where a user is in the create-and-publish flow

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingButtons,
    AwaitingPublish,
    AwaitingReaction,
}

/// Per-user flow record; a missing record means `Idle`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub state: FlowState,
    /// Snapshot of the message being drafted, opaque to the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<serde_json::Value>,
    #[serde(default)]
    pub buttons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_target: Option<Snowflake>,
}

impl ConversationState {
    pub fn awaiting_buttons(draft: serde_json::Value) -> Self {
        Self {
            state: FlowState::AwaitingButtons,
            draft: Some(draft),
            ..Self::default()
        }
    }

    pub fn awaiting_publish(draft: serde_json::Value, buttons: Vec<String>) -> Self {
        Self {
            state: FlowState::AwaitingPublish,
            draft: Some(draft),
            buttons,
            pending_target: None,
        }
    }

    pub fn awaiting_reaction(target: Snowflake) -> Self {
        Self {
            state: FlowState::AwaitingReaction,
            pending_target: Some(target),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is(&self, state: FlowState) -> bool {
        self.state == state
    }
}
