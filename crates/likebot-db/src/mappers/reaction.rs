//! Reaction entity <-> model mapper

use likebot_core::{Reaction, Snowflake};

use crate::models::ReactionModel;

/// Convert ReactionModel to Reaction entity
impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            message_id: Snowflake::new(model.message_id),
            user_id: model.user_id,
            label: model.label,
            created_at: model.created_at,
        }
    }
}
