//! Message service
//!
//! Lookup and removal of tracked messages.

use tracing::{info, instrument};

use likebot_core::{Message, MessageRef, Reaction};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn find(&self, message_ref: &MessageRef) -> ServiceResult<Option<Message>> {
        Ok(self.ctx.message_repo().find_by_ref(message_ref).await?)
    }

    /// Everyone's current reaction on a message, oldest first
    pub async fn reactions(&self, message_ref: &MessageRef) -> ServiceResult<Vec<Reaction>> {
        match self.find(message_ref).await? {
            Some(message) => Ok(self.ctx.reaction_repo().find_by_message(message.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Stop tracking a message whose remote copy is gone.
    ///
    /// Waits for presses in flight on the same ref; their counters stay as
    /// computed, only the record and its reactions are dropped.
    #[instrument(skip(self), fields(message_ref = %message_ref))]
    pub async fn forget(&self, message_ref: &MessageRef) -> ServiceResult<bool> {
        let _guard = self.ctx.ref_locks().lock(message_ref).await;
        let removed = self.ctx.message_repo().delete_by_ref(message_ref).await?;
        if removed {
            info!("Tracked message removed");
        }
        Ok(removed)
    }
}
