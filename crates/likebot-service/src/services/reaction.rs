//! Reaction service
//!
//! The aggregation engine: resolves a press on a tracked message into a
//! toggle of the user's reaction and returns the refreshed counters.

use tracing::{debug, info, instrument};

use likebot_core::{ButtonSet, DomainError, MessageRef, ReactionResult, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle `label` for `user_id` on the message behind `message_ref`.
    ///
    /// Presses on one ref are serialised from lookup to counter update. Not
    /// idempotent: repeating a press toggles again.
    #[instrument(skip(self), fields(message_ref = %message_ref))]
    pub async fn react(
        &self,
        user_id: UserId,
        message_ref: &MessageRef,
        label: &str,
    ) -> ServiceResult<ReactionResult> {
        let _guard = self.ctx.ref_locks().lock(message_ref).await;

        let message = self
            .ctx
            .message_repo()
            .find_by_ref(message_ref)
            .await?
            .ok_or_else(|| DomainError::MessageNotFound(message_ref.clone()))?;

        let result = self
            .ctx
            .reaction_repo()
            .toggle(
                message.id,
                user_id,
                label,
                self.ctx.settings().max_distinct_buttons,
            )
            .await
            .map_err(|err| match err {
                // Deleted between lookup and toggle
                DomainError::MessageIdNotFound(_) => {
                    DomainError::MessageNotFound(message_ref.clone())
                }
                other => other,
            })?;

        info!(
            message_id = %message.id,
            user_id,
            label,
            outcome = ?result.outcome,
            "Reaction toggled"
        );

        Ok(result)
    }

    /// Read-only snapshot of the counters
    #[instrument(skip(self), fields(message_ref = %message_ref))]
    pub async fn reactions_for(&self, message_ref: &MessageRef) -> ServiceResult<ButtonSet> {
        let Some(message) = self.ctx.message_repo().find_by_ref(message_ref).await? else {
            debug!("Message is not tracked");
            return Err(DomainError::MessageNotFound(message_ref.clone()).into());
        };

        Ok(self.ctx.reaction_repo().buttons(message.id).await?)
    }
}
