//! Chat service
//!
//! Keeps chat profiles fresh and lets chat admins change what gets reposted
//! and which buttons new posts start with.

use tracing::{info, instrument};

use likebot_core::{
    validate_reaction_label, Chat, ChatId, ChatProfile, ContentKind, DomainError, UserId,
};

use super::admin::AdminService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

pub struct ChatService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChatService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Insert or refresh a chat; new chats start with the default buttons
    #[instrument(skip(self, profile), fields(chat_id = profile.id))]
    pub async fn register(&self, profile: &ChatProfile) -> ServiceResult<Chat> {
        let chat = self
            .ctx
            .chat_repo()
            .upsert_profile(profile, &self.ctx.settings().default_buttons)
            .await?;
        Ok(chat)
    }

    pub async fn find(&self, chat_id: ChatId) -> ServiceResult<Option<Chat>> {
        Ok(self.ctx.chat_repo().find_by_id(chat_id).await?)
    }

    /// Replace the reposting settings of a chat. Only its admins may do this.
    #[instrument(skip(self))]
    pub async fn configure(
        &self,
        chat_id: ChatId,
        actor: UserId,
        allowed_types: &[ContentKind],
        buttons: &[String],
    ) -> ServiceResult<Chat> {
        if !AdminService::new(self.ctx).is_admin(chat_id, actor).await? {
            return Err(ServiceError::permission_denied("configure this chat"));
        }

        let mut labels: Vec<String> = Vec::with_capacity(buttons.len());
        for label in buttons {
            validate_reaction_label(label)?;
            if !labels.contains(label) {
                labels.push(label.clone());
            }
        }
        let max = self.ctx.settings().max_distinct_buttons;
        if labels.len() > max {
            return Err(DomainError::CapacityExceeded { max }.into());
        }

        let mut kinds: Vec<ContentKind> = Vec::with_capacity(allowed_types.len());
        for kind in allowed_types {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }

        let chat = self
            .ctx
            .chat_repo()
            .update_settings(chat_id, &kinds, &labels)
            .await?;

        info!(chat_id, actor, allowed = ?kinds, buttons = ?labels, "Chat settings updated");
        Ok(chat)
    }
}
