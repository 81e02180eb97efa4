//! Admin service
//!
//! Answers "is this user an administrator of that chat" from the transport's
//! admin list, memoised per chat in the context's `TtlCache`.

use std::sync::Arc;

use tracing::instrument;

use likebot_core::{ChatId, DomainError, UserId};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct AdminService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AdminService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Administrators of `chat_id`, fetched at most once per cache TTL
    #[instrument(skip(self))]
    pub async fn admin_ids(&self, chat_id: ChatId) -> ServiceResult<Vec<UserId>> {
        let admins = self.ctx.admins();
        let ids = self
            .ctx
            .admin_cache()
            .get_or_try_insert_with(chat_id, admins.admin_ids(chat_id))
            .await
            .map_err(|err| {
                Arc::try_unwrap(err)
                    .unwrap_or_else(|shared| DomainError::InternalError(shared.to_string()))
            })?;
        Ok(ids)
    }

    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> ServiceResult<bool> {
        Ok(self.admin_ids(chat_id).await?.contains(&user_id))
    }

    /// Whether the bot may delete other members' posts in `chat_id`
    pub async fn bot_is_admin(&self, chat_id: ChatId) -> ServiceResult<bool> {
        self.is_admin(chat_id, self.ctx.bot_id()).await
    }

    /// Drop the cached list, e.g. after an admin change was observed
    pub async fn invalidate(&self, chat_id: ChatId) {
        self.ctx.admin_cache().invalidate(&chat_id).await;
    }
}
