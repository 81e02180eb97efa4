//! PostgreSQL implementation of ChatRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use likebot_core::{Chat, ChatId, ChatProfile, ChatRepository, ContentKind, RepoResult};

use crate::mappers::content_kinds_to_strings;
use crate::models::ChatModel;

use super::error::{chat_not_found, map_db_error};

/// PostgreSQL implementation of ChatRepository
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    #[instrument(skip(self, profile, default_buttons), fields(chat_id = profile.id))]
    async fn upsert_profile(
        &self,
        profile: &ChatProfile,
        default_buttons: &[String],
    ) -> RepoResult<Chat> {
        // Settings columns are only written on insert
        let row = sqlx::query_as::<_, ChatModel>(
            r#"
            INSERT INTO chats (id, kind, username, title, buttons)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                kind = EXCLUDED.kind,
                username = EXCLUDED.username,
                title = EXCLUDED.title,
                updated_at = NOW()
            RETURNING id, kind, username, title, allowed_types, buttons, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.kind.as_str())
        .bind(&profile.username)
        .bind(profile.display_title())
        .bind(default_buttons)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Chat::try_from(row)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ChatId) -> RepoResult<Option<Chat>> {
        let row = sqlx::query_as::<_, ChatModel>(
            r#"
            SELECT id, kind, username, title, allowed_types, buttons, created_at, updated_at
            FROM chats
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Chat::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn update_settings(
        &self,
        id: ChatId,
        allowed_types: &[ContentKind],
        buttons: &[String],
    ) -> RepoResult<Chat> {
        let row = sqlx::query_as::<_, ChatModel>(
            r#"
            UPDATE chats
            SET allowed_types = $2, buttons = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, kind, username, title, allowed_types, buttons, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content_kinds_to_strings(allowed_types))
        .bind(buttons)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| chat_not_found(id))?;

        Chat::try_from(row)
    }
}
