//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use likebot_core::{
    ButtonSet, DomainError, Message, MessageRef, MessageRepository, RepoResult, Snowflake,
};

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::{map_db_error, map_unique_violation};

const MESSAGE_COLUMNS: &str = "id, chat_id, message_id, inline_message_id, from_user_id, \
     forward_from_user_id, forward_from_chat_id, forward_from_message_id, \
     original_message_id, anonymous, created_at";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self), fields(message_ref = %message_ref))]
    async fn find_by_ref(&self, message_ref: &MessageRef) -> RepoResult<Option<Message>> {
        let row = match message_ref {
            MessageRef::Chat {
                chat_id,
                message_id,
            } => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages \
                     WHERE chat_id = $1 AND message_id = $2 AND inline_message_id IS NULL"
                ))
                .bind(chat_id)
                .bind(message_id)
                .fetch_optional(&self.pool)
                .await
            }
            MessageRef::Inline { inline_message_id } => {
                sqlx::query_as::<_, MessageModel>(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages WHERE inline_message_id = $1"
                ))
                .bind(inline_message_id)
                .fetch_optional(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        row.map(Message::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageModel>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Message::try_from).transpose()
    }

    #[instrument(skip(self, message, buttons), fields(message_ref = %message.message_ref))]
    async fn create(&self, message: &Message, buttons: &[String]) -> RepoResult<()> {
        let insert = MessageInsert::new(message);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO messages (
                id, chat_id, message_id, inline_message_id, from_user_id,
                forward_from_user_id, forward_from_chat_id, forward_from_message_id,
                original_message_id, anonymous, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(insert.id)
        .bind(insert.chat_id)
        .bind(insert.message_id)
        .bind(insert.inline_message_id)
        .bind(insert.from_user_id)
        .bind(insert.forward_from_user_id)
        .bind(insert.forward_from_chat_id)
        .bind(insert.forward_from_message_id)
        .bind(insert.original_message_id)
        .bind(insert.anonymous)
        .bind(message.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::ValidationError(format!("{} is already tracked", message.message_ref))
            })
        })?;

        let set = ButtonSet::from_labels(buttons);
        for (position, button) in set.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO buttons (message_id, position, label, count)
                VALUES ($1, $2, $3, 0)
                "#,
            )
            .bind(insert.id)
            .bind(position as i32)
            .bind(&button.label)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(message_ref = %message_ref))]
    async fn delete_by_ref(&self, message_ref: &MessageRef) -> RepoResult<bool> {
        let result = match message_ref {
            MessageRef::Chat {
                chat_id,
                message_id,
            } => {
                sqlx::query(
                    r#"
                    DELETE FROM messages
                    WHERE chat_id = $1 AND message_id = $2 AND inline_message_id IS NULL
                    "#,
                )
                .bind(chat_id)
                .bind(message_id)
                .execute(&self.pool)
                .await
            }
            MessageRef::Inline { inline_message_id } => {
                sqlx::query("DELETE FROM messages WHERE inline_message_id = $1")
                    .bind(inline_message_id)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
