//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use likebot_core::{
    plan_reaction, ButtonSet, Reaction, ReactionPlan, ReactionRepository, ReactionResult,
    RepoResult, Snowflake, UserId,
};

use crate::mappers::button_set;
use crate::models::{ButtonModel, ReactionModel};

use super::error::{map_db_error, message_id_not_found};

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_buttons(
        tx: &mut Transaction<'_, Postgres>,
        message_id: i64,
    ) -> RepoResult<ButtonSet> {
        let rows = sqlx::query_as::<_, ButtonModel>(
            r#"
            SELECT label, count FROM buttons
            WHERE message_id = $1
            ORDER BY position
            "#,
        )
        .bind(message_id)
        .fetch_all(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(button_set(rows))
    }

    /// Persist the counter of `label` as held by `set`
    async fn write_count(
        tx: &mut Transaction<'_, Postgres>,
        message_id: i64,
        set: &ButtonSet,
        label: &str,
    ) -> RepoResult<()> {
        sqlx::query("UPDATE buttons SET count = $3 WHERE message_id = $1 AND label = $2")
            .bind(message_id)
            .bind(label)
            .bind(set.count(label) as i32)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn buttons(&self, message_id: Snowflake) -> RepoResult<ButtonSet> {
        let rows = sqlx::query_as::<_, ButtonModel>(
            r#"
            SELECT label, count FROM buttons
            WHERE message_id = $1
            ORDER BY position
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(button_set(rows))
    }

    #[instrument(skip(self))]
    async fn find(&self, message_id: Snowflake, user_id: UserId) -> RepoResult<Option<Reaction>> {
        let row = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, label, created_at
            FROM reactions
            WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Reaction::from))
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let rows = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, label, created_at
            FROM reactions
            WHERE message_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Reaction::from).collect())
    }

    /// One transaction: the message row is locked `FOR UPDATE`, so toggles on
    /// the same message from any process run one after another.
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        message_id: Snowflake,
        user_id: UserId,
        label: &str,
        max_distinct: usize,
    ) -> RepoResult<ReactionResult> {
        let id = message_id.into_inner();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query_scalar::<_, i64>("SELECT id FROM messages WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| message_id_not_found(message_id))?;

        let mut set = Self::load_buttons(&mut tx, id).await?;
        let existing = sqlx::query_scalar::<_, String>(
            "SELECT label FROM reactions WHERE message_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Rejected plans drop the transaction, which rolls back
        let plan = plan_reaction(&set, existing.as_deref(), label, max_distinct)?;
        let outcome = set.apply(&plan);

        if plan.grows() {
            sqlx::query(
                r#"
                INSERT INTO buttons (message_id, position, label, count)
                VALUES ($1, $2, $3, 0)
                "#,
            )
            .bind(id)
            .bind((set.len() - 1) as i32)
            .bind(label)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        match &plan {
            ReactionPlan::Add { label, .. } => {
                sqlx::query(
                    r#"
                    INSERT INTO reactions (message_id, user_id, label, created_at)
                    VALUES ($1, $2, $3, NOW())
                    "#,
                )
                .bind(id)
                .bind(user_id)
                .bind(label)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

                Self::write_count(&mut tx, id, &set, label).await?;
            }
            ReactionPlan::Remove { label } => {
                sqlx::query("DELETE FROM reactions WHERE message_id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

                Self::write_count(&mut tx, id, &set, label).await?;
            }
            ReactionPlan::Move { from, to, .. } => {
                sqlx::query(
                    r#"
                    UPDATE reactions SET label = $3, created_at = NOW()
                    WHERE message_id = $1 AND user_id = $2
                    "#,
                )
                .bind(id)
                .bind(user_id)
                .bind(to)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

                Self::write_count(&mut tx, id, &set, from).await?;
                Self::write_count(&mut tx, id, &set, to).await?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        tracing::debug!(message_id = %message_id, user_id, ?outcome, "Reaction toggled");
        Ok(ReactionResult {
            outcome,
            buttons: set,
        })
    }

    #[instrument(skip(self))]
    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<u64> {
        let id = message_id.into_inner();
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let deleted = sqlx::query("DELETE FROM reactions WHERE message_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        sqlx::query("UPDATE buttons SET count = 0 WHERE message_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(deleted)
    }
}
