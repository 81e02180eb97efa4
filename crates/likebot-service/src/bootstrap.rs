//! Wiring from configuration
//!
//! Builds the PostgreSQL-backed [`ServiceContext`]; conversation state goes to
//! Redis when `REDIS_URL` is configured and stays in process otherwise.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use likebot_cache::{MemoryConversationStore, RedisConversationStore, RedisPool};
use likebot_common::AppConfig;
use likebot_core::{AdminDirectory, ConversationStore, SnowflakeGenerator, UserId};
use likebot_db::{
    create_pool, run_migrations, DatabaseConfig, PgChatRepository, PgMessageRepository,
    PgReactionRepository, PgUserRepository,
};

use crate::services::{ServiceContext, ServiceContextBuilder};

/// Connect every store named by `config` and build the service context.
///
/// Migrations are applied before the context is returned. Must be called
/// inside a tokio runtime.
pub async fn connect(
    config: &AppConfig,
    bot_id: UserId,
    admins: Arc<dyn AdminDirectory>,
) -> anyhow::Result<ServiceContext> {
    config.bot.validate().context("invalid bot settings")?;
    anyhow::ensure!(
        config.snowflake.worker_id < 1024,
        "WORKER_ID must be below 1024, got {}",
        config.snowflake.worker_id
    );

    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("failed to connect to PostgreSQL")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;
    info!("Database ready");

    let conversations = conversation_store(config).await?;

    let ctx = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .chat_repo(Arc::new(PgChatRepository::new(pool.clone())))
        .message_repo(Arc::new(PgMessageRepository::new(pool.clone())))
        .reaction_repo(Arc::new(PgReactionRepository::new(pool)))
        .conversations(conversations)
        .admins(admins)
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .settings(config.bot.clone())
        .bot_id(bot_id)
        .build()?;

    Ok(ctx)
}

async fn conversation_store(config: &AppConfig) -> anyhow::Result<Arc<dyn ConversationStore>> {
    if let Some(redis) = &config.redis {
        let pool = RedisPool::from_config(redis).context("failed to create Redis pool")?;
        pool.health_check()
            .await
            .context("Redis is not reachable")?;
        info!("Conversation state kept in Redis");
        return Ok(Arc::new(RedisConversationStore::new(pool)));
    }

    info!("REDIS_URL not set, conversation state kept in process");
    Ok(Arc::new(MemoryConversationStore::new()))
}
