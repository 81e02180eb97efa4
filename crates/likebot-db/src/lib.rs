//! # likebot-db
//!
//! Storage implementations of the repository traits defined in `likebot-core`.
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repositories
//! - [`MemoryStore`], an in-process implementation of the same traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use likebot_db::{create_pool, run_migrations, DatabaseConfig, PgReactionRepository};
//!
//! let pool = create_pool(&DatabaseConfig::from(&app_config.database)).await?;
//! run_migrations(&pool).await?;
//! let reactions = PgReactionRepository::new(pool);
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgChatRepository, PgMessageRepository, PgReactionRepository, PgUserRepository,
};
