//! Test helpers for integration tests
//!
//! Provides a recording notifier, a fixed admin directory and a bot harness
//! that runs events through the dispatcher.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use likebot_common::{try_init_tracing, AppConfig, BotConfig};
use likebot_core::{AdminDirectory, ChatId, MessageRef, RepoResult, UserId};
use likebot_service::{
    bootstrap, Delivery, DeliveryReport, Dispatcher, Effect, InboundEvent, Notifier, NotifyError,
    ServiceContext,
};

/// Account id the bot runs as in tests
pub const BOT_ID: UserId = 777;

/// First message id handed out for reposts
const FIRST_POSTED_ID: i64 = 10_000;

/// Admin lists fixed up front; unknown chats have no admins
#[derive(Debug, Default)]
pub struct StaticAdmins {
    admins: HashMap<ChatId, Vec<UserId>>,
}

impl StaticAdmins {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, chat_id: ChatId, admins: &[UserId]) -> Self {
        self.admins.insert(chat_id, admins.to_vec());
        self
    }
}

#[async_trait]
impl AdminDirectory for StaticAdmins {
    async fn admin_ids(&self, chat_id: ChatId) -> RepoResult<Vec<UserId>> {
        Ok(self.admins.get(&chat_id).cloned().unwrap_or_default())
    }
}

/// Notifier that keeps every effect it is handed
///
/// Reposts are answered with fresh message ids in the target chat. Edits of
/// messages marked gone fail with `MessageGone`.
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Effect>>,
    gone: Mutex<HashSet<MessageRef>>,
    delay: Mutex<Option<Duration>>,
    next_posted: AtomicI64,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self {
            delivered: Mutex::new(Vec::new()),
            gone: Mutex::new(HashSet::new()),
            delay: Mutex::new(None),
            next_posted: AtomicI64::new(FIRST_POSTED_ID),
        }
    }
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effects delivered so far, oldest first
    pub fn delivered(&self) -> Vec<Effect> {
        self.delivered.lock().clone()
    }

    pub fn clear(&self) {
        self.delivered.lock().clear();
    }

    /// Pretend `message_ref` was deleted on the platform
    pub fn mark_gone(&self, message_ref: MessageRef) {
        self.gone.lock().insert(message_ref);
    }

    /// Stall every delivery by `delay`
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, effect: &Effect) -> Result<Delivery, NotifyError> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.delivered.lock().push(effect.clone());
        match effect {
            Effect::EditKeyboard { message_ref, .. } if self.gone.lock().contains(message_ref) => {
                Err(NotifyError::MessageGone(message_ref.clone()))
            }
            Effect::Repost(plan) => {
                let message_id = self.next_posted.fetch_add(1, Ordering::SeqCst);
                Ok(Delivery::Posted(MessageRef::chat(plan.chat_id, message_id)))
            }
            _ => Ok(Delivery::Done),
        }
    }
}

/// Dispatcher over in-process stores plus its recording notifier
pub struct TestBot {
    pub dispatcher: Arc<Dispatcher>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestBot {
    pub fn new(admins: StaticAdmins) -> Self {
        Self::with_settings(test_settings(), admins)
    }

    pub fn with_settings(settings: BotConfig, admins: StaticAdmins) -> Self {
        let ctx = ServiceContext::in_memory(settings, Arc::new(admins)).with_bot_id(BOT_ID);
        Self::from_context(ctx)
    }

    pub fn from_context(ctx: ServiceContext) -> Self {
        // The first bot of the test binary installs the subscriber
        let _ = try_init_tracing();
        let notifier = Arc::new(RecordingNotifier::new());
        let dispatcher = Arc::new(Dispatcher::new(ctx, notifier.clone()));
        Self {
            dispatcher,
            notifier,
        }
    }

    pub fn ctx(&self) -> &ServiceContext {
        self.dispatcher.context()
    }

    pub async fn send(&self, event: InboundEvent) -> Vec<DeliveryReport> {
        self.dispatcher.dispatch(event).await
    }
}

/// Bot settings with a short delivery timeout
pub fn test_settings() -> BotConfig {
    BotConfig {
        notification_timeout_ms: 200,
        ..BotConfig::default()
    }
}

/// Create a test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Helper to check if the PostgreSQL environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Bot over the stores named by the environment
pub async fn postgres_bot(admins: StaticAdmins) -> Result<TestBot> {
    let config = test_config()?;
    let ctx = bootstrap::connect(&config, BOT_ID, Arc::new(admins)).await?;
    Ok(TestBot::from_context(ctx))
}
