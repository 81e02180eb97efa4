//! In-process store implementing every repository trait
//!
//! Used when no database is configured and by tests. All state sits behind
//! one mutex that is never held across an await, so each trait call is atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use likebot_core::{
    plan_reaction, ButtonSet, Chat, ChatId, ChatProfile, ChatRepository, ContentKind, DomainError,
    Message, MessageRef, MessageRepository, Reaction, ReactionPlan, ReactionRepository,
    ReactionResult, RepoResult, Snowflake, User, UserId, UserProfile, UserRepository,
};

#[derive(Debug, Default)]
struct Inner {
    messages: HashMap<Snowflake, Message>,
    refs: HashMap<MessageRef, Snowflake>,
    buttons: HashMap<Snowflake, ButtonSet>,
    reactions: HashMap<Snowflake, HashMap<UserId, Reaction>>,
    users: HashMap<UserId, User>,
    chats: HashMap<ChatId, Chat>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked messages
    pub fn message_count(&self) -> usize {
        self.inner.lock().messages.len()
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_ref(&self, message_ref: &MessageRef) -> RepoResult<Option<Message>> {
        let inner = self.inner.lock();
        Ok(inner
            .refs
            .get(message_ref)
            .and_then(|id| inner.messages.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.inner.lock().messages.get(&id).cloned())
    }

    async fn create(&self, message: &Message, buttons: &[String]) -> RepoResult<()> {
        let mut inner = self.inner.lock();
        if inner.refs.contains_key(&message.message_ref) || inner.messages.contains_key(&message.id)
        {
            return Err(DomainError::ValidationError(format!(
                "{} is already tracked",
                message.message_ref
            )));
        }

        inner.refs.insert(message.message_ref.clone(), message.id);
        inner.messages.insert(message.id, message.clone());
        inner
            .buttons
            .insert(message.id, ButtonSet::from_labels(buttons));
        Ok(())
    }

    async fn delete_by_ref(&self, message_ref: &MessageRef) -> RepoResult<bool> {
        let mut inner = self.inner.lock();
        let Some(id) = inner.refs.remove(message_ref) else {
            return Ok(false);
        };
        inner.messages.remove(&id);
        inner.buttons.remove(&id);
        inner.reactions.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert(&self, profile: &UserProfile) -> RepoResult<User> {
        let mut inner = self.inner.lock();
        let user = inner
            .users
            .entry(profile.id)
            .and_modify(|user| user.update_profile(profile))
            .or_insert_with(|| User::from_profile(profile));
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.inner.lock().users.get(&id).cloned())
    }
}

#[async_trait]
impl ChatRepository for MemoryStore {
    async fn upsert_profile(
        &self,
        profile: &ChatProfile,
        default_buttons: &[String],
    ) -> RepoResult<Chat> {
        let mut inner = self.inner.lock();
        let chat = inner
            .chats
            .entry(profile.id)
            .and_modify(|chat| chat.update_profile(profile))
            .or_insert_with(|| Chat::from_profile(profile, default_buttons));
        Ok(chat.clone())
    }

    async fn find_by_id(&self, id: ChatId) -> RepoResult<Option<Chat>> {
        Ok(self.inner.lock().chats.get(&id).cloned())
    }

    async fn update_settings(
        &self,
        id: ChatId,
        allowed_types: &[ContentKind],
        buttons: &[String],
    ) -> RepoResult<Chat> {
        let mut inner = self.inner.lock();
        let chat = inner
            .chats
            .get_mut(&id)
            .ok_or(DomainError::ChatNotFound(id))?;
        chat.allowed_types = allowed_types.to_vec();
        chat.buttons = buttons.to_vec();
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn buttons(&self, message_id: Snowflake) -> RepoResult<ButtonSet> {
        Ok(self
            .inner
            .lock()
            .buttons
            .get(&message_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find(&self, message_id: Snowflake, user_id: UserId) -> RepoResult<Option<Reaction>> {
        Ok(self
            .inner
            .lock()
            .reactions
            .get(&message_id)
            .and_then(|by_user| by_user.get(&user_id))
            .cloned())
    }

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        let inner = self.inner.lock();
        let mut reactions: Vec<Reaction> = inner
            .reactions
            .get(&message_id)
            .map(|by_user| by_user.values().cloned().collect())
            .unwrap_or_default();
        reactions.sort_by_key(|r| (r.created_at, r.user_id));
        Ok(reactions)
    }

    async fn toggle(
        &self,
        message_id: Snowflake,
        user_id: UserId,
        label: &str,
        max_distinct: usize,
    ) -> RepoResult<ReactionResult> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        if !inner.messages.contains_key(&message_id) {
            return Err(DomainError::MessageIdNotFound(message_id));
        }
        let set = inner.buttons.entry(message_id).or_default();
        let by_user = inner.reactions.entry(message_id).or_default();

        let existing = by_user.get(&user_id).map(|r| r.label.clone());
        let plan = plan_reaction(set, existing.as_deref(), label, max_distinct)?;
        let outcome = set.apply(&plan);

        match &plan {
            ReactionPlan::Add { label, .. } => {
                by_user.insert(user_id, Reaction::new(message_id, user_id, label.as_str()));
            }
            ReactionPlan::Remove { .. } => {
                by_user.remove(&user_id);
            }
            ReactionPlan::Move { to, .. } => {
                by_user.insert(user_id, Reaction::new(message_id, user_id, to.as_str()));
            }
        }

        Ok(ReactionResult {
            outcome,
            buttons: set.clone(),
        })
    }

    async fn delete_all(&self, message_id: Snowflake) -> RepoResult<u64> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let removed = inner
            .reactions
            .remove(&message_id)
            .map_or(0, |by_user| by_user.len() as u64);
        if let Some(set) = inner.buttons.get_mut(&message_id) {
            *set = ButtonSet::from_labels(set.labels());
        }
        Ok(removed)
    }
}
