//! Repost service
//!
//! Decides whether a group post is replaced by a bot copy carrying the
//! reaction keyboard, and records the copy once the transport has sent it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use likebot_core::{
    parse_post, validate_reaction_label, ButtonSet, ChatId, ChatProfile, ContentKind, DomainError,
    ForceLevel, Layout, Message, MessageRef, PostBody, UserId, UserProfile,
};

use super::admin::AdminService;
use super::chat::ChatService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Where a forwarded post came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardOrigin {
    pub user: Option<UserId>,
    pub chat: Option<ChatId>,
    pub message_id: Option<i64>,
}

/// A message posted by a member in a group or channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPost {
    pub chat: ChatProfile,
    pub from: UserProfile,
    pub message_id: i64,
    pub kind: ContentKind,
    pub body: PostBody,
    pub forward: Option<ForwardOrigin>,
    pub is_reply: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepostMode {
    /// Send a copy keeping forward attribution
    Copy,
    /// Send the content as the bot's own message
    Transform,
}

/// Everything the transport needs to send the copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepostPlan {
    pub chat_id: ChatId,
    pub original_message_id: i64,
    pub kind: ContentKind,
    pub body: PostBody,
    pub mode: RepostMode,
    /// Author attribution is dropped
    pub anonymous: bool,
    pub author: UserProfile,
    /// Forward attribution to keep, `None` in transform mode
    pub forward: Option<ForwardOrigin>,
    pub buttons: Vec<String>,
    pub layout: Layout,
    pub delete_original: bool,
}

pub struct RepostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RepostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Plan the repost of `post`, `None` when it stays as it is.
    ///
    /// Fails with `EmptyAfterStrip` when a forced post has nothing left, and
    /// with `InvalidReaction`/`CapacityExceeded` for bad explicit buttons.
    #[instrument(skip(self, post), fields(chat_id = post.chat.id, message_id = post.message_id))]
    pub async fn plan(&self, post: &GroupPost) -> ServiceResult<Option<RepostPlan>> {
        if post.is_reply {
            return Ok(None);
        }

        let chat = ChatService::new(self.ctx).register(&post.chat).await?;

        let (directive, body) = parse_post(&post.body).map_err(DomainError::from)?;
        if directive.skip {
            debug!("Post marked to skip");
            return Ok(None);
        }

        let forwarded = post.forward.is_some();
        let wanted = directive.force.is_forced()
            || chat.allows(post.kind)
            || (forwarded && chat.allows(ContentKind::Forward));
        if !wanted {
            return Ok(None);
        }
        if body.is_empty() {
            debug!("Nothing left to repost after the directive");
            return Ok(None);
        }

        let buttons = if directive.has_buttons() {
            self.checked_buttons(directive.buttons)?
        } else {
            chat.buttons.clone()
        };

        let delete_original = post.kind != ContentKind::Album && self.can_delete(chat.id).await;
        let mode = if directive.force == ForceLevel::Transform {
            RepostMode::Transform
        } else {
            RepostMode::Copy
        };

        let layout = self.ctx.keyboard(&ButtonSet::from_labels(&buttons));
        Ok(Some(RepostPlan {
            chat_id: chat.id,
            original_message_id: post.message_id,
            kind: post.kind,
            body,
            mode,
            anonymous: directive.anonymous,
            author: post.from.clone(),
            forward: match mode {
                RepostMode::Copy => post.forward.clone(),
                RepostMode::Transform => None,
            },
            buttons,
            layout,
            delete_original,
        }))
    }

    /// Track the copy the transport sent for `plan`
    #[instrument(skip(self, plan), fields(chat_id = plan.chat_id, posted = %posted))]
    pub async fn record(&self, plan: &RepostPlan, posted: &MessageRef) -> ServiceResult<Message> {
        self.ctx.user_repo().upsert(&plan.author).await?;

        let mut message = Message::new(self.ctx.generate_id(), posted.clone())
            .with_original(plan.original_message_id);
        message = if plan.anonymous {
            message.anonymous()
        } else {
            message.with_author(plan.author.id)
        };
        if let Some(origin) = &plan.forward {
            message = message.with_forward_origin(origin.user, origin.chat, origin.message_id);
        }

        self.ctx
            .message_repo()
            .create(&message, &plan.buttons)
            .await?;

        info!(message_id = %message.id, buttons = plan.buttons.len(), "Repost recorded");
        Ok(message)
    }

    fn checked_buttons(&self, labels: Vec<String>) -> Result<Vec<String>, DomainError> {
        for label in &labels {
            validate_reaction_label(label)?;
        }
        let max = self.ctx.settings().max_distinct_buttons;
        if labels.len() > max {
            return Err(DomainError::CapacityExceeded { max });
        }
        Ok(labels)
    }

    async fn can_delete(&self, chat_id: ChatId) -> bool {
        match AdminService::new(self.ctx).bot_is_admin(chat_id).await {
            Ok(is_admin) => is_admin,
            Err(err) => {
                warn!(chat_id, error = %err, "Admin lookup failed, keeping the original");
                false
            }
        }
    }
}
