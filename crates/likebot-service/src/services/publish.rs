//! Publish service
//!
//! Drives the private-chat flow that turns a draft into an inline post with
//! reaction buttons, and the "react with any emoji" flow started from a deep
//! link. All steps keep their state in the conversation store:
//!
//! ```text
//! Idle --begin--> AwaitingButtons --submit_buttons--> AwaitingPublish --publish--> Idle
//! Idle --await_reaction--> AwaitingReaction --reaction_reply--> Idle
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use likebot_core::{
    validate_reaction_label, ButtonSet, ContentKind, ConversationState, DomainError, FlowState,
    Layout, Message, MessageRef, PostBody, ReactionResult, Snowflake, UserId,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::reaction::ReactionService;

/// Reply that publishes a post without buttons
pub const NO_BUTTONS: &str = "no buttons";

/// What the user sent to be published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub kind: ContentKind,
    pub body: PostBody,
}

/// Inline result offered for the `publish` query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub result_id: Uuid,
    pub draft: Draft,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub message: Message,
    pub buttons: ButtonSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionReply {
    pub message: Message,
    pub result: ReactionResult,
}

/// Parse the buttons a user typed for a draft.
///
/// Labels are separated by whitespace or commas and must each be a single
/// emoji; repeats are dropped. `no buttons` in any case gives an empty list.
pub fn parse_button_list(text: &str, max_distinct: usize) -> Result<Vec<String>, DomainError> {
    let text = text.trim();
    if text.eq_ignore_ascii_case(NO_BUTTONS) {
        return Ok(Vec::new());
    }

    let mut labels: Vec<String> = Vec::new();
    for label in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
    {
        validate_reaction_label(label)?;
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }

    if labels.is_empty() {
        return Err(DomainError::InvalidReaction(text.to_string()));
    }
    if labels.len() > max_distinct {
        return Err(DomainError::CapacityExceeded { max: max_distinct });
    }
    Ok(labels)
}

pub struct PublishService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PublishService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn state_in(
        &self,
        user_id: UserId,
        flow: FlowState,
    ) -> ServiceResult<Option<ConversationState>> {
        Ok(self
            .ctx
            .conversations()
            .get(user_id)
            .await?
            .filter(|state| state.is(flow)))
    }

    fn draft_of(state: &ConversationState) -> ServiceResult<Draft> {
        let value = state
            .draft
            .clone()
            .ok_or_else(|| ServiceError::internal("conversation state without a draft"))?;
        serde_json::from_value(value).map_err(ServiceError::internal)
    }

    /// Start a new draft, replacing whatever flow the user was in
    #[instrument(skip(self, draft), fields(kind = %draft.kind))]
    pub async fn begin(&self, user_id: UserId, draft: &Draft) -> ServiceResult<()> {
        let value = serde_json::to_value(draft).map_err(ServiceError::internal)?;
        self.ctx
            .conversations()
            .set(
                user_id,
                &ConversationState::awaiting_buttons(value),
                self.ctx.settings().publish_ttl(),
            )
            .await?;
        debug!("Draft started");
        Ok(())
    }

    /// Attach buttons to the pending draft and return the preview keyboard.
    ///
    /// On invalid input the draft stays where it was.
    #[instrument(skip(self))]
    pub async fn submit_buttons(&self, user_id: UserId, text: &str) -> ServiceResult<Layout> {
        let state = self
            .state_in(user_id, FlowState::AwaitingButtons)
            .await?
            .ok_or_else(|| ServiceError::not_found("Draft", user_id))?;

        let labels = parse_button_list(text, self.ctx.settings().max_distinct_buttons)?;
        let draft = state
            .draft
            .ok_or_else(|| ServiceError::internal("conversation state without a draft"))?;
        let preview = self.ctx.blank_keyboard(&ButtonSet::from_labels(&labels));

        self.ctx
            .conversations()
            .set(
                user_id,
                &ConversationState::awaiting_publish(draft, labels),
                self.ctx.settings().publish_ttl(),
            )
            .await?;
        Ok(preview)
    }

    /// The inline result for a `publish` query, if a draft is ready
    pub async fn preview(&self, user_id: UserId) -> ServiceResult<Option<Preview>> {
        let Some(state) = self.state_in(user_id, FlowState::AwaitingPublish).await? else {
            return Ok(None);
        };

        Ok(Some(Preview {
            result_id: Uuid::new_v4(),
            draft: Self::draft_of(&state)?,
            layout: self.ctx.blank_keyboard(&ButtonSet::from_labels(&state.buttons)),
        }))
    }

    /// Track the inline message the user just posted the draft as
    #[instrument(skip(self))]
    pub async fn publish(
        &self,
        user_id: UserId,
        inline_message_id: &str,
    ) -> ServiceResult<Option<Published>> {
        let Some(state) = self.state_in(user_id, FlowState::AwaitingPublish).await? else {
            debug!("Nothing to publish");
            return Ok(None);
        };

        let message = Message::new(self.ctx.generate_id(), MessageRef::inline(inline_message_id))
            .with_author(user_id);
        self.ctx
            .message_repo()
            .create(&message, &state.buttons)
            .await?;
        self.ctx.conversations().clear(user_id).await?;

        info!(message_id = %message.id, buttons = state.buttons.len(), "Draft published");
        Ok(Some(Published {
            message,
            buttons: ButtonSet::from_labels(state.buttons),
        }))
    }

    /// Wait for the user to send one emoji for `message_id`
    #[instrument(skip(self))]
    pub async fn await_reaction(&self, user_id: UserId, message_id: Snowflake) -> ServiceResult<()> {
        if self.ctx.message_repo().find_by_id(message_id).await?.is_none() {
            return Err(DomainError::MessageIdNotFound(message_id).into());
        }

        self.ctx
            .conversations()
            .set(
                user_id,
                &ConversationState::awaiting_reaction(message_id),
                self.ctx.settings().reaction_ttl(),
            )
            .await?;
        Ok(())
    }

    /// Apply the emoji the user sent to the message they were invited to
    #[instrument(skip(self))]
    pub async fn reaction_reply(&self, user_id: UserId, text: &str) -> ServiceResult<ReactionReply> {
        let target = self
            .state_in(user_id, FlowState::AwaitingReaction)
            .await?
            .and_then(|state| state.pending_target)
            .ok_or_else(|| ServiceError::not_found("Pending reaction", user_id))?;

        let label = text.trim();
        validate_reaction_label(label)?;

        let Some(message) = self.ctx.message_repo().find_by_id(target).await? else {
            self.ctx.conversations().clear(user_id).await?;
            return Err(DomainError::MessageIdNotFound(target).into());
        };

        let result = match ReactionService::new(self.ctx)
            .react(user_id, &message.message_ref, label)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                if err.is_message_not_found() {
                    self.ctx.conversations().clear(user_id).await?;
                }
                return Err(err);
            }
        };

        self.ctx.conversations().clear(user_id).await?;
        Ok(ReactionReply { message, result })
    }
}
