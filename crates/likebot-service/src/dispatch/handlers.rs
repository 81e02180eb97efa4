//! Event handlers
//!
//! One function per event kind. Handlers only compute effects; delivery and
//! error replies are the dispatcher's job.

use std::time::Duration;

use tracing::debug;

use likebot_core::{
    CallbackToken, FlowState, MessageRef, ReactionOutcome, ReactionResult, Snowflake,
    UserProfile,
};

use crate::services::{
    Draft, PublishService, ReactionService, RepostService, ServiceContext, ServiceError,
    ServiceResult,
};

use super::effects::Effect;
use super::events::InboundEvent;

/// Inline query that offers the pending draft
pub const PUBLISH_QUERY: &str = "publish";
/// Deep-link payload prefix inviting a free-emoji reaction
pub const REACT_PAYLOAD: &str = "react_";
/// Cache time for answers to dead buttons
pub const NOOP_CACHE_SECS: u32 = 10;

const WELCOME: &str = "Send me a post and I will attach reaction buttons to it.";
const BUTTONS_PROMPT: &str =
    "Send the buttons for this post, like \"👍 👎 🔥\", or \"no buttons\".";
const REACT_PROMPT: &str = "Send me one emoji to react with.";
const REACTION_REMOVED: &str = "You took your reaction back.";

fn publish_prompt(window: Duration) -> String {
    let minutes = window.as_secs() / 60;
    let window = match minutes {
        60 => "1 hour".to_string(),
        m if m > 60 && m % 60 == 0 => format!("{} hours", m / 60),
        1 => "1 minute".to_string(),
        m => format!("{m} minutes"),
    };
    format!("Press 'publish' and choose your channel.\nPublishing will be available for {window}.")
}

fn reaction_text(outcome: &ReactionOutcome) -> String {
    match outcome.current() {
        Some(button) => format!("You reacted with {}.", button.label),
        None => REACTION_REMOVED.to_string(),
    }
}

async fn touch_user(ctx: &ServiceContext, user: &UserProfile) -> ServiceResult<()> {
    ctx.user_repo().upsert(user).await?;
    Ok(())
}

fn refreshed(ctx: &ServiceContext, message_ref: MessageRef, result: &ReactionResult) -> Effect {
    Effect::EditKeyboard {
        message_ref,
        layout: ctx.keyboard(&result.buttons),
    }
}

pub(super) async fn callback_query(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::CallbackQuery {
        query_id,
        user,
        message_ref,
        data,
    } = event
    else {
        return Ok(Vec::new());
    };

    let label = match CallbackToken::parse(data) {
        Some(CallbackToken::Button(label)) => label,
        Some(CallbackToken::Noop) => {
            return Ok(vec![Effect::AnswerCallback {
                query_id: query_id.clone(),
                text: None,
                cache_time: NOOP_CACHE_SECS,
            }]);
        }
        None => {
            debug!(data, "Unknown callback data");
            return Ok(Vec::new());
        }
    };

    touch_user(ctx, user).await?;
    let result = match ReactionService::new(ctx).react(user.id, message_ref, &label).await {
        Ok(result) => result,
        Err(err) if err.is_message_not_found() => {
            debug!(message_ref = %message_ref, "Message doesn't exist");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    Ok(vec![
        Effect::AnswerCallback {
            query_id: query_id.clone(),
            text: Some(reaction_text(&result.outcome)),
            cache_time: 0,
        },
        refreshed(ctx, message_ref.clone(), &result),
    ])
}

pub(super) async fn group_post(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::GroupPost(post) = event else {
        return Ok(Vec::new());
    };

    Ok(RepostService::new(ctx)
        .plan(post)
        .await?
        .map(Effect::Repost)
        .into_iter()
        .collect())
}

pub(super) async fn private_message(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::PrivateMessage {
        user, kind, body, ..
    } = event
    else {
        return Ok(Vec::new());
    };

    touch_user(ctx, user).await?;
    let publish = PublishService::new(ctx);
    let flow = ctx
        .conversations()
        .get(user.id)
        .await?
        .map(|state| state.state)
        .unwrap_or_default();

    match (flow, body.text.as_deref()) {
        (FlowState::AwaitingButtons, Some(text)) => {
            let preview = publish.submit_buttons(user.id, text).await?;
            Ok(vec![Effect::Reply {
                chat_id: user.id,
                reply_to: None,
                text: publish_prompt(ctx.settings().publish_ttl()),
                layout: Some(preview),
            }])
        }
        (FlowState::AwaitingReaction, Some(text)) => {
            let reply = publish.reaction_reply(user.id, text).await?;
            Ok(vec![
                Effect::reply(user.id, reaction_text(&reply.result.outcome)),
                refreshed(ctx, reply.message.message_ref.clone(), &reply.result),
            ])
        }
        _ => {
            let draft = Draft {
                kind: *kind,
                body: body.clone(),
            };
            publish.begin(user.id, &draft).await?;
            Ok(vec![Effect::reply(user.id, BUTTONS_PROMPT)])
        }
    }
}

pub(super) async fn start(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::Start { user, payload } = event else {
        return Ok(Vec::new());
    };

    touch_user(ctx, user).await?;
    let Some(target) = payload
        .as_deref()
        .and_then(|payload| payload.strip_prefix(REACT_PAYLOAD))
    else {
        return Ok(vec![Effect::reply(user.id, WELCOME)]);
    };

    let message_id = Snowflake::parse(target)
        .map_err(|_| ServiceError::validation(format!("bad reaction link: {target}")))?;
    PublishService::new(ctx)
        .await_reaction(user.id, message_id)
        .await?;
    Ok(vec![Effect::reply(user.id, REACT_PROMPT)])
}

pub(super) async fn inline_query(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::InlineQuery {
        query_id,
        user,
        query,
    } = event
    else {
        return Ok(Vec::new());
    };
    if query.trim() != PUBLISH_QUERY {
        return Ok(Vec::new());
    }

    Ok(PublishService::new(ctx)
        .preview(user.id)
        .await?
        .map(|preview| Effect::AnswerInline {
            query_id: query_id.clone(),
            preview,
        })
        .into_iter()
        .collect())
}

pub(super) async fn chosen_inline_result(
    event: &InboundEvent,
    ctx: &ServiceContext,
) -> ServiceResult<Vec<Effect>> {
    let InboundEvent::ChosenInlineResult {
        user,
        query,
        inline_message_id,
    } = event
    else {
        return Ok(Vec::new());
    };
    if query.trim() != PUBLISH_QUERY {
        return Ok(Vec::new());
    }
    let Some(inline_message_id) = inline_message_id else {
        debug!("Chosen result without an inline message id");
        return Ok(Vec::new());
    };

    touch_user(ctx, user).await?;
    let Some(published) = PublishService::new(ctx)
        .publish(user.id, inline_message_id)
        .await?
    else {
        return Ok(Vec::new());
    };

    Ok(vec![Effect::EditKeyboard {
        message_ref: published.message.message_ref,
        layout: ctx.keyboard(&published.buttons),
    }])
}
