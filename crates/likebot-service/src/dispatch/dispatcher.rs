//! Event dispatcher
//!
//! Routes inbound events through a fixed `EventKind -> handler` table and
//! delivers the resulting effects through the [`Notifier`], each bounded by
//! the notification timeout. Delivery is best effort and never retried.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, error, instrument, warn};

use likebot_core::{DomainError, Message, MessageRef};

use crate::services::{MessageService, RepostService, ServiceContext, ServiceError, ServiceResult};

use super::effects::{Delivery, Effect, Notifier, NotifyError};
use super::events::{EventKind, InboundEvent};
use super::handlers;

type Handler =
    for<'a> fn(&'a InboundEvent, &'a ServiceContext) -> BoxFuture<'a, ServiceResult<Vec<Effect>>>;

/// Result of delivering one effect
#[derive(Debug)]
pub struct DeliveryReport {
    pub effect: Effect,
    pub result: Result<Delivery, DomainError>,
    /// Message recorded after a successful repost
    pub recorded: Option<Message>,
}

pub struct Dispatcher {
    ctx: ServiceContext,
    notifier: Arc<dyn Notifier>,
    handlers: HashMap<EventKind, Handler>,
}

impl Dispatcher {
    pub fn new(ctx: ServiceContext, notifier: Arc<dyn Notifier>) -> Self {
        let mut table: HashMap<EventKind, Handler> = HashMap::with_capacity(EventKind::ALL.len());
        table.insert(EventKind::CallbackQuery, |e, c| handlers::callback_query(e, c).boxed());
        table.insert(EventKind::GroupPost, |e, c| handlers::group_post(e, c).boxed());
        table.insert(EventKind::PrivateMessage, |e, c| {
            handlers::private_message(e, c).boxed()
        });
        table.insert(EventKind::Start, |e, c| handlers::start(e, c).boxed());
        table.insert(EventKind::InlineQuery, |e, c| handlers::inline_query(e, c).boxed());
        table.insert(EventKind::ChosenInlineResult, |e, c| {
            handlers::chosen_inline_result(e, c).boxed()
        });

        Self {
            ctx,
            notifier,
            handlers: table,
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Handle one event and deliver its effects in order
    #[instrument(skip(self, event), fields(kind = %event.kind(), user_id = event.user().id))]
    pub async fn dispatch(&self, event: InboundEvent) -> Vec<DeliveryReport> {
        let effects = self.handle(&event).await;

        let mut reports = Vec::with_capacity(effects.len());
        for effect in effects {
            reports.push(self.deliver(effect).await);
        }
        reports
    }

    /// Run the handler for `event`; failures become error replies
    pub async fn handle(&self, event: &InboundEvent) -> Vec<Effect> {
        let Some(handler) = self.handlers.get(&event.kind()) else {
            debug!("No handler registered");
            return Vec::new();
        };

        match handler(event, &self.ctx).await {
            Ok(effects) => effects,
            Err(err) => {
                log_failure(&err);
                error_reply(event, &err).into_iter().collect()
            }
        }
    }

    async fn deliver(&self, effect: Effect) -> DeliveryReport {
        let timeout = self.ctx.settings().notification_timeout();
        let result = match tokio::time::timeout(timeout, self.notifier.deliver(&effect)).await {
            Ok(Ok(delivery)) => Ok(delivery),
            Ok(Err(NotifyError::MessageGone(message_ref))) => {
                if matches!(effect, Effect::EditKeyboard { .. }) {
                    self.forget(&message_ref).await;
                    Err(DomainError::StaleEditConflict(message_ref))
                } else {
                    Err(DomainError::NotificationTimeout(format!(
                        "{} target is gone: {message_ref}",
                        effect.name()
                    )))
                }
            }
            Ok(Err(NotifyError::Transport(reason))) => {
                Err(DomainError::NotificationTimeout(reason))
            }
            Err(_) => Err(DomainError::NotificationTimeout(format!(
                "{} timed out after {timeout:?}",
                effect.name()
            ))),
        };

        let recorded = match (&effect, &result) {
            (Effect::Repost(plan), Ok(Delivery::Posted(posted))) => {
                match RepostService::new(&self.ctx).record(plan, posted).await {
                    Ok(message) => Some(message),
                    Err(err) => {
                        error!(error = %err, posted = %posted, "Failed to record repost");
                        None
                    }
                }
            }
            _ => None,
        };

        if let Err(err) = &result {
            warn!(effect = effect.name(), code = err.code(), error = %err, "Effect not delivered");
        }

        DeliveryReport {
            effect,
            result,
            recorded,
        }
    }

    /// Compensate for an edit on a message deleted remotely.
    /// Counters already computed stay as they are.
    async fn forget(&self, message_ref: &MessageRef) {
        if let Err(err) = MessageService::new(&self.ctx).forget(message_ref).await {
            error!(error = %err, message_ref = %message_ref, "Failed to drop stale message");
        }
    }
}

fn log_failure(err: &ServiceError) {
    if err.is_infrastructure() {
        error!(code = err.error_code(), error = %err, "Handler failed");
    } else {
        debug!(code = err.error_code(), error = %err, "Handler rejected event");
    }
}

/// Tell the user what went wrong, where the event allows a reply
fn error_reply(event: &InboundEvent, err: &ServiceError) -> Option<Effect> {
    let text = err.user_message()?;
    match event {
        InboundEvent::CallbackQuery { query_id, .. } => Some(Effect::AnswerCallback {
            query_id: query_id.clone(),
            text: Some(text.to_string()),
            cache_time: 0,
        }),
        InboundEvent::GroupPost(post) => Some(Effect::Reply {
            chat_id: post.chat.id,
            reply_to: Some(post.message_id),
            text: text.to_string(),
            layout: None,
        }),
        InboundEvent::PrivateMessage { user, .. } | InboundEvent::Start { user, .. } => {
            Some(Effect::reply(user.id, text))
        }
        InboundEvent::InlineQuery { .. } | InboundEvent::ChosenInlineResult { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likebot_core::{ChatProfile, ContentKind, PostBody, UserProfile};

    use crate::services::GroupPost;

    #[test]
    fn test_error_reply_targets() {
        let err: ServiceError = DomainError::EmptyAfterStrip.into();
        let post = InboundEvent::GroupPost(GroupPost {
            chat: ChatProfile::group(-1, "g"),
            from: UserProfile::new(2, "Ann"),
            message_id: 9,
            kind: ContentKind::Text,
            body: PostBody::text("++"),
            forward: None,
            is_reply: false,
        });
        assert!(matches!(
            error_reply(&post, &err),
            Some(Effect::Reply { chat_id: -1, reply_to: Some(9), .. })
        ));

        let inline = InboundEvent::InlineQuery {
            query_id: "q".into(),
            user: UserProfile::new(2, "Ann"),
            query: "publish".into(),
        };
        assert!(error_reply(&inline, &err).is_none());
    }

    #[test]
    fn test_silent_errors_have_no_reply() {
        let err: ServiceError = DomainError::MessageNotFound(MessageRef::chat(-1, 1)).into();
        let callback = InboundEvent::CallbackQuery {
            query_id: "q".into(),
            user: UserProfile::new(2, "Ann"),
            message_ref: MessageRef::chat(-1, 1),
            data: "button:👍".into(),
        };
        assert!(error_reply(&callback, &err).is_none());
    }
}
