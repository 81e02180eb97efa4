//! Posting flow and delivery tests
//!
//! Run with: cargo test -p likebot-integration-tests --test flow_tests

use std::time::Duration;

use likebot_core::{ContentKind, DomainError, Layout, MessageRef};
use likebot_integration_tests::*;
use likebot_service::{
    ChatService, Delivery, Effect, InboundEvent, MessageService, RepostMode, RepostPlan,
};

fn captions(layout: &Layout) -> Vec<String> {
    layout.cells().map(|cell| cell.caption.clone()).collect()
}

fn only_repost(effects: &[Effect]) -> &RepostPlan {
    match effects {
        [Effect::Repost(plan)] => plan,
        other => panic!("expected a single repost, got {other:?}"),
    }
}

// ============================================================================
// Publishing through inline mode
// ============================================================================

#[tokio::test]
async fn test_publish_flow() {
    let bot = TestBot::new(StaticAdmins::new());

    let reports = bot.send(private_text(1, "hello world")).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { chat_id: 1, layout: None, .. }
    ));

    let reports = bot.send(private_text(1, "👍, 🔥")).await;
    match &reports[0].effect {
        Effect::Reply {
            chat_id: 1,
            text,
            layout: Some(layout),
            ..
        } => {
            assert!(text.contains("publish"));
            assert_eq!(captions(layout), vec!["👍", "🔥"]);
        }
        other => panic!("unexpected effect {other:?}"),
    }

    let reports = bot.send(publish_query(1)).await;
    match &reports[0].effect {
        Effect::AnswerInline { preview, .. } => {
            assert_eq!(preview.draft.body.text.as_deref(), Some("hello world"));
            assert_eq!(preview.draft.kind, ContentKind::Text);
            assert_eq!(captions(&preview.layout), vec!["👍", "🔥"]);
        }
        other => panic!("unexpected effect {other:?}"),
    }

    let reports = bot.send(publish_chosen(1, "inline-1")).await;
    let inline_ref = MessageRef::inline("inline-1");
    assert!(matches!(
        &reports[0].effect,
        Effect::EditKeyboard { message_ref, layout }
            if message_ref == &inline_ref && captions(layout) == vec!["👍 0", "🔥 0"]
    ));

    let message = MessageService::new(bot.ctx())
        .find(&inline_ref)
        .await
        .unwrap()
        .expect("published message should be tracked");
    assert_eq!(message.from_user, Some(1));

    // Draft is consumed
    assert!(bot.send(publish_query(1)).await.is_empty());
    assert!(bot.send(publish_chosen(1, "inline-2")).await.is_empty());

    let reports = bot.send(press(2, &inline_ref, "🔥")).await;
    assert!(matches!(
        &reports[1].effect,
        Effect::EditKeyboard { layout, .. } if captions(layout) == vec!["👍 0", "🔥 1"]
    ));
}

#[tokio::test]
async fn test_bad_button_list_keeps_the_draft() {
    let bot = TestBot::new(StaticAdmins::new());

    bot.send(private_text(1, "a post")).await;
    let reports = bot.send(private_text(1, "thumbs up")).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { text, layout: None, .. } if text == "Please send a single emoji."
    ));

    let reports = bot.send(private_text(1, "No buttons")).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { layout: Some(layout), .. } if layout.is_empty()
    ));

    let reports = bot.send(publish_query(1)).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::AnswerInline { preview, .. } if preview.draft.body.text.as_deref() == Some("a post")
    ));
}

#[tokio::test]
async fn test_start_without_payload_greets() {
    let bot = TestBot::new(StaticAdmins::new());

    let reports = bot.send(start(1, None)).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(&reports[0].effect, Effect::Reply { chat_id: 1, .. }));
}

#[tokio::test]
async fn test_other_inline_queries_are_ignored() {
    let bot = TestBot::new(StaticAdmins::new());
    bot.send(private_text(1, "draft")).await;
    bot.send(private_text(1, "👍")).await;

    let reports = bot
        .send(InboundEvent::InlineQuery {
            query_id: "q".into(),
            user: user(1),
            query: "something else".into(),
        })
        .await;
    assert!(reports.is_empty());
}

// ============================================================================
// Reposting group posts
// ============================================================================

#[tokio::test]
async fn test_plain_post_in_unconfigured_chat_stays() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 1, 10, "just chatting")))
        .await;

    assert!(reports.is_empty());
    let registered = ChatService::new(bot.ctx()).find(chat.id).await.unwrap();
    assert!(registered.is_some());
}

#[tokio::test]
async fn test_forced_repost_is_recorded() {
    let chat = unique_group();
    let bot = TestBot::new(StaticAdmins::new().with(chat.id, &[BOT_ID]));

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 11, "++ look")))
        .await;
    assert_eq!(reports.len(), 1);

    let effects: Vec<Effect> = reports.iter().map(|r| r.effect.clone()).collect();
    let plan = only_repost(&effects);
    assert_eq!(plan.chat_id, chat.id);
    assert_eq!(plan.mode, RepostMode::Copy);
    assert!(plan.delete_original);
    assert!(!plan.anonymous);
    assert_eq!(plan.buttons, vec!["👍", "👎"]);
    assert_eq!(plan.body.text.as_deref().map(str::trim), Some("look"));

    let posted = match &reports[0].result {
        Ok(Delivery::Posted(posted)) => posted.clone(),
        other => panic!("unexpected delivery {other:?}"),
    };
    let recorded = reports[0].recorded.clone().unwrap();
    assert_eq!(recorded.message_ref, posted);
    assert_eq!(recorded.from_user, Some(3));
    assert_eq!(recorded.original_message_id, Some(11));
}

#[tokio::test]
async fn test_album_original_is_kept() {
    let chat = unique_group();
    let bot = TestBot::new(StaticAdmins::new().with(chat.id, &[BOT_ID]));
    let mut post = text_post(&chat, 3, 12, "++ holiday");
    post.kind = ContentKind::Album;

    let reports = bot.send(InboundEvent::GroupPost(post)).await;

    let effects: Vec<Effect> = reports.iter().map(|r| r.effect.clone()).collect();
    assert!(!only_repost(&effects).delete_original);
}

#[tokio::test]
async fn test_configured_chat_reposts_allowed_kinds() {
    let chat = unique_group();
    let bot = TestBot::new(StaticAdmins::new().with(chat.id, &[9]));
    ChatService::new(bot.ctx()).register(&chat).await.unwrap();
    ChatService::new(bot.ctx())
        .configure(chat.id, 9, &[ContentKind::Text], &["🔥".to_string()])
        .await
        .unwrap();

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 20, "plain text")))
        .await;
    let effects: Vec<Effect> = reports.iter().map(|r| r.effect.clone()).collect();
    let plan = only_repost(&effects);
    assert_eq!(plan.buttons, vec!["🔥"]);
    assert!(!plan.delete_original);

    // Skip mark wins over the chat settings
    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 21, "-- not this one")))
        .await;
    assert!(reports.is_empty());

    // Replies are never reposted
    let mut reply = text_post(&chat, 3, 22, "plain reply");
    reply.is_reply = true;
    assert!(bot.send(InboundEvent::GroupPost(reply)).await.is_empty());
}

#[tokio::test]
async fn test_configure_needs_admin() {
    let chat = unique_group();
    let bot = TestBot::new(StaticAdmins::new().with(chat.id, &[9]));
    ChatService::new(bot.ctx()).register(&chat).await.unwrap();

    let err = ChatService::new(bot.ctx())
        .configure(chat.id, 3, &[ContentKind::Text], &[])
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_ADMIN");
}

#[tokio::test]
async fn test_trailer_sets_buttons_and_anonymity() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(
            &chat,
            3,
            30,
            "++ secret\n:: anon buttons=😂,🔥",
        )))
        .await;

    let effects: Vec<Effect> = reports.iter().map(|r| r.effect.clone()).collect();
    let plan = only_repost(&effects);
    assert!(plan.anonymous);
    assert_eq!(plan.buttons, vec!["😂", "🔥"]);
    assert_eq!(plan.body.text.as_deref().map(str::trim), Some("secret"));

    let recorded = reports[0].recorded.clone().unwrap();
    assert!(recorded.anonymous);
    assert_eq!(recorded.from_user, None);
}

#[tokio::test]
async fn test_transform_drops_forward_origin() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();

    let reports = bot
        .send(InboundEvent::GroupPost(forwarded_post(&chat, 3, 40, -42, "++ kept")))
        .await;
    let recorded = reports[0].recorded.clone().unwrap();
    assert_eq!(recorded.forward_from_chat, Some(-42));

    let reports = bot
        .send(InboundEvent::GroupPost(forwarded_post(&chat, 3, 41, -42, "+++ fresh")))
        .await;
    let effects: Vec<Effect> = reports.iter().map(|r| r.effect.clone()).collect();
    let plan = only_repost(&effects);
    assert_eq!(plan.mode, RepostMode::Transform);
    assert!(plan.forward.is_none());
    assert!(!reports[0].recorded.clone().unwrap().is_forward());
}

#[tokio::test]
async fn test_empty_forced_post_gets_error_reply() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 50, "++")))
        .await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { chat_id, reply_to: Some(50), text, .. }
            if *chat_id == chat.id && text == "Cannot repost an empty message."
    ));
}

#[tokio::test]
async fn test_unforced_trailer_only_post_is_ignored() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 51, "::anon")))
        .await;

    assert!(reports.is_empty());
    assert!(bot.notifier.delivered().is_empty());
}

#[tokio::test]
async fn test_harness_installs_tracing_subscriber() {
    let _bot = TestBot::new(StaticAdmins::new());
    assert!(tracing::dispatcher::has_been_set());
}

// ============================================================================
// Delivery failures
// ============================================================================

#[tokio::test]
async fn test_edit_of_deleted_message_forgets_it() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();
    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 60, "++ short lived")))
        .await;
    let message_ref = reports[0].recorded.clone().unwrap().message_ref;

    bot.notifier.mark_gone(message_ref.clone());
    let reports = bot.send(press(4, &message_ref, "👍")).await;

    assert_eq!(reports.len(), 2);
    assert!(matches!(reports[0].result, Ok(Delivery::Done)));
    assert!(matches!(
        &reports[1].result,
        Err(DomainError::StaleEditConflict(stale)) if stale == &message_ref
    ));
    assert!(MessageService::new(bot.ctx())
        .find(&message_ref)
        .await
        .unwrap()
        .is_none());

    // Later presses on it are ignored
    assert!(bot.send(press(5, &message_ref, "👍")).await.is_empty());
}

#[tokio::test]
async fn test_slow_delivery_times_out() {
    let bot = TestBot::new(StaticAdmins::new());
    bot.notifier.set_delay(Some(Duration::from_secs(2)));

    let reports = bot.send(start(1, None)).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        reports[0].result,
        Err(DomainError::NotificationTimeout(_))
    ));
}

#[tokio::test]
async fn test_repost_not_recorded_when_delivery_fails() {
    let bot = TestBot::new(StaticAdmins::new());
    let chat = unique_group();
    bot.notifier.set_delay(Some(Duration::from_secs(2)));

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(&chat, 3, 70, "++ lost")))
        .await;

    assert!(reports[0].result.is_err());
    assert!(reports[0].recorded.is_none());
}
