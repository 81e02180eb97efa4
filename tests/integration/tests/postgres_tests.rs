//! End-to-end tests over PostgreSQL
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable DATABASE_URL (REDIS_URL optional)
//!
//! Run with: cargo test -p likebot-integration-tests --test postgres_tests

use std::sync::Arc;

use likebot_core::MessageRef;
use likebot_integration_tests::*;
use likebot_service::{Effect, InboundEvent, ReactionService};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repost_and_concurrent_presses() {
    if !check_test_env() {
        return;
    }

    let chat = unique_group();
    let bot = postgres_bot(StaticAdmins::new())
        .await
        .expect("Failed to connect");

    let reports = bot
        .send(InboundEvent::GroupPost(text_post(
            &chat,
            1,
            unique_suffix(),
            "++ over postgres",
        )))
        .await;
    let message_ref = reports[0]
        .recorded
        .clone()
        .expect("repost should be recorded")
        .message_ref;

    let mut handles = Vec::new();
    for user_id in 1..=20 {
        let dispatcher = Arc::clone(&bot.dispatcher);
        let event = press(user_id, &message_ref, "👎");
        handles.push(tokio::spawn(async move { dispatcher.dispatch(event).await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    assert_eq!(buttons.count("👎"), 20);
    assert_eq!(buttons.count("👍"), 0);
}

#[tokio::test]
async fn test_publish_flow_survives_reconnect() {
    if !check_test_env() {
        return;
    }

    let author = 900_000 + unique_suffix();
    let inline_id = format!("pg-inline-{}-{}", run_stamp(), unique_suffix());
    let bot = postgres_bot(StaticAdmins::new())
        .await
        .expect("Failed to connect");
    bot.send(private_text(author, "persisted")).await;
    bot.send(private_text(author, "🔥")).await;
    bot.send(publish_chosen(author, &inline_id)).await;

    // A second context over the same database sees the published message
    let other = postgres_bot(StaticAdmins::new())
        .await
        .expect("Failed to connect");
    let reports = other
        .send(press(author, &MessageRef::inline(inline_id), "🔥"))
        .await;
    assert!(matches!(
        &reports[1].effect,
        Effect::EditKeyboard { layout, .. }
            if layout.cells().map(|c| c.caption.as_str()).collect::<Vec<_>>() == vec!["🔥 1"]
    ));
}
