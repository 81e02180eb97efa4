//! Reaction engine tests
//!
//! Presses and free-emoji reactions run through the dispatcher over the
//! in-process stores.
//!
//! Run with: cargo test -p likebot-integration-tests --test reaction_tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use likebot_common::BotConfig;
use likebot_core::{Layout, MessageRef, Snowflake};
use likebot_integration_tests::*;
use likebot_service::{
    Delivery, DeliveryReport, Effect, InboundEvent, MessageService, ReactionService,
    NOOP_CACHE_SECS,
};

/// Repost a forced post in a fresh group and return the tracked copy
async fn tracked_post(bot: &TestBot) -> (MessageRef, Snowflake) {
    let chat = unique_group();
    let post = text_post(&chat, 1, unique_suffix(), "++ look at this");
    let reports = bot.send(InboundEvent::GroupPost(post)).await;

    assert_eq!(reports.len(), 1);
    let message = reports[0].recorded.clone().expect("repost should be recorded");
    (message.message_ref, message.id)
}

fn captions(layout: &Layout) -> Vec<String> {
    layout.cells().map(|cell| cell.caption.clone()).collect()
}

fn edited_layout(reports: &[DeliveryReport]) -> Option<Layout> {
    reports.iter().find_map(|report| match &report.effect {
        Effect::EditKeyboard { layout, .. } => Some(layout.clone()),
        _ => None,
    })
}

fn callback_text(reports: &[DeliveryReport]) -> Option<String> {
    reports.iter().find_map(|report| match &report.effect {
        Effect::AnswerCallback { text, .. } => text.clone(),
        _ => None,
    })
}

// ============================================================================
// Button presses
// ============================================================================

#[tokio::test]
async fn test_press_add_move_remove() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, _) = tracked_post(&bot).await;

    let reports = bot.send(press(2, &message_ref, "👍")).await;
    assert_eq!(callback_text(&reports).as_deref(), Some("You reacted with 👍."));
    assert_eq!(
        captions(&edited_layout(&reports).unwrap()),
        vec!["👍 1", "👎 0"]
    );

    let reports = bot.send(press(2, &message_ref, "👎")).await;
    assert_eq!(callback_text(&reports).as_deref(), Some("You reacted with 👎."));
    assert_eq!(
        captions(&edited_layout(&reports).unwrap()),
        vec!["👍 0", "👎 1"]
    );

    let reports = bot.send(press(2, &message_ref, "👎")).await;
    assert_eq!(
        callback_text(&reports).as_deref(),
        Some("You took your reaction back.")
    );

    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    assert_eq!(buttons.total(), 0);
    assert!(MessageService::new(bot.ctx())
        .reactions(&message_ref)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_presses_from_different_users_add_up() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, _) = tracked_post(&bot).await;

    bot.send(press(2, &message_ref, "👍")).await;
    bot.send(press(3, &message_ref, "👍")).await;
    let reports = bot.send(press(4, &message_ref, "👎")).await;

    assert_eq!(
        captions(&edited_layout(&reports).unwrap()),
        vec!["👍 2", "👎 1"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_presses_count_each_user_once() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, _) = tracked_post(&bot).await;

    let mut handles = Vec::new();
    for user_id in 100..150 {
        let dispatcher = Arc::clone(&bot.dispatcher);
        let event = press(user_id, &message_ref, "👍");
        handles.push(tokio::spawn(async move { dispatcher.dispatch(event).await }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    assert_eq!(buttons.count("👍"), 50);
    assert_eq!(buttons.count("👎"), 0);
    assert!(bot.ctx().ref_locks().is_empty());
}

/// Presses each user makes in order, and the label they end up with
fn press_script(user_id: i64) -> (&'static [&'static str], Option<&'static str>) {
    match user_id % 4 {
        0 => (&["👍"], Some("👍")),
        1 => (&["👍", "👎"], Some("👎")),
        2 => (&["👎", "👎"], None),
        _ => (&["👎", "👍", "👍", "👎"], Some("👎")),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_counters_match_stored_reactions_after_mixed_presses() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, _) = tracked_post(&bot).await;

    let mut handles = Vec::new();
    for user_id in 200..240 {
        let dispatcher = Arc::clone(&bot.dispatcher);
        let message_ref = message_ref.clone();
        handles.push(tokio::spawn(async move {
            let (presses, _) = press_script(user_id);
            for label in presses {
                dispatcher.dispatch(press(user_id, &message_ref, label)).await;
            }
        }));
    }
    // One user hammering the same button from several clients at once
    for _ in 0..5 {
        let dispatcher = Arc::clone(&bot.dispatcher);
        let event = press(300, &message_ref, "👍");
        handles.push(tokio::spawn(async move {
            dispatcher.dispatch(event).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    let reactions = MessageService::new(bot.ctx())
        .reactions(&message_ref)
        .await
        .unwrap();

    let mut per_label: HashMap<&str, u32> = HashMap::new();
    for reaction in &reactions {
        *per_label.entry(reaction.label.as_str()).or_default() += 1;
    }
    for button in buttons.iter() {
        assert_eq!(
            per_label.get(button.label.as_str()).copied().unwrap_or(0),
            button.count,
            "counter of {} disagrees with stored reactions",
            button.label
        );
    }
    assert!(per_label.keys().all(|label| buttons.contains(label)));

    let users: HashSet<i64> = reactions.iter().map(|r| r.user_id).collect();
    assert_eq!(users.len(), reactions.len(), "a user holds two reactions");

    // Scripted users end where their last press left them
    for user_id in 200..240 {
        let held = reactions
            .iter()
            .find(|r| r.user_id == user_id)
            .map(|r| r.label.as_str());
        assert_eq!(held, press_script(user_id).1, "user {user_id}");
    }
    assert_eq!(buttons.total(), reactions.len() as u64);
    assert!(bot.ctx().ref_locks().is_empty());
}

#[tokio::test]
async fn test_noop_press_is_answered_and_cached() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, _) = tracked_post(&bot).await;

    let reports = bot.send(press_noop(2, &message_ref)).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0].effect,
        Effect::AnswerCallback { text: None, cache_time, .. } if *cache_time == NOOP_CACHE_SECS
    ));
    assert!(matches!(reports[0].result, Ok(Delivery::Done)));
}

#[tokio::test]
async fn test_press_on_untracked_message_is_silent() {
    let bot = TestBot::new(StaticAdmins::new());

    let reports = bot.send(press(2, &MessageRef::chat(-5, 99), "👍")).await;

    assert!(reports.is_empty());
    assert!(bot.notifier.delivered().is_empty());
}

// ============================================================================
// Free emoji reactions
// ============================================================================

#[tokio::test]
async fn test_react_link_adds_new_emoji() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, message_id) = tracked_post(&bot).await;

    let reports = bot.send(react_link(5, message_id)).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { chat_id: 5, text, .. } if text == "Send me one emoji to react with."
    ));

    let reports = bot.send(private_text(5, " 🔥 ")).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { chat_id: 5, text, .. } if text == "You reacted with 🔥."
    ));
    assert!(matches!(
        &reports[1].effect,
        Effect::EditKeyboard { message_ref: edited, layout }
            if edited == &message_ref && captions(layout) == vec!["👍 0", "👎 0", "🔥 1"]
    ));
}

#[tokio::test]
async fn test_react_link_rejects_emoji_over_capacity() {
    let settings = BotConfig {
        max_distinct_buttons: 2,
        ..test_settings()
    };
    let bot = TestBot::with_settings(settings, StaticAdmins::new());
    let (message_ref, message_id) = tracked_post(&bot).await;

    bot.send(react_link(5, message_id)).await;
    let reports = bot.send(private_text(5, "🔥")).await;

    assert_eq!(reports.len(), 1);
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { text, .. } if text == "Too many reactions on this message."
    ));
    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    assert_eq!(buttons.len(), 2);
    assert_eq!(buttons.total(), 0);
}

#[tokio::test]
async fn test_react_link_to_unknown_message() {
    let bot = TestBot::new(StaticAdmins::new());

    let reports = bot.send(react_link(5, 123_456)).await;

    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { text, .. } if text == "That message is gone, nothing to react to."
    ));
}

#[tokio::test]
async fn test_react_link_wants_a_single_emoji() {
    let bot = TestBot::new(StaticAdmins::new());
    let (message_ref, message_id) = tracked_post(&bot).await;

    bot.send(react_link(5, message_id)).await;
    let reports = bot.send(private_text(5, "nice")).await;
    assert!(matches!(
        &reports[0].effect,
        Effect::Reply { text, .. } if text == "Please send a single emoji."
    ));

    // Still waiting for the emoji
    let reports = bot.send(private_text(5, "👍")).await;
    assert!(matches!(&reports[0].effect, Effect::Reply { text, .. } if text == "You reacted with 👍."));
    let buttons = ReactionService::new(bot.ctx())
        .reactions_for(&message_ref)
        .await
        .unwrap();
    assert_eq!(buttons.count("👍"), 1);
}
