//! Reaction entity and the toggle planner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{Snowflake, UserId};

use super::button::{Button, ButtonSet};

/// One user's current choice on one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message_id: Snowflake,
    pub user_id: UserId,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(message_id: Snowflake, user_id: UserId, label: impl Into<String>) -> Self {
        Self {
            message_id,
            user_id,
            label: label.into(),
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_label(&self, label: &str) -> bool {
        self.label == label
    }
}

/// The mutation a press resolves to, decided before anything is written.
///
/// `grow` is set when the target label is not in the set yet and a button
/// has to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionPlan {
    Add { label: String, grow: bool },
    Remove { label: String },
    Move { from: String, to: String, grow: bool },
}

impl ReactionPlan {
    /// Label the user ends up on, `None` after a removal
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Add { label, .. } => Some(label),
            Self::Remove { .. } => None,
            Self::Move { to, .. } => Some(to),
        }
    }

    #[inline]
    pub fn grows(&self) -> bool {
        matches!(
            self,
            Self::Add { grow: true, .. } | Self::Move { grow: true, .. }
        )
    }
}

/// What a toggle did, with post-mutation counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactionOutcome {
    Added(Button),
    Removed(Button),
    Moved { from: Button, to: Button },
}

impl ReactionOutcome {
    /// Button the user is on after the toggle
    pub fn current(&self) -> Option<&Button> {
        match self {
            Self::Added(button) => Some(button),
            Self::Removed(_) => None,
            Self::Moved { to, .. } => Some(to),
        }
    }
}

/// Outcome plus the full set, so callers can re-render without a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionResult {
    pub outcome: ReactionOutcome,
    pub buttons: ButtonSet,
}

/// Decide how a press of `label` by a user whose current reaction is
/// `existing` changes the set.
///
/// A label outside the set is appended only while the set holds fewer than
/// `max_distinct` buttons; otherwise the press is rejected and nothing may be
/// written.
pub fn plan_reaction(
    buttons: &ButtonSet,
    existing: Option<&str>,
    label: &str,
    max_distinct: usize,
) -> Result<ReactionPlan, DomainError> {
    let grow = !buttons.contains(label);
    if grow && buttons.len() >= max_distinct {
        return Err(DomainError::CapacityExceeded { max: max_distinct });
    }

    let plan = match existing {
        None => ReactionPlan::Add {
            label: label.to_string(),
            grow,
        },
        Some(current) if current == label => ReactionPlan::Remove {
            label: label.to_string(),
        },
        Some(current) => ReactionPlan::Move {
            from: current.to_string(),
            to: label.to_string(),
            grow,
        },
    };
    Ok(plan)
}
