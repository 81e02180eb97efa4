//! Button and ButtonSet - the counters rendered under a message

use serde::{Deserialize, Serialize};

use super::reaction::{ReactionOutcome, ReactionPlan};

/// One reaction button and the number of users currently on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub count: u32,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: 0,
        }
    }

    pub fn with_count(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Ordered, label-unique buttons of one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSet {
    buttons: Vec<Button>,
}

impl ButtonSet {
    /// Fresh set with zero counts. Duplicate labels keep their first position.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for label in labels {
            let label = label.into();
            if !set.contains(&label) {
                set.buttons.push(Button::new(label));
            }
        }
        set
    }

    /// Wrap buttons loaded from storage, already in display order
    pub fn from_buttons(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }

    pub fn get(&self, label: &str) -> Option<&Button> {
        self.buttons.iter().find(|b| b.label == label)
    }

    #[inline]
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// Count for a label, zero when the label is not in the set
    pub fn count(&self, label: &str) -> u32 {
        self.get(label).map_or(0, |b| b.count)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Button> {
        self.buttons.iter()
    }

    pub fn labels(&self) -> Vec<String> {
        self.buttons.iter().map(|b| b.label.clone()).collect()
    }

    pub fn total(&self) -> u64 {
        self.buttons.iter().map(|b| u64::from(b.count)).sum()
    }

    pub fn into_buttons(self) -> Vec<Button> {
        self.buttons
    }

    /// Apply a planned toggle to the counters and report what happened
    pub fn apply(&mut self, plan: &ReactionPlan) -> ReactionOutcome {
        match plan {
            ReactionPlan::Add { label, .. } => ReactionOutcome::Added(self.increment(label)),
            ReactionPlan::Remove { label } => ReactionOutcome::Removed(self.decrement(label)),
            ReactionPlan::Move { from, to, .. } => {
                let from = self.decrement(from);
                let to = self.increment(to);
                ReactionOutcome::Moved { from, to }
            }
        }
    }

    fn increment(&mut self, label: &str) -> Button {
        let idx = match self.buttons.iter().position(|b| b.label == label) {
            Some(idx) => idx,
            None => {
                self.buttons.push(Button::new(label));
                self.buttons.len() - 1
            }
        };
        let button = &mut self.buttons[idx];
        button.count += 1;
        button.clone()
    }

    fn decrement(&mut self, label: &str) -> Button {
        match self.buttons.iter_mut().find(|b| b.label == label) {
            Some(button) => {
                button.count = button.count.saturating_sub(1);
                button.clone()
            }
            None => Button::new(label),
        }
    }
}

impl<'a> IntoIterator for &'a ButtonSet {
    type Item = &'a Button;
    type IntoIter = std::slice::Iter<'a, Button>;

    fn into_iter(self) -> Self::IntoIter {
        self.buttons.iter()
    }
}
