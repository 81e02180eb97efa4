//! Inline keyboard layout for a button set
//!
//! The layout is transport neutral: rows of cells with a caption and the
//! callback token the transport sends back when a cell is pressed.

use serde::{Deserialize, Serialize};

use crate::entities::ButtonSet;

/// Callback token of a cell that does nothing
pub const NOOP_TOKEN: &str = "~";

const BUTTON_PREFIX: &str = "button:";

/// Decoded callback data
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallbackToken {
    Button(String),
    Noop,
}

impl CallbackToken {
    pub fn parse(data: &str) -> Option<Self> {
        if data == NOOP_TOKEN {
            return Some(Self::Noop);
        }
        data.strip_prefix(BUTTON_PREFIX)
            .filter(|label| !label.is_empty())
            .map(|label| Self::Button(label.to_owned()))
    }

    pub fn encode(&self) -> String {
        match self {
            Self::Button(label) => format!("{BUTTON_PREFIX}{label}"),
            Self::Noop => NOOP_TOKEN.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCell {
    pub label: String,
    pub caption: String,
    pub callback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardOptions {
    /// Show bare labels without counts
    pub blank: bool,
    pub max_per_row: usize,
}

impl Default for KeyboardOptions {
    fn default() -> Self {
        Self {
            blank: false,
            max_per_row: 5,
        }
    }
}

impl KeyboardOptions {
    pub fn blank(max_per_row: usize) -> Self {
        Self {
            blank: true,
            max_per_row,
        }
    }

    pub fn counted(max_per_row: usize) -> Self {
        Self {
            blank: false,
            max_per_row,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: Vec<Vec<KeyCell>>,
}

impl Layout {
    /// Append a row with one dead cell
    pub fn with_noop_row(mut self, caption: impl Into<String>) -> Self {
        self.rows.push(vec![KeyCell {
            label: String::new(),
            caption: caption.into(),
            callback: NOOP_TOKEN.to_owned(),
        }]);
        self
    }

    pub fn cells(&self) -> impl Iterator<Item = &KeyCell> {
        self.rows.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Lay out buttons in order, at most `max_per_row` per row
pub fn build(buttons: &ButtonSet, options: KeyboardOptions) -> Layout {
    let per_row = options.max_per_row.max(1);
    let cells: Vec<KeyCell> = buttons
        .iter()
        .map(|button| KeyCell {
            label: button.label.clone(),
            caption: if options.blank {
                button.label.clone()
            } else {
                format!("{} {}", button.label, button.count)
            },
            callback: CallbackToken::Button(button.label.clone()).encode(),
        })
        .collect();

    Layout {
        rows: cells.chunks(per_row).map(<[KeyCell]>::to_vec).collect(),
    }
}
