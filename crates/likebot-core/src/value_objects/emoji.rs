//! Reaction label validation for the free-text reaction path

use unicode_segmentation::UnicodeSegmentation;

use crate::error::DomainError;

/// Longest label that still fits a `button:<label>` callback token
/// in the platform's 64-byte callback data.
pub const MAX_LABEL_BYTES: usize = 64 - "button:".len();

const KEYCAP: char = '\u{20E3}';
const EMOJI_PRESENTATION: char = '\u{FE0F}';

/// Blocks where pictographic emoji live
fn is_pictographic(c: char) -> bool {
    matches!(
        c,
        '\u{1F000}'..='\u{1FAFF}'
            | '\u{2600}'..='\u{27BF}'
            | '\u{2300}'..='\u{23FF}'
            | '\u{2B00}'..='\u{2BFF}'
    )
}

/// Accept exactly one user-perceived character that looks like an emoji.
///
/// This is a shape check rather than a lookup against the emoji tables:
/// one extended grapheme cluster that either starts in a pictographic block,
/// asks for emoji presentation with U+FE0F, or is a keycap such as `1️⃣`.
/// Any symbol of those blocks passes, so `★` and `✓` are accepted too.
pub fn validate_reaction_label(label: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidReaction(label.to_string());

    if label.is_empty() || label.len() > MAX_LABEL_BYTES {
        return Err(invalid());
    }

    let mut graphemes = label.graphemes(true);
    let (Some(grapheme), None) = (graphemes.next(), graphemes.next()) else {
        return Err(invalid());
    };

    if grapheme.contains(KEYCAP) {
        return Ok(());
    }

    let first = grapheme.chars().next().ok_or_else(invalid)?;
    if first.is_ascii() || first.is_alphanumeric() || first.is_whitespace() || first.is_control() {
        return Err(invalid());
    }
    if is_pictographic(first) || grapheme.contains(EMOJI_PRESENTATION) {
        return Ok(());
    }

    Err(invalid())
}
