//! Posting directives embedded in message text
//!
//! Prefix marks, read only at the very first byte:
//! - `--` skips the post entirely
//! - `++` forces a repost
//! - `+++` forces a repost that drops the forward attribution
//!
//! Trailer line, read only on the last line of the text:
//!
//! ```text
//! look at this
//! :: anon buttons=🔥,😂
//! ```
//!
//! The trailer starts with `::` and holds whitespace separated tokens in any
//! order: `anon` marks the post anonymous, `buttons=a,b` lists explicit
//! buttons (several lists concatenate, duplicates keep the first occurrence).
//! A line with no tokens or with any unknown token is ordinary text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::DomainError;

const SKIP_MARK: &str = "--";
const FORCE_MARK: &str = "++";
const TRANSFORM_MARK: &str = "+++";
const TRAILER_MARK: &str = "::";
const ANON_TOKEN: &str = "anon";
const BUTTONS_TOKEN: &str = "buttons=";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceLevel {
    #[default]
    None,
    /// Repost even if the chat does not allow this content
    Force,
    /// Repost as a fresh copy without forward attribution
    Transform,
}

impl ForceLevel {
    fn detect(text: &str) -> Self {
        if text.starts_with(TRANSFORM_MARK) {
            Self::Transform
        } else if text.starts_with(FORCE_MARK) {
            Self::Force
        } else {
            Self::None
        }
    }

    /// Literal mark that selects this level
    pub fn marker(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Force => FORCE_MARK,
            Self::Transform => TRANSFORM_MARK,
        }
    }

    #[inline]
    pub fn is_forced(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn level(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Force => 1,
            Self::Transform => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub skip: bool,
    pub force: ForceLevel,
    pub anonymous: bool,
    pub buttons: Vec<String>,
    pub cleaned_text: String,
}

impl Directive {
    fn skipped(raw: &str) -> Self {
        Self {
            skip: true,
            cleaned_text: raw.to_owned(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn has_buttons(&self) -> bool {
        !self.buttons.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("nothing left after removing the posting marks")]
    EmptyAfterStrip,
}

impl From<DirectiveError> for DomainError {
    fn from(err: DirectiveError) -> Self {
        match err {
            DirectiveError::EmptyAfterStrip => DomainError::EmptyAfterStrip,
        }
    }
}

/// Text-bearing part of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostBody {
    pub text: Option<String>,
    pub caption: Option<String>,
    /// Whether the post carries media besides the text
    pub has_media: bool,
}

impl PostBody {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn media(caption: Option<String>) -> Self {
        Self {
            text: None,
            caption,
            has_media: true,
        }
    }

    /// Nothing left to send
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.caption.is_none() && !self.has_media
    }
}

#[derive(Debug, Default)]
struct Trailer {
    anonymous: bool,
    buttons: Vec<String>,
}

fn parse_trailer(line: &str) -> Option<Trailer> {
    let rest = line.trim().strip_prefix(TRAILER_MARK)?;
    let mut trailer = Trailer::default();
    let mut seen_token = false;

    for token in rest.split_whitespace() {
        seen_token = true;
        if token == ANON_TOKEN {
            trailer.anonymous = true;
        } else if let Some(list) = token.strip_prefix(BUTTONS_TOKEN) {
            for label in list.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                if !trailer.buttons.iter().any(|b| b == label) {
                    trailer.buttons.push(label.to_owned());
                }
            }
        } else {
            return None;
        }
    }

    seen_token.then_some(trailer)
}

/// Split off a trailer line if the last line is one
fn split_trailer(text: &str) -> (&str, Option<Trailer>) {
    let trimmed = text.trim_end();
    let (body, last) = match trimmed.rfind('\n') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };
    match parse_trailer(last) {
        Some(trailer) => (body.trim_end(), Some(trailer)),
        None => (text, None),
    }
}

/// Decode marks without judging the result
fn scan(raw: &str) -> Directive {
    if raw.starts_with(SKIP_MARK) {
        return Directive::skipped(raw);
    }

    let force = ForceLevel::detect(raw);
    let (rest, trailer) = split_trailer(&raw[force.marker().len()..]);
    let trailer = trailer.unwrap_or_default();

    Directive {
        skip: false,
        force,
        anonymous: trailer.anonymous,
        buttons: trailer.buttons,
        cleaned_text: rest.to_owned(),
    }
}

/// Parse the posting directive of a single text
///
/// A forced text that is empty once its marks are removed cannot be
/// reposted and yields [`DirectiveError::EmptyAfterStrip`].
pub fn parse(raw: Option<&str>) -> Result<Directive, DirectiveError> {
    let Some(raw) = raw else {
        return Ok(Directive::default());
    };

    let directive = scan(raw);
    if directive.force.is_forced() && directive.cleaned_text.is_empty() {
        return Err(DirectiveError::EmptyAfterStrip);
    }
    Ok(directive)
}

/// Parse the directive of a post and return the post with its marks removed
///
/// Marks are read from the text, or from the caption when there is no text.
/// A forcing mark is also stripped from the caption when the caption starts
/// with it. A caption or text emptied by stripping is dropped. A forced post
/// with an emptied text, or left with nothing at all, is an error.
pub fn parse_post(body: &PostBody) -> Result<(Directive, PostBody), DirectiveError> {
    let (primary, from_text) = match (&body.text, &body.caption) {
        (Some(text), _) => (text.as_str(), true),
        (None, Some(caption)) => (caption.as_str(), false),
        (None, None) => return Ok((Directive::default(), body.clone())),
    };

    let directive = scan(primary);
    if directive.skip {
        return Ok((directive, body.clone()));
    }

    let forced = directive.force.is_forced();
    let mut cleaned = body.clone();
    if from_text {
        let emptied = directive.cleaned_text.is_empty() && !primary.is_empty();
        if emptied && forced {
            return Err(DirectiveError::EmptyAfterStrip);
        }
        cleaned.text = Some(directive.cleaned_text.clone()).filter(|_| !emptied);

        let marker = directive.force.marker();
        cleaned.caption = body
            .caption
            .as_deref()
            .map(|caption| caption.strip_prefix(marker).unwrap_or(caption))
            .filter(|caption| !caption.is_empty())
            .map(str::to_owned);
    } else {
        cleaned.caption = Some(directive.cleaned_text.clone()).filter(|c| !c.is_empty());
    }

    if forced && cleaned.is_empty() {
        return Err(DirectiveError::EmptyAfterStrip);
    }
    Ok((directive, cleaned))
}
