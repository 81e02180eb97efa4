//! Chat entity - a group or channel and its reposting settings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::ChatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
            Self::Supergroup => "supergroup",
            Self::Channel => "channel",
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::Supergroup)
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            "supergroup" => Ok(Self::Supergroup),
            "channel" => Ok(Self::Channel),
            other => Err(format!("unknown chat kind: {other}")),
        }
    }
}

/// What a post carries, as far as reposting rules care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Link,
    Photo,
    Video,
    Animation,
    Document,
    Album,
    Forward,
    Unknown,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Photo => "photo",
            Self::Video => "video",
            Self::Animation => "animation",
            Self::Document => "doc",
            Self::Album => "album",
            Self::Forward => "forward",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the post carries a file besides its text
    pub fn has_media(&self) -> bool {
        matches!(
            self,
            Self::Photo | Self::Video | Self::Animation | Self::Document | Self::Album
        )
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "link" => Ok(Self::Link),
            "photo" => Ok(Self::Photo),
            "video" => Ok(Self::Video),
            "animation" => Ok(Self::Animation),
            "doc" | "document" => Ok(Self::Document),
            "album" => Ok(Self::Album),
            "forward" => Ok(Self::Forward),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown content kind: {other}")),
        }
    }
}

/// Chat fields as the transport reports them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatProfile {
    pub id: ChatId,
    pub kind: ChatKind,
    pub username: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ChatProfile {
    pub fn group(id: ChatId, title: impl Into<String>) -> Self {
        Self {
            id,
            kind: ChatKind::Supergroup,
            username: None,
            title: Some(title.into()),
            first_name: None,
            last_name: None,
        }
    }

    /// Group title, or the person's name for private chats
    pub fn display_title(&self) -> Option<String> {
        if let Some(title) = &self.title {
            return Some(title.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            _ => None,
        }
    }
}

/// Stored chat with its settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub kind: ChatKind,
    pub username: Option<String>,
    pub title: Option<String>,
    /// Content kinds reposted without a force mark
    pub allowed_types: Vec<ContentKind>,
    /// Button template for reposts in this chat
    pub buttons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn from_profile(profile: &ChatProfile, default_buttons: &[String]) -> Self {
        let now = Utc::now();
        Self {
            id: profile.id,
            kind: profile.kind,
            username: profile.username.clone(),
            title: profile.display_title(),
            allowed_types: Vec::new(),
            buttons: default_buttons.to_vec(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh profile fields; settings stay as they are
    pub fn update_profile(&mut self, profile: &ChatProfile) {
        self.kind = profile.kind;
        self.username.clone_from(&profile.username);
        self.title = profile.display_title();
        self.updated_at = Utc::now();
    }

    #[inline]
    pub fn allows(&self, kind: ContentKind) -> bool {
        self.allowed_types.contains(&kind)
    }
}
