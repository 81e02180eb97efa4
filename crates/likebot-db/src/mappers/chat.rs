//! Chat entity <-> model mapper

use likebot_core::{Chat, ChatKind, ContentKind, DomainError};

use crate::models::ChatModel;

/// Convert ChatModel to Chat entity. Unknown content kinds are skipped.
impl TryFrom<ChatModel> for Chat {
    type Error = DomainError;

    fn try_from(model: ChatModel) -> Result<Self, Self::Error> {
        let kind: ChatKind = model
            .kind
            .parse()
            .map_err(|e: String| DomainError::DatabaseError(e))?;

        let allowed_types = model
            .allowed_types
            .iter()
            .filter_map(|s| s.parse::<ContentKind>().ok())
            .collect();

        Ok(Chat {
            id: model.id,
            kind,
            username: model.username,
            title: model.title,
            allowed_types,
            buttons: model.buttons,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

pub fn content_kinds_to_strings(kinds: &[ContentKind]) -> Vec<String> {
    kinds.iter().map(|k| k.as_str().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_chat_model_mapping() {
        let model = ChatModel {
            id: -100,
            kind: "supergroup".into(),
            username: None,
            title: Some("Memes".into()),
            allowed_types: vec!["photo".into(), "sticker".into(), "doc".into()],
            buttons: vec!["👍".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let chat = Chat::try_from(model).unwrap();
        assert_eq!(chat.kind, ChatKind::Supergroup);
        assert_eq!(
            chat.allowed_types,
            vec![ContentKind::Photo, ContentKind::Document]
        );
        assert_eq!(content_kinds_to_strings(&chat.allowed_types), vec!["photo", "doc"]);
    }

    #[test]
    fn test_bad_kind_is_database_error() {
        let model = ChatModel {
            id: 1,
            kind: "forum".into(),
            username: None,
            title: None,
            allowed_types: vec![],
            buttons: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Chat::try_from(model).is_err());
    }
}
