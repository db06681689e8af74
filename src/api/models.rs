use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHAT_GREETING: &str =
    "Hi! I'm SeikoBot. How can I help you find your next favorite movie?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }

    pub fn greeting() -> Self {
        Self::model(CHAT_GREETING)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    #[serde(default)]
    pub title: String,
}

impl GroundingSource {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            &self.uri
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchAnswer {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

/// Image bytes with their MIME type, as exchanged with the image models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn from_base64(mime_type: &str, encoded: &str) -> Option<Self> {
        let data = STANDARD.decode(encoded.trim()).ok()?;
        if data.is_empty() {
            return None;
        }
        let mime_type = if mime_type.trim().is_empty() {
            "image/jpeg"
        } else {
            mime_type.trim()
        };
        Some(Self {
            mime_type: mime_type.to_string(),
            data,
        })
    }

    /// Parses `data:<mime>;base64,<payload>`.
    pub fn parse_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        Self::from_base64(mime_type, payload)
    }

    pub fn base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_keeps_mime_type_and_bytes() {
        let image = InlineImage::parse_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
        assert_eq!(image.to_data_url(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn malformed_data_urls_are_rejected() {
        assert!(InlineImage::parse_data_url("https://example.com/a.png").is_none());
        assert!(InlineImage::parse_data_url("data:image/png,plain").is_none());
        assert!(InlineImage::parse_data_url("data:image/png;base64,!!!").is_none());
        assert!(InlineImage::parse_data_url("data:image/png;base64,").is_none());
    }

    #[test]
    fn source_title_falls_back_to_uri() {
        let source = GroundingSource {
            uri: "https://example.com/film".into(),
            title: " ".into(),
        };
        assert_eq!(source.display_title(), "https://example.com/film");
    }

    #[test]
    fn greeting_comes_from_the_assistant() {
        let greeting = ChatMessage::greeting();
        assert_eq!(greeting.role, ChatRole::Model);
        assert_eq!(greeting.text, CHAT_GREETING);
        assert_ne!(greeting.id, ChatMessage::greeting().id);
    }
}
