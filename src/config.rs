//! Settings for the generative-AI backend.
//!
//! Defaults are baked in at build time; the AI settings panel can override
//! them and the result is persisted through the key-value store.

use crate::storage::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};

pub const AI_SETTINGS_KEY: &str = "seikoyt.ai_settings";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-4.0-generate-001";

const MIN_TIMEOUT_SECS: u32 = 1;
const MAX_TIMEOUT_SECS: u32 = 120;

fn default_api_key() -> String {
    option_env!("SEIKOYT_GEMINI_API_KEY")
        .unwrap_or_default()
        .to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_image_edit_model() -> String {
    DEFAULT_IMAGE_EDIT_MODEL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_request_timeout_secs() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_image_edit_model")]
    pub image_edit_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    /// Model used for grounded search.
    #[serde(default = "default_chat_model")]
    pub search_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_base: default_api_base(),
            chat_model: default_chat_model(),
            image_edit_model: default_image_edit_model(),
            image_model: default_image_model(),
            search_model: default_chat_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AiSettings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Trims text fields, restores blank models to their defaults and clamps
    /// the timeout.
    pub fn normalized(mut self) -> Self {
        fn or_default(value: String, fallback: fn() -> String) -> String {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                fallback()
            } else {
                trimmed.to_string()
            }
        }

        self.api_key = self.api_key.trim().to_string();
        self.api_base = or_default(self.api_base, default_api_base)
            .trim_end_matches('/')
            .to_string();
        self.chat_model = or_default(self.chat_model, default_chat_model);
        self.image_edit_model = or_default(self.image_edit_model, default_image_edit_model);
        self.image_model = or_default(self.image_model, default_image_model);
        self.search_model = or_default(self.search_model, default_chat_model);
        self.request_timeout_secs = self
            .request_timeout_secs
            .clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        self
    }

    pub fn load(store: &impl KeyValueStore) -> Self {
        let raw = match store.get(AI_SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                tracing::warn!("could not read AI settings: {err}");
                return Self::default();
            }
        };
        match serde_json::from_str::<Self>(&raw) {
            Ok(settings) => settings.normalized(),
            Err(err) => {
                tracing::warn!("ignoring malformed AI settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.clone().normalized())?;
        store.set(AI_SETTINGS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_settings_use_defaults() {
        let store = MemoryStore::new();
        let settings = AiSettings::load(&store);
        assert_eq!(settings.chat_model, "gemini-2.5-flash");
        assert_eq!(settings.image_model, "imagen-4.0-generate-001");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let store = MemoryStore::new();
        store.set(AI_SETTINGS_KEY, "[1, 2").unwrap();
        assert_eq!(AiSettings::load(&store), AiSettings::default());
    }

    #[test]
    fn partial_settings_fill_in_missing_fields() {
        let store = MemoryStore::new();
        store
            .set(AI_SETTINGS_KEY, r#"{"api_key":"abc","request_timeout_secs":900}"#)
            .unwrap();
        let settings = AiSettings::load(&store);
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.request_timeout_secs, 120);
        assert_eq!(settings.image_edit_model, "gemini-2.5-flash-image");
    }

    #[test]
    fn saved_settings_are_normalized() {
        let store = MemoryStore::new();
        let settings = AiSettings {
            api_key: "  key ".into(),
            api_base: "https://proxy.local/".into(),
            chat_model: " ".into(),
            request_timeout_secs: 0,
            ..AiSettings::default()
        };
        settings.save(&store).unwrap();

        let loaded = AiSettings::load(&store);
        assert!(loaded.has_api_key());
        assert_eq!(loaded.api_key, "key");
        assert_eq!(loaded.api_base, "https://proxy.local");
        assert_eq!(loaded.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(loaded.request_timeout_secs, 1);
    }
}
