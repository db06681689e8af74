//! The signed-in viewer's display profile.

use crate::storage::{KeyValueStore, StoreError};
use serde::{Deserialize, Serialize};

pub const PROFILE_KEY: &str = "seikoYTUserProfile";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    /// Avatar as a `data:` URL.
    pub profile_picture_url: String,
}

impl UserProfile {
    /// Form validation for the setup page and the profile modal.
    pub fn validated(username: &str, profile_picture_url: &str) -> Result<Self, String> {
        let username = username.trim();
        if username.is_empty() {
            return Err("Username cannot be empty.".to_string());
        }
        Ok(Self {
            username: username.to_string(),
            profile_picture_url: profile_picture_url.to_string(),
        })
    }

    pub fn initial(&self) -> char {
        self.username
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

pub struct ProfileStore<S> {
    store: S,
}

impl<S: KeyValueStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reads the saved profile. Unreadable data is discarded and reported as
    /// absent so the viewer is sent back through profile setup.
    pub fn load(&self) -> Option<UserProfile> {
        let raw = match self.store.get(PROFILE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!("could not read stored profile: {err}");
                return None;
            }
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                tracing::warn!("discarding malformed stored profile: {err}");
                if let Err(err) = self.store.remove(PROFILE_KEY) {
                    tracing::warn!("could not remove malformed profile: {err}");
                }
                None
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile)?;
        self.store.set(PROFILE_KEY, &raw)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(PROFILE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn profile() -> UserProfile {
        UserProfile {
            username: "Mika".into(),
            profile_picture_url: "data:image/jpeg;base64,AAAA".into(),
        }
    }

    #[test]
    fn saved_profile_loads_back() {
        let profiles = ProfileStore::new(MemoryStore::new());
        assert_eq!(profiles.load(), None);
        profiles.save(&profile()).unwrap();
        assert_eq!(profiles.load(), Some(profile()));
    }

    #[test]
    fn stored_json_uses_camel_case_fields() {
        let store = MemoryStore::new();
        ProfileStore::new(&store).save(&profile()).unwrap();
        let raw = store.get(PROFILE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"profilePictureUrl\""));
    }

    #[test]
    fn malformed_profile_is_treated_as_absent_and_removed() {
        let store = MemoryStore::new();
        store.set(PROFILE_KEY, "{not json").unwrap();

        let profiles = ProfileStore::new(&store);
        assert_eq!(profiles.load(), None);
        assert_eq!(store.get(PROFILE_KEY).unwrap(), None);
    }

    #[test]
    fn clear_forgets_the_profile() {
        let profiles = ProfileStore::new(MemoryStore::new());
        profiles.save(&profile()).unwrap();
        profiles.clear().unwrap();
        assert_eq!(profiles.load(), None);
    }

    #[test]
    fn validation_trims_and_rejects_blank_names() {
        assert_eq!(
            UserProfile::validated("   ", "").unwrap_err(),
            "Username cannot be empty."
        );
        let profile = UserProfile::validated("  zoe ", "data:x").unwrap();
        assert_eq!(profile.username, "zoe");
        assert_eq!(profile.initial(), 'Z');
    }
}
