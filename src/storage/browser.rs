use super::{KeyValueStore, StoreError};
use gloo_storage::{LocalStorage, Storage};

fn js_message(err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// `window.localStorage`, values kept verbatim.
#[derive(Debug, Clone, Copy)]
pub struct BrowserStore;

impl BrowserStore {
    pub fn open() -> Result<Self, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Backend("no window".into()))?
            .local_storage()
            .map_err(js_message)?
            .ok_or_else(|| StoreError::Backend("local storage disabled".into()))?;
        Ok(Self)
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        LocalStorage::raw().get_item(key).map_err(js_message)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw().set_item(key, value).map_err(js_message)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        LocalStorage::raw().remove_item(key).map_err(js_message)
    }
}
