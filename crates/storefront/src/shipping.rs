//! Shipping address state, mirrored to the local store.
//!
//! The in-memory value and the persisted copy are kept equal after every
//! mutating call. Persistence failures do not roll back the in-memory
//! value; a corrupt persisted blob loads as empty defaults.

use std::sync::Mutex;

use wagtail_core::ShippingData;

use crate::storage::LocalStore;

/// Fixed key the shipping draft is persisted under.
pub const SHIPPING_DATA_KEY: &str = "shipping_data";

/// Holds the current shipping draft and syncs it to a [`LocalStore`].
#[derive(Debug)]
pub struct ShippingManager {
    store: LocalStore,
    data: Mutex<ShippingData>,
}

impl ShippingManager {
    /// Create a manager, loading any persisted draft from the store.
    ///
    /// An unparsable persisted blob is logged and replaced with defaults.
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        let data = store
            .load(SHIPPING_DATA_KEY)
            .and_then(|raw| match serde_json::from_str::<ShippingData>(&raw) {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::warn!("Discarding corrupt shipping draft: {e}");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            store,
            data: Mutex::new(data),
        }
    }

    /// Current in-memory shipping draft.
    #[must_use]
    pub fn get(&self) -> ShippingData {
        self.lock().clone()
    }

    /// Replace the draft and persist it synchronously.
    pub fn set(&self, data: ShippingData) {
        let mut guard = self.lock();
        *guard = data;
        self.persist(&guard);
    }

    /// Patch only the postal code, keeping the rest of the draft.
    pub fn update_postal_code(&self, code: impl Into<String>) {
        let mut guard = self.lock();
        guard.postal_code = code.into();
        self.persist(&guard);
    }

    /// Reset the draft to empty defaults and remove the persisted entry.
    pub fn clear(&self) {
        let mut guard = self.lock();
        *guard = ShippingData::default();
        self.store.remove(SHIPPING_DATA_KEY);
    }

    fn persist(&self, data: &ShippingData) {
        match serde_json::to_string(data) {
            Ok(raw) => self.store.save(SHIPPING_DATA_KEY, &raw),
            Err(e) => tracing::warn!("Failed to serialize shipping draft: {e}"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ShippingData> {
        // A poisoned lock still holds a usable draft; last-write-wins.
        self.data
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> LocalStore {
        LocalStore::new(Some(dir.path().to_path_buf()))
    }

    fn sample() -> ShippingData {
        ShippingData {
            postal_code: "1084".to_owned(),
            address: "1 Paw Lane".to_owned(),
            city: "Buenos Aires".to_owned(),
            province: "CABA".to_owned(),
            additional_info: "ring twice".to_owned(),
        }
    }

    #[test]
    fn set_then_get_returns_equal_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ShippingManager::new(store_in(&dir));

        manager.set(sample());
        assert_eq!(manager.get(), sample());
    }

    #[test]
    fn draft_survives_reload() {
        let dir = tempfile::tempdir().expect("tempdir");

        let manager = ShippingManager::new(store_in(&dir));
        manager.set(sample());
        drop(manager);

        // A fresh manager over the same directory simulates a reload.
        let reloaded = ShippingManager::new(store_in(&dir));
        assert_eq!(reloaded.get(), sample());
    }

    #[test]
    fn update_postal_code_keeps_other_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ShippingManager::new(store_in(&dir));

        manager.set(sample());
        manager.update_postal_code("9000");

        let data = manager.get();
        assert_eq!(data.postal_code, "9000");
        assert_eq!(data.address, "1 Paw Lane");
        assert_eq!(data.city, "Buenos Aires");
    }

    #[test]
    fn clear_resets_to_defaults_and_removes_entry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let manager = ShippingManager::new(store.clone());

        manager.set(sample());
        manager.clear();

        assert_eq!(manager.get(), ShippingData::default());
        assert_eq!(store.load(SHIPPING_DATA_KEY), None);

        // Clearing an already-empty draft is fine too.
        manager.clear();
        assert_eq!(manager.get(), ShippingData::default());
    }

    #[test]
    fn corrupt_persisted_draft_loads_as_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(SHIPPING_DATA_KEY, "{not valid");

        let manager = ShippingManager::new(store);
        assert_eq!(manager.get(), ShippingData::default());
    }

    #[test]
    fn disabled_store_still_serves_memory() {
        let manager = ShippingManager::new(LocalStore::disabled());

        manager.set(sample());
        assert_eq!(manager.get(), sample());

        manager.update_postal_code("4000");
        assert_eq!(manager.get().postal_code, "4000");
    }
}
