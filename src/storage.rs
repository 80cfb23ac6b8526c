//! localStorage-backed identity marker.

use taskboard_client::models::Identity;
use taskboard_client::storage::{decode_identity, encode_identity, IdentityStorage, StorageError, IDENTITY_KEY};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

impl IdentityStorage for BrowserStorage {
    fn load(&self) -> Option<Identity> {
        let raw = Self::local().ok()?.get_item(IDENTITY_KEY).ok()??;
        decode_identity(&raw)
    }

    fn save(&self, identity: &Identity) -> Result<(), StorageError> {
        let raw = encode_identity(identity)?;
        Self::local()?
            .set_item(IDENTITY_KEY, &raw)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn clear(&self) {
        match Self::local() {
            Ok(storage) => {
                if storage.remove_item(IDENTITY_KEY).is_err() {
                    tracing::warn!("failed to remove identity marker");
                }
            }
            Err(err) => tracing::warn!(error = %err, "identity marker not cleared"),
        }
    }
}
