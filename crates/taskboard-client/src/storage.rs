//! Persistence of the identity marker across reloads.

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::Identity;

/// Storage key, shared with anything else reading the marker.
pub const IDENTITY_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("failed to encode identity: {0}")]
    Encode(String),
}

pub trait IdentityStorage {
    /// Stored identity, or `None` when absent or unreadable.
    fn load(&self) -> Option<Identity>;
    fn save(&self, identity: &Identity) -> Result<(), StorageError>;
    fn clear(&self);
}

/// Decode a stored marker; malformed values count as absent.
pub fn decode_identity(raw: &str) -> Option<Identity> {
    match serde_json::from_str::<Identity>(raw) {
        Ok(identity) if !identity.email.is_empty() => Some(identity),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed identity marker");
            None
        }
    }
}

pub fn encode_identity(identity: &Identity) -> Result<String, StorageError> {
    serde_json::to_string(identity).map_err(|e| StorageError::Encode(e.to_string()))
}

/// In-memory storage holding the encoded marker, like a browser would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl IdentityStorage for MemoryStorage {
    fn load(&self) -> Option<Identity> {
        self.slot.borrow().as_deref().and_then(decode_identity)
    }

    fn save(&self, identity: &Identity) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(encode_identity(identity)?);
        Ok(())
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}
