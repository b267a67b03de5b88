//! Ephemeral access handles for resized blobs.
//!
//! Every artifact gets one [`AccessHandle`], a short `blob:scaler/<id>`
//! locator registered in a [`HandleRegistry`]. Callers resolve the locator to
//! read the bytes without copying them and call [`AccessHandle::release`] once
//! they no longer need it. Nothing is revoked implicitly.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::types::Blob;

/// Scheme prefix of every locator handed out by a registry.
pub const LOCATOR_PREFIX: &str = "blob:scaler/";

/// Registry of live blob locators. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    blobs: RwLock<HashMap<u64, Blob>>,
}

impl HandleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return the handle that owns its locator.
    pub fn register(&self, blob: Blob) -> AccessHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner
            .blobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, blob);
        tracing::trace!("Registered handle {}{:016x}", LOCATOR_PREFIX, id);
        AccessHandle {
            id,
            registry: self.clone(),
        }
    }

    /// Look up the bytes behind a locator. `None` once the handle is released.
    pub fn resolve(&self, locator: &str) -> Option<Blob> {
        let id = parse_locator(locator)?;
        self.inner
            .blobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Number of locators that have not been released.
    pub fn live_count(&self) -> usize {
        self.inner
            .blobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    fn revoke(&self, id: u64) -> bool {
        self.inner
            .blobs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    fn contains(&self, id: u64) -> bool {
        self.inner
            .blobs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&id)
    }
}

impl fmt::Debug for HandleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// A revocable reference to one artifact's bytes.
///
/// Not `Clone`: exactly one owner per locator.
pub struct AccessHandle {
    id: u64,
    registry: HandleRegistry,
}

impl AccessHandle {
    /// The locator string, e.g. `blob:scaler/000000000000002a`.
    pub fn locator(&self) -> String {
        format!("{}{:016x}", LOCATOR_PREFIX, self.id)
    }

    /// Whether the locator still resolves.
    pub fn is_live(&self) -> bool {
        self.registry.contains(self.id)
    }

    /// Revoke the locator. Returns `false` if it was already released.
    ///
    /// The artifact's own copy of the bytes is unaffected.
    pub fn release(&self) -> bool {
        let released = self.registry.revoke(self.id);
        if released {
            tracing::trace!("Released handle {}", self.locator());
        }
        released
    }
}

impl fmt::Debug for AccessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessHandle")
            .field("locator", &self.locator())
            .field("live", &self.is_live())
            .finish()
    }
}

fn parse_locator(locator: &str) -> Option<u64> {
    let hex = locator.strip_prefix(LOCATOR_PREFIX)?;
    u64::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(bytes: &[u8]) -> Blob {
        Arc::from(bytes)
    }

    #[test]
    fn test_register_and_resolve() {
        let registry = HandleRegistry::new();
        let handle = registry.register(blob(b"abc"));

        assert!(handle.locator().starts_with(LOCATOR_PREFIX));
        let resolved = registry.resolve(&handle.locator()).unwrap();
        assert_eq!(&resolved[..], b"abc");
        assert!(handle.is_live());
    }

    #[test]
    fn test_locators_are_unique() {
        let registry = HandleRegistry::new();
        let a = registry.register(blob(b"a"));
        let b = registry.register(blob(b"b"));
        assert_ne!(a.locator(), b.locator());
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_release_revokes_locator_only() {
        let registry = HandleRegistry::new();
        let data = blob(b"payload");
        let handle = registry.register(Arc::clone(&data));

        assert!(handle.release());
        assert!(!handle.is_live());
        assert!(registry.resolve(&handle.locator()).is_none());
        // Second release is a no-op
        assert!(!handle.release());
        // Bytes held elsewhere survive revocation
        assert_eq!(&data[..], b"payload");
    }

    #[test]
    fn test_resolve_rejects_foreign_locators() {
        let registry = HandleRegistry::new();
        let _handle = registry.register(blob(b"x"));
        assert!(registry.resolve("blob:other/0000000000000001").is_none());
        assert!(registry.resolve("blob:scaler/not-hex").is_none());
    }

    #[test]
    fn test_registries_are_isolated() {
        let first = HandleRegistry::new();
        let second = HandleRegistry::new();
        let handle = first.register(blob(b"x"));
        assert!(second.resolve(&handle.locator()).is_none());
    }
}
