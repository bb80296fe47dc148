//! Image-attachment lifecycle for post creation.
//!
//! The preview handle stands in for a browser-level object reference: a
//! scarce resource that must be released when the attachment is
//! replaced, cleared, or its owner goes away. The registry counts live
//! handles; release is idempotent and guaranteed by `Drop`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

/// Issuer and tracker of live preview handles.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: Mutex<HashSet<Uuid>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new live handle.
    pub fn issue(self: &Arc<Self>) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.lock().insert(id);
        PreviewHandle {
            id,
            registry: Arc::clone(self),
        }
    }

    /// Number of handles currently live.
    pub fn live_count(&self) -> usize {
        self.lock().len()
    }

    /// Releases a handle; returns false when it was already released.
    fn release(&self, id: &Uuid) -> bool {
        self.lock().remove(id)
    }

    fn is_live(&self, id: &Uuid) -> bool {
        self.lock().contains(id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<Uuid>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live reference to a previewable resource.
///
/// Released exactly once: on drop, via the registry, idempotently.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    /// Opaque URI the UI can hand to an image surface.
    pub fn uri(&self) -> String {
        format!("preview://{}", self.id)
    }

    pub fn is_live(&self) -> bool {
        self.registry.is_live(&self.id)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.id);
    }
}

/// The transient image attachment held while composing a post.
#[derive(Debug)]
pub struct ImageAttachment {
    file: PathBuf,
    preview: PreviewHandle,
}

impl ImageAttachment {
    pub fn new(file: impl Into<PathBuf>, registry: &Arc<PreviewRegistry>) -> Self {
        Self {
            file: file.into(),
            preview: registry.issue(),
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_drop_releases() {
        let registry = Arc::new(PreviewRegistry::new());
        let handle = registry.issue();
        assert_eq!(registry.live_count(), 1);
        assert!(handle.is_live());

        drop(handle);
        assert_eq!(registry.live_count(), 0);
    }

    /// Test: replacing an attachment leaves exactly one live handle.
    #[test]
    fn test_replace_attachment_releases_previous() {
        let registry = Arc::new(PreviewRegistry::new());
        let mut slot = Some(ImageAttachment::new("a.png", &registry));
        assert_eq!(registry.live_count(), 1);

        // Release the previous handle before creating the new one.
        slot.take();
        assert_eq!(registry.live_count(), 0);
        slot = Some(ImageAttachment::new("b.png", &registry));
        assert_eq!(registry.live_count(), 1);

        slot.take();
        assert_eq!(registry.live_count(), 0);
    }

    /// Test: release is idempotent at the registry.
    #[test]
    fn test_release_idempotent() {
        let registry = Arc::new(PreviewRegistry::new());
        let handle = registry.issue();
        let id = handle.id;

        assert!(registry.release(&id));
        assert!(!registry.release(&id));

        // The handle's own drop is now a no-op.
        drop(handle);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_handles_are_independent() {
        let registry = Arc::new(PreviewRegistry::new());
        let first = registry.issue();
        let second = registry.issue();
        assert_eq!(registry.live_count(), 2);

        drop(first);
        assert_eq!(registry.live_count(), 1);
        assert!(second.is_live());
    }
}
