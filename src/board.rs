use crate::types::Snapshot;

/// Owns the single current snapshot. The cycle orchestrator holds the store
/// (writer side); every read surface holds a [`BoardViewer`]. Replacement
/// swaps the whole value under the write lock, so a reader sees either the
/// complete old snapshot or the complete new one.
pub struct BoardStore {
    inner: std::sync::Arc<std::sync::RwLock<Snapshot>>,
}

impl BoardStore {
    #[must_use]
    pub fn new() -> Self {
        BoardStore {
            inner: std::sync::Arc::new(std::sync::RwLock::new(Snapshot::default())),
        }
    }

    #[must_use]
    pub fn viewer(&self) -> BoardViewer {
        BoardViewer {
            inner: self.inner.clone(),
        }
    }

    pub fn replace(&self, snapshot: Snapshot) {
        if let Ok(mut current) = self.inner.write() {
            *current = snapshot;
        }
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        BoardStore::new()
    }
}

/// Cloneable read-only handle onto the current snapshot.
#[derive(Clone)]
pub struct BoardViewer {
    inner: std::sync::Arc<std::sync::RwLock<Snapshot>>,
}

impl BoardViewer {
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.read().expect("Read lock poisoned").clone()
    }
}
