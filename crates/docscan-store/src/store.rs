// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document list persisted as a single JSON value under a storage key.
//
// The whole list is loaded once at startup and written back after every
// change. Writes go to a sibling temp file first and are renamed into place,
// so a crash mid-write leaves the previous list intact.

use std::path::{Path, PathBuf};

use docscan_core::error::{DocscanError, Result};
use docscan_core::types::{DocId, ScannedDoc};
use tracing::{debug, info, instrument, warn};

/// Ordered document list, newest first.
///
/// Passed by reference to whatever needs it; there is no global instance.
#[derive(Debug)]
pub struct DocumentStore {
    /// Backing file, or `None` for a purely in-memory store.
    path: Option<PathBuf>,
    docs: Vec<ScannedDoc>,
}

impl DocumentStore {
    /// Open the store for `storage_key` inside `dir`.
    pub fn open_in_dir(dir: impl AsRef<Path>, storage_key: &str) -> Result<Self> {
        Self::open(dir.as_ref().join(format!("{storage_key}.json")))
    }

    /// Open (or lazily create) the store backed by `path`.
    ///
    /// A missing file is an empty list. A file that cannot be parsed is logged
    /// and also treated as empty; it is replaced on the next save.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let docs = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<ScannedDoc>>(&json) {
                Ok(docs) => docs,
                Err(err) => {
                    warn!(error = %err, "failed to parse stored documents; starting empty");
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(DocscanError::Io(err)),
        };
        info!(count = docs.len(), "document store loaded");
        Ok(Self {
            path: Some(path),
            docs,
        })
    }

    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            docs: Vec::new(),
        }
    }

    /// Backing file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the full list to disk.
    #[instrument(skip(self), fields(count = self.docs.len()))]
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.docs)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path).map_err(|err| {
            DocscanError::Storage(format!("failed to replace {}: {}", path.display(), err))
        })?;
        debug!("document store saved");
        Ok(())
    }

    // -- Queries ---------------------------------------------------------------

    /// All documents, newest first.
    pub fn all(&self) -> &[ScannedDoc] {
        &self.docs
    }

    pub fn get(&self, id: &DocId) -> Option<&ScannedDoc> {
        self.docs.iter().find(|doc| doc.id == *id)
    }

    /// Like [`get`](Self::get) but a missing id is an error.
    pub fn require(&self, id: &DocId) -> Result<&ScannedDoc> {
        self.get(id).ok_or(DocscanError::DocumentNotFound(*id))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    // -- Mutations (each saves) ---------------------------------------------------

    /// Add a new document at the front of the list.
    pub fn insert_front(&mut self, doc: ScannedDoc) -> Result<()> {
        debug!(id = %doc.id, "inserting document");
        self.docs.insert(0, doc);
        self.save()
    }

    /// Replace the stored document with the same id.
    pub fn update(&mut self, doc: ScannedDoc) -> Result<()> {
        let slot = self
            .docs
            .iter_mut()
            .find(|existing| existing.id == doc.id)
            .ok_or(DocscanError::DocumentNotFound(doc.id))?;
        *slot = doc;
        self.save()
    }

    /// Remove a document; returns it.
    pub fn delete(&mut self, id: &DocId) -> Result<ScannedDoc> {
        let index = self
            .docs
            .iter()
            .position(|doc| doc.id == *id)
            .ok_or(DocscanError::DocumentNotFound(*id))?;
        let removed = self.docs.remove(index);
        self.save()?;
        info!(id = %id, "document deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::FilterMode;

    fn doc(tag: &str) -> ScannedDoc {
        ScannedDoc::new(format!("data:image/jpeg;base64,{tag}"))
    }

    #[test]
    fn newest_first() {
        let mut store = DocumentStore::in_memory();
        let first = doc("AAAA");
        let second = doc("BBBB");
        store.insert_front(first.clone()).expect("insert");
        store.insert_front(second.clone()).expect("insert");

        let ids: Vec<DocId> = store.all().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn update_replaces_by_id() {
        let mut store = DocumentStore::in_memory();
        let mut d = doc("AAAA");
        store.insert_front(d.clone()).expect("insert");

        d.filter = FilterMode::Bw;
        d.extracted_text = Some("hello".into());
        store.update(d.clone()).expect("update");

        let stored = store.require(&d.id).expect("present");
        assert_eq!(stored.filter, FilterMode::Bw);
        assert_eq!(stored.extracted_text.as_deref(), Some("hello"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_ids_are_reported() {
        let mut store = DocumentStore::in_memory();
        let stray = doc("AAAA");
        assert!(matches!(
            store.update(stray.clone()),
            Err(DocscanError::DocumentNotFound(id)) if id == stray.id
        ));
        assert!(matches!(
            store.delete(&stray.id),
            Err(DocscanError::DocumentNotFound(_))
        ));
        assert!(store.require(&stray.id).is_err());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let d = doc("AAAA");
        {
            let mut store = DocumentStore::open_in_dir(dir.path(), "docs_v1").expect("open");
            assert!(store.is_empty());
            store.insert_front(d.clone()).expect("insert");
            store.insert_front(doc("BBBB")).expect("insert");
        }

        let mut reopened = DocumentStore::open_in_dir(dir.path(), "docs_v1").expect("reopen");
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.all()[1].id, d.id);
        assert_eq!(
            reopened.all()[1].created_at.timestamp_millis(),
            d.created_at.timestamp_millis()
        );

        reopened.delete(&d.id).expect("delete");
        let again = DocumentStore::open_in_dir(dir.path(), "docs_v1").expect("reopen");
        assert_eq!(again.len(), 1);
        assert!(!dir.path().join("docs_v1.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_starts_empty_and_is_overwritten() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "[{ this is not json").expect("write");

        let mut store = DocumentStore::open(&path).expect("open");
        assert!(store.is_empty());

        store.insert_front(doc("AAAA")).expect("insert");
        let reopened = DocumentStore::open(&path).expect("reopen");
        assert_eq!(reopened.len(), 1);
    }
}
