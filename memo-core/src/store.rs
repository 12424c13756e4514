//! Authoritative in-memory memo index.
//!
//! One owned table keyed by record id, plus two key-only index views (by
//! file path and by set title) and a global insertion-order list. Every
//! mutation updates all of them in the same call, so the two views can
//! never disagree. The store performs no I/O; a session owns exactly one
//! and mutates it from serialized event handlers.

use std::collections::HashMap;

use tracing::warn;

use crate::types::MemoEntry;
use crate::types::MemoRecord;

#[derive(Default)]
pub struct MemoStore {
    entries: HashMap<String, MemoEntry>,
    by_file: HashMap<String, Vec<String>>,
    by_set: HashMap<String, Vec<String>>,
    order: Vec<String>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a fresh store by replaying `add` over loaded sets. Iteration
    /// is set-by-set in the given order, so the per-set record order on
    /// disk survives a session restart.
    pub fn from_sets(sets: Vec<(String, Vec<MemoRecord>)>) -> Self {
        let mut store = Self::new();
        for (set_title, records) in sets {
            for record in records {
                store.add(&set_title, record);
            }
        }
        store
    }

    /// Inserts `record` under `set_title`, appending to the file bucket,
    /// the set projection and the global order. Ids are expected to be
    /// unique already; a colliding id evicts the previous owner so the
    /// views stay consistent.
    pub fn add(&mut self, set_title: &str, record: MemoRecord) {
        let id = record.id.clone();
        if self.entries.contains_key(&id) {
            warn!("duplicate memo id {id}, replacing previous record");
            self.unlink(&id);
        }
        self.by_file
            .entry(record.file_path.clone())
            .or_default()
            .push(id.clone());
        self.by_set
            .entry(set_title.to_string())
            .or_default()
            .push(id.clone());
        self.order.push(id.clone());
        self.entries.insert(
            id,
            MemoEntry {
                set_title: set_title.to_string(),
                record,
            },
        );
    }

    /// Replaces the content of the record with matching id in place,
    /// preserving set membership and every ordering position. The updated
    /// record must carry the same id and the same `file_path` as the
    /// stored one; re-anchoring to another file is not supported. Returns
    /// the entry as now stored, or `None` when absent or mismatched.
    pub fn update(&mut self, id: &str, updated: MemoRecord) -> Option<MemoEntry> {
        if updated.id != id {
            return None;
        }
        let entry = self.entries.get_mut(id)?;
        if entry.record.file_path != updated.file_path {
            return None;
        }
        entry.record = updated;
        Some(entry.clone())
    }

    /// Removes the record with matching id from the `file_path` bucket and
    /// from its set projection. Returns the removed entry (callers need
    /// its set title to rewrite the right set), or `None` when absent.
    pub fn delete(&mut self, id: &str, file_path: &str) -> Option<MemoEntry> {
        match self.entries.get(id) {
            Some(entry) if entry.record.file_path == file_path => self.unlink(id),
            _ => None,
        }
    }

    /// Every record across all sets, in global insertion order.
    pub fn get_all(&self) -> Vec<MemoEntry> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id))
            .cloned()
            .collect()
    }

    /// All records annotating `file_path`, across sets, in insertion order.
    pub fn get_by_file_path(&self, file_path: &str) -> Vec<MemoEntry> {
        self.ids_to_entries(self.by_file.get(file_path))
    }

    /// All records in the set, across files, in insertion order. This is
    /// exactly the list the persistence gateway writes for the set.
    pub fn get_by_set_title(&self, set_title: &str) -> Vec<MemoRecord> {
        self.ids_to_entries(self.by_set.get(set_title))
            .into_iter()
            .map(|entry| entry.record)
            .collect()
    }

    /// Zero-or-one lookup used to validate lens arguments before
    /// update/delete.
    pub fn get_by_file_path_and_id(&self, file_path: &str, id: &str) -> Option<MemoEntry> {
        self.entries
            .get(id)
            .filter(|entry| entry.record.file_path == file_path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn ids_to_entries(&self, ids: Option<&Vec<String>>) -> Vec<MemoEntry> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.entries.get(id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    fn unlink(&mut self, id: &str) -> Option<MemoEntry> {
        let entry = self.entries.remove(id)?;
        if let Some(ids) = self.by_file.get_mut(&entry.record.file_path) {
            ids.retain(|other| other != id);
            if ids.is_empty() {
                self.by_file.remove(&entry.record.file_path);
            }
        }
        if let Some(ids) = self.by_set.get_mut(&entry.set_title) {
            ids.retain(|other| other != id);
            if ids.is_empty() {
                self.by_set.remove(&entry.set_title);
            }
        }
        self.order.retain(|other| other != id);
        Some(entry)
    }
}
