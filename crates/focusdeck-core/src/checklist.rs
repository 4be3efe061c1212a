//! Persisted checklist.
//!
//! Items are kept in insertion order and written to a [`KvStore`] as a JSON
//! array of `{text, completed}` after every change. When no store is given,
//! or the store fails its write probe at open, the checklist keeps working in
//! memory only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::KvStore;

const PROBE_KEY: &str = "__storage_test__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Identity within this session; not persisted.
    #[serde(skip, default = "Uuid::new_v4")]
    id: Uuid,
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

pub struct ChecklistStore<S: KvStore> {
    store: Option<S>,
    key: String,
    items: Vec<ChecklistItem>,
}

impl<S: KvStore> ChecklistStore<S> {
    /// Open the checklist stored under `key`, loading existing items.
    pub fn open(store: Option<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let store = store.filter(|s| match probe(s) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("checklist storage unavailable, keeping items in memory: {e}");
                false
            }
        });

        let mut checklist = Self {
            store,
            key,
            items: Vec::new(),
        };
        checklist.load();
        checklist
    }

    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::open(None, key)
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_some()
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ChecklistItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Id of the item at display position `index` (zero-based).
    pub fn id_at(&self, index: usize) -> Option<Uuid> {
        self.items.get(index).map(|item| item.id)
    }

    /// Append a new unchecked item. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let item = ChecklistItem {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
        };
        let id = item.id;
        self.items.push(item);
        self.save();
        Some(id)
    }

    /// Flip the item's flag and return the new value.
    pub fn toggle(&mut self, id: Uuid) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.completed = !item.completed;
        let completed = item.completed;
        self.save();
        Some(completed)
    }

    /// Returns false when no item has this id.
    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.completed = completed;
        self.save();
        true
    }

    pub fn remove(&mut self, id: Uuid) -> Option<ChecklistItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        self.save();
        Some(removed)
    }

    fn load(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        match store.get(&self.key) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<ChecklistItem>>(&json) {
                Ok(items) => {
                    self.items = items
                        .into_iter()
                        .filter_map(|mut item: ChecklistItem| {
                            let text = item.text.trim();
                            if text.is_empty() {
                                return None;
                            }
                            item.text = text.to_string();
                            Some(item)
                        })
                        .collect();
                }
                Err(e) => tracing::warn!("ignoring malformed checklist '{}': {e}", self.key),
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("failed to read checklist '{}', keeping items in memory: {e}", self.key);
                self.store = None;
            }
        }
    }

    fn save(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let result = serde_json::to_string(&self.items)
            .map_err(|e| e.to_string())
            .and_then(|json| store.set(&self.key, &json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!("failed to save checklist '{}': {e}", self.key);
        }
    }
}

fn probe<S: KvStore>(store: &S) -> Result<(), crate::error::StorageError> {
    store.set(PROBE_KEY, PROBE_KEY)?;
    store.remove(PROBE_KEY)
}
