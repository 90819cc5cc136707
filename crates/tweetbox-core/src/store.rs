use log::{debug, warn};

use crate::note::normalize_text;
use crate::{Error, IdGenerator, KeyValueStore, Note};

/// Storage key the whole collection lives under.
pub const STORAGE_KEY: &str = "tweets";

/// The in-memory tweet collection, kept in sync with a [`KeyValueStore`].
///
/// Notes keep insertion order. Every successful mutation rewrites the full
/// collection under [`STORAGE_KEY`]; if that write fails the mutation is undone
/// so memory never runs ahead of storage.
pub struct NoteStore<S: KeyValueStore> {
    storage: S,
    notes: Vec<Note>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Load the persisted collection, or start empty if nothing is stored.
    pub fn load(storage: S) -> Result<Self, Error> {
        let notes = match storage.get(STORAGE_KEY)? {
            Some(raw) => parse_notes(&raw)?,
            None => Vec::new(),
        };
        debug!("loaded {} tweets", notes.len());
        Ok(Self::with_notes(storage, notes))
    }

    /// Start empty without reading storage. Nothing is written until the
    /// first mutation.
    pub fn empty(storage: S) -> Self {
        Self::with_notes(storage, Vec::new())
    }

    fn with_notes(storage: S, notes: Vec<Note>) -> Self {
        let ids = IdGenerator::seeded(notes.iter().map(|n| n.id));
        Self {
            storage,
            notes,
            ids,
        }
    }

    /// All notes in display order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a new note and return its id.
    pub fn create(&mut self, text: &str) -> Result<i64, Error> {
        let text = validate(text)?;
        let id = self.ids.next_id()?;
        self.notes.push(Note { id, text });

        if let Err(e) = self.persist() {
            self.notes.pop();
            return Err(e);
        }
        debug!("created tweet {}", id);
        Ok(id)
    }

    /// Replace the text of note `id`. Returns false (and writes nothing) if
    /// there is no such note.
    pub fn update(&mut self, id: i64, text: &str) -> Result<bool, Error> {
        let text = validate(text)?;
        let Some(index) = self.position(id) else {
            debug!("update of unknown tweet {} ignored", id);
            return Ok(false);
        };

        let previous = std::mem::replace(&mut self.notes[index].text, text);
        if let Err(e) = self.persist() {
            self.notes[index].text = previous;
            return Err(e);
        }
        debug!("updated tweet {}", id);
        Ok(true)
    }

    /// Remove note `id`. Returns false (and writes nothing) if there is no
    /// such note.
    pub fn delete(&mut self, id: i64) -> Result<bool, Error> {
        let Some(index) = self.position(id) else {
            debug!("delete of unknown tweet {} ignored", id);
            return Ok(false);
        };

        let removed = self.notes.remove(index);
        if let Err(e) = self.persist() {
            self.notes.insert(index, removed);
            return Err(e);
        }
        debug!("deleted tweet {}", id);
        Ok(true)
    }

    /// Write the full collection to storage, replacing what was there.
    pub fn persist(&self) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.notes)
            .map_err(|e| Error::Internal(format!("failed to serialize tweets: {}", e)))?;
        self.storage.set(STORAGE_KEY, &raw).map_err(|e| {
            warn!("failed to persist {} tweets: {}", self.notes.len(), e);
            e
        })
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.notes.iter().position(|n| n.id == id)
    }
}

fn validate(text: &str) -> Result<String, Error> {
    normalize_text(text).ok_or_else(|| Error::Validation("tweet cannot be empty".into()))
}

fn parse_notes(raw: &str) -> Result<Vec<Note>, Error> {
    // The browser script stored `null` for a cleared list.
    let notes: Option<Vec<Note>> = serde_json::from_str(raw).map_err(|e| Error::Corrupt {
        key: STORAGE_KEY.to_string(),
        reason: e.to_string(),
    })?;
    Ok(notes.unwrap_or_default())
}
