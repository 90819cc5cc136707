use log::debug;

use crate::{Error, KeyValueStore, NoteStore};

/// Whether the next submit creates a tweet or updates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(i64),
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Created(i64),
    Updated(i64),
}

/// The form-facing side of the app: a [`NoteStore`] plus the edit-mode state
/// machine that decides what a submit means.
pub struct Editor<S: KeyValueStore> {
    store: NoteStore<S>,
    mode: EditMode,
}

impl<S: KeyValueStore> Editor<S> {
    pub fn new(store: NoteStore<S>) -> Self {
        Self {
            store,
            mode: EditMode::Idle,
        }
    }

    pub fn store(&self) -> &NoteStore<S> {
        &self.store
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    /// Label for the submit control in the current mode.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            EditMode::Idle => "Add",
            EditMode::Editing(_) => "Update",
        }
    }

    /// Enter edit mode for `id`, returning the text to pre-fill the input
    /// with. Unknown ids leave the mode untouched.
    pub fn begin_edit(&mut self, id: i64) -> Option<&str> {
        let note = self.store.get(id)?;
        debug!("editing tweet {}", id);
        self.mode = EditMode::Editing(id);
        Some(&note.text)
    }

    /// Leave edit mode without changing anything.
    pub fn cancel_edit(&mut self) {
        if let EditMode::Editing(id) = self.mode {
            debug!("edit of tweet {} cancelled", id);
        }
        self.mode = EditMode::Idle;
    }

    /// Handle a form submit: update the tweet being edited, or create a new
    /// one. A rejected submit keeps the current mode.
    pub fn submit(&mut self, text: &str) -> Result<Submitted, Error> {
        match self.mode {
            EditMode::Idle => {
                let id = self.store.create(text)?;
                Ok(Submitted::Created(id))
            }
            EditMode::Editing(id) => {
                let found = self.store.update(id, text)?;
                self.mode = EditMode::Idle;
                if found {
                    Ok(Submitted::Updated(id))
                } else {
                    Err(Error::NotFound(format!("tweet {}", id)))
                }
            }
        }
    }

    /// Delete a tweet. Deleting the tweet being edited ends edit mode.
    pub fn delete(&mut self, id: i64) -> Result<bool, Error> {
        let deleted = self.store.delete(id)?;
        if self.mode == EditMode::Editing(id) {
            self.mode = EditMode::Idle;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KeyValueStore, MemoryStore, Note, STORAGE_KEY};

    fn editor_with(notes: &[Note]) -> Editor<MemoryStore> {
        let raw = serde_json::to_string(notes).unwrap();
        let store = NoteStore::load(MemoryStore::with_entry(STORAGE_KEY, &raw)).unwrap();
        Editor::new(store)
    }

    #[test]
    fn test_starts_idle() {
        let editor = editor_with(&[]);
        assert_eq!(editor.mode(), EditMode::Idle);
        assert_eq!(editor.submit_label(), "Add");
    }

    #[test]
    fn test_submit_in_idle_creates() {
        let mut editor = editor_with(&[]);
        let submitted = editor.submit("hello").unwrap();

        let Submitted::Created(id) = submitted else {
            panic!("expected a created tweet, got {:?}", submitted);
        };
        assert_eq!(editor.store().get(id).unwrap().text, "hello");
        assert_eq!(editor.mode(), EditMode::Idle);
    }

    #[test]
    fn test_edit_round_trip() {
        let mut editor = editor_with(&[Note::new(5, "foo")]);

        assert_eq!(editor.begin_edit(5), Some("foo"));
        assert_eq!(editor.mode(), EditMode::Editing(5));
        assert_eq!(editor.submit_label(), "Update");

        assert_eq!(editor.submit("bar").unwrap(), Submitted::Updated(5));
        assert_eq!(editor.store().notes(), &[Note::new(5, "bar")]);
        assert_eq!(editor.mode(), EditMode::Idle);
        assert_eq!(editor.submit_label(), "Add");
    }

    #[test]
    fn test_begin_edit_unknown_id() {
        let mut editor = editor_with(&[Note::new(1, "a")]);
        assert_eq!(editor.begin_edit(2), None);
        assert_eq!(editor.mode(), EditMode::Idle);
    }

    #[test]
    fn test_empty_submit_keeps_editing() {
        let mut editor = editor_with(&[Note::new(5, "foo")]);
        editor.begin_edit(5);

        assert!(matches!(editor.submit("  "), Err(Error::Validation(_))));
        assert_eq!(editor.mode(), EditMode::Editing(5));
        assert_eq!(editor.store().get(5).unwrap().text, "foo");
    }

    #[test]
    fn test_cancel_edit() {
        let mut editor = editor_with(&[Note::new(5, "foo")]);
        editor.begin_edit(5);
        editor.cancel_edit();

        assert_eq!(editor.mode(), EditMode::Idle);
        let submitted = editor.submit("new").unwrap();
        assert!(matches!(submitted, Submitted::Created(_)));
        assert_eq!(editor.store().len(), 2);
        assert_eq!(editor.store().get(5).unwrap().text, "foo");
    }

    #[test]
    fn test_submit_after_edited_tweet_vanished() {
        let mut editor = editor_with(&[Note::new(5, "foo"), Note::new(6, "bar")]);
        editor.begin_edit(5);
        // Bypass the editor so edit mode survives the removal.
        assert!(editor.store.delete(5).unwrap());

        assert!(matches!(editor.submit("baz"), Err(Error::NotFound(_))));
        assert_eq!(editor.mode(), EditMode::Idle);
        assert_eq!(editor.store().notes(), &[Note::new(6, "bar")]);

        let raw = editor.store().storage().get(STORAGE_KEY).unwrap().unwrap();
        assert!(!raw.contains("baz"));
    }

    #[test]
    fn test_deleting_edited_tweet_ends_edit_mode() {
        let mut editor = editor_with(&[Note::new(1, "a"), Note::new(2, "b")]);
        editor.begin_edit(2);

        assert!(editor.delete(1).unwrap());
        assert_eq!(editor.mode(), EditMode::Editing(2));

        assert!(editor.delete(2).unwrap());
        assert_eq!(editor.mode(), EditMode::Idle);
        assert!(editor.store().is_empty());
    }
}
