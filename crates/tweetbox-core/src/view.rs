//! List-view model and click routing shared by the frontends.

use crate::Note;

/// Class marking the delete control of a list entry.
pub const DELETE_MARKER: &str = "delete-tweet";
/// Class marking the edit control of a list entry.
pub const EDIT_MARKER: &str = "edit-tweet";
/// Attribute on the list entry that carries the tweet id.
pub const ID_ATTRIBUTE: &str = "data-tweet-id";

/// One rendered row of the tweet list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry<'a> {
    pub id: i64,
    pub text: &'a str,
}

impl<'a> ListEntry<'a> {
    /// Rows for the whole collection, in display order.
    pub fn all(notes: &'a [Note]) -> Vec<ListEntry<'a>> {
        notes
            .iter()
            .map(|n| ListEntry {
                id: n.id,
                text: &n.text,
            })
            .collect()
    }

    /// Value of [`ID_ATTRIBUTE`] for this row.
    pub fn id_attribute(&self) -> String {
        self.id.to_string()
    }
}

/// What a click on the list asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete(i64),
    Edit(i64),
}

impl Action {
    /// Route a click given the target's classes and the id attribute of the
    /// entry it belongs to. Clicks on anything but a marked control, or on an
    /// entry with an unreadable id, yield `None`.
    pub fn from_target<'c, I>(classes: I, id_attribute: Option<&str>) -> Option<Action>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let mut delete = false;
        let mut edit = false;
        for class in classes {
            match class {
                DELETE_MARKER => delete = true,
                EDIT_MARKER => edit = true,
                _ => {}
            }
        }
        if !delete && !edit {
            return None;
        }

        let id = id_attribute?.trim().parse::<i64>().ok()?;
        // Delete wins if a control somehow carries both markers.
        if delete {
            Some(Action::Delete(id))
        } else {
            Some(Action::Edit(id))
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Action::Delete(id) | Action::Edit(id) => id,
        }
    }
}
