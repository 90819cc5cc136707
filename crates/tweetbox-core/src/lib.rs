//! tweetbox core library - shared types, storage contract and business logic.
//!
//! This crate contains no I/O and can be compiled for any target.

mod editor;
mod error;
mod ids;
mod note;
mod notice;
mod storage;
mod store;
mod view;

pub use editor::{EditMode, Editor, Submitted};
pub use error::Error;
pub use ids::IdGenerator;
pub use note::Note;
pub use notice::{Notice, NoticeKind, NOTICE_TIMEOUT_MS};
pub use storage::{KeyValueStore, MemoryStore};
pub use store::{NoteStore, STORAGE_KEY};
pub use view::{Action, ListEntry, DELETE_MARKER, EDIT_MARKER, ID_ATTRIBUTE};
