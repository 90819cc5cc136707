//! File-based storage implementation for tweetbox.
//!
//! Each key is one JSON file under the store directory:
//!
//! ```text
//! .tweetbox/
//!   .lock          # Lock file for read-modify-write cycles
//!   tweets.json
//! ```

use fs2::FileExt;
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tweetbox_core::{Error, KeyValueStore, STORAGE_KEY};

const LOCK_FILE: &str = ".lock";

/// File-based key-value store.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store at the given directory, creating it if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root)
            .map_err(|e| Error::Storage(format!("Failed to create store dir: {}", e)))?;

        Ok(Self { root })
    }

    /// Set up a store at `root`.
    ///
    /// A directory that already holds a store is refused unless
    /// `reinitialize` is set, in which case only the stored tweets are
    /// removed. Anything else in the directory is never touched.
    pub fn init<P: AsRef<Path>>(root: P, reinitialize: bool) -> Result<Self, Error> {
        let root = root.as_ref();

        if Self::holds_store(root) {
            if !reinitialize {
                return Err(Error::Storage(format!(
                    "{} is already initialized",
                    root.display()
                )));
            }
            let store = Self::open(root)?;
            store.reset()?;
            return Ok(store);
        }

        let store = Self::open(root)?;
        // The lock file marks the directory as a store.
        drop(store.lock()?);
        info!("initialized store at {}", root.display());
        Ok(store)
    }

    /// Whether `root` contains tweetbox data.
    pub fn holds_store<P: AsRef<Path>>(root: P) -> bool {
        let root = root.as_ref();
        root.join(LOCK_FILE).exists() || root.join(format!("{}.json", STORAGE_KEY)).exists()
    }

    /// Remove the stored tweets, leaving the directory and any other files.
    pub fn reset(&self) -> Result<(), Error> {
        let _lock = self.lock()?;
        let path = self.key_path(STORAGE_KEY)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Acquire an exclusive lock on the store.
    ///
    /// Hold the guard across load, mutate and persist so concurrent processes
    /// cannot drop each other's changes. Each single write is atomic without it.
    pub fn lock(&self) -> Result<FileLock, Error> {
        let lock_path = self.root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| Error::Storage(format!("Failed to open lock file: {}", e)))?;

        file.lock_exclusive()
            .map_err(|e| Error::Storage(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }

    /// Get the path to the file backing a key.
    fn key_path(&self, key: &str) -> Result<PathBuf, Error> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

/// RAII guard for file locking.
pub struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.key_path(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Write the value atomically: uniquely named temp file, fsync, rename.
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.key_path(key)?;

        let mut file = NamedTempFile::new_in(&self.root)
            .map_err(|e| Error::Storage(format!("Failed to create temp file: {}", e)))?;

        file.write_all(value.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write temp file: {}", e)))?;

        file.as_file()
            .sync_all()
            .map_err(|e| Error::Storage(format!("Failed to sync temp file: {}", e)))?;

        // Atomic rename
        file.persist(&path)
            .map_err(|e| Error::Storage(format!("Failed to rename temp file: {}", e)))?;

        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;
    use tweetbox_core::{Note, NoteStore, STORAGE_KEY};

    fn setup() -> (TempDir, FileStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).unwrap();
        (temp_dir, store)
    }

    #[test]
    fn test_get_missing_key() {
        let (_temp, store) = setup();
        assert_eq!(store.get("tweets").unwrap(), None);
    }

    #[test]
    fn test_set_and_get() {
        let (temp, store) = setup();

        store.set("tweets", "[]").unwrap();
        store.set("tweets", r#"[{"id":1,"text":"hi"}]"#).unwrap();

        assert_eq!(
            store.get("tweets").unwrap().as_deref(),
            Some(r#"[{"id":1,"text":"hi"}]"#)
        );
        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["tweets.json"]);
    }

    #[test]
    fn test_concurrent_unlocked_writes_stay_whole() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        let values: Vec<String> = (0..8)
            .map(|i| format!("[{}]", vec![i.to_string(); 2000].join(",")))
            .collect();

        let handles: Vec<_> = values
            .clone()
            .into_iter()
            .map(|value| {
                let root = root.clone();
                thread::spawn(move || {
                    let store = FileStore::open(&root).unwrap();
                    for _ in 0..20 {
                        store.set("tweets", &value).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let store = FileStore::open(&root).unwrap();
        let last = store.get("tweets").unwrap().unwrap();
        assert!(values.contains(&last));
    }

    #[test]
    fn test_init_fresh_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".tweetbox");

        assert!(!FileStore::holds_store(&root));
        FileStore::init(&root, false).unwrap();
        assert!(FileStore::holds_store(&root));

        assert!(matches!(
            FileStore::init(&root, false),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn test_reinitialize_keeps_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("precious");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("thesis.txt"), "years of work").unwrap();

        // Not a store yet: nothing is removed.
        FileStore::init(&root, true).unwrap();
        assert_eq!(
            fs::read_to_string(root.join("thesis.txt")).unwrap(),
            "years of work"
        );

        let store = FileStore::open(&root).unwrap();
        NoteStore::load(&store).unwrap().create("hello").unwrap();

        // A store now: only the tweets go.
        let store = FileStore::init(&root, true).unwrap();
        assert!(NoteStore::load(&store).unwrap().is_empty());
        assert!(root.join("thesis.txt").exists());
        assert!(root.is_dir());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (_temp, store) = setup();
        assert!(matches!(store.set("../escape", "x"), Err(Error::Storage(_))));
        assert!(matches!(store.get(""), Err(Error::Storage(_))));
    }

    #[test]
    fn test_open_creates_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a").join(".tweetbox");
        let store = FileStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.as_path());
    }

    #[test]
    fn test_note_store_survives_reopen() {
        let (temp, store) = setup();

        let mut notes = NoteStore::load(&store).unwrap();
        let first = notes.create("first").unwrap();
        let second = notes.create("second").unwrap();
        notes.delete(first).unwrap();

        let reopened = FileStore::open(temp.path()).unwrap();
        let notes = NoteStore::load(&reopened).unwrap();
        assert_eq!(notes.notes(), &[Note::new(second, "second")]);

        let raw = reopened.get(STORAGE_KEY).unwrap().unwrap();
        let parsed: Vec<Note> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_concurrent_locked_creates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        FileStore::open(&root).unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let root = root.clone();
                thread::spawn(move || {
                    let store = FileStore::open(&root).unwrap();
                    let _lock = store.lock().unwrap();
                    let mut notes = NoteStore::load(&store).unwrap();
                    notes.create(&format!("Tweet {}", i)).unwrap()
                })
            })
            .collect();

        let ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // All IDs should be unique
        let unique_ids: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique_ids.len(), 10);

        // No write was lost
        let store = FileStore::open(&root).unwrap();
        let notes = NoteStore::load(&store).unwrap();
        assert_eq!(notes.len(), 10);
    }
}
