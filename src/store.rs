use crate::error::Error;
use crate::types::Workout;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Fixed key the whole workout history is stored under.
pub const STORAGE_KEY: &str = "workouts";

/// Key-value blob storage, the shape of a browser's localStorage: opaque
/// strings under string keys, `None` when a key was never written.
pub trait BlobStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;
}

/// Append-only ordered sequence of workouts. Insertion order is display
/// order; this is the single source of truth, views only borrow from it.
#[derive(Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    pub fn push(&mut self, workout: Workout) {
        self.workouts.push(workout);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Serialize the whole sequence as one JSON blob under [`STORAGE_KEY`].
    pub fn save(&self, blob: &mut dyn BlobStore) -> Result<(), Error> {
        let payload = serde_json::to_string(&self.workouts)?;
        blob.set_item(STORAGE_KEY, &payload)?;
        tracing::debug!(count = self.workouts.len(), "persisted workout store");
        Ok(())
    }

    /// Load a previously saved sequence. An absent blob is not an error:
    /// it just means no history, and an empty store comes back.
    ///
    /// Records carry their variant tag, so reloaded workouts are full
    /// `Running`/`Cycling` values with their derived metrics intact.
    pub fn load(blob: &dyn BlobStore) -> Result<Self, Error> {
        let Some(payload) = blob.get_item(STORAGE_KEY)? else {
            return Ok(Self::default());
        };
        let workouts: Vec<Workout> = serde_json::from_str(&payload)?;
        tracing::debug!(count = workouts.len(), "loaded workout store");
        Ok(Self { workouts })
    }
}

/// File-backed blob store: one file per key under a directory, so history
/// survives across runs the way localStorage survives across sessions.
#[derive(Debug)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Storage(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Ephemeral in-process blob store. Handy as a test double and for
/// throwaway sessions that should not touch the disk.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    items: HashMap<String, String>,
}

impl BlobStore for MemoryBlobStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
