//! File-backed queue of bookings waiting to be submitted.
//!
//! The queue is one JSON array shared by every process that opens the same
//! path: the booking form pushes, `barber-sync` drains. Each mutation takes
//! an exclusive advisory lock on `<path>.lock`, re-reads the file, applies
//! the change and writes it back through a temporary file and a rename.
//! The in-memory entries are a snapshot from the last read or write.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use barber_core::booking::NewBooking;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Offline queue I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Offline queue file is corrupt: {0}")]
    Format(#[from] serde_json::Error),
}

/// A booking held locally until the API accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedBooking {
    pub local_id: Uuid,
    pub booking: NewBooking,
    pub queued_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct OfflineQueue {
    path: PathBuf,
    entries: Vec<QueuedBooking>,
}

/// Held while the queue file is read and rewritten.
struct FileLock(File);

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.0);
    }
}

impl OfflineQueue {
    /// Open the queue stored at `path`. A missing or empty file is an empty
    /// queue.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, QueueError> {
        let mut queue = Self {
            path: path.into(),
            entries: Vec::new(),
        };
        queue.reload()?;
        Ok(queue)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Refresh the snapshot with whatever other handles have written.
    pub fn reload(&mut self) -> Result<(), QueueError> {
        let _lock = self.lock()?;
        self.entries = self.read()?;
        Ok(())
    }

    /// Entries in submission order, oldest first, as of the last reload or
    /// mutation through this handle.
    pub fn entries(&self) -> &[QueuedBooking] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a booking. Returns its local id.
    pub fn push(&mut self, booking: NewBooking) -> Result<Uuid, QueueError> {
        let entry = QueuedBooking {
            local_id: Uuid::new_v4(),
            booking,
            queued_at: Utc::now(),
        };
        let local_id = entry.local_id;
        self.update(|entries| entries.push(entry))?;
        Ok(local_id)
    }

    /// Drop one entry. Returns `false` when the file no longer holds it.
    pub fn remove(&mut self, local_id: Uuid) -> Result<bool, QueueError> {
        self.update(|entries| {
            let before = entries.len();
            entries.retain(|e| e.local_id != local_id);
            entries.len() != before
        })
    }

    /// Drop every entry, including ones queued by other handles.
    pub fn clear(&mut self) -> Result<(), QueueError> {
        self.update(Vec::clear)
    }

    /// Read-modify-write under the file lock.
    fn update<R>(
        &mut self,
        change: impl FnOnce(&mut Vec<QueuedBooking>) -> R,
    ) -> Result<R, QueueError> {
        let _lock = self.lock()?;
        let mut entries = self.read()?;
        let result = change(&mut entries);
        self.write(&entries)?;
        self.entries = entries;
        Ok(result)
    }

    fn lock(&self) -> Result<FileLock, QueueError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.sibling(".lock"))?;
        FileExt::lock_exclusive(&file)?;
        Ok(FileLock(file))
    }

    fn read(&self) -> Result<Vec<QueuedBooking>, QueueError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entries: &[QueuedBooking]) -> Result<(), QueueError> {
        let tmp = self.sibling(".tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(suffix);
        PathBuf::from(name)
    }
}
