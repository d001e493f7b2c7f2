use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::{Backend, HistoryStore, Saved, StoreError, StoreResult};
use crate::record::HistoryRecord;

/// Kunci riwayat cadangan; nama berkasnya mengikuti kunci ini.
pub const STORAGE_KEY: &str = "mentalHealthHistorySDG3";

/// Bentuk elemen berkas cadangan. Skor disimpan di `total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LocalEntry {
    timestamp: String,
    name: String,
    total: i32,
    category: String,
    #[serde(default)]
    note: String,
}

impl From<&HistoryRecord> for LocalEntry {
    fn from(record: &HistoryRecord) -> Self {
        LocalEntry {
            timestamp: record.timestamp.clone(),
            name: record.name.clone(),
            total: record.total,
            category: record.category.clone(),
            note: record.note.clone(),
        }
    }
}

impl From<LocalEntry> for HistoryRecord {
    fn from(entry: LocalEntry) -> Self {
        HistoryRecord {
            id: None,
            timestamp: entry.timestamp,
            name: entry.name,
            total: entry.total,
            max_score: HistoryRecord::default_max_score(),
            category: entry.category,
            note: entry.note,
        }
    }
}

/// Riwayat sebagai satu array JSON dalam satu berkas, terbaru lebih dulu.
///
/// Setiap baca-ubah-tulis memegang `lock`, sehingga penyimpanan bersamaan tidak
/// saling menimpa.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Berkas penyimpanan `<dir>/mentalHealthHistorySDG3.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Membuang entri yang sudah diterima di tempat lain (satu entri per rekaman).
    /// Entri yang ditulis sementara itu tetap disimpan.
    pub(crate) async fn remove_replayed(&self, replayed: &[HistoryRecord]) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        for record in replayed {
            let entry = LocalEntry::from(record);
            if let Some(position) = entries.iter().position(|stored| *stored == entry) {
                entries.remove(position);
            }
        }
        if entries.is_empty() {
            self.remove().await
        } else {
            self.write(&entries).await
        }
    }

    async fn read(&self) -> StoreResult<Vec<LocalEntry>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, entries: &[LocalEntry]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        let json = serde_json::to_vec(entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json)
            .await
            .map_err(|source| self.io_error(source))
    }

    async fn remove(&self) -> StoreResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl HistoryStore for LocalStore {
    async fn submit(&self, record: HistoryRecord) -> StoreResult<Saved> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read().await?;
        entries.insert(0, LocalEntry::from(&record));
        self.write(&entries).await?;
        debug!(path = %self.path.display(), count = entries.len(), "saved record locally");
        Ok(Saved {
            record: HistoryRecord { id: None, ..record },
            backend: Backend::Local,
        })
    }

    async fn list(&self) -> StoreResult<Vec<HistoryRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read()
            .await?
            .into_iter()
            .map(HistoryRecord::from)
            .collect())
    }

    async fn clear_all(&self) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        self.remove().await
    }
}
