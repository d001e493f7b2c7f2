//! Gerbang penyimpanan riwayat.
//!
//! [`HistoryStore`] punya dua backend: [`RemoteStore`] berbicara dengan REST API
//! riwayat, [`LocalStore`] menyimpan array JSON dalam satu berkas. [`ResilientStore`]
//! mendahulukan server dan beralih ke penyimpanan lokal setiap kali permintaan gagal.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::record::HistoryRecord;

mod local;
mod remote;
mod resilient;

pub use local::{LocalStore, STORAGE_KEY};
pub use remote::RemoteStore;
pub use resilient::ResilientStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("local store {path:?} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("local store {path:?} holds malformed data: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Backend yang menerima rekaman.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Local,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Remote => f.write_str("remote"),
            Backend::Local => f.write_str("local"),
        }
    }
}

/// Rekaman seperti yang tersimpan, termasuk kolom yang diisi backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    pub record: HistoryRecord,
    pub backend: Backend,
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn submit(&self, record: HistoryRecord) -> StoreResult<Saved>;

    /// Rekaman, terbaru lebih dulu.
    async fn list(&self) -> StoreResult<Vec<HistoryRecord>>;

    async fn clear_all(&self) -> StoreResult<()>;
}

/// Menyusun gerbang penyimpanan sesuai `config`.
///
/// Bila API aktif, server dicek sekali; hasilnya hanya dicatat di log.
pub async fn open(config: &Config) -> StoreResult<Box<dyn HistoryStore>> {
    let local = LocalStore::new(config.local_path());
    if !config.api.enabled {
        info!(path = %local.path().display(), "remote history disabled, using local store");
        return Ok(Box::new(local));
    }

    let remote = RemoteStore::new(&config.api.base_url, config.timeout())?;
    match remote.health().await {
        Ok(status) => info!(%status, "history backend connected"),
        Err(err) => warn!(error = %err, "history backend not available, local fallback in use"),
    }
    Ok(Box::new(
        ResilientStore::new(remote, local).with_replay(config.storage.replay_pending),
    ))
}
