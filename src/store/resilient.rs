use async_trait::async_trait;
use tracing::{info, warn};

use super::{HistoryStore, LocalStore, Saved, StoreError, StoreResult};
use crate::record::HistoryRecord;

/// Penyimpanan utama dengan cadangan lokal.
///
/// Permintaan utama yang gagal dicatat di log lalu dilayani cadangan. Rekaman yang
/// hanya masuk ke cadangan berstatus tertunda: bila replay aktif, rekaman itu dikirim
/// ke penyimpanan utama, yang terlama dulu, sebelum submit atau list berikutnya.
pub struct ResilientStore<P> {
    primary: P,
    fallback: LocalStore,
    replay_pending: bool,
}

impl<P: HistoryStore> ResilientStore<P> {
    pub fn new(primary: P, fallback: LocalStore) -> Self {
        Self {
            primary,
            fallback,
            replay_pending: true,
        }
    }

    pub fn with_replay(mut self, enabled: bool) -> Self {
        self.replay_pending = enabled;
        self
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn fallback(&self) -> &LocalStore {
        &self.fallback
    }

    /// Mengirim rekaman tertunda ke penyimpanan utama dan mengembalikan jumlah yang
    /// diterima. Berhenti di rekaman pertama yang ditolak; sisanya tetap tertunda.
    ///
    /// Gagal dengan error penyimpanan utama bila rekaman terlama pun tidak masuk.
    pub async fn replay(&self) -> StoreResult<usize> {
        let pending = self.fallback.list().await?;
        if pending.is_empty() {
            return Ok(0);
        }

        let total = pending.len();
        let mut replayed = Vec::with_capacity(total);
        for record in pending.into_iter().rev() {
            match self.primary.submit(record.clone()).await {
                Ok(_) => replayed.push(record),
                Err(err) if replayed.is_empty() => return Err(err),
                Err(err) => {
                    warn!(error = %err, remaining = total - replayed.len(), "replay interrupted");
                    break;
                }
            }
        }

        self.fallback.remove_replayed(&replayed).await?;
        info!(count = replayed.len(), "replayed pending records");
        Ok(replayed.len())
    }

    /// Menjalankan [`replay`](Self::replay) bila aktif. `false` bila penyimpanan utama
    /// baru saja gagal, sehingga pemanggil langsung memakai cadangan.
    async fn replay_if_enabled(&self) -> bool {
        if !self.replay_pending {
            return true;
        }
        match self.replay().await {
            Ok(_) => true,
            Err(err @ StoreError::Transport { .. }) => {
                warn!(error = %err, "pending records not replayed, primary skipped");
                false
            }
            Err(err) => {
                warn!(error = %err, "pending records not replayed");
                true
            }
        }
    }
}

#[async_trait]
impl<P: HistoryStore> HistoryStore for ResilientStore<P> {
    async fn submit(&self, record: HistoryRecord) -> StoreResult<Saved> {
        if !self.replay_if_enabled().await {
            return self.fallback.submit(record).await;
        }
        match self.primary.submit(record.clone()).await {
            Ok(saved) => Ok(saved),
            Err(err) => {
                warn!(error = %err, "primary store unavailable, saving locally");
                self.fallback.submit(record).await
            }
        }
    }

    async fn list(&self) -> StoreResult<Vec<HistoryRecord>> {
        if !self.replay_if_enabled().await {
            return self.fallback.list().await;
        }
        match self.primary.list().await {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(error = %err, "primary store unavailable, reading local history");
                self.fallback.list().await
            }
        }
    }

    /// Mengosongkan penyimpanan utama, lalu cadangan apa pun hasilnya.
    async fn clear_all(&self) -> StoreResult<()> {
        if let Err(err) = self.primary.clear_all().await {
            warn!(error = %err, "primary store not cleared");
        }
        self.fallback.clear_all().await
    }
}
