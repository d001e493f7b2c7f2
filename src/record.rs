use chrono::Local;

use crate::band::{Band, ScoreResult};
use crate::MAX_SCORE;

/// Format waktu yang dipakai layanan riwayat, mis. `19/10/2026, 08:30:00`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Satu entri riwayat tes.
///
/// `id` hanya diisi oleh server; entri yang tersimpan lokal tidak memilikinya.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub id: Option<i64>,
    pub timestamp: String,
    pub name: String,
    pub total: i32,
    pub max_score: i32,
    pub category: String,
    pub note: String,
}

impl HistoryRecord {
    pub fn new(result: &ScoreResult, name: &str, note: &str) -> Self {
        let name = name.trim();
        Self {
            id: None,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            name: if name.is_empty() { "-" } else { name }.to_string(),
            total: result.total,
            max_score: result.max,
            category: result.category().to_string(),
            note: note.trim().to_string(),
        }
    }

    /// Kategori hasil parse label; `None` untuk label yang tidak dikenal.
    pub fn band(&self) -> Option<Band> {
        self.category.parse().ok()
    }

    pub(crate) fn default_max_score() -> i32 {
        MAX_SCORE
    }
}
