//! Klasifikasi skor total ke dalam empat kategori.
//!
//! Satu-satunya tempat ambang batas didefinisikan. Tampilan hasil, jalur simpan
//! lokal, dan pewarnaan grafik tren semuanya memanggil [`Band::classify`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    /// Skor ≤ 33% dari skor maksimum
    Baik,
    /// Skor ≤ 66% dari skor maksimum
    PerluPerhatianRingan,
    DisarankanKonsultasi,
    /// Skor di luar rentang 0..=maksimum
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category label: {0:?}")]
pub struct ParseBandError(String);

impl Band {
    pub const ALL: [Band; 4] = [
        Band::Baik,
        Band::PerluPerhatianRingan,
        Band::DisarankanKonsultasi,
        Band::Error,
    ];

    /// Ambang atas kategori Baik dan Perlu Perhatian Ringan:
    /// `floor(max × 0.33)` dan `floor(max × 0.66)`.
    pub fn thresholds(max: i32) -> (i32, i32) {
        // dihitung di i64; hasilnya tidak pernah melebihi `max`
        let max = i64::from(max);
        ((max * 33 / 100) as i32, (max * 66 / 100) as i32)
    }

    pub fn classify(total: i32, max: i32) -> Band {
        if total < 0 || total > max {
            return Band::Error;
        }
        let (good, mild) = Band::thresholds(max);
        if total <= good {
            Band::Baik
        } else if total <= mild {
            Band::PerluPerhatianRingan
        } else {
            Band::DisarankanKonsultasi
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Baik => "Baik",
            Band::PerluPerhatianRingan => "Perlu Perhatian Ringan",
            Band::DisarankanKonsultasi => "Disarankan Konsultasi",
            Band::Error => "Error",
        }
    }

    pub fn advice(self) -> &'static str {
        match self {
            Band::Baik => "Pertahankan pola hidup sehat, teruskan refleksi diri.",
            Band::PerluPerhatianRingan => "Coba relaksasi, atur jadwal, dan cukup tidur.",
            Band::DisarankanKonsultasi => "Pertimbangkan segera berkonsultasi dengan profesional.",
            Band::Error => "Skor tidak valid.",
        }
    }

    /// Warna teks kategori pada tampilan hasil.
    pub fn color(self) -> &'static str {
        match self {
            Band::Baik => "#16a34a",
            Band::PerluPerhatianRingan => "#f59e0b",
            Band::DisarankanKonsultasi => "#ef4444",
            Band::Error => "#888888",
        }
    }

    /// Warna batang pada grafik tren (palet lebih terang).
    pub fn chart_color(self) -> &'static str {
        match self {
            Band::Baik => "#22c55e",
            Band::PerluPerhatianRingan => "#fbbf24",
            Band::DisarankanKonsultasi => "#f97373",
            Band::Error => "#888888",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Band {
    type Err = ParseBandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Band::ALL
            .into_iter()
            .find(|band| band.label() == s.trim())
            .ok_or_else(|| ParseBandError(s.to_string()))
    }
}

/// Hasil akhir satu sesi tes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub total: i32,
    pub max: i32,
    pub band: Band,
}

impl ScoreResult {
    pub fn new(total: i32, max: i32) -> Self {
        Self {
            total,
            max,
            band: Band::classify(total, max),
        }
    }

    pub fn category(&self) -> &'static str {
        self.band.label()
    }

    pub fn advice(&self) -> &'static str {
        self.band.advice()
    }

    pub fn color(&self) -> &'static str {
        self.band.color()
    }
}
