//! Ringkasan statistik, tabel riwayat, dan grafik tren untuk terminal.

use std::fmt::{self, Write};

use crate::band::Band;
use crate::record::HistoryRecord;

/// Jumlah entri terbaru yang ikut digambar pada grafik tren.
pub const TREND_LIMIT: usize = 10;

pub const EMPTY_HISTORY: &str = "Belum ada data. Lakukan tes terlebih dahulu.";

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub min: i32,
    pub max: i32,
    /// Rata-rata skor, dibulatkan dua desimal
    pub mean: f64,
}

impl Summary {
    /// `None` bila riwayat kosong.
    pub fn from_records(records: &[HistoryRecord]) -> Option<Self> {
        let first = records.first()?.total;
        let (min, max, sum) = records.iter().fold(
            (first, first, 0i64),
            |(min, max, sum), record| {
                (
                    min.min(record.total),
                    max.max(record.total),
                    sum + i64::from(record.total),
                )
            },
        );
        let mean = sum as f64 / records.len() as f64;
        Some(Summary {
            count: records.len(),
            min,
            max,
            mean: (mean * 100.0).round() / 100.0,
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Jumlah entri: {}", self.count)?;
        writeln!(f, "Skor minimum: {}", self.min)?;
        writeln!(f, "Skor maksimum: {}", self.max)?;
        write!(f, "Rata-rata: {:.2}", self.mean)
    }
}

/// Satu batang pada grafik tren.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendBar {
    pub timestamp: String,
    pub total: i32,
    /// `total / max`, dibatasi ke 0..=1 untuk keperluan gambar
    pub ratio: f64,
    pub band: Band,
}

/// Maksimal [`TREND_LIMIT`] entri terbaru, diurutkan dari yang terlama.
///
/// `records` diharapkan terurut dari yang terbaru, seperti hasil `list()`.
pub fn trend(records: &[HistoryRecord]) -> Vec<TrendBar> {
    let mut bars = records
        .iter()
        .take(TREND_LIMIT)
        .map(|record| {
            let ratio = if record.max_score > 0 {
                (f64::from(record.total) / f64::from(record.max_score)).clamp(0.0, 1.0)
            } else {
                0.0
            };
            TrendBar {
                timestamp: record.timestamp.clone(),
                total: record.total,
                ratio,
                band: Band::classify(record.total, record.max_score),
            }
        })
        .collect::<Vec<TrendBar>>();
    bars.reverse();
    bars
}

/// Grafik batang horizontal. Dengan `colored`, batang diberi warna ANSI sesuai
/// [`Band::chart_color`].
pub fn render_trend(bars: &[TrendBar], width: usize, colored: bool) -> String {
    if bars.is_empty() {
        return "Belum ada data untuk digambarkan.".to_string();
    }
    let mut out = String::new();
    for bar in bars {
        let filled = (bar.ratio * width as f64).round() as usize;
        let body = "█".repeat(filled);
        let body = match ansi_color(bar.band.chart_color()).filter(|_| colored) {
            Some(color) => format!("{color}{body}\x1b[0m"),
            None => body,
        };
        let pad = " ".repeat(width.saturating_sub(filled));
        let _ = writeln!(
            out,
            "{:<20} |{body}{pad}| {:>3}  {}",
            bar.timestamp, bar.total, bar.band
        );
    }
    out
}

fn ansi_color(hex: &str) -> Option<String> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(format!(
        "\x1b[38;2;{};{};{}m",
        channel(0..2)?,
        channel(2..4)?,
        channel(4..6)?
    ))
}

/// Tabel riwayat: Tanggal, Nama, Skor, Kategori, Catatan.
pub fn render_table(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    let headers = ["Tanggal", "Nama", "Skor", "Kategori", "Catatan"];
    let rows = records
        .iter()
        .map(|r| {
            [
                r.timestamp.clone(),
                r.name.clone(),
                r.total.to_string(),
                r.category.clone(),
                r.note.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    out.push_str(&rule);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(timestamp: &str, total: i32) -> HistoryRecord {
        HistoryRecord {
            id: None,
            timestamp: timestamp.to_string(),
            name: "Ayu".to_string(),
            total,
            max_score: 60,
            category: Band::classify(total, 60).label().to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn test_summary() {
        let records = [record("c", 10), record("b", 21), record("a", 30)];
        let summary = Summary::from_records(&records).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, 10);
        assert_eq!(summary.max, 30);
        assert_eq!(summary.mean, 20.33);
        assert_eq!(
            summary.to_string(),
            "Jumlah entri: 3\nSkor minimum: 10\nSkor maksimum: 30\nRata-rata: 20.33"
        );
    }

    #[test]
    fn test_summary_empty() {
        assert_eq!(Summary::from_records(&[]), None);
    }

    #[test]
    fn test_trend_takes_ten_most_recent_oldest_first() {
        // terbaru lebih dulu: t11 .. t0
        let records = (0..12)
            .rev()
            .map(|i| record(&format!("t{i}"), i * 5))
            .collect::<Vec<_>>();
        let bars = trend(&records);
        assert_eq!(bars.len(), TREND_LIMIT);
        assert_eq!(bars.first().unwrap().timestamp, "t2");
        assert_eq!(bars.last().unwrap().timestamp, "t11");
        assert_eq!(bars.last().unwrap().total, 55);
        assert_eq!(bars.first().unwrap().band, Band::Baik);
        assert_eq!(bars.last().unwrap().band, Band::DisarankanKonsultasi);
    }

    #[test]
    fn test_trend_ratio() {
        let bars = trend(&[record("a", 30), record("b", 75)]);
        assert_eq!(bars[0].ratio, 1.0);
        assert_eq!(bars[0].band, Band::Error);
        assert_eq!(bars[1].ratio, 0.5);
    }

    #[test]
    fn test_trend_large_max_score() {
        let mut large = record("a", 10);
        large.max_score = 100_000_000;
        let bars = trend(&[large]);
        assert_eq!(bars[0].band, Band::Baik);
        assert!(bars[0].ratio < 0.001);
    }

    #[test]
    fn test_render_trend() {
        let bars = trend(&[record("b", 60), record("a", 0)]);
        let text = render_trend(&bars, 10, false);
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a "));
        assert!(!lines[0].contains('█'));
        assert!(lines[1].contains(&"█".repeat(10)));
        assert!(lines[1].ends_with("Disarankan Konsultasi"));

        let colored = render_trend(&bars, 10, true);
        assert!(colored.contains("\x1b[38;2;249;115;115m"));
    }

    #[test]
    fn test_render_table() {
        assert_eq!(render_table(&[]), EMPTY_HISTORY);
        let table = render_table(&[record("19/10/2026, 08:30:00", 21)]);
        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Tanggal"));
        assert!(lines[2].contains("Perlu Perhatian Ringan"));
    }
}
