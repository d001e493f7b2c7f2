use std::io::Write;

use crate::error::Error;
use crate::record::HistoryRecord;

/// Nama berkas ekspor bawaan.
pub const EXPORT_FILE_NAME: &str = "riwayat_kesehatan_mental.csv";

pub const CSV_HEADER: &str = "Tanggal,Nama,Skor,Kategori,Catatan";

/// Menulis riwayat sebagai CSV: kolom teks selalu diberi tanda kutip, skor tidak.
pub fn write_csv<W: Write>(records: &[HistoryRecord], mut writer: W) -> Result<(), Error> {
    writeln!(writer, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{}",
            quoted(&record.timestamp),
            quoted(&record.name),
            record.total,
            quoted(&record.category),
            quoted(&record.note),
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// `"` digandakan, lalu seluruh nilai dibungkus tanda kutip.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
