use std::io::Read;

use crate::error::Error;
use crate::AnswerSet;

/// Membaca banyak jawaban sekaligus dari CSV tanpa header.
///
/// Setiap baris: `id,a1,a2,...,a20`. Baris dengan nilai di luar 0–3 atau lebih dari
/// 20 jawaban menghasilkan error untuk baris itu saja; baris yang kurang dari 20
/// jawaban baru ditolak saat dinilai.
pub fn read_bulk<R: Read>(reader: R) -> impl Iterator<Item = Result<(String, AnswerSet), Error>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_records()
        .map(|row| {
            let row = row?;
            let mut fields = row.iter();
            let id = fields.next().unwrap_or_default().to_string();
            let mut answers = AnswerSet::default();
            for field in fields {
                let value = field.parse::<u8>().map_err(|_| Error::IllegalAnswer)?;
                answers.push(value)?;
            }
            Ok((id, answers))
        })
}
