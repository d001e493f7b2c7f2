use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    /// 20 butir tidak terpenuhi, atau posisi di luar bank pertanyaan
    #[error("question is outside the question bank")]
    IllegalQuestion,
    /// Nilai jawaban di luar 0–3
    #[error("answer must be a number from 0 to 3")]
    IllegalAnswer,
    /// Masih ada butir yang belum dijawab
    #[error("not every question has been answered")]
    NotFulfilled,
    #[error("no value selected for the current question")]
    NoSelection,
    #[error("the session is not in progress")]
    NotInProgress,
    #[error("the session is not complete yet")]
    NotComplete,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}
