//! Alur tes: satu objek sesi yang dibawa dari satu transisi ke transisi berikutnya.
//!
//! `Idle → InProgress(step) → Complete`. Dari `Complete` hanya bisa kembali lewat
//! [`Session::restart`].

use tracing::info;

use crate::band::ScoreResult;
use crate::error::Error;
use crate::record::HistoryRecord;
use crate::store::{HistoryStore, Saved};
use crate::{score, AnswerSet, QUESTIONS, QUESTION_COUNT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    /// Butir yang sedang ditampilkan (0-based)
    InProgress { step: usize },
    Complete,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: State,
    answers: AnswerSet,
}

/// Hasil sesi yang sudah dinilai dan disimpan.
#[derive(Debug, Clone)]
pub struct Completed {
    pub result: ScoreResult,
    pub saved: Saved,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sesi baru pada butir pertama dengan semua jawaban kosong.
    pub fn start() -> Self {
        Self {
            state: State::InProgress { step: 0 },
            answers: AnswerSet::default(),
        }
    }

    pub fn restart(&mut self) {
        *self = Self::start();
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn step(&self) -> Option<usize> {
        match self.state {
            State::InProgress { step } => Some(step),
            _ => None,
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Jawaban yang sudah tercatat untuk butir saat ini.
    pub fn current_answer(&self) -> Option<u8> {
        self.step().and_then(|step| self.answers.get(step))
    }

    /// Mencatat pilihan untuk butir saat ini lalu maju satu butir, atau selesai pada
    /// butir terakhir. Tanpa pilihan, jawaban yang sudah tercatat dipakai; jika itu
    /// pun tidak ada, transisi ditolak dan sesi tidak berubah.
    pub fn next(&mut self, selected: Option<u8>) -> Result<State, Error> {
        let step = self.step().ok_or(Error::NotInProgress)?;
        let value = selected
            .or_else(|| self.answers.get(step))
            .ok_or(Error::NoSelection)?;
        self.answers.set(step, value)?;
        self.state = if step + 1 >= QUESTION_COUNT {
            State::Complete
        } else {
            State::InProgress { step: step + 1 }
        };
        Ok(self.state)
    }

    /// Mundur satu butir; tidak berbuat apa-apa pada butir pertama.
    pub fn prev(&mut self) -> State {
        if let State::InProgress { step } = self.state {
            if step > 0 {
                self.state = State::InProgress { step: step - 1 };
            }
        }
        self.state
    }

    pub fn result(&self) -> Result<ScoreResult, Error> {
        if self.state != State::Complete {
            return Err(Error::NotComplete);
        }
        let total = score(&QUESTIONS, &self.answers)?;
        Ok(ScoreResult::new(total, QUESTIONS.max_score()))
    }

    /// Menilai sesi yang sudah selesai dan menyimpannya lewat `store`.
    pub async fn complete<S>(&self, store: &S, name: &str, note: &str) -> Result<Completed, Error>
    where
        S: HistoryStore + ?Sized,
    {
        let result = self.result()?;
        let record = HistoryRecord::new(&result, name, note);
        let saved = store.submit(record).await?;
        info!(
            total = result.total,
            category = result.category(),
            backend = %saved.backend,
            "test result saved"
        );
        Ok(Completed { result, saved })
    }
}
