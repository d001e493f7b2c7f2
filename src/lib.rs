use once_cell::sync::Lazy;
use serde::Deserialize;

pub mod band;
pub mod bulk;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod record;
pub mod report;
pub mod session;
pub mod store;

pub use band::{Band, ScoreResult};
pub use bulk::read_bulk;
pub use config::Config;
pub use error::Error;
pub use record::HistoryRecord;
pub use session::{Completed, Session, State};
pub use store::{Backend, HistoryStore, Saved};

/// Jumlah butir pernyataan dalam tes.
pub const QUESTION_COUNT: usize = 20;

/// Nilai tertinggi pada skala jawaban 0–3.
pub const MAX_ANSWER: u8 = 3;

/// Skor total tertinggi (3 × jumlah butir).
pub const MAX_SCORE: i32 = QUESTION_COUNT as i32 * MAX_ANSWER as i32;

pub static QUESTIONS: Lazy<QuestionBank> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/questions.json"))
        .expect("embedded question bank is valid JSON")
});

/// Satu pilihan pada skala jawaban.
#[derive(Debug, Clone, Deserialize)]
pub struct Score {
    pub score: u8,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    /// Butir berskor terbalik: persetujuan yang tinggi berarti kondisi yang lebih baik,
    /// sehingga nilai jawaban dibalik (`3 - nilai`) sebelum dijumlahkan.
    pub reverse: bool,
}

/// Master 20 pernyataan tes kesehatan mental beserta skala jawabannya.
#[derive(Debug, Deserialize)]
pub struct QuestionBank {
    pub title: String,
    /// Petunjuk pengisian yang ditampilkan sebelum butir pertama.
    pub instruction: String,
    pub scale: Vec<Score>,
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Butir berdasarkan posisi tampil (0-based).
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Butir berdasarkan nomor pernyataan.
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn max_score(&self) -> i32 {
        self.questions.len() as i32 * i32::from(MAX_ANSWER)
    }
}

/// Jawaban satu sesi tes. Setiap slot kosong atau bernilai 0–3.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: [Option<u8>; QUESTION_COUNT],
    offset: usize,
}

impl AnswerSet {
    /// Menyimpan jawaban berikutnya secara berurutan.
    pub fn push(&mut self, value: u8) -> Result<(), Error> {
        let value = check_answer(value)?;
        let slot = self
            .values
            .get_mut(self.offset)
            .ok_or(Error::IllegalQuestion)?;
        *slot = Some(value);
        self.offset += 1;
        Ok(())
    }

    /// Menyimpan jawaban untuk nomor pernyataan (1-based).
    pub fn insert(&mut self, question_no: usize, value: u8) -> Result<(), Error> {
        if question_no < 1 {
            return Err(Error::IllegalQuestion);
        }
        self.set(question_no - 1, value)
    }

    /// Menyimpan jawaban untuk posisi tampil (0-based). Nilai di luar 0–3 ditolak
    /// tanpa mengubah isi.
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), Error> {
        let value = check_answer(value)?;
        let slot = self.values.get_mut(index).ok_or(Error::IllegalQuestion)?;
        *slot = Some(value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(index).copied().flatten()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn answered(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    /// Skor dan kategori dengan bank pertanyaan bawaan.
    pub fn to_score(&self) -> Result<ScoreResult, Error> {
        let total = score(&QUESTIONS, self)?;
        Ok(ScoreResult::new(total, QUESTIONS.max_score()))
    }
}

fn check_answer(value: u8) -> Result<u8, Error> {
    if value <= MAX_ANSWER {
        Ok(value)
    } else {
        Err(Error::IllegalAnswer)
    }
}

fn reverse_if(question: &Question, value: u8) -> u8 {
    if question.reverse {
        MAX_ANSWER - value
    } else {
        value
    }
}

/// Skor total dari jawaban lengkap.
///
/// Butir berskor terbalik menyumbang `3 - nilai`, butir lain menyumbang nilainya
/// sendiri. Jawaban yang belum lengkap ditolak dengan [`Error::NotFulfilled`].
pub fn score(bank: &QuestionBank, answers: &AnswerSet) -> Result<i32, Error> {
    if bank.len() != QUESTION_COUNT {
        return Err(Error::IllegalQuestion);
    }
    bank.questions
        .iter()
        .zip(answers.values.iter())
        .map(|(question, value)| value.map(|value| i32::from(reverse_if(question, value))))
        .sum::<Option<i32>>()
        .ok_or(Error::NotFulfilled)
}

#[cfg(test)]
mod test {
    use super::*;

    fn answers_by(rule: impl Fn(&Question) -> u8) -> AnswerSet {
        let mut answers = AnswerSet::default();
        for question in QUESTIONS.questions() {
            answers.push(rule(question)).unwrap();
        }
        answers
    }

    #[test]
    fn test_get() {
        assert_eq!(Some(1), QUESTIONS.get(0).map(|q| q.id));
        assert_eq!(Some(20), QUESTIONS.get(19).map(|q| q.id));
        assert_eq!(None, QUESTIONS.get(20).map(|q| q.id));
    }

    #[test]
    fn test_question() {
        assert_eq!(Some(1), QUESTIONS.question(1).map(|q| q.id));
        assert_eq!(Some(20), QUESTIONS.question(20).map(|q| q.id));
        assert!(QUESTIONS.question(21).is_none());
    }

    #[test]
    fn test_questions() {
        let questions = QUESTIONS.questions();
        assert_eq!(questions.len(), QUESTION_COUNT);
        assert_eq!(QUESTIONS.max_score(), MAX_SCORE);
        assert_eq!(questions.iter().filter(|q| q.reverse).count(), 8);
        assert!(questions[2].reverse);
        assert!(!questions[0].reverse);
        assert_eq!(QUESTIONS.scale.len(), 4);
    }

    #[test]
    fn test_reverse_if() {
        let forward = QUESTIONS.get(0).unwrap();
        let reverse = QUESTIONS.get(2).unwrap();
        assert_eq!(reverse_if(forward, 0), 0);
        assert_eq!(reverse_if(forward, 3), 3);
        assert_eq!(reverse_if(reverse, 0), 3);
        assert_eq!(reverse_if(reverse, 1), 2);
        assert_eq!(reverse_if(reverse, 2), 1);
        assert_eq!(reverse_if(reverse, 3), 0);
    }

    #[test]
    fn test_answer_store_all_zero() {
        // 8 butir terbalik masing-masing menyumbang 3
        let answers = answers_by(|_| 0);
        assert_eq!(score(&QUESTIONS, &answers).unwrap(), 24);
    }

    #[test]
    fn test_answer_store_all_three() {
        let answers = answers_by(|_| 3);
        assert_eq!(score(&QUESTIONS, &answers).unwrap(), 36);
    }

    #[test]
    fn test_lowest_possible_score_is_good() {
        let answers = answers_by(|q| if q.reverse { 3 } else { 0 });
        let result = answers.to_score().unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(result.max, 60);
        assert_eq!(result.band, Band::Baik);
    }

    #[test]
    fn test_highest_possible_score_recommends_consultation() {
        let answers = answers_by(|q| if q.reverse { 0 } else { 3 });
        let result = answers.to_score().unwrap();
        assert_eq!(result.total, 60);
        assert_eq!(result.band, Band::DisarankanKonsultasi);
    }

    #[test]
    fn test_score_stays_in_range() {
        for value in 0..=MAX_ANSWER {
            for flip in 0..=MAX_ANSWER {
                let answers = answers_by(|q| if q.reverse { flip } else { value });
                let total = score(&QUESTIONS, &answers).unwrap();
                assert!((0..=MAX_SCORE).contains(&total));
            }
        }
    }

    #[test]
    fn test_answer_not_fulfilled() {
        let mut answers = AnswerSet::default();
        for _ in 0..19 {
            assert!(answers.push(1).is_ok());
        }
        assert!(!answers.is_complete());
        assert!(matches!(
            score(&QUESTIONS, &answers),
            Err(Error::NotFulfilled)
        ));
    }

    #[test]
    fn test_answer_exceeded() {
        let mut answers = AnswerSet::default();
        for _ in 0..20 {
            assert!(answers.push(1).is_ok());
        }
        assert!(answers.is_complete());
        assert!(matches!(answers.push(1), Err(Error::IllegalQuestion)));
    }

    #[test]
    fn test_insert() {
        let mut answers = AnswerSet::default();
        assert!(answers.insert(0, 1).is_err());
        assert!(answers.insert(1, 1).is_ok());
        assert!(answers.insert(20, 1).is_ok());
        assert!(answers.insert(21, 1).is_err());
        assert!(matches!(answers.insert(10, 4), Err(Error::IllegalAnswer)));
        assert_eq!(answers.get(9), None);
        assert_eq!(answers.answered(), 2);
    }
}
