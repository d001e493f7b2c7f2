use mental_check::report::{trend, Summary};
use mental_check::store::{HistoryStore, LocalStore};
use mental_check::{Backend, Band, Error, Session, State, QUESTIONS};

/// Menjalankan sesi baru sampai selesai, tiap butir dijawab dengan `pick`.
fn finish(pick: impl Fn(bool) -> u8) -> Session {
    let mut session = Session::start();
    while let Some(step) = session.step() {
        let question = QUESTIONS.get(step).unwrap();
        session.next(Some(pick(question.reverse))).unwrap();
    }
    assert_eq!(session.state(), State::Complete);
    session
}

#[tokio::test]
async fn lowest_answers_are_saved_as_good() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::in_dir(dir.path());

    let session = finish(|reverse| if reverse { 3 } else { 0 });
    let completed = session.complete(&store, "Ayu", "").await.unwrap();

    assert_eq!(completed.result.total, 0);
    assert_eq!(completed.result.max, 60);
    assert_eq!(completed.result.band, Band::Baik);
    assert_eq!(completed.saved.backend, Backend::Local);

    let history = store.list().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].category, "Baik");
    assert_eq!(history[0].name, "Ayu");
}

#[tokio::test]
async fn highest_answers_recommend_consultation() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::in_dir(dir.path());

    let session = finish(|reverse| if reverse { 0 } else { 3 });
    let completed = session.complete(&store, " ", "capek").await.unwrap();

    assert_eq!(completed.result.total, 60);
    assert_eq!(completed.result.band, Band::DisarankanKonsultasi);
    assert_eq!(completed.saved.record.name, "-");
    assert_eq!(completed.saved.record.note, "capek");
}

#[tokio::test]
async fn just_above_good_boundary_is_mild_concern() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::in_dir(dir.path());

    // minimum di semua butir, lalu 20 poin di butir biasa: 6 × 3 + 1 × 2
    let mut session = Session::start();
    let mut points_left = 20u8;
    while let Some(step) = session.step() {
        let question = QUESTIONS.get(step).unwrap();
        let value = if question.reverse {
            3
        } else {
            let value = points_left.min(3);
            points_left -= value;
            value
        };
        session.next(Some(value)).unwrap();
    }
    let completed = session.complete(&store, "Citra", "").await.unwrap();
    assert_eq!(completed.result.total, 20);
    assert_eq!(completed.result.band, Band::PerluPerhatianRingan);
}

#[tokio::test]
async fn incomplete_session_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::in_dir(dir.path());

    let mut session = Session::start();
    session.next(Some(1)).unwrap();
    assert!(matches!(
        session.complete(&store, "Ayu", "").await,
        Err(Error::NotComplete)
    ));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn history_statistics_over_several_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::in_dir(dir.path());

    let mut session = finish(|reverse| if reverse { 3 } else { 0 });
    session.complete(&store, "a", "").await.unwrap();
    session.restart();
    assert_eq!(session.state(), State::InProgress { step: 0 });

    finish(|_| 0).complete(&store, "b", "").await.unwrap();
    finish(|reverse| if reverse { 0 } else { 3 })
        .complete(&store, "c", "")
        .await
        .unwrap();

    let history = store.list().await.unwrap();
    let summary = Summary::from_records(&history).unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.min, 0);
    assert_eq!(summary.max, 60);
    assert_eq!(summary.mean, 28.0);

    let bars = trend(&history);
    let totals = bars.iter().map(|bar| bar.total).collect::<Vec<_>>();
    assert_eq!(totals, [0, 24, 60]);
    assert_eq!(
        bars.iter().map(|bar| bar.band).collect::<Vec<_>>(),
        [Band::Baik, Band::PerluPerhatianRingan, Band::DisarankanKonsultasi]
    );

    store.clear_all().await.unwrap();
    assert!(store.list().await.unwrap().is_empty());
}
