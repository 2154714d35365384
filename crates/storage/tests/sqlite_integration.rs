use storage::repository::{ProgressKey, ProgressStore, Storage, StoreEvent};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_overwrites_and_removes() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get(ProgressKey::LevelProgress).await.unwrap(), None);

    repo.set(ProgressKey::LevelProgress, "12".into())
        .await
        .unwrap();
    repo.set(ProgressKey::LevelProgress, "14".into())
        .await
        .unwrap();
    assert_eq!(
        repo.get(ProgressKey::LevelProgress).await.unwrap().as_deref(),
        Some("14")
    );

    repo.remove(ProgressKey::LevelProgress).await.unwrap();
    assert_eq!(repo.get(ProgressKey::LevelProgress).await.unwrap(), None);

    // Removing a missing key is a no-op.
    repo.remove(ProgressKey::LevelProgress).await.unwrap();
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    repo.set(ProgressKey::CurrentBookId, "1342".into())
        .await
        .unwrap();
    assert_eq!(
        repo.get(ProgressKey::CurrentBookId).await.unwrap().as_deref(),
        Some("1342")
    );
}

#[tokio::test]
async fn sqlite_storage_publishes_changes() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress_events?mode=memory&cache=shared")
        .await
        .expect("storage");
    let mut events = storage.progress.subscribe();

    storage
        .progress
        .set(ProgressKey::BooksRead, "1".into())
        .await
        .unwrap();
    storage
        .progress
        .remove(ProgressKey::ReadingStartTime)
        .await
        .unwrap();

    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Set(ProgressKey::BooksRead)
    );
    assert_eq!(
        events.recv().await.unwrap(),
        StoreEvent::Removed(ProgressKey::ReadingStartTime)
    );
}
