use reader_core::model::{Book, BookId, ReaderSettings};
use reader_core::text::Layout;
use reader_core::time::fixed_now;
use services::{AppServices, Clock, CompletionReport, NavRequest};

#[tokio::test]
async fn sqlite_backed_reading_persists_progress() {
    let services = AppServices::new_sqlite(
        "sqlite:file:memdb_services_flow?mode=memory&cache=shared",
        Clock::fixed(fixed_now()),
        ReaderSettings::default(),
    )
    .await
    .expect("services");
    let reader = services.reader();

    let text = (1..=450)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let book = Book::new(BookId::new("42").unwrap(), "Numbers", Vec::new())
        .unwrap()
        .with_content(text);

    let mut open = reader.open(book, Layout::Mobile).await.unwrap();
    assert_eq!(open.session().view_count(), 3);

    let step = reader
        .navigate(&mut open, NavRequest::GoTo(usize::MAX))
        .await
        .unwrap();
    assert_eq!(step.position, 2);
    // No auth token configured, so only local counters move.
    assert_eq!(step.completion, Some(CompletionReport::Skipped));

    let progress = services.progress().snapshot().await.unwrap();
    assert_eq!(progress.completed_count(), 1);
    assert_eq!(progress.level_progress(), 0);
}
