mod args;
mod render;

use reader_core::model::{Author, Book};
use reader_core::text::Layout;
use services::config::settings_from_env;
use services::{AppServices, Clock, NavRequest, OpenBook, ReaderService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{ArgsError, Command, ReadArgs, print_usage};
use crate::render::Input;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv = std::env::args().skip(1);
    let cmd = args::parse(argv, std::env::var("READER_DB_URL").ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::Progress { db_url } => show_progress(&db_url).await,
        Command::Read(read) => read_book(read).await,
    }
}

async fn open_services(db_url: &str) -> Result<AppServices, Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup; the library crates never touch the filesystem directly.
    prepare_sqlite_file(db_url)?;
    let settings = settings_from_env()?;
    Ok(AppServices::new_sqlite(db_url, Clock::default_clock(), settings).await?)
}

async fn show_progress(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let services = open_services(db_url).await?;
    let ledger = services.progress();
    let state = ledger.snapshot().await?;
    let books_read = ledger.books_read().await?;
    let current = ledger.current_book().await?;
    println!(
        "{}",
        render::progress(&state, books_read, current.as_ref().map(|id| id.as_str()))
    );
    Ok(())
}

async fn read_book(read: ReadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let services = open_services(&read.db_url).await?;

    let title = read
        .title
        .unwrap_or_else(|| format!("Book {}", read.book_id));
    let authors = read
        .author
        .map(|name| vec![Author { name }])
        .unwrap_or_default();
    let mut book = Book::new(read.book_id, title, authors)?;
    if let Some(path) = &read.file {
        book = book.with_content(tokio::fs::read_to_string(path).await?);
    }

    let reader = services.reader();
    let _ticker = services.start_ticker();
    let mut open = reader.open(book, read.layout).await?;
    info!(
        book_id = %open.document().book().id(),
        layout = open.document().layout().as_str(),
        views = open.document().view_count(),
        "book opened"
    );
    if let Some(report) = open.opening_report() {
        println!("{}", render::completion(report));
    }
    print_current(&open);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let request = match render::parse_input(&line) {
            Input::Quit => break,
            Input::Next => NavRequest::Next,
            Input::Previous => NavRequest::Previous,
            Input::Page(number) => NavRequest::PageNumber(number),
            Input::Layout(layout) => {
                switch_layout(&reader, &mut open, layout).await?;
                continue;
            }
            Input::Unknown => {
                eprintln!("commands: n, p, g <page>, l <mobile|desktop>, q");
                continue;
            }
        };
        step(&reader, &mut open, request).await?;
    }

    let credit = reader.close(open).await?;
    println!("{}", render::exit_credit(credit.as_ref()));
    Ok(())
}

async fn step(
    reader: &ReaderService,
    open: &mut OpenBook,
    request: NavRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let step = reader.navigate(open, request).await?;
    if step.moved {
        print_current(open);
    }
    if let Some(report) = &step.completion {
        println!("{}", render::completion(report));
    }
    Ok(())
}

async fn switch_layout(
    reader: &ReaderService,
    open: &mut OpenBook,
    layout: Layout,
) -> Result<(), Box<dyn std::error::Error>> {
    if open.document().layout() == layout {
        return Ok(());
    }
    let report = reader.relayout(open, layout).await?;
    info!(
        layout = layout.as_str(),
        views = open.document().view_count(),
        "layout changed"
    );
    print_current(open);
    if let Some(report) = &report {
        println!("{}", render::completion(report));
    }
    Ok(())
}

fn print_current(open: &OpenBook) {
    let document = open.document();
    let position = open.session().position();
    if let Some(view) = open.current_view() {
        println!(
            "{}",
            render::view(document.book(), &view, position, document.view_count())
        );
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
