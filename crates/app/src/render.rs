use std::fmt::Write as _;

use reader_core::model::{Book, ProgressState, View};
use reader_core::text::{Layout, Slot};
use services::{CompletionReport, ExitCredit};

const RULE: &str = "----------------------------------------";

/// Parsed reader input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Next,
    Previous,
    Page(usize),
    Layout(Layout),
    Quit,
    Unknown,
}

pub fn parse_input(line: &str) -> Input {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (None, _) | (Some("n" | "next"), None) => Input::Next,
        (Some("p" | "prev" | "previous"), None) => Input::Previous,
        (Some("q" | "quit" | "exit"), None) => Input::Quit,
        (Some("g" | "go"), Some(number)) => number.parse().map_or(Input::Unknown, Input::Page),
        (Some("l" | "layout"), Some(name)) => name.parse().map_or(Input::Unknown, Input::Layout),
        (Some(number), None) => number.parse().map_or(Input::Unknown, Input::Page),
        _ => Input::Unknown,
    }
}

pub fn view(book: &Book, view: &View<'_>, position: usize, view_count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    match view {
        View::Page(page) => {
            let _ = writeln!(out, "{}", page.as_str());
        }
        View::Spread(spread) => {
            write_slot(&mut out, book, spread.left);
            let _ = writeln!(out, "{RULE}");
            write_slot(&mut out, book, spread.right);
        }
    }
    let _ = writeln!(out, "{RULE}");
    let _ = write!(out, "[{} / {}]", position + 1, view_count);
    out
}

fn write_slot(out: &mut String, book: &Book, slot: Slot<'_>) {
    match slot {
        Slot::Title => {
            let _ = writeln!(out, "{}", book.title());
            let _ = writeln!(out, "by {}", book.primary_author());
        }
        Slot::Page(page) => {
            let _ = writeln!(out, "{}", page.as_str());
        }
        Slot::Blank => {
            let _ = writeln!(out);
        }
    }
}

pub fn completion(report: &CompletionReport) -> String {
    match report {
        CompletionReport::Dispatched => "Book completed. Sending quest progress.".into(),
        CompletionReport::Skipped => "Book completed.".into(),
    }
}

pub fn exit_credit(credit: Option<&ExitCredit>) -> String {
    match credit {
        Some(credit) => format!(
            "Read for {} min: +{} level progress (now {}), {} completed",
            credit.elapsed_minutes, credit.gained, credit.level_progress, credit.completed_count
        ),
        None => "Session too short for progress credit.".into(),
    }
}

pub fn progress(state: &ProgressState, books_read: u32, current_book: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "level progress: {}", state.level_progress());
    let _ = writeln!(out, "completed:      {}", state.completed_count());
    let _ = writeln!(out, "books read:     {books_read}");
    let _ = write!(out, "current book:   {}", current_book.unwrap_or("-"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_core::model::{Author, BookId};
    use reader_core::text::{Page, Spread};

    fn book() -> Book {
        Book::new(
            BookId::new("11").unwrap(),
            "Alice's Adventures in Wonderland",
            vec![Author {
                name: "Lewis Carroll".into(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn input_commands() {
        assert_eq!(parse_input(""), Input::Next);
        assert_eq!(parse_input(" n "), Input::Next);
        assert_eq!(parse_input("prev"), Input::Previous);
        assert_eq!(parse_input("g 4"), Input::Page(4));
        assert_eq!(parse_input("12"), Input::Page(12));
        assert_eq!(parse_input("q"), Input::Quit);
        assert_eq!(parse_input("g four"), Input::Unknown);
        assert_eq!(parse_input("n 2"), Input::Unknown);
        assert_eq!(parse_input("l mobile"), Input::Layout(Layout::Mobile));
        assert_eq!(parse_input("layout Desktop"), Input::Layout(Layout::Desktop));
        assert_eq!(parse_input("l tablet"), Input::Unknown);
    }

    #[test]
    fn completion_messages() {
        assert_eq!(
            completion(&CompletionReport::Dispatched),
            "Book completed. Sending quest progress."
        );
        assert_eq!(completion(&CompletionReport::Skipped), "Book completed.");
    }

    #[test]
    fn title_slot_shows_title_and_author() {
        let page = Page::new("Down the Rabbit-Hole.");
        let spread = View::Spread(Spread {
            left: Slot::Title,
            right: Slot::Page(&page),
        });
        let out = view(&book(), &spread, 0, 3);
        assert!(out.contains("Alice's Adventures in Wonderland\nby Lewis Carroll"));
        assert!(out.contains("Down the Rabbit-Hole."));
        assert!(out.ends_with("[1 / 3]"));
    }

    #[test]
    fn mobile_page_is_printed_as_is() {
        let page = Page::new("one two three");
        let out = view(&book(), &View::Page(&page), 4, 5);
        assert!(out.contains("one two three"));
        assert!(!out.contains("Lewis Carroll"));
        assert!(out.ends_with("[5 / 5]"));
    }

    #[test]
    fn progress_summary_lists_counters() {
        let state = ProgressState::from_persisted(40, 3);
        let out = progress(&state, 7, None);
        assert!(out.contains("level progress: 40"));
        assert!(out.contains("books read:     7"));
        assert!(out.ends_with("current book:   -"));
    }
}
