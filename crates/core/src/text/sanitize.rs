use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("sanitizer pattern should compile")
}

static TAGS: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]*>"));
static BRACES: LazyLock<Regex> = LazyLock::new(|| compile(r"\{[^}]*\}"));
static BRACKETS: LazyLock<Regex> = LazyLock::new(|| compile(r"\[.*?\]"));
static COPYRIGHT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)copyright(?:\s*(?:©|\(c\)))?(?:\s*\d{4})?"));
static RIGHTS_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)all rights reserved\.?"));
static LICENSE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?is)project gutenberg license.*?(?:\*\*\*|\z)"));
static WWW_LINKS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)www\.\S+"));
static HTTP_LINKS: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)https?://\S*"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

/// Strip markup and boilerplate from raw book text.
///
/// Patterns run in a fixed order; each removed range becomes a single space
/// and the result is whitespace-collapsed and trimmed. Never fails.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let removals: [&Regex; 8] = [
        &TAGS,
        &BRACES,
        &BRACKETS,
        &COPYRIGHT,
        &RIGHTS_RESERVED,
        &LICENSE_BLOCK,
        &WWW_LINKS,
        &HTTP_LINKS,
    ];

    let mut text = raw.to_string();
    for pattern in removals {
        text = pattern.replace_all(&text, " ").into_owned();
    }
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_and_boilerplate() {
        let raw = "<p>Hello</p> {ignore} [skip] Copyright 2020 All rights reserved. http://x.com";
        assert_eq!(sanitize(raw), "Hello");
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \n\t "), "");
        assert_eq!(sanitize("<br/><hr>"), "");
    }

    #[test]
    fn collapses_whitespace_across_lines() {
        assert_eq!(
            sanitize("It was\n\n  a dark\tand <i>stormy</i> night."),
            "It was a dark and stormy night."
        );
    }

    #[test]
    fn brackets_do_not_span_lines() {
        assert_eq!(sanitize("[note] kept [open\nline] end"), "kept [open line] end");
    }

    #[test]
    fn removes_license_block_to_marker_or_end() {
        let raw = "Story text. Project Gutenberg License\nterms and\nconditions *** More story.";
        assert_eq!(sanitize(raw), "Story text. More story.");

        let raw = "Story text. project gutenberg license\nruns to the end";
        assert_eq!(sanitize(raw), "Story text.");
    }

    #[test]
    fn removes_links() {
        assert_eq!(
            sanitize("Visit www.gutenberg.org or https://example.com/a?b=c today"),
            "Visit or today"
        );
        assert_eq!(sanitize("See http://www.example.com now"), "See now");
    }

    #[test]
    fn copyright_variants() {
        assert_eq!(sanitize("COPYRIGHT (c) 1999 Someone"), "Someone");
        assert_eq!(sanitize("Copyright © 2001"), "");
    }

    #[test]
    fn brackets_removed_before_license_block() {
        // The bracketed marker is gone, so the block runs to the next real one.
        assert_eq!(
            sanitize("Intro. Project Gutenberg License [***] tail *** Outro."),
            "Intro. Outro."
        );
    }
}
