use crate::text::Page;

/// What one side of a desktop spread shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Synthetic title page: book title and author, no body text.
    Title,
    Page(&'a Page),
    /// Past the last page.
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spread<'a> {
    pub left: Slot<'a>,
    pub right: Slot<'a>,
}

/// Number of spreads needed for `page_count` pages plus the title page.
#[must_use]
pub fn spread_count(page_count: usize) -> usize {
    (page_count + 1).div_ceil(2)
}

/// The spread at `index`, or `None` past the end.
///
/// Slot 0 is the title page and page `i` sits in slot `i + 1`; spread `k`
/// shows slots `2k` and `2k + 1`.
#[must_use]
pub fn spread_at(pages: &[Page], index: usize) -> Option<Spread<'_>> {
    if index >= spread_count(pages.len()) {
        return None;
    }
    Some(Spread {
        left: slot(pages, index * 2),
        right: slot(pages, index * 2 + 1),
    })
}

fn slot(pages: &[Page], slot_index: usize) -> Slot<'_> {
    match slot_index {
        0 => Slot::Title,
        i => pages.get(i - 1).map_or(Slot::Blank, Slot::Page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> Vec<Page> {
        (0..n).map(|i| Page::new(format!("p{i}"))).collect()
    }

    #[test]
    fn spread_count_includes_title() {
        assert_eq!(spread_count(0), 1);
        assert_eq!(spread_count(1), 1);
        assert_eq!(spread_count(2), 2);
        assert_eq!(spread_count(3), 2);
        assert_eq!(spread_count(4), 3);
    }

    #[test]
    fn spreads_place_every_page_once() {
        let pages = pages(3);
        let first = spread_at(&pages, 0).unwrap();
        assert_eq!(first.left, Slot::Title);
        assert_eq!(first.right, Slot::Page(&pages[0]));

        let second = spread_at(&pages, 1).unwrap();
        assert_eq!(second.left, Slot::Page(&pages[1]));
        assert_eq!(second.right, Slot::Page(&pages[2]));

        assert!(spread_at(&pages, 2).is_none());
    }

    #[test]
    fn odd_tail_is_blank() {
        let pages = pages(2);
        let last = spread_at(&pages, 1).unwrap();
        assert_eq!(last.left, Slot::Page(&pages[1]));
        assert_eq!(last.right, Slot::Blank);
    }

    #[test]
    fn empty_book_is_title_only() {
        let spread = spread_at(&[], 0).unwrap();
        assert_eq!(spread.left, Slot::Title);
        assert_eq!(spread.right, Slot::Blank);
    }
}
