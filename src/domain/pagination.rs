//! Page-number windows and page bookkeeping shared by the list views.

use std::fmt;

use serde::Serialize;

/// Number of pages shown in full before the window starts truncating.
const FULL_WINDOW: usize = 7;

/// A single slot in a pagination footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    /// A navigable page number (1-based).
    Page(usize),
    /// A gap between non-adjacent page numbers.
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Computes the bounded, ellipsis-truncated page window for a footer.
///
/// The first and last pages are always present once the total exceeds seven
/// pages. The current page is expected to already be within
/// `1..=total_pages`.
///
/// ```
/// use resalloc::domain::pagination::{window, PageItem::{Ellipsis, Page}};
///
/// assert_eq!(
///     window(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
#[must_use]
pub fn window(current: usize, total_pages: usize) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= FULL_WINDOW {
        return (1..=total_pages).map(Page).collect();
    }

    if current <= 4 {
        vec![
            Page(1),
            Page(2),
            Page(3),
            Page(4),
            Page(5),
            Ellipsis,
            Page(total_pages),
        ]
    } else if current >= total_pages - 3 {
        let mut items = vec![Page(1), Ellipsis];
        items.extend((total_pages - 4..=total_pages).map(Page));
        items
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total_pages),
        ]
    }
}

/// Number of pages needed to show `total_items` at `per_page` items each.
#[must_use]
pub const fn total_pages(total_items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        total_items.div_ceil(per_page)
    }
}

/// Tracks the current page of a paginated view.
///
/// Navigation is always clamped to `1..=total_pages`. When there are no pages
/// at all the pager stays on page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    per_page: usize,
    total_items: usize,
}

impl Pager {
    /// Creates a pager on page 1 with no known items.
    ///
    /// A `per_page` of zero is treated as one.
    #[must_use]
    pub fn new(per_page: usize) -> Self {
        Self {
            current: 1,
            per_page: per_page.max(1),
            total_items: 0,
        }
    }

    /// The current (1-based) page.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Total number of items across all pages, as last reported.
    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    /// Number of pages for the current item count.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.per_page)
    }

    /// Offset of the first item on the current page, saturating at
    /// `usize::MAX` for absurd page numbers.
    #[must_use]
    pub const fn skip(&self) -> usize {
        (self.current - 1).saturating_mul(self.per_page)
    }

    /// The footer window for the current position.
    #[must_use]
    pub fn window(&self) -> Vec<PageItem> {
        window(self.current, self.total_pages())
    }

    /// Records a new item count without moving the current page.
    ///
    /// The current page is not clamped here: a server-side list reports its
    /// total together with the page that was requested.
    pub const fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
    }

    /// Moves to `page`, clamped to the valid range. Returns whether the page
    /// changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.total_pages().max(1));
        let changed = target != self.current;
        self.current = target;
        changed
    }

    /// Moves one page forward, stopping at the last page.
    pub fn next(&mut self) -> bool {
        self.go_to(self.current.saturating_add(1))
    }

    /// Moves one page back, stopping at page 1.
    pub fn previous(&mut self) -> bool {
        self.go_to(self.current.saturating_sub(1))
    }

    /// Returns to page 1.
    pub const fn reset(&mut self) {
        self.current = 1;
    }

    /// Jumps to `page` without clamping to the known total.
    ///
    /// Used when entering a view on a page requested by the user before the
    /// total is known; 0 is still treated as 1.
    pub fn start_at(&mut self, page: usize) {
        self.current = page.max(1);
    }

    /// The index range of the current page within a locally held list.
    #[must_use]
    pub fn slice_range(&self) -> std::ops::Range<usize> {
        let start = self.skip().min(self.total_items);
        let end = start.saturating_add(self.per_page).min(self.total_items);
        start..end
    }
}
