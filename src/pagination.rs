//! Page math for the transaction table

use serde::Serialize;

/// Number of pages needed for `total_items`; never less than one
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Items shown on `page` (1-based). Empty when `page` is out of range.
pub fn slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 || page > total_pages(items.len(), page_size) {
        return &[];
    }

    let start = ((page - 1) * page_size).min(items.len());
    let end = (page * page_size).min(items.len());
    &items[start..end]
}

/// One button of the pagination bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub label: String,
    /// Page this control navigates to
    pub page: usize,
    pub is_active: bool,
    pub is_disabled: bool,
}

/// Builds the pagination bar: Previous, one control per page, Next.
///
/// Returns nothing when everything fits on a single page.
pub fn controls(current_page: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let mut bar = Vec::with_capacity(total_pages + 2);

    bar.push(PageControl {
        label: "Previous".to_string(),
        page: current_page.saturating_sub(1).max(1),
        is_active: false,
        is_disabled: current_page <= 1,
    });

    for page in 1..=total_pages {
        bar.push(PageControl {
            label: page.to_string(),
            page,
            is_active: page == current_page,
            is_disabled: false,
        });
    }

    bar.push(PageControl {
        label: "Next".to_string(),
        page: (current_page + 1).min(total_pages),
        is_active: false,
        is_disabled: current_page >= total_pages,
    });

    bar
}

/// Current position in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    /// Create a page state on page 1. A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Go back to page 1
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Move to `page` if it exists for `total_items`.
    ///
    /// Returns false and leaves the state unchanged otherwise.
    pub fn go_to(&mut self, page: usize, total_items: usize) -> bool {
        if page == 0 || page > total_pages(total_items, self.page_size) {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_pages(total_items, self.page_size)
    }

    /// Items of the current page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        slice(items, self.current_page, self.page_size)
    }

    /// Pagination bar for the current page
    pub fn controls(&self, total_items: usize) -> Vec<PageControl> {
        controls(self.current_page, self.total_pages(total_items))
    }
}
