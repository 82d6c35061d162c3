//! Page cursor for paginated movie lists.

use movie_explorer_api::tmdb::MAX_PAGES;

/// Page cursor clamped to `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-based).
    page: u32,
    /// Total pages reported by the latest accepted response.
    total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    /// Creates a cursor on page 1 of 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            page: 1,
            total_pages: 1,
        }
    }

    /// Returns the current page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Moves to `target` if it lies in `[1, total_pages]`.
    ///
    /// Returns `false` and leaves the cursor untouched otherwise.
    pub const fn go_to(&mut self, target: u32) -> bool {
        if target >= 1 && target <= self.total_pages {
            self.page = target;
            true
        } else {
            false
        }
    }

    /// Moves to the next page, if any.
    pub fn next(&mut self) -> bool {
        self.page.checked_add(1).is_some_and(|t| self.go_to(t))
    }

    /// Moves to the previous page, if any.
    pub fn prev(&mut self) -> bool {
        self.page.checked_sub(1).is_some_and(|t| self.go_to(t))
    }

    /// Returns `true` if a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Returns `true` if a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Resets the cursor to page 1 (the total is kept until the next response).
    pub const fn reset(&mut self) {
        self.page = 1;
    }

    /// Resets to page 1 of 1 until a response reports the real total.
    pub const fn forget_total(&mut self) {
        self.page = 1;
        self.total_pages = 1;
    }

    /// Records the total reported by a response, clamped to `[1, MAX_PAGES]`.
    ///
    /// Pulls the cursor back onto the last page if it now lies past it and
    /// returns `true` in that case.
    pub fn set_total_pages(&mut self, total_pages: u32) -> bool {
        self.total_pages = total_pages.clamp(1, MAX_PAGES);
        if self.page > self.total_pages {
            self.page = self.total_pages;
            return true;
        }
        false
    }
}
