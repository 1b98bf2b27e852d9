//! Page arithmetic for result listings.
//!
//! Listing is best-effort discovery: a page outside the available range is
//! clamped to the nearest valid page instead of being rejected.

use std::num::NonZeroUsize;

use serde::Serialize;

/// A clamped page of a listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page_number: usize,
    pub total_pages: usize,
    pub per_page: NonZeroUsize,
}

impl Page {
    /// Number of records preceding this page.
    pub fn offset(&self) -> usize {
        (self.page_number - 1) * self.per_page.get()
    }

    /// Maximum number of records on this page.
    pub fn limit(&self) -> usize {
        self.per_page.get()
    }
}

/// Total page count for `total_count` records; an empty listing still has one page.
pub fn total_pages(total_count: usize, per_page: NonZeroUsize) -> usize {
    total_count.div_ceil(per_page.get()).max(1)
}

/// Resolves the requested page against the record count.
pub fn paginate(total_count: usize, requested_page: Option<i64>, per_page: NonZeroUsize) -> Page {
    let total_pages = total_pages(total_count, per_page);
    let page_number = match requested_page {
        None => 1,
        Some(page) if page < 1 => 1,
        Some(page) => usize::try_from(page).map_or(total_pages, |page| page.min(total_pages)),
    };

    Page {
        page_number,
        total_pages,
        per_page,
    }
}
