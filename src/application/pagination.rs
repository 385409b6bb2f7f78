//! Page-number pagination shared by the blog listings.
//!
//! Callers speak one-indexed page numbers; repositories receive a zero-indexed
//! [`BlogPostsPageRequest`]. [`PaginationInfo`] carries the window back out for
//! rendering.

use serde::Serialize;
use thiserror::Error;

/// Posts per listing page.
pub const PAGE_SIZE: u32 = 10;

/// Pages shown on either side of the current page in navigation.
const NAVIGATION_WINDOW: u64 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page numbers start at 1, got {page}")]
    PageOutOfRange { page: u32 },
}

/// Zero-indexed request for a slice of published posts, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlogPostsPageRequest {
    page: u32,
    size: u32,
}

impl BlogPostsPageRequest {
    pub fn new(page: u32) -> Self {
        Self {
            page,
            size: PAGE_SIZE,
        }
    }

    /// Translate a one-indexed page number into a zero-indexed request.
    pub fn for_page(one_indexed: u32) -> Result<Self, PaginationError> {
        one_indexed
            .checked_sub(1)
            .map(Self::new)
            .ok_or(PaginationError::PageOutOfRange { page: one_indexed })
    }

    pub fn first() -> Self {
        Self::new(0)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One slot in the page navigation bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageElement {
    pub number: u64,
    pub is_current: bool,
    pub is_gap: bool,
}

impl PageElement {
    fn page(number: u64, current: u64) -> Self {
        Self {
            number,
            is_current: number == current,
            is_gap: false,
        }
    }

    fn gap() -> Self {
        Self {
            number: 0,
            is_current: false,
            is_gap: true,
        }
    }
}

/// Page window metadata derived from a request and the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    current_page: u64,
    page_size: u32,
    total_items: u64,
    total_pages: u64,
}

impl PaginationInfo {
    pub fn new(request: &BlogPostsPageRequest, total_items: u64) -> Self {
        let page_size = request.size().max(1);
        Self {
            current_page: u64::from(request.page()) + 1,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(u64::from(page_size)),
        }
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn is_previous_visible(&self) -> bool {
        self.current_page > 1
    }

    pub fn is_next_visible(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn previous_page_number(&self) -> u64 {
        self.current_page.saturating_sub(1).max(1)
    }

    pub fn next_page_number(&self) -> u64 {
        self.current_page + 1
    }

    /// First page, last page and a window around the current page, with
    /// skipped runs collapsed into gaps.
    pub fn page_elements(&self) -> Vec<PageElement> {
        if self.total_pages == 0 {
            return Vec::new();
        }

        let last = self.total_pages;
        let window_start = self.current_page.saturating_sub(NAVIGATION_WINDOW).max(1);
        let window_end = self
            .current_page
            .saturating_add(NAVIGATION_WINDOW)
            .min(last);

        let mut numbers = vec![1];
        numbers.extend(window_start..=window_end);
        numbers.push(last);
        numbers.sort_unstable();
        numbers.dedup();

        let mut elements = Vec::with_capacity(numbers.len() + 2);
        let mut previous: Option<u64> = None;
        for number in numbers {
            if previous.is_some_and(|prev| number > prev + 1) {
                elements.push(PageElement::gap());
            }
            elements.push(PageElement::page(number, self.current_page));
            previous = Some(number);
        }
        elements
    }
}

/// Items of one listing page together with their pagination descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultList<T> {
    items: Vec<T>,
    pagination: PaginationInfo,
}

impl<T> ResultList<T> {
    pub fn new(items: Vec<T>, pagination: PaginationInfo) -> Self {
        Self { items, pagination }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> &PaginationInfo {
        &self.pagination
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_parts(self) -> (Vec<T>, PaginationInfo) {
        (self.items, self.pagination)
    }
}
