//! Pagination utilities for TGit API responses.

use serde::{Deserialize, Serialize};

use crate::id::ProjectId;
use crate::response::Response;

/// A page of results from the TGit API.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Envelope of the response that carried this page.
    pub response: Response,
}

impl<T> Page<T> {
    /// Create a new page from items and the response envelope.
    #[must_use]
    pub fn new(items: Vec<T>, response: Response) -> Self {
        Self { items, response }
    }

    /// Whether the server reported a next page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.response.next_page > 0
    }

    /// The next page number, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        u32::try_from(self.response.next_page)
            .ok()
            .filter(|page| *page > 0)
    }

    /// Total number of items across all pages as reported by `X-Total`.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.response.total_items
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            response: self.response,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Common paging parameters accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Number of items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListOptions {
    /// Paging params for a specific page.
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

/// Query types that can be walked page by page.
pub trait Paginated {
    /// Mutable access to the paging parameters.
    fn list_options_mut(&mut self) -> &mut ListOptions;
}

impl Paginated for ListOptions {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        self
    }
}

impl<O: Paginated> Paginated for (ProjectId, O) {
    fn list_options_mut(&mut self) -> &mut ListOptions {
        self.1.list_options_mut()
    }
}
