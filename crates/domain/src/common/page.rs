//! Pagination envelope for list queries.

use serde::{Deserialize, Serialize};

/// One page of a paginated query result.
///
/// Field names match the wire shape clients already consume
/// (`totalDocs`, `perPage`, `currentPage`, `totalPages`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page from one query's rows plus the unfiltered total.
    pub fn new(docs: Vec<T>, total_docs: u64, current_page: u32, per_page: u32) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            (total_docs.div_ceil(per_page as u64)) as u32
        };
        Self {
            docs,
            total_docs,
            per_page,
            current_page,
            total_pages,
        }
    }

    /// Map the docs while keeping the pagination counters.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            per_page: self.per_page,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_exact_multiple() {
        let page: Page<i32> = Page::new(vec![], 40, 2, 20);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_map_preserves_counters() {
        let page = Page::new(vec![1, 2], 2, 1, 20).map(|n| n.to_string());
        assert_eq!(page.docs, vec!["1", "2"]);
        assert_eq!(page.total_docs, 2);
    }
}
