//! Common types used across Brew Lens

use serde::{Deserialize, Serialize};

/// Largest page size a client may request
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Build pagination from optional query values, clamping to sane bounds
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        let default = Self::default();
        Self {
            page: page.unwrap_or(default.page).max(1),
            per_page: per_page.unwrap_or(default.per_page).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Slice one page out of `items`
    pub fn paginate<T: Clone>(&self, items: &[T]) -> PaginatedResponse<T> {
        let total_items = items.len() as u64;
        let total_pages = items.len().div_ceil(self.per_page as usize) as u32;
        let start = (self.page.saturating_sub(1) as usize).saturating_mul(self.per_page as usize);
        let data = items
            .iter()
            .skip(start)
            .take(self.per_page as usize)
            .cloned()
            .collect();

        PaginatedResponse {
            data,
            pagination: PaginationMeta {
                page: self.page,
                per_page: self.per_page,
                total_items,
                total_pages,
            },
        }
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_clamps() {
        let p = Pagination::from_query(Some(0), Some(1000));
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, MAX_PER_PAGE);

        let p = Pagination::from_query(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 20);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items: Vec<u32> = (1..=45).collect();
        let page = Pagination { page: 3, per_page: 20 }.paginate(&items);
        assert_eq!(page.data, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.pagination.total_items, 45);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        let items = vec![1, 2, 3];
        let page = Pagination { page: 5, per_page: 2 }.paginate(&items);
        assert!(page.data.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
    }
}
