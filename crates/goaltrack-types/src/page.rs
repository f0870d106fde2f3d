//! Pagination types

use serde::{Deserialize, Serialize};

/// 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
        }
    }
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Slice `items` to this page. Page 0 is treated as page 1.
    pub fn apply<T: Clone>(&self, items: &[T]) -> PaginatedResult<T> {
        let page = self.page_number.max(1) as usize;
        let size = self.page_size as usize;
        let start = (page - 1).saturating_mul(size).min(items.len());
        let end = start.saturating_add(size).min(items.len());

        PaginatedResult {
            data: items[start..end].to_vec(),
            total_records: items.len() as u64,
            page_number: self.page_number.max(1),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub total_records: u64,
    pub page_number: u32,
    pub page_size: u32,
}
