//! Zero-based pagination parameters for list endpoints.

use serde::Deserialize;

/// Pagination query parameters (`?page=0&pageSize=20`).
///
/// Pages are zero-based, matching the data grid on the dashboard frontend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PAGE_SIZE: usize = 100;

    /// Default items per page.
    const DEFAULT_PAGE_SIZE: usize = 20;

    pub fn limit(&self) -> usize {
        self.page_size
            .unwrap_or(Self::DEFAULT_PAGE_SIZE)
            .clamp(1, Self::MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        self.current_page().saturating_mul(self.limit())
    }

    pub fn current_page(&self) -> usize {
        self.page.unwrap_or(0)
    }
}
