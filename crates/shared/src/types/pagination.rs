//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Smallest page size a client may request.
pub const MIN_PAGE_SIZE: u32 = 5;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 10;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page_id")]
    pub page_id: u32,
    /// Number of items per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_id() -> u32 {
    1
}

fn default_page_size() -> u32 {
    MIN_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_id: default_page_id(),
            page_size: default_page_size(),
        }
    }
}

impl PageRequest {
    /// Checks the page bounds a client is allowed to ask for.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page_id < 1 {
            return Err(AppError::Validation("page_id must be at least 1".into()));
        }
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(AppError::Validation(format!(
                "page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(())
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_id.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}
