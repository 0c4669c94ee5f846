//! REST response envelopes.
//!
//! The API wraps every payload:
//!
//! ```text
//! { "success": true,  "data": T, "message": "..." }              ApiResponse<T>
//! { "success": true,  "data": [T], "pagination": {...} }          Paginated<T>
//! { "success": false, "error": { "code", "message", "details" } } ApiErrorBody
//! ```

use serde::{Deserialize, Serialize};

/// Single-payload envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Pagination block of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// 1-based `(first, last)` row numbers of this page, or `None` when the
    /// page is empty.
    ///
    /// ```
    /// use stockroom_types::PaginationMeta;
    ///
    /// let meta = PaginationMeta {
    ///     page: 3, limit: 10, total: 25, total_pages: 3, has_next: false, has_prev: true,
    /// };
    /// assert_eq!(meta.showing_range(), Some((21, 25)));
    /// ```
    #[must_use]
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 || self.page == 0 || self.limit == 0 {
            return None;
        }
        let first = u64::from(self.page - 1) * u64::from(self.limit) + 1;
        if first > self.total {
            return None;
        }
        let last = (u64::from(self.page) * u64::from(self.limit)).min(self.total);
        Some((first, last))
    }
}

/// List envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error detail inside [`ApiErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<FieldError>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}
