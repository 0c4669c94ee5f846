//! Core types for stockroom.
//!
//! This crate holds the data shared by every other crate in the
//! workspace: domain records as the REST API sends them, the response
//! envelopes, list query parameters, and the [`Role`] hierarchy.
//!
//! # Crate Architecture
//!
//! ```text
//! stockroom-types   (Role, records, envelopes, queries)  ◄── HERE
//!     ↑
//! stockroom-auth    (Permission, checks, route guard, navigation)
//!     ↑
//! stockroom-client  (ApiClient, SessionManager, endpoint services, config)
//!     ↑
//! stockroom-cli     (`stockroom` binary)
//! ```
//!
//! # Wire Format
//!
//! Records use camelCase JSON field names and RFC 3339 timestamps,
//! matching the API. Request bodies skip unset optional fields so that
//! partial updates only touch what the caller provided.
//!
//! # Example
//!
//! ```
//! use stockroom_types::{InventoryQuery, ListState, QueryParams, Role};
//!
//! assert!(Role::Manager > Role::Viewer);
//!
//! let mut list = ListState::new(InventoryQuery::default());
//! list.toggle_sort("quantity");
//! let pairs = list.query().to_pairs();
//! assert_eq!(pairs[0], ("page", "1".to_string()));
//! ```

mod email;
mod envelope;
mod error;
mod inventory;
mod merchant;
mod query;
mod role;
mod stats;
mod user;

pub use email::{
    BroadcastReport, BulkDeleteRequest, BulkDeleteResult, EmailLog, EmailStatus, RecipientResult,
    ReportFormat, ReportStats, SendInventoryReport, SendReportResult,
};
pub use envelope::{
    ApiErrorBody, ApiErrorDetail, ApiResponse, FieldError, Paginated, PaginationMeta,
};
pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use inventory::{
    DashboardStats, InventoryItem, InventoryUpdate, NewInventoryItem, QuantityUpdate, StockLevel,
    LOW_STOCK_THRESHOLD,
};
pub use merchant::{
    parse_email_list, BulkImportRequest, BulkImportResult, Merchant, MerchantUpdate, NewMerchant,
};
pub use query::{
    ActiveFilter, DateWindow, EmailLogQuery, InventoryQuery, ListState, MerchantQuery,
    QueryParams, SortOrder, UserQuery, DEFAULT_PAGE_SIZE,
};
pub use role::{ParseRoleError, Role};
pub use stats::{EmailLogStats, MerchantStats, QuickStats, UserStats};
pub use user::{
    LoginData, LoginRequest, NewUser, RoleInfo, User, UserRef, UserStatusUpdate, UserUpdate,
};
