//! Typed endpoint services.
//!
//! Each service is a borrowed view over an [`ApiClient`]:
//!
//! ```text
//! client.inventory().list(&query)
//!   → authorize(inventory.view)     ClientError::Denied, nothing sent
//!   → GET /inventory?page=..&limit=..
//!   → Paginated<InventoryItem>
//! ```
//!
//! The permission gate is advisory; the server enforces its own checks and
//! may still answer 401/403.

mod auth;
mod dashboard;
mod email_logs;
mod inventory;
mod merchants;
mod reports;
mod users;

pub use auth::AuthApi;
pub use dashboard::{DashboardApi, DASHBOARD_SAMPLE_SIZE};
pub use email_logs::EmailLogsApi;
pub use inventory::{InventoryApi, DEFAULT_SEARCH_LIMIT};
pub use merchants::MerchantsApi;
pub use reports::ReportsApi;
pub use users::UsersApi;

use crate::{ApiClient, ClientError};
use stockroom_types::Paginated;

impl ApiClient {
    /// `pagination.total` of `path` under `filters`, fetching a single row.
    pub(crate) async fn count(
        &self,
        path: &str,
        filters: &[(&'static str, String)],
    ) -> Result<u64, ClientError> {
        let mut query = vec![("limit", "1".to_string())];
        query.extend_from_slice(filters);
        let page: Paginated<serde_json::Value> = self.get_query(path, &query).await?;
        Ok(page.pagination.total)
    }

    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    #[must_use]
    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    #[must_use]
    pub fn merchants(&self) -> MerchantsApi<'_> {
        MerchantsApi::new(self)
    }

    #[must_use]
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    #[must_use]
    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    #[must_use]
    pub fn email_logs(&self) -> EmailLogsApi<'_> {
        EmailLogsApi::new(self)
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi::new(self)
    }
}
