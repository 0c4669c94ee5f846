use crate::{ApiClient, ClientError};
use stockroom_auth::{Permission, RoleSource};
use stockroom_types::{DashboardStats, InventoryItem, Paginated, QuickStats};

/// Items fetched to derive the dashboard figures.
pub const DASHBOARD_SAMPLE_SIZE: u32 = 100;

pub struct DashboardApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DashboardApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Summary figures from the first [`DASHBOARD_SAMPLE_SIZE`] items.
    ///
    /// The total comes from pagination; low-stock count, value and recent
    /// items only cover the sample.
    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        self.client.authorize(Permission::DashboardView)?;
        let page: Paginated<InventoryItem> = self
            .client
            .get_query("/inventory", &[("limit", DASHBOARD_SAMPLE_SIZE.to_string())])
            .await?;
        Ok(DashboardStats::summarize(page.pagination.total, &page.data))
    }

    /// Headline counts of inventory, users and merchants.
    ///
    /// Categories the role may not view are left `None` and not requested.
    pub async fn quick_stats(&self) -> Result<QuickStats, ClientError> {
        self.client.authorize(Permission::DashboardView)?;
        let can_view = |p: Permission| self.client.state().decide(p).is_granted();

        let users = async {
            if can_view(Permission::UsersView) {
                self.client.count("/users", &[]).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let merchants = async {
            if can_view(Permission::MerchantsView) {
                self.client.count("/merchants", &[]).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let (inventory_count, user_count, merchant_count) =
            tokio::try_join!(self.client.count("/inventory", &[]), users, merchants)?;

        Ok(QuickStats {
            inventory_count,
            user_count,
            merchant_count,
        })
    }
}
