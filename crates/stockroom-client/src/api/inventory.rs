use crate::{ApiClient, ClientError};
use serde_json::Value;
use stockroom_auth::Permission;
use stockroom_types::{
    ApiResponse, InventoryItem, InventoryQuery, InventoryUpdate, NewInventoryItem, Paginated,
    QuantityUpdate, QueryParams,
};

/// Result count of a quick search when none is given.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// `/inventory` and `/search/inventory`.
pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &InventoryQuery) -> Result<Paginated<InventoryItem>, ClientError> {
        self.client.authorize(Permission::InventoryView)?;
        self.client.get_query("/inventory", &query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<InventoryItem, ClientError> {
        self.client.authorize(Permission::InventoryView)?;
        let resp: ApiResponse<InventoryItem> =
            self.client.get(&format!("/inventory/{id}")).await?;
        Ok(resp.data)
    }

    /// Quick search by name or SKU.
    ///
    /// A blank query returns no items without contacting the server.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<InventoryItem>, ClientError> {
        self.client.authorize(Permission::InventoryView)?;

        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let resp: ApiResponse<Vec<InventoryItem>> = self
            .client
            .get_query(
                "/search/inventory",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(resp.data)
    }

    pub async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, ClientError> {
        self.client.authorize(Permission::InventoryCreate)?;
        if item.name.trim().is_empty() {
            return Err(ClientError::invalid_input("item name is required"));
        }
        if item.quantity < 0 {
            return Err(ClientError::invalid_input("quantity cannot be negative"));
        }
        let resp: ApiResponse<InventoryItem> = self.client.post("/inventory", item).await?;
        Ok(resp.data)
    }

    pub async fn update(&self, id: i64, update: &InventoryUpdate) -> Result<InventoryItem, ClientError> {
        self.client.authorize(Permission::InventoryEdit)?;
        let resp: ApiResponse<InventoryItem> =
            self.client.put(&format!("/inventory/{id}"), update).await?;
        Ok(resp.data)
    }

    pub async fn update_quantity(&self, id: i64, quantity: i64) -> Result<InventoryItem, ClientError> {
        self.client.authorize(Permission::InventoryQuantityUpdate)?;
        if quantity < 0 {
            return Err(ClientError::invalid_input("quantity cannot be negative"));
        }
        let resp: ApiResponse<InventoryItem> = self
            .client
            .patch(&format!("/inventory/{id}/quantity"), &QuantityUpdate { quantity })
            .await?;
        Ok(resp.data)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client.authorize(Permission::InventoryDelete)?;
        let _: Value = self.client.delete(&format!("/inventory/{id}")).await?;
        Ok(())
    }
}
