use crate::{ApiClient, ClientError};
use serde_json::Value;
use stockroom_auth::Permission;
use stockroom_types::{
    ActiveFilter, ApiResponse, BulkImportRequest, BulkImportResult, Merchant, MerchantQuery,
    MerchantStats, MerchantUpdate, NewMerchant, Paginated, QueryParams,
};

/// `/merchants`.
pub struct MerchantsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MerchantsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &MerchantQuery) -> Result<Paginated<Merchant>, ClientError> {
        self.client.authorize(Permission::MerchantsView)?;
        self.client.get_query("/merchants", &query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<Merchant, ClientError> {
        self.client.authorize(Permission::MerchantsView)?;
        let resp: ApiResponse<Merchant> = self.client.get(&format!("/merchants/{id}")).await?;
        Ok(resp.data)
    }

    pub async fn create(&self, merchant: &NewMerchant) -> Result<Merchant, ClientError> {
        self.client.authorize(Permission::MerchantsCreate)?;
        if !merchant.email.contains('@') {
            return Err(ClientError::invalid_input(format!(
                "'{}' is not an email address",
                merchant.email
            )));
        }
        let resp: ApiResponse<Merchant> = self.client.post("/merchants", merchant).await?;
        Ok(resp.data)
    }

    pub async fn update(&self, id: i64, update: &MerchantUpdate) -> Result<Merchant, ClientError> {
        self.client.authorize(Permission::MerchantsEdit)?;
        let resp: ApiResponse<Merchant> =
            self.client.put(&format!("/merchants/{id}"), update).await?;
        Ok(resp.data)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.client.authorize(Permission::MerchantsDelete)?;
        let _: Value = self.client.delete(&format!("/merchants/{id}")).await?;
        Ok(())
    }

    /// Total, active and inactive merchant counts.
    pub async fn stats(&self) -> Result<MerchantStats, ClientError> {
        self.client.authorize(Permission::MerchantsView)?;
        let all: Vec<(&str, String)> = Vec::new();
        let active = vec![("status", ActiveFilter::Active.as_str().to_string())];
        let inactive = vec![("status", ActiveFilter::Inactive.as_str().to_string())];

        let (total, active_count, inactive_count) = tokio::try_join!(
            self.client.count("/merchants", &all),
            self.client.count("/merchants", &active),
            self.client.count("/merchants", &inactive),
        )?;

        Ok(MerchantStats {
            total,
            active_count,
            inactive_count,
        })
    }

    /// Imports already-parsed addresses (see
    /// [`parse_email_list`](stockroom_types::parse_email_list)).
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] when `emails` is empty.
    pub async fn bulk_import(
        &self,
        emails: &[String],
        default_name: Option<String>,
    ) -> Result<BulkImportResult, ClientError> {
        self.client.authorize(Permission::MerchantsImport)?;
        if emails.is_empty() {
            return Err(ClientError::invalid_input("no email addresses to import"));
        }

        let request = BulkImportRequest::from_emails(emails, default_name);
        let resp: ApiResponse<BulkImportResult> =
            self.client.post("/merchants/bulk-import", &request).await?;

        tracing::info!(
            imported = resp.data.imported,
            skipped = resp.data.skipped,
            "merchant import finished"
        );
        Ok(resp.data)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::testing::offline_client;
    use crate::ClientError;
    use stockroom_auth::{AccessDenied, Permission};
    use stockroom_types::{MerchantQuery, Role};

    #[tokio::test]
    async fn viewer_cannot_list_merchants() {
        let client = offline_client(Some(Role::Viewer));
        let err = client
            .merchants()
            .list(&MerchantQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Denied(AccessDenied::MissingPermission {
                permission: Permission::MerchantsView,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn viewer_cannot_count_merchants() {
        let client = offline_client(Some(Role::Viewer));
        let err = client.merchants().stats().await.unwrap_err();
        assert!(matches!(err, ClientError::Denied(_)));
    }

    #[tokio::test]
    async fn empty_import_rejected() {
        let client = offline_client(Some(Role::Manager));
        let err = client.merchants().bulk_import(&[], None).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }
}
