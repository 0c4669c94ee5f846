use crate::{ApiClient, ClientError};
use chrono::NaiveDate;
use serde_json::Value;
use stockroom_auth::Permission;
use stockroom_types::{
    ApiResponse, BulkDeleteRequest, BulkDeleteResult, DateWindow, EmailLog, EmailLogQuery,
    EmailLogStats, EmailStatus, Paginated, QueryParams, Role,
};

/// Row cap of one CSV export.
pub const EXPORT_LIMIT: u32 = 10_000;

/// `/email-logs`: delivery history of report mail-outs.
///
/// Deleting log entries is reserved for Admins on top of the history
/// permission.
pub struct EmailLogsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> EmailLogsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &EmailLogQuery) -> Result<Paginated<EmailLog>, ClientError> {
        self.client.authorize(Permission::ReportsHistory)?;
        self.client.get_query("/email-logs", &query.to_pairs()).await
    }

    pub async fn get(&self, id: i64) -> Result<EmailLog, ClientError> {
        self.client.authorize(Permission::ReportsHistory)?;
        let resp: ApiResponse<EmailLog> = self.client.get(&format!("/email-logs/{id}")).await?;
        Ok(resp.data)
    }

    /// Counts by status and for the last day, week and month before `today`.
    pub async fn stats(&self, today: NaiveDate) -> Result<EmailLogStats, ClientError> {
        self.client.authorize(Permission::ReportsHistory)?;
        let by_status = |status: EmailStatus| vec![("status", status.as_str().to_string())];
        let since = |window: DateWindow| {
            window
                .date_from(today)
                .map(|d| ("dateFrom", d.format("%Y-%m-%d").to_string()))
                .into_iter()
                .collect::<Vec<_>>()
        };
        let all: Vec<(&str, String)> = Vec::new();
        let (sent, failed, pending) = (
            by_status(EmailStatus::Sent),
            by_status(EmailStatus::Failed),
            by_status(EmailStatus::Pending),
        );
        let (day, week, month) = (
            since(DateWindow::Today),
            since(DateWindow::Week),
            since(DateWindow::Month),
        );

        let (
            total_emails,
            total_sent,
            total_failed,
            total_pending,
            today_count,
            this_week_count,
            this_month_count,
        ) = tokio::try_join!(
            self.client.count("/email-logs", &all),
            self.client.count("/email-logs", &sent),
            self.client.count("/email-logs", &failed),
            self.client.count("/email-logs", &pending),
            self.client.count("/email-logs", &day),
            self.client.count("/email-logs", &week),
            self.client.count("/email-logs", &month),
        )?;

        Ok(EmailLogStats {
            total_emails,
            total_sent,
            total_failed,
            total_pending,
            today_count,
            this_week_count,
            this_month_count,
        })
    }

    /// Re-sends a failed email. Needs the send permission, not just history.
    pub async fn retry(&self, id: i64) -> Result<EmailLog, ClientError> {
        self.client.authorize(Permission::ReportsSend)?;
        let resp: ApiResponse<EmailLog> = self
            .client
            .post(&format!("/email-logs/{id}/retry"), &serde_json::json!({}))
            .await?;
        tracing::info!(id, status = %resp.data.status, "email retried");
        Ok(resp.data)
    }

    /// The log as CSV, filtered by the status and date bounds of `query`.
    ///
    /// Paging and search of `query` are ignored; at most [`EXPORT_LIMIT`]
    /// rows are exported.
    pub async fn export_csv(&self, query: &EmailLogQuery) -> Result<String, ClientError> {
        self.client.authorize(Permission::ReportsHistory)?;
        let mut params = Vec::new();
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(d) = query.date_from {
            params.push(("dateFrom", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = query.date_to {
            params.push(("dateTo", d.format("%Y-%m-%d").to_string()));
        }
        params.push(("format", "csv".to_string()));
        params.push(("limit", EXPORT_LIMIT.to_string()));

        let csv = self.client.get_text("/email-logs/export", &params).await?;
        tracing::info!(bytes = csv.len(), "email log exported");
        Ok(csv)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        self.authorize_delete()?;
        let _: Value = self.client.delete(&format!("/email-logs/{id}")).await?;
        Ok(())
    }

    /// Deletes several entries in one request; returns how many went.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] when `ids` is empty; nothing is sent.
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<u64, ClientError> {
        self.authorize_delete()?;
        if ids.is_empty() {
            return Err(ClientError::invalid_input("no email log ids to delete"));
        }

        let request = BulkDeleteRequest { ids: ids.to_vec() };
        let resp: ApiResponse<BulkDeleteResult> = self
            .client
            .delete_with_body("/email-logs/bulk", &request)
            .await?;
        tracing::info!(
            requested = ids.len(),
            deleted = resp.data.deleted_count,
            "email logs deleted"
        );
        Ok(resp.data.deleted_count)
    }

    fn authorize_delete(&self) -> Result<(), ClientError> {
        self.client.authorize(Permission::ReportsHistory)?;
        self.client.authorize_role(Role::Admin)
    }
}
