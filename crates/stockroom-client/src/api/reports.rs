use crate::{ApiClient, ClientError};
use stockroom_auth::Permission;
use stockroom_types::{
    ApiResponse, BroadcastReport, ReportFormat, ReportStats, SendInventoryReport,
    SendReportResult,
};

/// `/reports`.
pub struct ReportsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Mails the inventory report to explicit recipients.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidInput`] when there are no recipients or one of
    /// them has no `@`; nothing is sent in that case.
    pub async fn send_inventory(
        &self,
        report: &SendInventoryReport,
    ) -> Result<SendReportResult, ClientError> {
        self.client.authorize(Permission::ReportsSend)?;
        validate_recipients(&report.recipients)?;

        let resp: ApiResponse<SendReportResult> =
            self.client.post("/reports/send-inventory", report).await?;
        log_result(&resp.data);
        Ok(resp.data)
    }

    /// Mails the inventory report to every active merchant.
    pub async fn send_to_merchants(
        &self,
        report: &BroadcastReport,
    ) -> Result<SendReportResult, ClientError> {
        self.client.authorize(Permission::ReportsSend)?;
        let resp: ApiResponse<SendReportResult> =
            self.client.post("/reports/send-to-merchants", report).await?;
        log_result(&resp.data);
        Ok(resp.data)
    }

    pub async fn stats(&self) -> Result<ReportStats, ClientError> {
        self.client.authorize(Permission::ReportsView)?;
        let resp: ApiResponse<ReportStats> = self.client.get("/reports/stats").await?;
        Ok(resp.data)
    }

    /// The full inventory report as a CSV or JSON document.
    pub async fn download_inventory(&self, format: ReportFormat) -> Result<String, ClientError> {
        self.client.authorize(Permission::ReportsView)?;
        let document = self
            .client
            .get_text("/reports/inventory", &[("format", format.as_str().to_string())])
            .await?;
        tracing::info!(%format, bytes = document.len(), "inventory report downloaded");
        Ok(document)
    }
}

fn validate_recipients(recipients: &[String]) -> Result<(), ClientError> {
    if recipients.is_empty() {
        return Err(ClientError::invalid_input("at least one recipient is required"));
    }
    if let Some(bad) = recipients.iter().find(|r| !r.contains('@')) {
        return Err(ClientError::invalid_input(format!(
            "'{bad}' is not an email address"
        )));
    }
    Ok(())
}

fn log_result(result: &SendReportResult) {
    if result.total_failed > 0 {
        tracing::warn!(
            sent = result.total_sent,
            failed = result.total_failed,
            "report partially delivered"
        );
    } else {
        tracing::info!(sent = result.total_sent, "report sent");
    }
}
