//! Count summaries shown on the dashboard and list screens.
//!
//! Each figure is the `pagination.total` of a one-row list request, so
//! the server does the counting.

use serde::{Deserialize, Serialize};

/// Headline counts; a category the role cannot see is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub inventory_count: u64,
    pub user_count: Option<u64>,
    pub merchant_count: Option<u64>,
}

/// Staff accounts by role and by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: u64,
    pub admin_count: u64,
    pub manager_count: u64,
    pub viewer_count: u64,
    pub active_count: u64,
    pub inactive_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantStats {
    pub total: u64,
    pub active_count: u64,
    pub inactive_count: u64,
}

/// Email log totals by delivery status and by recency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLogStats {
    pub total_emails: u64,
    pub total_sent: u64,
    pub total_failed: u64,
    pub total_pending: u64,
    pub today_count: u64,
    /// Last 7 days.
    pub this_week_count: u64,
    /// Last 30 days.
    pub this_month_count: u64,
}

impl EmailLogStats {
    /// Sent share of all emails in whole percent, rounded half up.
    /// `0` when nothing was logged.
    #[must_use]
    pub fn success_rate(&self) -> u64 {
        if self.total_emails == 0 {
            return 0;
        }
        let sent = self.total_sent.min(self.total_emails);
        (sent * 200 + self.total_emails) / (self.total_emails * 2)
    }
}
