//! List query parameters and page-local list state.
//!
//! Each list screen (inventory, merchants, users, email logs) keeps a
//! query value plus the pagination block of the last response. The
//! rules are shared:
//!
//! - Only set, non-empty parameters are sent, in a fixed order.
//! - Changing the search text or any filter returns to page 1.
//! - Page navigation stays within `[1, total_pages]` once known.

use crate::{EmailStatus, PaginationMeta, Role};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default rows per page of a list screen.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A list query that can be rendered as URL query pairs.
pub trait QueryParams: Clone {
    /// Current page, if set.
    fn page(&self) -> Option<u32>;

    fn set_page(&mut self, page: Option<u32>);

    fn limit(&self) -> Option<u32>;

    fn set_limit(&mut self, limit: Option<u32>);

    /// Replaces the free-text search (blank clears it).
    fn set_search(&mut self, search: Option<String>);

    /// Query pairs in wire order, skipping unset values.
    fn to_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Active / inactive filter for merchants and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveFilter {
    Active,
    Inactive,
}

impl ActiveFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ActiveFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown status '{other}' (expected active or inactive)")),
        }
    }
}

fn push_num(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(v) = value.filter(|v| *v > 0) {
        pairs.push((key, v.to_string()));
    }
}

fn push_str(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        pairs.push((key, v.to_string()));
    }
}

fn normalize(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `GET /inventory` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

impl QueryParams for InventoryQuery {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn set_limit(&mut self, limit: Option<u32>) {
        self.limit = limit;
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = normalize(search);
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "search", self.search.as_deref());
        push_str(&mut pairs, "sort", self.sort.as_deref());
        push_str(&mut pairs, "order", self.order.map(SortOrder::as_str));
        pairs
    }
}

/// `GET /merchants` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchantQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub status: Option<ActiveFilter>,
}

impl QueryParams for MerchantQuery {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn set_limit(&mut self, limit: Option<u32>) {
        self.limit = limit;
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = normalize(search);
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "search", self.search.as_deref());
        push_str(&mut pairs, "status", self.status.map(ActiveFilter::as_str));
        pairs
    }
}

/// `GET /users` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub role: Option<Role>,
    pub status: Option<ActiveFilter>,
}

impl QueryParams for UserQuery {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn set_limit(&mut self, limit: Option<u32>) {
        self.limit = limit;
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = normalize(search);
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "search", self.search.as_deref());
        push_str(&mut pairs, "role", self.role.map(Role::as_str));
        push_str(&mut pairs, "status", self.status.map(ActiveFilter::as_str));
        pairs
    }
}

/// `GET /email-logs` parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailLogQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<EmailStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Matches the recipient address.
    pub search: Option<String>,
}

impl QueryParams for EmailLogQuery {
    fn page(&self) -> Option<u32> {
        self.page
    }

    fn set_page(&mut self, page: Option<u32>) {
        self.page = page;
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn set_limit(&mut self, limit: Option<u32>) {
        self.limit = limit;
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = normalize(search);
    }

    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_num(&mut pairs, "page", self.page);
        push_num(&mut pairs, "limit", self.limit);
        push_str(&mut pairs, "status", self.status.map(EmailStatus::as_str));
        if let Some(d) = self.date_from {
            pairs.push(("dateFrom", d.format("%Y-%m-%d").to_string()));
        }
        if let Some(d) = self.date_to {
            pairs.push(("dateTo", d.format("%Y-%m-%d").to_string()));
        }
        push_str(&mut pairs, "search", self.search.as_deref());
        pairs
    }
}

/// Relative date filter of the email log screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Today,
    /// Last 7 days.
    Week,
    /// Last 30 days.
    Month,
    All,
}

impl DateWindow {
    /// Lower bound for `dateFrom`, relative to `today`.
    #[must_use]
    pub fn date_from(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Today => Some(today),
            Self::Week => Some(today - Duration::days(7)),
            Self::Month => Some(today - Duration::days(30)),
            Self::All => None,
        }
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(format!("unknown date window '{other}'")),
        }
    }
}

/// Page-local state of one list screen.
///
/// # Example
///
/// ```
/// use stockroom_types::{InventoryQuery, ListState, QueryParams};
///
/// let mut state = ListState::new(InventoryQuery::default());
/// state.go_to(4);
/// state.set_search(Some("bolt".into()));
/// assert_eq!(state.query().page(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<Q> {
    query: Q,
    pagination: Option<PaginationMeta>,
}

impl<Q: QueryParams> ListState<Q> {
    /// Starts at page 1 with [`DEFAULT_PAGE_SIZE`] unless `query` sets them.
    #[must_use]
    pub fn new(mut query: Q) -> Self {
        if query.page().is_none() {
            query.set_page(Some(1));
        }
        if query.limit().is_none() {
            query.set_limit(Some(DEFAULT_PAGE_SIZE));
        }
        Self {
            query,
            pagination: None,
        }
    }

    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub fn pagination(&self) -> Option<&PaginationMeta> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.query.page().unwrap_or(1)
    }

    /// Records the pagination block of the latest response.
    pub fn record(&mut self, pagination: PaginationMeta) {
        self.pagination = Some(pagination);
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.query.set_search(search);
        self.reset_page();
    }

    /// Applies a filter change and returns to page 1.
    pub fn update_filters(&mut self, f: impl FnOnce(&mut Q)) {
        f(&mut self.query);
        self.reset_page();
    }

    /// Changes the page size and returns to page 1.
    pub fn set_limit(&mut self, limit: u32) {
        self.query.set_limit(Some(limit.max(1)));
        self.reset_page();
    }

    /// Jumps to `page`, clamped to `[1, total_pages]` when known.
    pub fn go_to(&mut self, page: u32) {
        let mut page = page.max(1);
        if let Some(meta) = &self.pagination {
            page = page.min(meta.total_pages.max(1));
        }
        self.query.set_page(Some(page));
    }

    /// Advances one page; returns `false` when already on the last page.
    pub fn next(&mut self) -> bool {
        match &self.pagination {
            Some(meta) if !meta.has_next => false,
            _ => {
                let Some(page) = self.current_page().checked_add(1) else {
                    return false;
                };
                self.go_to(page);
                true
            }
        }
    }

    /// Goes back one page; returns `false` on the first page.
    pub fn prev(&mut self) -> bool {
        let page = self.current_page();
        let blocked = page <= 1 || matches!(&self.pagination, Some(meta) if !meta.has_prev);
        if blocked {
            return false;
        }
        self.go_to(page - 1);
        true
    }

    /// 1-based `(first, last)` rows of the recorded page.
    #[must_use]
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        self.pagination.as_ref().and_then(PaginationMeta::showing_range)
    }

    fn reset_page(&mut self) {
        self.query.set_page(Some(1));
        self.pagination = None;
    }
}

impl ListState<InventoryQuery> {
    /// Sorts by `column`; re-selecting the ascending column flips to
    /// descending, anything else sorts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        let same_asc = self.query.sort.as_deref() == Some(column)
            && self.query.order == Some(SortOrder::Asc);
        self.query.sort = Some(column.to_string());
        self.query.order = Some(if same_asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(page: u32, total_pages: u32) -> PaginationMeta {
        PaginationMeta {
            page,
            limit: 10,
            total: u64::from(total_pages) * 10,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    #[test]
    fn inventory_pairs_skip_unset() {
        let q = InventoryQuery {
            page: Some(2),
            limit: None,
            search: Some(String::new()),
            sort: Some("name".into()),
            order: Some(SortOrder::Desc),
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("sort", "name".to_string()),
                ("order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn zero_page_is_not_sent() {
        let q = MerchantQuery {
            page: Some(0),
            ..Default::default()
        };
        assert!(q.to_pairs().is_empty());
    }

    #[test]
    fn user_pairs_include_role_and_status() {
        let q = UserQuery {
            limit: Some(1),
            role: Some(Role::Admin),
            status: Some(ActiveFilter::Inactive),
            ..Default::default()
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("limit", "1".to_string()),
                ("role", "Admin".to_string()),
                ("status", "inactive".to_string()),
            ]
        );
    }

    #[test]
    fn email_pairs_format_dates() {
        let q = EmailLogQuery {
            status: Some(EmailStatus::Failed),
            date_from: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("status", "failed".to_string()),
                ("dateFrom", "2024-05-01".to_string()),
            ]
        );
    }

    #[test]
    fn new_state_defaults() {
        let state = ListState::new(InventoryQuery::default());
        assert_eq!(state.query().page, Some(1));
        assert_eq!(state.query().limit, Some(DEFAULT_PAGE_SIZE));
        assert!(state.pagination().is_none());
    }

    #[test]
    fn search_resets_page() {
        let mut state = ListState::new(InventoryQuery::default());
        state.record(meta(1, 5));
        state.go_to(3);
        state.set_search(Some("  widget ".into()));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.query().search.as_deref(), Some("widget"));
    }

    #[test]
    fn blank_search_clears() {
        let mut state = ListState::new(MerchantQuery::default());
        state.set_search(Some("acme".into()));
        state.set_search(Some("   ".into()));
        assert!(state.query().search.is_none());
    }

    #[test]
    fn filter_change_resets_page() {
        let mut state = ListState::new(EmailLogQuery::default());
        state.go_to(4);
        state.update_filters(|q| q.status = Some(EmailStatus::Pending));
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.query().status, Some(EmailStatus::Pending));
    }

    #[test]
    fn go_to_clamps_to_known_pages() {
        let mut state = ListState::new(UserQuery::default());
        state.record(meta(1, 3));
        state.go_to(9);
        assert_eq!(state.current_page(), 3);
        state.go_to(0);
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn next_and_prev_respect_bounds() {
        let mut state = ListState::new(InventoryQuery::default());
        assert!(!state.prev());

        state.record(meta(1, 2));
        assert!(state.next());
        assert_eq!(state.current_page(), 2);

        state.record(meta(2, 2));
        assert!(!state.next());
        assert!(state.prev());
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn next_stops_at_last_representable_page() {
        let mut state = ListState::new(InventoryQuery::default());
        state.go_to(u32::MAX);
        assert!(!state.next());
        assert_eq!(state.current_page(), u32::MAX);
    }

    #[test]
    fn toggle_sort_flips_same_column() {
        let mut state = ListState::new(InventoryQuery::default());
        state.toggle_sort("name");
        assert_eq!(state.query().order, Some(SortOrder::Asc));
        state.toggle_sort("name");
        assert_eq!(state.query().order, Some(SortOrder::Desc));
        state.toggle_sort("name");
        assert_eq!(state.query().order, Some(SortOrder::Asc));
        state.toggle_sort("quantity");
        assert_eq!(state.query().sort.as_deref(), Some("quantity"));
        assert_eq!(state.query().order, Some(SortOrder::Asc));
    }

    #[test]
    fn set_limit_resets_page() {
        let mut state = ListState::new(InventoryQuery::default());
        state.go_to(2);
        state.set_limit(50);
        assert_eq!(state.query().limit, Some(50));
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn date_windows() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(DateWindow::Today.date_from(today), Some(today));
        assert_eq!(
            DateWindow::Week.date_from(today),
            NaiveDate::from_ymd_opt(2024, 3, 24)
        );
        assert_eq!(
            DateWindow::Month.date_from(today),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(DateWindow::All.date_from(today), None);
    }
}
