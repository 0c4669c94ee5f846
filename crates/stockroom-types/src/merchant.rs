//! Merchant contacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A merchant contact that can receive inventory reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /merchants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMerchant {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `PUT /merchants/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body of `POST /merchants/bulk-import`.
///
/// `emails` is the comma/newline separated list exactly as the server
/// expects it; build it with [`BulkImportRequest::from_emails`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRequest {
    pub emails: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_name: Option<String>,
}

impl BulkImportRequest {
    /// Joins already-parsed addresses with newlines.
    #[must_use]
    pub fn from_emails(emails: &[String], default_name: Option<String>) -> Self {
        Self {
            emails: emails.join("\n"),
            default_name,
        }
    }
}

/// `data` of a bulk import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportResult {
    pub imported: u32,
    pub skipped: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Splits pasted text on commas and line breaks.
///
/// Entries are trimmed; blanks and entries without `@` are dropped.
///
/// ```
/// use stockroom_types::parse_email_list;
///
/// let parsed = parse_email_list("a@x.com, b@y.org\r\nnot-an-email\n\n");
/// assert_eq!(parsed, vec!["a@x.com", "b@y.org"]);
/// ```
#[must_use]
pub fn parse_email_list(input: &str) -> Vec<String> {
    input
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|e| !e.is_empty() && e.contains('@'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_order() {
        let parsed = parse_email_list("z@a.com\ny@b.com,x@c.com");
        assert_eq!(parsed, vec!["z@a.com", "y@b.com", "x@c.com"]);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_email_list("").is_empty());
        assert!(parse_email_list(" , \n ").is_empty());
    }

    #[test]
    fn bulk_request_joins_with_newlines() {
        let req = BulkImportRequest::from_emails(&["a@x.com".into(), "b@x.com".into()], None);
        assert_eq!(req.emails, "a@x.com\nb@x.com");
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("defaultName").is_none());
    }
}
