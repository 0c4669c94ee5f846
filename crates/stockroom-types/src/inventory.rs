//! Inventory items and stock classification.

use crate::UserRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quantity at or below which an item counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// An inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::for_quantity(self.quantity)
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Stock classification shown next to each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    #[must_use]
    pub fn for_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            Self::OutOfStock
        } else if quantity <= LOW_STOCK_THRESHOLD {
            Self::Low
        } else {
            Self::InStock
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::Low => "Low Stock",
            Self::InStock => "In Stock",
        }
    }
}

/// Body of `POST /inventory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Body of `PUT /inventory/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

/// Body of `PATCH /inventory/{id}/quantity`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

/// Dashboard summary derived from the first page of inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Total item count reported by pagination.
    pub total_items: u64,
    pub low_stock_items: usize,
    pub total_value: f64,
    /// Up to five most recently created items, newest first.
    pub recent_items: Vec<InventoryItem>,
}

impl DashboardStats {
    /// Number of entries kept in [`recent_items`](Self::recent_items).
    pub const RECENT_LIMIT: usize = 5;

    /// Summarises a page of items; `total_items` comes from pagination.
    #[must_use]
    pub fn summarize(total_items: u64, items: &[InventoryItem]) -> Self {
        let low_stock_items = items
            .iter()
            .filter(|item| item.quantity <= LOW_STOCK_THRESHOLD)
            .count();
        let total_value = items.iter().map(InventoryItem::total_value).sum();

        let mut recent_items = items.to_vec();
        recent_items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_items.truncate(Self::RECENT_LIMIT);

        Self {
            total_items,
            low_stock_items,
            total_value,
            recent_items,
        }
    }
}
