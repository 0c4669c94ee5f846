//! Plain-text rendering of API results.

use stockroom_types::{
    EmailLog, EmailLogStats, InventoryItem, Merchant, PaginationMeta, SendReportResult, User,
    UserStats,
};

pub(crate) fn money(value: f64) -> String {
    format!("${value:.2}")
}

pub(crate) fn items(items: &[InventoryItem]) {
    if items.is_empty() {
        println!("No items found");
        return;
    }
    println!("{:>6}  {:<12} {:<28} {:>6}  {:>10}  STOCK", "ID", "SKU", "NAME", "QTY", "PRICE");
    for item in items {
        println!(
            "{:>6}  {:<12} {:<28} {:>6}  {:>10}  {}",
            item.id,
            item.sku,
            clip(&item.name, 28),
            item.quantity,
            money(item.unit_price),
            item.stock_level().label()
        );
    }
}

pub(crate) fn item_detail(item: &InventoryItem) {
    println!("{} (#{})", item.name, item.id);
    println!("  SKU:         {}", item.sku);
    println!("  Quantity:    {} [{}]", item.quantity, item.stock_level().label());
    println!("  Unit price:  {}", money(item.unit_price));
    println!("  Total value: {}", money(item.total_value()));
    if !item.description.is_empty() {
        println!("  {}", item.description);
    }
    if let Some(by) = &item.updated_by {
        println!("  Updated by {} at {}", by.username, item.updated_at.format("%Y-%m-%d %H:%M"));
    }
}

pub(crate) fn merchants(merchants: &[Merchant]) {
    if merchants.is_empty() {
        println!("No merchants found");
        return;
    }
    for m in merchants {
        let state = if m.is_active { "active" } else { "inactive" };
        println!("{:>6}  {:<28} {:<32} {state}", m.id, clip(&m.name, 28), m.email);
    }
}

pub(crate) fn users(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }
    for u in users {
        let state = if u.is_active { "active" } else { "inactive" };
        println!(
            "{:>6}  {:<20} {:<32} {:<8} {state}",
            u.id,
            u.username,
            u.email,
            u.role()
        );
    }
}

pub(crate) fn user_stats(stats: &UserStats) {
    println!("Total:    {}", stats.total);
    println!(
        "By role:  {} Admin, {} Manager, {} Viewer",
        stats.admin_count, stats.manager_count, stats.viewer_count
    );
    println!(
        "Status:   {} active, {} inactive",
        stats.active_count, stats.inactive_count
    );
}

pub(crate) fn email_log_stats(stats: &EmailLogStats) {
    println!("Total:      {}", stats.total_emails);
    println!(
        "Sent:       {} ({}%)",
        stats.total_sent,
        stats.success_rate()
    );
    println!("Failed:     {}", stats.total_failed);
    println!("Pending:    {}", stats.total_pending);
    println!("Today:      {}", stats.today_count);
    println!("Last 7d:    {}", stats.this_week_count);
    println!("Last 30d:   {}", stats.this_month_count);
}

pub(crate) fn email_logs(logs: &[EmailLog]) {
    if logs.is_empty() {
        println!("No emails found");
        return;
    }
    for log in logs {
        println!(
            "{:>6}  {}  {:<8} {:<32} {}",
            log.id,
            log.created_at.format("%Y-%m-%d %H:%M"),
            log.status,
            log.recipient_email,
            clip(&log.subject, 40)
        );
    }
}

pub(crate) fn send_result(result: &SendReportResult) {
    println!(
        "Sent {} of {} report(s)",
        result.total_sent, result.recipient_count
    );
    let failed = result.failed_recipients();
    if !failed.is_empty() {
        eprintln!("Failed: {}", failed.join(", "));
    }
}

pub(crate) fn pagination(meta: &PaginationMeta) {
    match meta.showing_range() {
        Some((first, last)) => println!(
            "Showing {first}-{last} of {} (page {}/{})",
            meta.total, meta.page, meta.total_pages
        ),
        None => println!("Showing 0 of {}", meta.total),
    }
}

/// Shortens `s` to at most `max` chars, marking the cut with `~`.
fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
