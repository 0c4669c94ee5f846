//! Command execution.
//!
//! Offline commands (`permissions`, `nav`, `route`) accept `--role` to
//! preview a role without a session; without it they bootstrap from the
//! stored credentials like every other command.

use crate::output;
use crate::{Command, InventoryCommand, MerchantsCommand, PageArgs, ReportsCommand, UsersCommand};
use anyhow::{bail, Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use stockroom_auth::{
    default_navigation, required_permissions, user_menu, AuthStatus, Authorizer, Principal,
    RouteDecision, RouteGuard,
};
use stockroom_client::config::StockroomConfig;
use stockroom_client::session::{FileCredentialStore, SessionManager, SessionState};
use stockroom_client::ApiClient;
use stockroom_types::{
    parse_email_list, BroadcastReport, EmailLogQuery, InventoryQuery, MerchantQuery, Role,
    SendInventoryReport, UserQuery,
};

type Session = SessionManager<FileCredentialStore>;

pub(crate) async fn run(command: Command, config: &StockroomConfig) -> Result<()> {
    match command {
        Command::Login { username, password } => login(config, &username, &password).await,
        Command::Logout => logout(config).await,
        Command::Whoami => whoami(config).await,
        Command::Permissions { role } => permissions(config, role).await,
        Command::Nav { role } => nav(config, role).await,
        Command::Route { path, role } => route(config, &path, role).await,
        Command::Inventory(cmd) => inventory(&signed_in(config).await?, cmd).await,
        Command::Merchants(cmd) => merchants(&signed_in(config).await?, cmd).await,
        Command::Users(cmd) => users(&signed_in(config).await?, cmd).await,
        Command::Reports(cmd) => reports(&signed_in(config).await?, cmd).await,
        Command::Dashboard => dashboard(&signed_in(config).await?).await,
    }
}

fn open_session(config: &StockroomConfig) -> Result<Session> {
    let client = ApiClient::new(&config.api, Arc::new(SessionState::new()))
        .context("failed to create API client")?;
    let store = FileCredentialStore::new(config.paths.credentials_file_or_default());
    Ok(SessionManager::new(client, store))
}

/// Opens the session and resolves it from the stored credentials.
async fn resolved(config: &StockroomConfig) -> Result<Session> {
    let session = open_session(config)?;
    session
        .bootstrap()
        .await
        .context("failed to read stored credentials")?;
    Ok(session)
}

async fn signed_in(config: &StockroomConfig) -> Result<Session> {
    let session = resolved(config).await?;
    if !session.status().is_authenticated() {
        bail!("not signed in; run `stockroom login` first");
    }
    Ok(session)
}

/// The previewed role, or the stored session's status.
async fn status_for(config: &StockroomConfig, role: Option<Role>) -> Result<AuthStatus> {
    match role {
        Some(role) => Ok(AuthStatus::signed_in(Principal::new(0, "preview", role))),
        None => Ok(resolved(config).await?.status()),
    }
}

// ─── Session ─────────────────────────────────────────────────────

async fn login(config: &StockroomConfig, username: &str, password: &str) -> Result<()> {
    let session = open_session(config)?;
    let user = session.login(username, password).await?;
    println!("Signed in as {} ({})", user.username, user.role());
    Ok(())
}

async fn logout(config: &StockroomConfig) -> Result<()> {
    let session = resolved(config).await?;
    session.logout().await?;
    println!("Signed out");
    Ok(())
}

async fn whoami(config: &StockroomConfig) -> Result<()> {
    let session = resolved(config).await?;
    match session.status().principal() {
        Some(p) => println!("{} ({})", p.username, p.role),
        None => println!("not signed in"),
    }
    Ok(())
}

// ─── Authorization preview ───────────────────────────────────────

async fn permissions(config: &StockroomConfig, role: Option<Role>) -> Result<()> {
    let authorizer = Authorizer::new(status_for(config, role).await?);
    let Some(granted) = authorizer.granted() else {
        bail!("session is still resolving, try again");
    };
    if let Some(role) = authorizer.status().role() {
        println!("role: {role}");
    } else {
        println!("not signed in");
    }
    for permission in granted {
        println!("{}", permission.key());
    }
    Ok(())
}

async fn nav(config: &StockroomConfig, role: Option<Role>) -> Result<()> {
    let authorizer = Authorizer::new(status_for(config, role).await?);
    let (Some(main), Some(menu)) = (
        authorizer.visible_navigation(&default_navigation()),
        authorizer.visible_navigation(&user_menu()),
    ) else {
        bail!("session is still resolving, try again");
    };
    for item in main.iter().chain(menu.iter()) {
        println!("{:<10} {:<24} {}", item.label, item.href, item.description);
    }
    Ok(())
}

async fn route(config: &StockroomConfig, path: &str, role: Option<Role>) -> Result<()> {
    let status = status_for(config, role).await?;
    let decision = RouteGuard::new().check(path, &status);

    match &decision {
        RouteDecision::Allow => println!("allow"),
        RouteDecision::Pending => println!("pending"),
        RouteDecision::RedirectToLogin { .. } | RouteDecision::Forbidden { .. } => {
            let kind = if matches!(decision, RouteDecision::Forbidden { .. }) {
                "forbidden"
            } else {
                "redirect"
            };
            let target = decision.redirect_target().unwrap_or_default();
            println!("{kind} {target}");
        }
    }

    let required = required_permissions(path);
    if !required.is_empty() {
        let keys: Vec<&str> = required.iter().map(|p| p.key()).collect();
        println!("requires any of: {}", keys.join(", "));
    }
    Ok(())
}

// ─── Resources ───────────────────────────────────────────────────

async fn inventory(session: &Session, cmd: InventoryCommand) -> Result<()> {
    let api = session.client().inventory();
    match cmd {
        InventoryCommand::List { page, sort, order } => {
            let query = InventoryQuery {
                page: page.page,
                limit: page.limit,
                search: page.search,
                sort,
                order,
            };
            let result = api.list(&query).await?;
            output::items(&result.data);
            output::pagination(&result.pagination);
        }
        InventoryCommand::Get { id } => output::item_detail(&api.get(id).await?),
        InventoryCommand::Search { query, limit } => {
            output::items(&api.search(&query, limit).await?);
        }
        InventoryCommand::SetQuantity { id, quantity } => {
            let item = api.update_quantity(id, quantity).await?;
            println!("{} quantity set to {}", item.name, item.quantity);
        }
        InventoryCommand::Delete { id } => {
            api.delete(id).await?;
            println!("Deleted item {id}");
        }
    }
    Ok(())
}

async fn merchants(session: &Session, cmd: MerchantsCommand) -> Result<()> {
    let api = session.client().merchants();
    match cmd {
        MerchantsCommand::List { page, status } => {
            let PageArgs { page, limit, search } = page;
            let query = MerchantQuery {
                page,
                limit,
                search,
                status,
            };
            let result = api.list(&query).await?;
            output::merchants(&result.data);
            output::pagination(&result.pagination);
        }
        MerchantsCommand::Stats => {
            let stats = api.stats().await?;
            println!("Total:    {}", stats.total);
            println!("Active:   {}", stats.active_count);
            println!("Inactive: {}", stats.inactive_count);
        }
        MerchantsCommand::Import { file, default_name } => {
            let text = read_input(&file)?;
            let emails = parse_email_list(&text);
            if emails.is_empty() {
                bail!("no email addresses found in {}", file.display());
            }
            let result = api.bulk_import(&emails, default_name).await?;
            println!("Imported {}, skipped {}", result.imported, result.skipped);
            for error in &result.errors {
                eprintln!("  {error}");
            }
        }
    }
    Ok(())
}

async fn users(session: &Session, cmd: UsersCommand) -> Result<()> {
    let api = session.client().users();
    match cmd {
        UsersCommand::List { page, role, status } => {
            let query = UserQuery {
                page: page.page,
                limit: page.limit,
                search: page.search,
                role,
                status,
            };
            let result = api.list(&query).await?;
            output::users(&result.data);
            output::pagination(&result.pagination);
        }
        UsersCommand::SetStatus { id, status } => {
            let user = api.set_status(id, status.is_active()).await?;
            println!("{} is now {status}", user.username);
        }
        UsersCommand::Stats => output::user_stats(&api.stats().await?),
    }
    Ok(())
}

async fn reports(session: &Session, cmd: ReportsCommand) -> Result<()> {
    match cmd {
        ReportsCommand::Send {
            to,
            subject,
            message,
        } => {
            let report = SendInventoryReport {
                recipients: to,
                subject,
                custom_message: message,
            };
            let result = session.client().reports().send_inventory(&report).await?;
            output::send_result(&result);
        }
        ReportsCommand::Broadcast { subject, message } => {
            let report = BroadcastReport {
                subject,
                custom_message: message,
            };
            let result = session.client().reports().send_to_merchants(&report).await?;
            output::send_result(&result);
        }
        ReportsCommand::Stats => {
            let stats = session.client().reports().stats().await?;
            println!("Items:            {}", stats.total_items);
            println!("Low stock:        {}", stats.low_stock_items);
            println!("Active merchants: {}", stats.active_merchants);
            if let Some(last) = stats.last_report_generated {
                println!("Last report:      {last}");
            }
        }
        ReportsCommand::Logs {
            page,
            limit,
            status,
            window,
            search,
        } => {
            let today = chrono::Local::now().date_naive();
            let query = EmailLogQuery {
                page,
                limit,
                status,
                date_from: window.and_then(|w| w.date_from(today)),
                date_to: None,
                search,
            };
            let result = session.client().email_logs().list(&query).await?;
            output::email_logs(&result.data);
            output::pagination(&result.pagination);
        }
        ReportsCommand::Retry { id } => {
            let log = session.client().email_logs().retry(id).await?;
            println!("{} to {}: {}", log.subject, log.recipient_email, log.status);
        }
        ReportsCommand::LogStats => {
            let today = chrono::Local::now().date_naive();
            let stats = session.client().email_logs().stats(today).await?;
            output::email_log_stats(&stats);
        }
        ReportsCommand::ExportLogs {
            status,
            window,
            output,
        } => {
            let today = chrono::Local::now().date_naive();
            let query = EmailLogQuery {
                status,
                date_from: window.and_then(|w| w.date_from(today)),
                ..Default::default()
            };
            let csv = session.client().email_logs().export_csv(&query).await?;
            write_output(output.as_deref(), &csv)?;
        }
        ReportsCommand::DeleteLogs { ids } => {
            let deleted = match ids.as_slice() {
                [id] => {
                    session.client().email_logs().delete(*id).await?;
                    1
                }
                _ => session.client().email_logs().bulk_delete(&ids).await?,
            };
            println!("Deleted {deleted} of {} email log(s)", ids.len());
        }
        ReportsCommand::Download { format, output } => {
            let document = session.client().reports().download_inventory(format).await?;
            write_output(output.as_deref(), &document)?;
        }
    }
    Ok(())
}

async fn dashboard(session: &Session) -> Result<()> {
    let api = session.client().dashboard();
    let (stats, counts) = tokio::try_join!(api.stats(), api.quick_stats())?;
    println!("Total items:  {}", stats.total_items);
    println!("Low stock:    {}", stats.low_stock_items);
    println!("Total value:  {}", output::money(stats.total_value));
    if let Some(users) = counts.user_count {
        println!("Users:        {users}");
    }
    if let Some(merchants) = counts.merchant_count {
        println!("Merchants:    {merchants}");
    }
    if !stats.recent_items.is_empty() {
        println!();
        println!("Recently added:");
        output::items(&stats.recent_items);
    }
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Writes a downloaded document to `path`, or to stdout without one.
fn write_output(path: Option<&Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", text.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("failed to write stdout")?;
            if !text.ends_with('\n') {
                writeln!(stdout).context("failed to write stdout")?;
            }
        }
    }
    Ok(())
}
