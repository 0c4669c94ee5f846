//! stockroom CLI - inventory back office from the terminal
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`STOCKROOM_*`)
//! 3. Project config (`.stockroom/config.toml` in the project root)
//! 4. Global config (`~/.stockroom/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `STOCKROOM_DEBUG`: Enable debug logging (`true`/`false`)
//! - `STOCKROOM_API_URL`: API base URL
//! - `STOCKROOM_TIMEOUT_SECS`: Request timeout in seconds
//! - `STOCKROOM_CREDENTIALS`: Credentials file path
//! - `STOCKROOM_PASSWORD`: Password for `login` when `-p` is omitted

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use stockroom_client::config::{ConfigLoader, ConfigResolver, StockroomConfig};
use stockroom_types::{ActiveFilter, DateWindow, EmailStatus, ReportFormat, Role, SortOrder};
use tracing_subscriber::EnvFilter;

/// stockroom - inventory back office client
#[derive(Parser, Debug)]
#[command(name = "stockroom")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// API base URL (also: STOCKROOM_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Credentials file (also: STOCKROOM_CREDENTIALS)
    #[arg(long, global = true, value_name = "PATH")]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and remove the stored token
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List granted permission keys
    Permissions {
        /// Preview a role instead of the signed-in user
        #[arg(long)]
        role: Option<Role>,
    },
    /// Show the navigation entries visible to a role
    Nav {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Show the route guard decision for a path
    Route {
        path: String,
        #[arg(long)]
        role: Option<Role>,
    },
    /// Inventory items
    #[command(subcommand)]
    Inventory(InventoryCommand),
    /// Merchant contacts
    #[command(subcommand)]
    Merchants(MerchantsCommand),
    /// Staff accounts (Admin)
    #[command(subcommand)]
    Users(UsersCommand),
    /// Report mail-outs and their log
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Summary figures and headline counts
    Dashboard,
}

#[derive(ClapArgs, Debug, Default)]
pub(crate) struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum InventoryCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        order: Option<SortOrder>,
    },
    Get {
        id: i64,
    },
    /// Quick search by name or SKU
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    SetQuantity {
        id: i64,
        quantity: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum MerchantsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        status: Option<ActiveFilter>,
    },
    /// Import addresses from a file (`-` reads stdin)
    Import {
        file: PathBuf,
        #[arg(long)]
        default_name: Option<String>,
    },
    /// Active and inactive counts
    Stats,
}

#[derive(Subcommand, Debug)]
pub(crate) enum UsersCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        status: Option<ActiveFilter>,
    },
    SetStatus {
        id: i64,
        status: ActiveFilter,
    },
    /// Counts by role and status
    Stats,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ReportsCommand {
    /// Mail the inventory report to the given addresses
    Send {
        #[arg(long = "to", required = true, value_name = "EMAIL")]
        to: Vec<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    /// Mail the inventory report to every active merchant
    Broadcast {
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: Option<String>,
    },
    Stats,
    /// Email delivery log
    Logs {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        status: Option<EmailStatus>,
        /// today, week, month or all
        #[arg(long)]
        window: Option<DateWindow>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Re-send a logged email
    Retry {
        id: i64,
    },
    /// Email log counts by status and recency
    LogStats,
    /// Export the email log as CSV
    ExportLogs {
        #[arg(long)]
        status: Option<EmailStatus>,
        /// today, week, month or all
        #[arg(long)]
        window: Option<DateWindow>,
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Delete email log entries (Admin)
    DeleteLogs {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
    /// Download the inventory report
    Download {
        /// csv or json
        #[arg(long, default_value_t)]
        format: ReportFormat,
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Applies CLI flags on top of file and environment configuration.
struct CliConfigResolver {
    project_root: PathBuf,
    debug: bool,
    api_url: Option<String>,
    credentials: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            project_root,
            debug: args.debug,
            api_url: args.api_url.clone(),
            credentials: args.credentials.clone(),
        }
    }

    fn resolve(&self) -> Result<StockroomConfig> {
        let mut config = ConfigLoader::new()
            .with_project_root(&self.project_root)
            .load()
            .context("failed to load configuration")?;
        self.apply(&mut config);

        anyhow::ensure!(
            config.api.base_url.starts_with("http://") || config.api.base_url.starts_with("https://"),
            "--api-url must start with http:// or https:// (got '{}')",
            config.api.base_url
        );
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut StockroomConfig) {
        if self.debug {
            config.debug = true;
        }
        if let Some(ref url) = self.api_url {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ref path) = self.credentials {
            config.paths.credentials_file = Some(path.clone());
        }
    }
}

/// Terminal filter: `--debug` / `debug = true` > `RUST_LOG` > default `warn`.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let resolver = CliConfigResolver::from_args(&args);
    let config = resolver.resolve()?;
    init_tracing(config.debug);

    tracing::debug!(
        project = %resolver.project_root.display(),
        api = %config.api.base_url,
        "configuration resolved"
    );

    commands::run(args.command, &config).await
}
