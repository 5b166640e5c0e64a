mod cmd_activity;
mod cmd_config;
mod cmd_context;
mod cmd_locale;
mod tab;

use std::future::Future;
use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aula_client::{GuardOptions, LayoutFetch};

use crate::cmd_config::AulaConfig;
use crate::tab::{Tab, TabArgs};

#[derive(Parser)]
#[command(
    name = "aula",
    version,
    about = "LTI client: session capture, role routing, and activity calls"
)]
struct Cli {
    /// URL the tab was opened with (the launch redirect, token included)
    #[arg(long, global = true)]
    launch_url: Option<String>,
    /// Backend origin (defaults to config base_url, then the launch URL's origin)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Run without a browser context: no capture, guards render
    #[arg(long, global = true)]
    server: bool,
    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the LTI context of this tab
    Context {
        /// Print the {success, data, error} envelope as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether this placement still needs an activity
    Pending,
    /// Run the route guards for a path
    Navigate {
        /// Path being navigated to (e.g. / or /actividad/abc)
        path: String,
        /// Override config layout_fetch (credentials_only or session_header)
        #[arg(long)]
        layout_fetch: Option<LayoutFetch>,
    },
    /// Create, read, or submit to activities
    Activity {
        #[command(subcommand)]
        cmd: cmd_activity::ActivityCmd,
    },
    /// Interface locale preference
    Locale {
        #[command(subcommand)]
        cmd: cmd_locale::LocaleCmd,
    },
    /// Manage config.json in the store root
    Config {
        #[command(subcommand)]
        cmd: cmd_config::ConfigCmd,
    },
}

fn init_logging(verbose: bool) {
    let debug_enabled = verbose
        || std::env::var("AULA_DEBUG_LOG")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
            .unwrap_or(false);

    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and open the tab. `config` commands skip this so a broken
/// `config.json` can still be repaired.
fn open_tab(args: &TabArgs, store_root: &Path) -> anyhow::Result<(Tab, AulaConfig)> {
    let config = AulaConfig::load(store_root)?;
    let tab = Tab::open(args, &config)?;
    Ok((tab, config))
}

fn block_on(fut: impl Future<Output = anyhow::Result<()>>) -> anyhow::Result<()> {
    tokio::runtime::Runtime::new()?.block_on(fut)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let store_root = aula_store::store_root();
    let tab_args = TabArgs {
        launch_url: cli.launch_url,
        base_url: cli.base_url,
        server: cli.server,
    };

    match cli.cmd {
        Command::Config { cmd } => cmd_config::run(cmd, &store_root),
        Command::Context { json } => {
            let (tab, _) = open_tab(&tab_args, &store_root)?;
            block_on(cmd_context::context(&tab, json))
        }
        Command::Pending => {
            let (tab, _) = open_tab(&tab_args, &store_root)?;
            block_on(cmd_context::pending(&tab))
        }
        Command::Navigate { path, layout_fetch } => {
            let (tab, config) = open_tab(&tab_args, &store_root)?;
            let options = GuardOptions {
                layout_fetch: layout_fetch.unwrap_or(config.layout_fetch),
            };
            block_on(cmd_context::navigate(&tab, &path, options))
        }
        Command::Activity { cmd } => {
            let (tab, _) = open_tab(&tab_args, &store_root)?;
            block_on(cmd_activity::run(cmd, &tab))
        }
        Command::Locale { cmd } => {
            let (tab, _) = open_tab(&tab_args, &store_root)?;
            cmd_locale::run(cmd, &tab, &store_root)
        }
    }
}
