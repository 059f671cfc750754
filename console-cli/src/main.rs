// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Ando Console — admin console for APISIX-compatible gateways
//
//  Settings:  YAML file + ANDO_CONSOLE_* env overrides
//  Transport: admin REST API (/apisix/admin/*)
//  Plugins:   edited through a PluginSetBinding per owner
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod commands;

use clap::{Parser, Subcommand};
use console_client::AdminClient;
use console_core::{ConsoleError, ConsoleSettings, ResourceKind};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ando-console", version, about = "Ando Console — gateway admin from the terminal")]
struct Cli {
    /// Path to the settings file
    #[arg(short, long, default_value = "ando-console.yaml")]
    settings: PathBuf,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or change the gateway address and admin key
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// List a resource collection
    List {
        kind: ResourceKind,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one resource as JSON
    Get { kind: ResourceKind, id: String },
    /// Create or replace a resource from a JSON file
    Put {
        kind: ResourceKind,
        /// Resource id; generated when omitted
        id: Option<String>,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete a resource
    Delete { kind: ResourceKind, id: String },
    /// Show the effective plugin set of a route, consumer, consumer group, or global rule
    Plugins {
        kind: ResourceKind,
        id: String,
        /// Also list catalog plugins that are not configured yet
        #[arg(long)]
        all: bool,
    },
    /// Switch a plugin on
    Enable { kind: ResourceKind, id: String, plugin: String },
    /// Switch a plugin off
    Disable { kind: ResourceKind, id: String, plugin: String },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        admin_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ── Tracing ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // ── Settings ──
    let mut settings = ConsoleSettings::load(&cli.settings)?;
    info!(path = %cli.settings.display(), base_url = %settings.base_url, "settings loaded");

    if let Command::Settings { action } = cli.command {
        return match action {
            SettingsAction::Show => commands::settings::show(&settings),
            SettingsAction::Set { base_url, admin_key } => {
                commands::settings::set(&mut settings, &cli.settings, base_url, admin_key)
            }
        };
    }

    // Everything past this point needs an admin key.
    settings.ensure_configured()?;

    let client = Arc::new(AdminClient::new(&settings)?);
    let result = run(cli.command, &client).await;

    if let Err(e) = &result
        && let Some(ConsoleError::Unauthorized) = e.downcast_ref::<ConsoleError>()
    {
        warn!("admin key rejected by the gateway, clearing it");
        settings.clear_admin_key();
        settings.save(&cli.settings)?;
    }
    result
}

async fn run(command: Command, client: &Arc<AdminClient>) -> anyhow::Result<()> {
    match command {
        Command::Settings { .. } => Ok(()),
        Command::List { kind, page, page_size, json } => {
            commands::resources::list(client, kind, console_client::Page { page, page_size }, json).await
        }
        Command::Get { kind, id } => commands::resources::get(client, kind, &id).await,
        Command::Put { kind, id, file } => commands::resources::put(client, kind, id.as_deref(), &file).await,
        Command::Delete { kind, id } => commands::resources::delete(client, kind, &id).await,
        Command::Plugins { kind, id, all } => commands::plugins::show(client, kind, &id, all).await,
        Command::Enable { kind, id, plugin } => commands::plugins::toggle(client, kind, &id, &plugin, true).await,
        Command::Disable { kind, id, plugin } => commands::plugins::toggle(client, kind, &id, &plugin, false).await,
    }
}
