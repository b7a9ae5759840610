use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;

use scout_portal_edit::config;
use scout_portal_edit::content::HttpContentStore;
use scout_portal_edit::identity::{CurrentUser, Role};
use scout_portal_edit::session::change::{ChangeValue, PendingChange};
use scout_portal_edit::session::EditSession;

#[derive(Parser)]
#[command(name = "portal-edit")]
#[command(about = "Scout portal content editing - buffer edits and push them to the content API")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Content API base URL (overrides config)")]
    base_url: Option<String>,

    #[arg(
        long,
        global = true,
        help = "Bearer token for the content API (falls back to PORTAL_EDIT_TOKEN)"
    )]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Set a single plain-text content value")]
    Set {
        #[arg(help = "Numeric content id in the content API")]
        content_id: i64,
        #[arg(help = "New text value")]
        value: String,
    },

    #[command(about = "Push a batch of edits from a JSON file")]
    Push {
        #[arg(help = "Path to a JSON array of {id, contentId, kind, value, metadata} entries")]
        file: PathBuf,
    },
}

/// One entry of a batch file. `kind`/`value` deserialize straight into the
/// session's tagged change value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    id: String,
    content_id: i64,
    #[serde(flatten)]
    value: ChangeValue,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present so PORTAL_EDIT_TOKEN and CONTENT_BASE_URL are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let token = cli
        .token
        .or_else(|| std::env::var("PORTAL_EDIT_TOKEN").ok())
        .context("no credential: pass --token or set PORTAL_EDIT_TOKEN")?;

    let mut content_config = config::config().content.clone();
    if let Some(base_url) = cli.base_url {
        content_config.base_url = base_url;
    }
    let store = HttpContentStore::new(&content_config)?;

    // The CLI acts as an admin session: the content API still authorizes the
    // token server-side, the local gate just has to let the buffer fill.
    let mut session = EditSession::new();
    session.set_user(Some(
        CurrentUser::new("portal-edit-cli", Role::Admin).with_credential(token),
    ));
    session.enable_edit_mode();

    match cli.command {
        Commands::Set { content_id, value } => {
            session.record_change(PendingChange::new(
                format!("cli.{}", content_id),
                content_id,
                ChangeValue::PlainText(value),
            ));
        }
        Commands::Push { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let entries: Vec<BatchEntry> = serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", file.display()))?;

            for entry in entries {
                let mut change = PendingChange::new(entry.id, entry.content_id, entry.value);
                if let Some(metadata) = entry.metadata {
                    change = change.with_metadata(metadata);
                }
                session.record_change(change);
            }
        }
    }

    let total = session.pending_count();
    if session.commit_all(&store).await {
        println!("Saved {} change(s)", total);
        Ok(())
    } else {
        anyhow::bail!("save failed; no buffered changes were dropped")
    }
}
