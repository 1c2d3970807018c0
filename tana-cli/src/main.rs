//! tana - track per-user consumable items with automatic expiry

mod output;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

use libtana::service::{Event, PendingAction};
use libtana::view;
use libtana::{
    now_ms, Config, InventoryService, ItemType, Result, Snapshot, SnapshotStore, TanaError, User,
};

#[derive(Parser, Debug)]
#[command(name = "tana", version)]
#[command(about = "Track per-user consumable items with automatic expiry")]
#[command(long_about = r#"Track per-user consumable items with automatic expiry.

Items expire 5 days after they are granted. Expired items are removed by
the periodic sweep in `tana watch`, or on demand with `tana purge`.

EXAMPLES:
    # Add a user (name auto-generated when omitted)
    tana add-user
    tana add-user Alice

    # Grant a glove and show countdowns, soonest expiry first
    tana grant Alice
    tana list

    # Consume the oldest active glove, skipping the prompt
    tana use Alice --yes

    # Remove expired items and keep countdowns live
    tana purge Alice --yes
    tana watch --interval 1s

    # JSON output for scripting
    tana list --format json | jq '.[0].glove.active'

EXIT CODES:
    0 - Success
    1 - Error (configuration or storage failure)
    3 - Invalid input (unknown user, ambiguous name, bad type)
"#)]
struct Cli {
    /// Path to the snapshot blob (overrides config)
    #[arg(long, global = true, env = "TANA_STORE", value_name = "PATH")]
    store: Option<PathBuf>,

    /// Skip confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a user (name auto-generated when omitted)
    AddUser {
        /// Display name; whitespace-only counts as omitted
        name: Option<String>,
    },
    /// Rename a user
    Rename {
        /// User id or exact name
        user: String,
        name: String,
    },
    /// Delete a user and all their items
    RemoveUser {
        /// User id or exact name
        user: String,
    },
    /// Grant an item that expires 5 days from now
    Grant {
        /// User id or exact name
        user: String,
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "glove")]
        item_type: String,
    },
    /// Use (delete) an item, oldest active first
    Use {
        /// User id or exact name
        user: String,
        #[arg(short = 't', long = "type", value_name = "TYPE", default_value = "glove")]
        item_type: String,
        /// Specific item id instead of the oldest active one
        #[arg(long, value_name = "ID")]
        item: Option<String>,
    },
    /// Remove a user's expired items
    Purge {
        /// User id or exact name
        user: String,
        /// Restrict to one item type
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        item_type: Option<String>,
    },
    /// Show users ordered by soonest glove expiry
    List,
    /// Re-render countdowns on every sweep tick until interrupted
    Watch {
        /// Sweep period, e.g. "1s" or "500ms" (default from config)
        #[arg(long, value_name = "PERIOD")]
        interval: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    libtana::logging::init_default();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let service = match &cli.store {
        Some(path) => InventoryService::with_store(SnapshotStore::new(path)),
        None => InventoryService::from_config(&config)?,
    };

    match cli.command {
        Command::AddUser { name } => {
            let user = service.add_user(name.as_deref());
            println!("Added user {} ({})", user.name, user.id);
            Ok(())
        }

        Command::Rename { user, name } => {
            let target = resolve_user(&service.snapshot(), &user)?;
            let action = PendingAction::RenameUser {
                user_id: target.id.clone(),
                new_name: name,
            };
            if !confirm(&action, cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            if service.apply(action) {
                println!("Renamed {}.", target.name);
            } else {
                println!("Nothing changed (empty name or stale reference).");
            }
            Ok(())
        }

        Command::RemoveUser { user } => {
            let target = resolve_user(&service.snapshot(), &user)?;
            let action = PendingAction::DeleteUser {
                user_id: target.id.clone(),
            };
            if !confirm(&action, cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            if service.apply(action) {
                println!("Deleted user {}.", target.name);
            } else {
                println!("Nothing changed (stale reference).");
            }
            Ok(())
        }

        Command::Grant { user, item_type } => {
            let target = resolve_user(&service.snapshot(), &user)?;
            let item_type = parse_item_type(&item_type)?;
            match service.add_item(&target.id, item_type) {
                Some(item) => println!(
                    "Granted {} to {} (expires {}).",
                    item_type,
                    target.name,
                    output::format_expiry(item.expires_at)
                ),
                None => println!("Nothing changed (stale reference)."),
            }
            Ok(())
        }

        Command::Use {
            user,
            item_type,
            item,
        } => {
            let snapshot = service.snapshot();
            let target = resolve_user(&snapshot, &user)?;
            let item_type = parse_item_type(&item_type)?;

            let item_id = match item {
                Some(id) => id,
                None => {
                    let partition = view::items_of_type(&target, item_type, now_ms());
                    match partition.active.first() {
                        Some(next) => next.id.clone(),
                        None => {
                            println!("{} has no active {} items.", target.name, item_type);
                            return Ok(());
                        }
                    }
                }
            };

            let action = PendingAction::ConsumeItem {
                user_id: target.id.clone(),
                item_id,
            };
            if !confirm(&action, cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            if service.apply(action) {
                println!("Item used.");
            } else {
                println!("No matching item; nothing removed.");
            }
            Ok(())
        }

        Command::Purge { user, item_type } => {
            let target = resolve_user(&service.snapshot(), &user)?;
            let item_type = item_type.as_deref().map(parse_item_type).transpose()?;
            let action = PendingAction::PurgeExpired {
                user_id: target.id.clone(),
                item_type,
            };
            if !confirm(&action, cli.yes)? {
                println!("Aborted.");
                return Ok(());
            }
            let removed = service.purge_expired(&target.id, item_type);
            println!("Removed {} expired item(s).", removed);
            Ok(())
        }

        Command::List => {
            let snapshot = service.snapshot();
            let now = now_ms();
            match cli.format.as_str() {
                "json" => println!("{}", output::render_json(&snapshot, now)?),
                _ => print!("{}", output::render_text(&snapshot, now)),
            }
            Ok(())
        }

        Command::Watch { interval } => {
            let period = match interval {
                Some(s) => humantime::parse_duration(&s).map_err(|e| {
                    TanaError::InvalidInput(format!("invalid interval '{}': {}", s, e))
                })?,
                None => config.sweep_period(),
            };
            watch(service, period).await
        }
    }
}

/// Find a user by id first, then by exact unique name
fn resolve_user(snapshot: &Snapshot, needle: &str) -> Result<User> {
    if let Some(user) = snapshot.user(needle) {
        return Ok(user.clone());
    }

    let matches: Vec<&User> = snapshot.users.iter().filter(|u| u.name == needle).collect();
    match matches.len() {
        0 => Err(TanaError::InvalidInput(format!(
            "no user matches '{}'",
            needle
        ))),
        1 => Ok(matches[0].clone()),
        _ => Err(TanaError::InvalidInput(format!(
            "user name '{}' is ambiguous; use an id",
            needle
        ))),
    }
}

fn parse_item_type(s: &str) -> Result<ItemType> {
    s.parse().map_err(TanaError::InvalidInput)
}

/// The caller-side half of the two-phase protocol: show the pending
/// action, invoke the operation only on explicit approval
fn confirm(action: &PendingAction, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    eprint!("About to {}. Continue? [y/N] ", action.summary());
    let _ = io::stderr().flush();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| TanaError::InvalidInput(format!("failed to read confirmation: {}", e)))?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "YES"))
}

async fn watch(service: InventoryService, period: Duration) -> Result<()> {
    let sweeper = service.spawn_sweeper(period);
    let mut events = service.subscribe();

    println!("Watching (Ctrl-C to stop)...");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = events.recv() => match event {
                Ok(Event::Tick { now_ms }) => {
                    println!();
                    print!("{}", output::render_text(&service.snapshot(), now_ms));
                }
                Ok(Event::SnapshotChanged { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    sweeper.shutdown();
    Ok(())
}
