//! opsgraph command-line client.
//!
//! Provides the `opsgraph` binary with subcommands that drive the same
//! `SyncSession` a canvas uses:
//! - `replay` applies a recorded message log offline and prints the final
//!   graph as JSON;
//! - `watch` follows a live authority and prints a line per change;
//! - `action` sends one `node_action` and reports the status it produced.
//!
//! Logs go to stderr so stdout stays machine-readable.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use opsgraph_core::{GraphSnapshot, GraphStore, NodeAction, NodeId};
use opsgraph_sync::{
    connect, decode_inbound, ChannelTransport, Decoded, Disconnected, InboundEvent,
    InboundMessage, ReconnectPolicy, SessionStats, SyncSession,
};

/// Resource canvas sync client.
#[derive(Parser)]
#[command(name = "opsgraph", about = "Resource canvas sync client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a JSON-lines message log and print the resulting graph.
    Replay {
        /// Message log, one inbound message per line.
        #[arg(short, long)]
        file: PathBuf,

        /// Start from the demo graph instead of an empty one.
        #[arg(long)]
        demo: bool,
    },

    /// Follow a live authority and print a summary line per change.
    Watch {
        /// WebSocket URL of the authority.
        #[arg(short, long, default_value = "ws://localhost:8000/ws")]
        url: String,
    },

    /// Ask the authority to run an action on a node.
    Action {
        #[arg(short, long, default_value = "ws://localhost:8000/ws")]
        url: String,

        /// Target node id.
        #[arg(short, long)]
        node: String,

        /// Action name (launch, provision, start, stop, reboot, configure,
        /// status, or anything the authority understands).
        #[arg(short, long)]
        action: String,

        /// Seconds to wait for the node to appear and for the reply.
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Replay { file, demo } => run_replay(&file, demo),
        Commands::Watch { url } => run_watch(url).await,
        Commands::Action {
            url,
            node,
            action,
            timeout_secs,
        } => {
            run_action(
                url,
                NodeId(node),
                NodeAction::from(action),
                Duration::from_secs(timeout_secs),
            )
            .await
        }
    };
    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// replay
// ---------------------------------------------------------------------------

/// Execute the replay subcommand.
///
/// Returns exit code: 0 = success, 3 = I/O error.
fn run_replay(path: &Path, demo: bool) -> i32 {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: failed to open '{}': {}", path.display(), e);
            return 3;
        }
    };
    let store = if demo { GraphStore::demo() } else { GraphStore::new() };

    match replay(store, BufReader::new(file)) {
        Ok((snapshot, stats)) => {
            tracing::info!(
                applied = stats.applied,
                rejected = stats.rejected,
                malformed = stats.malformed,
                unrecognized = stats.unrecognized,
                "replay finished"
            );
            print_json(&snapshot);
            0
        }
        Err(e) => {
            eprintln!("I/O error: {}", e);
            3
        }
    }
}

/// Feeds every non-blank line of `log` to an offline session.
fn replay(store: GraphStore, log: impl BufRead) -> io::Result<(GraphSnapshot, SessionStats)> {
    let mut session = SyncSession::new(store, Disconnected);
    for line in log.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        session.handle_frame(&line);
    }
    Ok((session.store().snapshot(), session.stats()))
}

// ---------------------------------------------------------------------------
// watch
// ---------------------------------------------------------------------------

/// Follows the authority until Ctrl-C. Always returns 0; connection trouble
/// is retried by the client and logged.
async fn run_watch(url: String) -> i32 {
    let (client, transport, inbound) = connect(url, ReconnectPolicy::default());
    let session = SyncSession::new(GraphStore::new(), transport);
    let mut snapshots = session.subscribe();
    let (_commands_tx, commands_rx) = mpsc::unbounded_channel();
    let run = tokio::spawn(session.run(inbound, commands_rx));

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = summary_line(&snapshots.borrow_and_update());
                println!("{}", line);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    client.close();
    if let Ok(store) = run.await {
        tracing::info!(revision = store.revision(), "watch stopped");
    }
    0
}

fn summary_line(snapshot: &GraphSnapshot) -> String {
    let statuses: Vec<String> = snapshot
        .nodes
        .iter()
        .map(|n| format!("{}={}", n.id, n.status()))
        .collect();
    format!(
        "rev {} | {} nodes, {} edges ({} active) | {}",
        snapshot.revision,
        snapshot.nodes.len(),
        snapshot.edges.len(),
        snapshot.active_edges().count(),
        statuses.join(" ")
    )
}

// ---------------------------------------------------------------------------
// action
// ---------------------------------------------------------------------------

/// Execute the action subcommand.
///
/// Returns exit code: 0 = action sent (reply printed if one arrived),
/// 1 = node never appeared or the action could not be sent.
async fn run_action(url: String, node: NodeId, action: NodeAction, timeout: Duration) -> i32 {
    let (client, transport, mut inbound) = connect(url, ReconnectPolicy::default());
    let mut session: SyncSession<ChannelTransport> = SyncSession::new(GraphStore::new(), transport);

    let appeared = tokio::time::timeout(timeout, async {
        while !session.store().contains_node(&node) {
            match inbound.recv().await {
                Some(event) => {
                    session.handle_event(event);
                }
                None => return false,
            }
        }
        true
    })
    .await
    .unwrap_or(false);
    if !appeared {
        eprintln!("Error: node '{}' not found on the authority", node);
        client.close();
        return 1;
    }

    match session.request_action(&node, action.clone()) {
        Ok(true) => tracing::info!(%node, %action, "action sent"),
        Ok(false) | Err(_) => {
            eprintln!("Error: failed to send '{}' to '{}'", action, node);
            client.close();
            return 1;
        }
    }

    let reply = tokio::time::timeout(timeout, async {
        while let Some(event) = inbound.recv().await {
            let InboundEvent::Frame(frame) = event else {
                session.handle_event(event);
                continue;
            };
            session.handle_frame(&frame);
            if let Ok(Decoded::Message(msg @ InboundMessage::SetStatus { .. })) =
                decode_inbound(&frame)
            {
                if matches!(&msg, InboundMessage::SetStatus { id, .. } if *id == node) {
                    return Some(msg);
                }
            }
        }
        None
    })
    .await
    .ok()
    .flatten();

    match reply {
        Some(msg) => print_json(&msg),
        None => eprintln!("No status change reported for '{}'", node),
    }
    client.close();
    0
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}
