mod cli;

use foldwatch::{
    config::{self, ActionKind, ConfigStore},
    watch::{WatchManager, WatchSettings},
};
use foldwatch_tools::{check_tools, require_tool, PredefinedAction};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tools the predefined actions and notifications shell out to.
const DAEMON_TOOLS: [&str; 3] = ["convert", "ffmpeg", "notify-send"];

async fn run_daemon(config_path: PathBuf, settle_ms: u64) -> Result<()> {
    for tool in DAEMON_TOOLS {
        if let Err(e) = require_tool(tool) {
            tracing::warn!(error = %e, "Actions using this tool will fail");
        }
    }

    let settings = WatchSettings::default().with_settle_delay(Duration::from_millis(settle_ms));
    let manager = Arc::new(WatchManager::new(config_path, settings));
    let cancel = CancellationToken::new();

    tokio::spawn(shutdown_signal(cancel.clone()));

    manager
        .run(cancel)
        .await
        .context("Watch manager failed to start")
}

/// Cancel `cancel` on SIGINT or SIGTERM.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => return,
    }

    tracing::info!("Shutdown signal received, stopping...");
    cancel.cancel();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "foldwatch=trace,foldwatch_tools=debug".to_string()
        } else {
            "foldwatch=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Daemon { settle_ms } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_daemon(config_path, settle_ms))
        }
        Commands::Add {
            path,
            action,
            command,
            extensions,
            keep,
        } => add_binding(&config_path, &path, action, command, extensions, keep),
        Commands::Remove { path, matcher } => remove_binding(&config_path, &path, matcher),
        Commands::List { path } => list_bindings(&config_path, path.as_deref()),
        Commands::CheckTools => check_tools_cmd(),
        Commands::Version => {
            println!("foldwatch {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_store(config_path: &Path) -> Result<ConfigStore> {
    ConfigStore::open(config_path)
        .with_context(|| format!("Failed to open folder config {}", config_path.display()))
}

fn add_binding(
    config_path: &Path,
    path: &Path,
    action: Option<String>,
    command: Option<String>,
    extensions: Vec<String>,
    keep: bool,
) -> Result<()> {
    let kind = match (command, action) {
        (Some(command), _) => ActionKind::Command(command),
        (None, Some(action)) => {
            let action: PredefinedAction = action.parse()?;
            ActionKind::Predefined(action.name().to_string())
        }
        (None, None) => anyhow::bail!("Either --action or --command is required"),
    };

    let mut store = open_store(config_path)?;
    let binding = store.upsert_binding(path, kind, extensions, keep)?;

    println!("✓ {} -> {}", binding.path.display(), binding.describe());
    if !binding.extensions.is_empty() {
        println!("  Extensions: {}", binding.extensions.join(", "));
    }
    if binding.keep_original {
        println!("  Originals kept in {}", binding.path.join(".originals").display());
    }

    Ok(())
}

fn remove_binding(config_path: &Path, path: &Path, matcher: Option<String>) -> Result<()> {
    let mut store = open_store(config_path)?;

    match matcher {
        Some(matcher) => {
            let removed = store.remove_binding(path, &matcher)?;
            println!("✓ Removed {} from {}", removed.describe(), removed.path.display());
        }
        None => {
            let count = store.remove_all_bindings_for_path(path)?;
            println!("✓ Removed {} binding(s) from {}", count, path.display());
        }
    }

    Ok(())
}

fn list_bindings(config_path: &Path, only: Option<&Path>) -> Result<()> {
    let store = open_store(config_path)?;

    let paths = match only {
        Some(path) => vec![foldwatch_common::paths::expand_path(path)],
        None => store.distinct_paths(),
    };

    if paths.is_empty() {
        println!("No folders are being watched.");
        println!("Add one with: foldwatch add <path> --action <name>");
        return Ok(());
    }

    for path in paths {
        let bindings = store.bindings_for_path(&path);
        println!("{}", path.display());
        if bindings.is_empty() {
            println!("  (no actions)");
        }
        for binding in bindings {
            print!("  - {}", binding.describe());
            if !binding.extensions.is_empty() {
                print!(" [{}]", binding.extensions.join(", "));
            }
            if binding.keep_original {
                print!(" (keep original)");
            }
            println!();
        }
    }

    Ok(())
}

fn check_tools_cmd() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All tools are available!");
    } else {
        println!("Some tools are missing. Actions that need them will fail.");
    }

    Ok(())
}
