//! Interactive task manager
//!
//! Keeps personal, work and plain tasks in memory and writes them to a JSON
//! file on quit. Set `TASKMGR_FILE` to load a task file at startup.

mod config;
mod shell;

use std::io;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::shell::Shell;
use taskmgr_core::task::TaskStore;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the menu
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskmgr=warn,taskmgr_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "Loaded configuration");

    let mut store = TaskStore::new();
    if let Some(path) = config.task_file.as_ref().filter(|path| path.exists()) {
        let count = store
            .load_from_file(path)
            .with_context(|| format!("Failed to load tasks from {}", path.display()))?;
        tracing::info!("Loaded {} tasks from {:?}", count, path);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock(), store, config);
    shell.run().context("Terminal I/O failed")?;

    tracing::debug!(tasks = shell.store().len(), "Exiting");
    Ok(())
}
