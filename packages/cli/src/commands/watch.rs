use super::{build_session, warn_without_engine, EngineArgs};
use crate::config::Config;
use crate::display::present;
use crate::watcher::FileWatcher;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// AsciiDoc file to watch
    pub file: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Re-render `file` on every change until interrupted
pub async fn watch(args: WatchArgs, config: &Config) -> Result<()> {
    let config = args.engine.apply(config);
    let mut session = build_session(&config);
    let mut updates = session.subscribe();
    let mut watcher = FileWatcher::new(&args.file)?;

    println!(
        "{} {}",
        "👀 Watching".bright_blue().bold(),
        args.file.display()
    );
    warn_without_engine(&args.engine, &config);
    println!();
    println!("{}", present(&session.render_state()));

    drop(session.set_source(read_source(&args.file)?));

    loop {
        tokio::select! {
            change = watcher.next_change() => {
                if change.is_none() {
                    break;
                }
                match read_source(&args.file) {
                    Ok(source) if source != session.source() => {
                        tracing::debug!(bytes = source.len(), "source changed");
                        drop(session.set_source(source));
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!(error = %err, "skipping unreadable change"),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                println!();
                println!("{}", present(&state));
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("{}", "Stopped watching".dimmed());
                break;
            }
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}
