mod commands;
mod config;
mod display;
mod watcher;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{render, watch, RenderArgs, WatchArgs};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// AsciiDork Playground - live AsciiDoc to HTML preview
#[derive(Parser, Debug)]
#[command(name = "adork-playground")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to adork-playground.config.json in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `adork_playground_editor=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a document once and print the formatted HTML
    Render(RenderArgs),

    /// Re-render a document every time it changes
    Watch(WatchArgs),
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let config = Config::resolve(cli.config.as_ref(), &cwd)?;

    match cli.command {
        Command::Render(args) => {
            let state = render(args, &config).await?;
            Ok(if state.is_error() { 2 } else { 0 })
        }
        Command::Watch(args) => {
            watch(args, &config).await?;
            Ok(0)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(cli).await {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!();
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            eprintln!();
            std::process::exit(1);
        }
    }
}
