use super::{build_session, warn_without_engine, EngineArgs};
use crate::config::Config;
use crate::display::present;
use adork_playground_common::RenderState;
use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// AsciiDoc file to render (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Print the render state as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Run the pipeline once and print the resulting state
pub async fn render(args: RenderArgs, config: &Config) -> Result<RenderState> {
    let config = args.engine.apply(config);
    let source = read_source(args.file.as_ref())?;

    let mut session = build_session(&config);
    warn_without_engine(&args.engine, &config);

    session.edit(source).await?;
    let state = session.render_state();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", present(&state));
    }

    Ok(state)
}

fn read_source(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Cannot read stdin")?;
            Ok(source)
        }
    }
}
