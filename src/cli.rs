use std::{path::PathBuf, sync::OnceLock};

use clap::Parser;

/// Declarative service stacks for un-complicated infrastructure.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the resource lookup context file.
    #[arg(short, long, default_value = "stack-context.toml")]
    pub context: PathBuf,

    /// Write the declaration set here instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

static ARGS: OnceLock<Args> = OnceLock::new();

pub fn get_cli_args() -> &'static Args {
    ARGS.get_or_init(Args::parse)
}
