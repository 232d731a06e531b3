//! `draftforge` command-line entry point.

use anyhow::Result;
use clap::Parser;
use draftforge_selector::cli::{run_cli, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    run_cli(cli)
}
