//! Binary crate for the `classy-weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive search and configuration prompts
//! - Rendering forecast day cards

use clap::Parser;

mod cli;
mod logger;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logger::init(cmd.verbose);
    cmd.run().await
}
