//! CLI entrypoint for the `gatekeep-demo-app` binary.

use clap::Parser as _;
use eyre::Result;

use gatekeep_client::{cli::Cli, inner_main};

#[tokio::main]
async fn main() -> Result<()> {
    inner_main(Cli::parse()).await
}
