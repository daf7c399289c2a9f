//! CLI entrypoint for the `gatekeep-auth-server` binary.

use clap::Parser as _;
use eyre::Result;

use gatekeep_auth_server::{cli::Cli, inner_main};

#[tokio::main]
async fn main() -> Result<()> {
    inner_main(Cli::parse()).await
}
