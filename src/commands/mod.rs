//! Command line surface
//!
//! Each resource group is a `clap` subcommand tree. Commands validate their
//! flags, build a payload, hand it to [`crate::resource::operations`] and
//! print the result.

pub mod config;
pub mod connector;
pub mod delegate;
pub mod project;
pub mod secret;

use crate::harness::HarnessClient;
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

pub use config::ConfigCommand;
pub use connector::ConnectorCommand;
pub use delegate::DelegateCommand;
pub use project::ProjectCommand;
pub use secret::SecretCommand;

/// Commands that talk to the Harness API
#[derive(Subcommand, Debug)]
pub enum ApiCommand {
    /// Create or delete projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Create or delete secrets
    #[command(subcommand)]
    Secret(SecretCommand),

    /// Create or delete connectors
    #[command(subcommand)]
    Connector(ConnectorCommand),

    /// Look up delegates
    #[command(subcommand)]
    Delegate(DelegateCommand),
}

/// Run an API command, writing its result to `out`
pub async fn run<W: Write>(command: ApiCommand, client: &HarnessClient, out: &mut W) -> Result<()> {
    match command {
        ApiCommand::Project(cmd) => project::run(cmd, client, out).await,
        ApiCommand::Secret(cmd) => secret::run(cmd, client, out).await,
        ApiCommand::Connector(cmd) => connector::run(cmd, client, out).await,
        ApiCommand::Delegate(cmd) => delegate::run(cmd, client, out).await,
    }
}
