//! Command line client for the Harness NextGen management API.
//!
//! The binary is a thin shell over this library so the command layer can be
//! driven from integration tests against a mock server.

pub mod commands;
pub mod config;
pub mod harness;
pub mod resource;

/// Version injected at compile time via HARNESS_CLI_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("HARNESS_CLI_VERSION") {
    Some(v) => v,
    None => "dev",
};
