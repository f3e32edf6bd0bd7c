use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use harness_cli::commands::{self, ApiCommand, ConfigCommand};
use harness_cli::config::{Config, Overrides};
use harness_cli::harness::HarnessClient;
use harness_cli::VERSION;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage Harness projects, secrets, connectors and delegates
#[derive(Parser, Debug)]
#[command(name = "harness-cli", version = VERSION, about, long_about = None)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// Harness API key
    #[arg(short = 'k', long, env = "HARNESS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Harness account identifier
    #[arg(short, long, env = "HARNESS_ACCOUNT_ID", global = true)]
    account_id: Option<String>,

    /// Organization identifier [default: default]
    #[arg(short, long, env = "HARNESS_ORG_ID", global = true)]
    org_id: Option<String>,

    /// API gateway URL
    #[arg(long, env = "HARNESS_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Request timeout in seconds [default: 30]
    #[arg(
        long,
        env = "HARNESS_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout: Option<u64>,

    /// Log level
    #[arg(
        short = 'v',
        long,
        visible_alias = "verbose",
        value_enum,
        env = "HARNESS_LOG_LEVEL",
        default_value = "info",
        global = true
    )]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

impl GlobalArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            account_id: self.account_id.clone(),
            org_id: self.org_id.clone(),
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Api(ApiCommand),

    /// Inspect or change persisted defaults
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print the version
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// Logs go to stderr, or to `log_file` through a non-blocking writer whose
/// guard must live until exit. Stdout carries command output only.
fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt()
            .with_max_level(tracing_level)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::debug!("harness-cli {} logging to {:?}", VERSION, log_path);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.global.log_level, args.global.log_file.as_deref())?;
    let overrides = args.global.overrides();
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Version => {
            writeln!(stdout, "harness-cli {}", VERSION)?;
        }
        Command::Config(cmd) => {
            let path = Config::config_path()
                .context("Could not determine the configuration directory")?;
            commands::config::run(cmd, &path, &overrides, &mut stdout)?;
        }
        Command::Api(cmd) => {
            let settings = Config::load().resolve(&overrides)?;
            tracing::debug!(
                account = %settings.account_id,
                org = %settings.org_id,
                endpoint = %settings.endpoint,
                "Resolved settings"
            );
            let client = HarnessClient::new(&settings)?;
            commands::run(cmd, &client, &mut stdout).await?;
        }
    }

    stdout.flush()?;
    Ok(())
}
