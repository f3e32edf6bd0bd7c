//! `delegate` commands

use crate::harness::{HarnessClient, Outcome, Scope, ScopedIds};
use crate::resource::operations::{self, OutputFormat};
use crate::resource::{DelegateTagQuery, ResourceKind};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum DelegateCommand {
    /// List existing delegates by tag
    #[command(after_help = "Examples:\n  harness-cli delegate list --project-id <project id> --tags foo --tags bar\n  harness-cli delegate list --delegate-scope account --output yaml")]
    List(ListDelegatesArgs),
}

#[derive(Args, Debug)]
pub struct ListDelegatesArgs {
    /// The project whose delegates are listed
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// The scope of the delegate
    #[arg(long = "delegate-scope", value_enum, default_value_t = Scope::Project)]
    pub scope: Scope,

    /// The tags that will be used to filter the delegate
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

/// One delegate group as printed to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegateEntry {
    pub name: String,
    pub id: String,
}

impl DelegateEntry {
    /// Entries without a name or identifier are skipped
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            name: value.get("name")?.as_str()?.to_string(),
            id: value.get("identifier")?.as_str()?.to_string(),
        })
    }
}

/// Reduce raw delegate groups to `{name, id}` entries
fn summarize(items: &[Value]) -> Result<Vec<Value>> {
    let entries: Vec<DelegateEntry> =
        items.iter().filter_map(DelegateEntry::from_value).collect();
    if entries.len() < items.len() {
        tracing::warn!(
            "Skipped {} delegate entries without name or identifier",
            items.len() - entries.len()
        );
    }
    entries
        .iter()
        .map(|e| serde_json::to_value(e).map_err(Into::into))
        .collect()
}

pub async fn run<W: Write>(
    cmd: DelegateCommand,
    client: &HarnessClient,
    out: &mut W,
) -> Result<()> {
    let DelegateCommand::List(args) = cmd;

    let ids = ScopedIds::new(args.scope, &client.org_id, args.project_id.as_deref());
    tracing::info!("Getting list of delegates for tags {:?}", args.tags);

    let query = DelegateTagQuery { tags: args.tags };
    let outcome = operations::list(client, ResourceKind::DelegateGroups, &ids, &query)
        .await
        .context("Failed to list delegates")?;

    let outcome = match outcome {
        Outcome::Listed { items } => Outcome::Listed {
            items: summarize(&items)?,
        },
        other => other,
    };

    operations::report_as(&outcome, ResourceKind::DelegateGroups, "", args.output, out)?;
    Ok(())
}
