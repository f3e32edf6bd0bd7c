//! `project` commands

use crate::harness::{derive_identifier, parse_tags, HarnessClient, Scope, ScopedIds};
use crate::resource::{operations, Module, ProjectSpec, ResourceKind, ResourceRequest};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Creates a new project
    #[command(after_help = "Examples:\n  harness-cli project new --name foo --account-id <account id>\n  harness-cli project new --name foo --account-id <account id> --org-id <org id>")]
    New(NewProjectArgs),

    /// Delete a project
    #[command(after_help = "Examples:\n  harness-cli project delete --name foo --account-id <account id> --org-id <org id>")]
    Delete(DeleteProjectArgs),
}

#[derive(Args, Debug)]
pub struct NewProjectArgs {
    /// The name of the project to create
    #[arg(short, long)]
    pub name: String,

    /// The description for the project
    #[arg(short, long)]
    pub description: Option<String>,

    /// The modules to attach to the project
    #[arg(short, long, value_enum, value_delimiter = ',', default_value = "CI")]
    pub modules: Vec<Module>,

    /// Tags to attach, in the format key:value e.g. foo:bar
    #[arg(short, long = "tags")]
    pub tags: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteProjectArgs {
    /// The name of the project to delete
    #[arg(short, long)]
    pub name: String,
}

pub async fn run<W: Write>(cmd: ProjectCommand, client: &HarnessClient, out: &mut W) -> Result<()> {
    // Projects always live inside an organization
    let ids = ScopedIds::new(Scope::Org, &client.org_id, None);

    let (outcome, name) = match cmd {
        ProjectCommand::New(args) => {
            let tags = parse_tags(&args.tags)?;
            let request = ResourceRequest::new(
                &args.name,
                &client.account_id,
                &ids,
                ProjectSpec {
                    modules: args.modules,
                },
            )?
            .with_description(args.description)
            .with_tags(tags);

            let outcome =
                operations::create(client, ResourceKind::Project, &ids, &args.name, &request)
                    .await
                .context("Failed to create project")?;
            (outcome, args.name)
        }
        ProjectCommand::Delete(args) => {
            let identifier = derive_identifier(&args.name)?;
            let outcome =
                operations::delete(client, ResourceKind::Project, &ids, &args.name, &identifier)
                    .await
                .context("Failed to delete project")?;
            (outcome, args.name)
        }
    };

    operations::report(&outcome, ResourceKind::Project, &name, out)?;
    Ok(())
}
