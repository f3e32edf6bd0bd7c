//! `secret` commands

use crate::harness::{derive_identifier, parse_tags, FileUpload, HarnessClient, Scope, ScopedIds};
use crate::resource::{operations, ResourceKind, ResourceRequest, SecretSpec, SecretType, ValueType};
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Secret manager built into every Harness account
pub const DEFAULT_SECRET_MANAGER: &str = "harnessSecretManager";

#[derive(Subcommand, Debug)]
pub enum SecretCommand {
    /// Create a new secret
    #[command(after_help = "Examples:\n  harness-cli secret new --name foo --project-id <project id> --file foo.txt\n  harness-cli secret new --name foo --project-id <project id> --text foo --secret-type SecretText\n  harness-cli secret new --name foo --text foo --secret-type SecretText --secret-scope account")]
    New(NewSecretArgs),

    /// Delete a secret
    #[command(after_help = "Examples:\n  harness-cli secret delete --name foo --project-id <project id>\n  harness-cli secret delete --name foo --secret-scope org")]
    Delete(DeleteSecretArgs),
}

#[derive(Args, Debug)]
pub struct NewSecretArgs {
    /// The name of the secret to create
    #[arg(short, long)]
    pub name: String,

    /// The description for the secret
    #[arg(short, long)]
    pub description: Option<String>,

    /// The project where the secret will be created
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// File holding the secret content; required unless the type is SecretText
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// The secret text when the secret type is SecretText
    #[arg(long)]
    pub text: Option<String>,

    /// Tags to attach, in the format key:value e.g. foo:bar
    #[arg(short, long = "tags")]
    pub tags: Vec<String>,

    /// The secret manager id to use
    #[arg(short, long = "secret-manager-id", default_value = DEFAULT_SECRET_MANAGER)]
    pub secret_manager_id: String,

    /// The secret type
    #[arg(long, value_enum, default_value = "SecretFile")]
    pub secret_type: SecretType,

    /// The secret scope
    #[arg(long = "secret-scope", value_enum, default_value_t = Scope::Project)]
    pub scope: Scope,

    /// How the value of a SecretText is stored
    #[arg(long = "secret-value-type", value_enum, default_value = "Inline")]
    pub value_type: ValueType,
}

impl NewSecretArgs {
    /// Check flag combinations before anything is sent
    pub fn validate(&self) -> Result<()> {
        if self.secret_type.is_file_backed() {
            let Some(file) = &self.file else {
                bail!(
                    "\"--file\" is required when the secret type is \"{}\"",
                    self.secret_type.as_str()
                );
            };
            if !file.is_file() {
                bail!("secret file {:?} does not exist", file);
            }
        } else if self.text.as_deref().unwrap_or_default().is_empty() {
            bail!("\"--text\" is required when the secret type is \"SecretText\"");
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteSecretArgs {
    /// The name of the secret to delete
    #[arg(short, long)]
    pub name: String,

    /// The project where the secret will be deleted
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// The secret scope
    #[arg(long = "secret-scope", value_enum, default_value_t = Scope::Project)]
    pub scope: Scope,
}

pub async fn run<W: Write>(cmd: SecretCommand, client: &HarnessClient, out: &mut W) -> Result<()> {
    let (outcome, name) = match cmd {
        SecretCommand::New(args) => {
            args.validate()?;
            let ids = ScopedIds::new(args.scope, &client.org_id, args.project_id.as_deref());
            let tags = parse_tags(&args.tags)?;
            let spec = SecretSpec::new(
                args.secret_type,
                &args.secret_manager_id,
                args.value_type,
                args.text,
            );
            let request = ResourceRequest::new(&args.name, &client.account_id, &ids, spec)?
                .with_description(args.description)
                .with_tags(tags);

            let outcome = match args.file.filter(|_| args.secret_type.is_file_backed()) {
                Some(path) => {
                    let file = FileUpload::read(&path).await?;
                    let kind = ResourceKind::Secret;
                    operations::upload(client, kind, &ids, &args.name, &request, file).await
                }
                None => {
                    operations::create(client, ResourceKind::Secret, &ids, &args.name, &request)
                        .await
                }
            }
            .context("Failed to create secret")?;

            (outcome, args.name)
        }
        SecretCommand::Delete(args) => {
            let ids = ScopedIds::new(args.scope, &client.org_id, args.project_id.as_deref());
            let identifier = derive_identifier(&args.name)?;
            let outcome =
                operations::delete(client, ResourceKind::Secret, &ids, &args.name, &identifier)
                    .await
                .context("Failed to delete secret")?;
            (outcome, args.name)
        }
    };

    operations::report(&outcome, ResourceKind::Secret, &name, out)?;
    Ok(())
}
