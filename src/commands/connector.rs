//! `connector` commands
//!
//! Each connector type gets its own `new` subcommand; deletion is shared.

use crate::harness::{derive_identifier, HarnessClient, Scope, ScopedIds};
use crate::resource::{
    operations, ConnectorSpec, DockerAuth, DockerProvider, DockerRegistrySpec, GcpCredential,
    GcpSpec, GithubApiAccess, GithubAuth, GithubHttpCredentials, GithubSpec, GithubUrlType,
    ResourceKind, ResourceRequest, SecretKeyRef, SshCredentials, TokenRef, UsernamePassword,
    UsernameToken,
};
use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Subcommand, ValueEnum};
use std::io::Write;

pub const DEFAULT_DOCKER_REGISTRY_URL: &str = "https://registry.hub.docker.com/v2/";

#[derive(Subcommand, Debug)]
pub enum ConnectorCommand {
    /// Delete a connector
    #[command(after_help = "Examples:\n  harness-cli connector delete --name foo --project-id <project id>\n  harness-cli connector delete --name foo --connector-scope account")]
    Delete(DeleteConnectorArgs),

    /// Docker registry connectors
    #[command(subcommand)]
    DockerRegistry(DockerRegistryCommand),

    /// GitHub connectors
    #[command(subcommand)]
    Github(GithubCommand),

    /// Google Cloud Platform connectors
    #[command(subcommand)]
    Gcp(GcpCommand),
}

#[derive(Subcommand, Debug)]
pub enum DockerRegistryCommand {
    /// Create a new Docker registry connector
    #[command(after_help = "Examples:\n  harness-cli connector docker-registry new --name dockerhub --username me --password-secret-id docker_pat\n  harness-cli connector docker-registry new --name public --auth-type anonymous --connector-scope account")]
    New(NewDockerRegistryArgs),
}

#[derive(Subcommand, Debug)]
pub enum GithubCommand {
    /// Create a new GitHub connector
    #[command(after_help = "Examples:\n  harness-cli connector github new --name gh --url https://github.com/acme --username me --pat gh_pat\n  harness-cli connector github new --name gh --url git@github.com:acme/app.git --url-type Repo --auth-type Ssh --ssh-key gh_ssh --enable-api-access false")]
    New(NewGithubArgs),
}

#[derive(Subcommand, Debug)]
pub enum GcpCommand {
    /// Create a new GCP connector
    #[command(after_help = "Examples:\n  harness-cli connector gcp new --name gcp --secret-key gcp_sa_key\n  harness-cli connector gcp new --name gcp --auth-type delegate --delegate-tags gke")]
    New(NewGcpArgs),
}

/// Flags shared by every connector type
#[derive(Args, Debug)]
pub struct CommonConnectorArgs {
    /// The name of the connector to create
    #[arg(short, long)]
    pub name: String,

    /// The description for the connector
    #[arg(short, long)]
    pub description: Option<String>,

    /// The project where the connector will be created
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// The connector scope
    #[arg(long = "connector-scope", value_enum, default_value_t = Scope::Project)]
    pub scope: Scope,

    /// Run connection checks through a delegate
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub execute_on_delegate: bool,

    /// Delegate tags used to select the delegate
    #[arg(long, value_delimiter = ',')]
    pub delegate_tags: Vec<String>,
}

impl CommonConnectorArgs {
    fn ids(&self, client: &HarnessClient) -> ScopedIds {
        ScopedIds::new(self.scope, &client.org_id, self.project_id.as_deref())
    }

    /// Qualify a secret id so the connector can find it from its own scope
    fn secret_ref(&self, secret_id: &str) -> String {
        self.scope.secret_ref(secret_id)
    }
}

#[derive(Args, Debug)]
pub struct DeleteConnectorArgs {
    /// The name of the connector to delete
    #[arg(short, long)]
    pub name: String,

    /// The project where the connector will be deleted
    #[arg(short, long)]
    pub project_id: Option<String>,

    /// The connector scope
    #[arg(long = "connector-scope", value_enum, default_value_t = Scope::Project)]
    pub scope: Scope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DockerAuthType {
    Password,
    Anonymous,
}

#[derive(Args, Debug)]
pub struct NewDockerRegistryArgs {
    #[command(flatten)]
    pub common: CommonConnectorArgs,

    #[arg(long, value_enum, default_value = "password")]
    pub auth_type: DockerAuthType,

    /// Registry user name
    #[arg(short, long)]
    pub username: Option<String>,

    /// Secret holding the registry password
    #[arg(long = "password-secret-id")]
    pub password_secret_id: Option<String>,

    #[arg(long, default_value = DEFAULT_DOCKER_REGISTRY_URL)]
    pub registry_url: String,

    #[arg(long, value_enum, default_value = "DockerHub")]
    pub provider_type: DockerProvider,
}

impl NewDockerRegistryArgs {
    pub fn to_spec(&self) -> Result<ConnectorSpec> {
        let auth = match self.auth_type {
            DockerAuthType::Anonymous => DockerAuth::Anonymous,
            DockerAuthType::Password => {
                let (Some(username), Some(secret)) = (&self.username, &self.password_secret_id)
                else {
                    bail!(
                        "\"--username\" and \"--password-secret-id\" are required for password \
                         authentication"
                    );
                };
                DockerAuth::UsernamePassword(UsernamePassword {
                    username: username.clone(),
                    password_ref: self.common.secret_ref(secret),
                })
            }
        };

        Ok(ConnectorSpec::DockerRegistry(DockerRegistrySpec {
            docker_registry_url: self.registry_url.clone(),
            provider_type: self.provider_type,
            auth,
            execute_on_delegate: self.common.execute_on_delegate,
            delegate_selectors: self.common.delegate_tags.clone(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GithubAuthType {
    #[value(name = "Http")]
    Http,
    #[value(name = "Ssh")]
    Ssh,
}

#[derive(Args, Debug)]
pub struct NewGithubArgs {
    #[command(flatten)]
    pub common: CommonConnectorArgs,

    /// GitHub account or repository URL
    #[arg(long)]
    pub url: String,

    #[arg(long, value_enum, default_value = "Account")]
    pub url_type: GithubUrlType,

    /// Repository used to test an account level connector
    #[arg(long)]
    pub validation_repo: Option<String>,

    #[arg(long, value_enum, default_value = "Http")]
    pub auth_type: GithubAuthType,

    /// GitHub user name for HTTP authentication
    #[arg(short, long)]
    pub username: Option<String>,

    /// Secret holding a personal access token
    #[arg(long)]
    pub pat: Option<String>,

    /// Secret holding an SSH key
    #[arg(long)]
    pub ssh_key: Option<String>,

    /// Let Harness call the GitHub API with the personal access token
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    pub enable_api_access: bool,
}

impl NewGithubArgs {
    pub fn to_spec(&self) -> Result<ConnectorSpec> {
        let authentication = match self.auth_type {
            GithubAuthType::Http => {
                let (Some(username), Some(pat)) = (&self.username, &self.pat) else {
                    bail!("\"--username\" and \"--pat\" are required for Http authentication");
                };
                GithubAuth::Http(GithubHttpCredentials::UsernameToken(UsernameToken {
                    username: username.clone(),
                    token_ref: self.common.secret_ref(pat),
                }))
            }
            GithubAuthType::Ssh => {
                let Some(key) = &self.ssh_key else {
                    bail!("\"--ssh-key\" is required for Ssh authentication");
                };
                GithubAuth::Ssh(SshCredentials {
                    ssh_key_ref: self.common.secret_ref(key),
                })
            }
        };

        let api_access = if self.enable_api_access {
            let Some(pat) = &self.pat else {
                bail!("\"--pat\" is required when API access is enabled");
            };
            Some(GithubApiAccess::Token(TokenRef {
                token_ref: self.common.secret_ref(pat),
            }))
        } else {
            None
        };

        let validation_repo = match self.url_type {
            GithubUrlType::Repo => Some(self.url.clone()),
            GithubUrlType::Account => self.validation_repo.clone(),
        };

        Ok(ConnectorSpec::Github(GithubSpec {
            url: self.url.clone(),
            url_type: self.url_type,
            validation_repo,
            authentication,
            api_access,
            execute_on_delegate: self.common.execute_on_delegate,
            delegate_selectors: self.common.delegate_tags.clone(),
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GcpAuthType {
    /// Service account key stored as a secret
    Manual,
    /// Credentials of the delegate's service account
    Delegate,
}

#[derive(Args, Debug)]
pub struct NewGcpArgs {
    #[command(flatten)]
    pub common: CommonConnectorArgs,

    #[arg(long, value_enum, default_value = "manual")]
    pub auth_type: GcpAuthType,

    /// Secret holding the service account key
    #[arg(long)]
    pub secret_key: Option<String>,
}

impl NewGcpArgs {
    pub fn to_spec(&self) -> Result<ConnectorSpec> {
        let credential = match self.auth_type {
            GcpAuthType::Manual => {
                let Some(key) = &self.secret_key else {
                    bail!("\"--secret-key\" is required for manual authentication");
                };
                GcpCredential::ManualConfig(SecretKeyRef {
                    secret_key_ref: self.common.secret_ref(key),
                })
            }
            GcpAuthType::Delegate => {
                if self.common.delegate_tags.is_empty() {
                    bail!(
                        "\"--delegate-tags\" is required when inheriting credentials \
                         from a delegate"
                    );
                }
                GcpCredential::InheritFromDelegate
            }
        };

        Ok(ConnectorSpec::Gcp(GcpSpec {
            credential,
            execute_on_delegate: self.common.execute_on_delegate,
            delegate_selectors: self.common.delegate_tags.clone(),
        }))
    }
}

async fn create_connector<W: Write>(
    client: &HarnessClient,
    common: CommonConnectorArgs,
    spec: ConnectorSpec,
    out: &mut W,
) -> Result<()> {
    let ids = common.ids(client);
    let kind = spec.type_name();
    let request = ResourceRequest::new(&common.name, &client.account_id, &ids, spec)?
        .with_description(common.description);

    let outcome = operations::create(client, ResourceKind::Connector, &ids, &common.name, &request)
        .await
        .with_context(|| format!("Failed to create {} connector", kind))?;

    operations::report(&outcome, ResourceKind::Connector, &common.name, out)?;
    Ok(())
}

pub async fn run<W: Write>(
    cmd: ConnectorCommand,
    client: &HarnessClient,
    out: &mut W,
) -> Result<()> {
    match cmd {
        ConnectorCommand::Delete(args) => {
            let ids = ScopedIds::new(args.scope, &client.org_id, args.project_id.as_deref());
            let identifier = derive_identifier(&args.name)?;
            let outcome =
                operations::delete(client, ResourceKind::Connector, &ids, &args.name, &identifier)
                    .await
                .context("Failed to delete connector")?;
            operations::report(&outcome, ResourceKind::Connector, &args.name, out)?;
            Ok(())
        }
        ConnectorCommand::DockerRegistry(DockerRegistryCommand::New(args)) => {
            let spec = args.to_spec()?;
            create_connector(client, args.common, spec, out).await
        }
        ConnectorCommand::Github(GithubCommand::New(args)) => {
            let spec = args.to_spec()?;
            create_connector(client, args.common, spec, out).await
        }
        ConnectorCommand::Gcp(GcpCommand::New(args)) => {
            let spec = args.to_spec()?;
            create_connector(client, args.common, spec, out).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser)]
    struct Cli {
        #[command(subcommand)]
        cmd: ConnectorCommand,
    }

    fn parse(argv: &[&str]) -> ConnectorCommand {
        let mut full = vec!["test"];
        full.extend_from_slice(argv);
        Cli::parse_from(full).cmd
    }

    fn spec_json(cmd: ConnectorCommand) -> Result<serde_json::Value> {
        let spec = match cmd {
            ConnectorCommand::DockerRegistry(DockerRegistryCommand::New(args)) => args.to_spec()?,
            ConnectorCommand::Github(GithubCommand::New(args)) => args.to_spec()?,
            ConnectorCommand::Gcp(GcpCommand::New(args)) => args.to_spec()?,
            other => panic!("unexpected command: {:?}", other),
        };
        Ok(serde_json::to_value(spec).unwrap())
    }

    #[test]
    fn test_docker_password_needs_credentials() {
        let cmd = parse(&["docker-registry", "new", "--name", "hub"]);
        assert!(spec_json(cmd).is_err());
    }

    #[test]
    fn test_docker_secret_ref_follows_scope() {
        let cmd = parse(&[
            "docker-registry", "new", "--name", "hub", "--username", "me",
            "--password-secret-id", "docker_pat", "--connector-scope", "org",
        ]);
        let value = spec_json(cmd).unwrap();
        assert_eq!(value["type"], "DockerRegistry");
        assert_eq!(value["spec"]["auth"]["spec"]["passwordRef"], "org.docker_pat");
        assert_eq!(value["spec"]["dockerRegistryUrl"], DEFAULT_DOCKER_REGISTRY_URL);
    }

    #[test]
    fn test_github_http_with_api_access() {
        let cmd = parse(&[
            "github", "new", "--name", "gh", "--url", "https://github.com/acme",
            "--username", "me", "--pat", "gh_pat",
        ]);
        let value = spec_json(cmd).unwrap();
        assert_eq!(
            value["spec"]["authentication"],
            json!({
                "type": "Http",
                "spec": {"type": "UsernameToken", "spec": {"username": "me", "tokenRef": "gh_pat"}}
            })
        );
        assert_eq!(value["spec"]["apiAccess"]["spec"]["tokenRef"], "gh_pat");
        assert_eq!(value["spec"]["type"], "Account");
    }

    #[test]
    fn test_github_repo_url_is_validation_repo() {
        let cmd = parse(&[
            "github", "new", "--name", "gh", "--url", "git@github.com:acme/app.git",
            "--url-type", "Repo", "--auth-type", "Ssh", "--ssh-key", "gh_ssh",
            "--enable-api-access", "false",
        ]);
        let value = spec_json(cmd).unwrap();
        assert_eq!(value["spec"]["validationRepo"], "git@github.com:acme/app.git");
        assert_eq!(value["spec"]["authentication"]["spec"]["sshKeyRef"], "gh_ssh");
        assert!(value["spec"].get("apiAccess").is_none());
    }

    #[test]
    fn test_github_api_access_requires_pat() {
        let cmd = parse(&[
            "github", "new", "--name", "gh", "--url", "https://github.com/acme",
            "--auth-type", "Ssh", "--ssh-key", "gh_ssh",
        ]);
        assert!(spec_json(cmd).is_err());
    }

    #[test]
    fn test_gcp_delegate_needs_tags() {
        let cmd = parse(&["gcp", "new", "--name", "gcp", "--auth-type", "delegate"]);
        assert!(spec_json(cmd).is_err());

        let cmd = parse(&[
            "gcp", "new", "--name", "gcp", "--auth-type", "delegate", "--delegate-tags", "gke,prod",
        ]);
        let value = spec_json(cmd).unwrap();
        assert_eq!(value["spec"]["credential"], json!({"type": "InheritFromDelegate"}));
        assert_eq!(value["spec"]["delegateSelectors"], json!(["gke", "prod"]));
    }

    #[test]
    fn test_gcp_manual_at_account_scope() {
        let cmd = parse(&[
            "gcp", "new", "--name", "gcp", "--secret-key", "sa_key", "--connector-scope", "account",
            "--execute-on-delegate", "false",
        ]);
        let value = spec_json(cmd).unwrap();
        assert_eq!(value["spec"]["credential"]["spec"]["secretKeyRef"], "account.sa_key");
        assert_eq!(value["spec"]["executeOnDelegate"], false);
    }
}
