//! Resource Operations
//!
//! The create / delete / list sequence shared by every resource kind. What
//! differs between kinds (paths, envelope key, reply shape) comes from the
//! registry.

use super::registry::{ResourceDef, ResourceKind};
use crate::harness::{
    ApiError, Expect, FileUpload, HarnessClient, Outcome, RequestHandle, ScopedIds,
};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// How listings are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

fn start<'c>(
    client: &'c HarnessClient,
    def: &'static ResourceDef,
    ids: &ScopedIds,
) -> RequestHandle<'c> {
    def.query.iter().fold(client.request().scoped(ids), |req, (k, v)| {
        req.query(k.as_str(), v.as_str())
    })
}

fn envelope<'a, S: Serialize>(
    def: &'a ResourceDef,
    payload: &'a S,
) -> Result<BTreeMap<&'a str, &'a S>, ApiError> {
    let key = def.require(&def.envelope, "create")?;
    Ok(BTreeMap::from([(key, payload)]))
}

/// Create a resource from a JSON payload
pub async fn create<S: Serialize>(
    client: &HarnessClient,
    kind: ResourceKind,
    ids: &ScopedIds,
    name: &str,
    payload: &S,
) -> Result<Outcome, ApiError> {
    let def = kind.def()?;
    let path = def.require(&def.create_path, "create")?;
    let identifier_path = def.require(&def.identifier_path, "create")?;

    tracing::info!("Creating {} '{}'", def.display_name, name);

    let document = start(client, def, ids)
        .post_json(path, &envelope(def, payload)?)
        .await?;

    Outcome::decode(document, Expect::Identifier(identifier_path), name)
}

/// Create a resource whose content is a file, sending the payload as the
/// `spec` form field
pub async fn upload<S: Serialize>(
    client: &HarnessClient,
    kind: ResourceKind,
    ids: &ScopedIds,
    name: &str,
    payload: &S,
    file: FileUpload,
) -> Result<Outcome, ApiError> {
    let def = kind.def()?;
    let path = def.require(&def.upload_path, "file upload")?;
    let identifier_path = def.require(&def.identifier_path, "file upload")?;

    tracing::info!(
        "Creating {} '{}' from file '{}' ({} bytes)",
        def.display_name,
        name,
        file.file_name,
        file.content.len()
    );

    let document = start(client, def, ids)
        .post_multipart(path, &envelope(def, payload)?, file)
        .await?;

    Outcome::decode(document, Expect::Identifier(identifier_path), name)
}

/// Delete a resource by identifier
pub async fn delete(
    client: &HarnessClient,
    kind: ResourceKind,
    ids: &ScopedIds,
    name: &str,
    identifier: &str,
) -> Result<Outcome, ApiError> {
    let def = kind.def()?;
    let path = def.require(&def.delete_path, "delete")?;

    tracing::info!("Deleting {} '{}' ({})", def.display_name, name, identifier);

    let document = start(client, def, ids)
        .delete_by_id(path, identifier)
        .await?;

    Outcome::decode(document, Expect::Flag(&def.deleted_path), name)
}

/// Query a listing endpoint with a JSON filter body
pub async fn list<B: Serialize>(
    client: &HarnessClient,
    kind: ResourceKind,
    ids: &ScopedIds,
    filter: &B,
) -> Result<Outcome, ApiError> {
    let def = kind.def()?;
    let path = def.require(&def.list_path, "list")?;
    let response_path = def.require(&def.list_response_path, "list")?;

    tracing::info!("Listing {}s", def.display_name);

    let document = start(client, def, ids).post_json(path, filter).await?;

    Outcome::decode(document, Expect::List(response_path), "")
}

/// Print the field of interest of an outcome.
///
/// Remote failures are reported through the log only; they never abort the
/// command.
pub fn report<W: Write>(
    outcome: &Outcome,
    kind: ResourceKind,
    name: &str,
    out: &mut W,
) -> io::Result<()> {
    report_as(outcome, kind, name, OutputFormat::Json, out)
}

/// Like [`report`], printing listings in the given format
pub fn report_as<W: Write>(
    outcome: &Outcome,
    kind: ResourceKind,
    name: &str,
    format: OutputFormat,
    out: &mut W,
) -> io::Result<()> {
    let label = kind
        .def()
        .map(|d| d.display_name.as_str())
        .unwrap_or_else(|_| kind.key());

    match outcome {
        Outcome::Created { identifier } => writeln!(out, "{}", identifier),
        Outcome::Deleted { deleted: true } => {
            writeln!(out, "{} '{}' deleted successfully", label, name)
        }
        Outcome::Deleted { deleted: false } => {
            tracing::warn!("{} '{}' was not deleted", label, name);
            writeln!(out, "{} '{}' was not deleted", label, name)
        }
        Outcome::Listed { items } => match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, items)?;
                writeln!(out)
            }
            OutputFormat::Yaml => {
                let rendered = serde_yaml::to_string(items).map_err(io::Error::other)?;
                out.write_all(rendered.as_bytes())
            }
        },
        Outcome::Duplicate { name } => {
            writeln!(out, "{} with name '{}' already exists", label, name)
        }
        Outcome::RemoteFailure {
            code,
            message,
            document,
        } => {
            tracing::error!(
                code = code.as_deref().unwrap_or("-"),
                message = message.as_deref().unwrap_or("-"),
                "{} request failed: {}",
                label,
                document
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(outcome: &Outcome, kind: ResourceKind, name: &str) -> String {
        let mut out = Vec::new();
        report(outcome, kind, name, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn render_listing(format: OutputFormat) -> String {
        let outcome = Outcome::Listed {
            items: vec![json!({"name": "Delegate 1", "id": "d1"})],
        };
        let mut out = Vec::new();
        report_as(&outcome, ResourceKind::DelegateGroups, "", format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_listing_as_json() {
        assert_eq!(
            render_listing(OutputFormat::Json),
            "[{\"id\":\"d1\",\"name\":\"Delegate 1\"}]\n"
        );
    }

    #[test]
    fn test_listing_as_yaml() {
        assert_eq!(render_listing(OutputFormat::Yaml), "- id: d1\n  name: Delegate 1\n");
    }

    #[test]
    fn test_deleted_false_message() {
        let outcome = Outcome::Deleted { deleted: false };
        assert_eq!(
            render(&outcome, ResourceKind::Secret, "foo"),
            "Secret 'foo' was not deleted\n"
        );
    }

    #[test]
    fn test_created_prints_identifier_only() {
        let outcome = Outcome::Created {
            identifier: "foo".to_string(),
        };
        assert_eq!(render(&outcome, ResourceKind::Project, "Foo"), "foo\n");
    }

    #[test]
    fn test_duplicate_message() {
        let outcome = Outcome::Duplicate {
            name: "Foo".to_string(),
        };
        assert_eq!(
            render(&outcome, ResourceKind::Secret, "Foo"),
            "Secret with name 'Foo' already exists\n"
        );
    }

    #[test]
    fn test_deleted_message() {
        let outcome = Outcome::Deleted { deleted: true };
        assert_eq!(
            render(&outcome, ResourceKind::Connector, "dockerhub"),
            "Connector 'dockerhub' deleted successfully\n"
        );
    }

    #[test]
    fn test_remote_failure_prints_nothing() {
        let outcome = Outcome::RemoteFailure {
            code: Some("INVALID_REQUEST".to_string()),
            message: Some("nope".to_string()),
            document: json!({"status": "ERROR"}),
        };
        assert_eq!(render(&outcome, ResourceKind::Project, "Foo"), "");
    }

    #[test]
    fn test_envelope_wraps_payload() {
        let def = ResourceKind::Connector.def().unwrap();
        let payload = json!({"name": "x"});
        let wrapped = serde_json::to_value(envelope(def, &payload).unwrap()).unwrap();
        assert_eq!(wrapped, json!({"connector": {"name": "x"}}));
    }
}
