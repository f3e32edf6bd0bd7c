//! Response interpretation
//!
//! Every Harness reply is a JSON document with a `status` field. It is decoded
//! once, here, into an [`Outcome`] so commands never poke at the raw map.

use super::error::ApiError;
use serde_json::Value;

pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const CODE_DUPLICATE_FIELD: &str = "DUPLICATE_FIELD";

/// Shape of the payload a successful reply is expected to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect<'a> {
    /// A string identifier at the given dot path
    Identifier(&'a str),
    /// A boolean flag at the given dot path
    Flag(&'a str),
    /// An array at the given dot path. These replies may omit `status` on
    /// success; without it, the array itself must be present.
    List(&'a str),
}

/// Business result of a call
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created {
        identifier: String,
    },
    Deleted {
        deleted: bool,
    },
    Listed {
        items: Vec<Value>,
    },
    /// A resource with the same identifier already exists
    Duplicate {
        name: String,
    },
    RemoteFailure {
        code: Option<String>,
        message: Option<String>,
        document: Value,
    },
}

impl Outcome {
    /// Interpret a decoded response document.
    ///
    /// `name` is the display name the user asked for; it is only used to
    /// describe a duplicate.
    pub fn decode(document: Value, expect: Expect<'_>, name: &str) -> Result<Self, ApiError> {
        let status = document.get("status").and_then(Value::as_str);

        let succeeded = match (expect, status) {
            (_, Some(STATUS_SUCCESS)) => true,
            (Expect::List(path), None) => lookup_path(&document, path).is_some_and(Value::is_array),
            _ => false,
        };

        if !succeeded {
            return Ok(Self::failure(document, name));
        }

        match expect {
            Expect::Identifier(path) => lookup_path(&document, path)
                .and_then(Value::as_str)
                .map(|id| Self::Created {
                    identifier: id.to_string(),
                })
                .ok_or_else(|| missing(path)),
            Expect::Flag(path) => lookup_path(&document, path)
                .and_then(Value::as_bool)
                .map(|deleted| Self::Deleted { deleted })
                .ok_or_else(|| missing(path)),
            Expect::List(path) => {
                let items = match lookup_path(&document, path) {
                    Some(Value::Array(items)) => items.clone(),
                    Some(Value::Null) | None => Vec::new(),
                    Some(_) => return Err(missing(path)),
                };
                Ok(Self::Listed { items })
            }
        }
    }

    fn failure(document: Value, name: &str) -> Self {
        let code = string_field(&document, "code");
        if code.as_deref() == Some(CODE_DUPLICATE_FIELD) {
            return Self::Duplicate {
                name: name.to_string(),
            };
        }

        Self::RemoteFailure {
            code,
            message: string_field(&document, "message"),
            document,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Created { .. } | Self::Deleted { .. } | Self::Listed { .. }
        )
    }
}

fn string_field(document: &Value, key: &str) -> Option<String> {
    document.get(key).and_then(Value::as_str).map(str::to_string)
}

fn missing(path: &str) -> ApiError {
    ApiError::UnexpectedResponse(format!("successful response has no '{}'", path))
}

/// Walk a dot-notation path (`data.project.identifier`); numeric segments
/// index into arrays.
pub fn lookup_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    path.split('.')
        .filter(|part| !part.is_empty())
        .try_fold(value, |current, part| match part.parse::<usize>() {
            Ok(idx) if current.is_array() => current.get(idx),
            _ => current.get(part),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_identifier_extracted() {
        let doc = json!({"status": "SUCCESS", "data": {"project": {"identifier": "foo"}}});
        let outcome =
            Outcome::decode(doc, Expect::Identifier("data.project.identifier"), "Foo").unwrap();
        assert_eq!(
            outcome,
            Outcome::Created {
                identifier: "foo".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_detected() {
        let doc = json!({"status": "ERROR", "code": "DUPLICATE_FIELD", "message": "exists"});
        let outcome =
            Outcome::decode(doc, Expect::Identifier("data.secret.identifier"), "Foo").unwrap();
        assert_eq!(
            outcome,
            Outcome::Duplicate {
                name: "Foo".to_string()
            }
        );
    }

    #[test]
    fn test_missing_status_is_remote_failure() {
        let doc = json!({"code": "INVALID_REQUEST", "message": "bad org"});
        let outcome = Outcome::decode(doc.clone(), Expect::Flag("data"), "x").unwrap();
        assert_eq!(
            outcome,
            Outcome::RemoteFailure {
                code: Some("INVALID_REQUEST".to_string()),
                message: Some("bad org".to_string()),
                document: doc,
            }
        );
    }

    #[test]
    fn test_delete_flag() {
        let doc = json!({"status": "SUCCESS", "data": true});
        let outcome = Outcome::decode(doc, Expect::Flag("data"), "x").unwrap();
        assert_eq!(outcome, Outcome::Deleted { deleted: true });
    }

    #[test]
    fn test_success_without_field_is_unexpected() {
        let doc = json!({"status": "SUCCESS", "data": {}});
        let err =
            Outcome::decode(doc, Expect::Identifier("data.connector.identifier"), "x").unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_list_without_status() {
        let doc = json!({"resource": [{"identifier": "d1", "name": "Delegate 1"}]});
        match Outcome::decode(doc, Expect::List("resource"), "").unwrap() {
            Outcome::Listed { items } => assert_eq!(items.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_list_without_status_or_array_is_failure() {
        for doc in [
            Value::Null,
            json!({"code": "INVALID_TOKEN", "message": "Token is not valid"}),
            json!({"resource": null}),
        ] {
            let outcome = Outcome::decode(doc, Expect::List("resource"), "").unwrap();
            assert!(
                matches!(outcome, Outcome::RemoteFailure { .. }),
                "unexpected outcome: {:?}",
                outcome
            );
        }
    }

    #[test]
    fn test_list_success_status_without_items_is_empty() {
        let doc = json!({"status": "SUCCESS"});
        let outcome = Outcome::decode(doc, Expect::List("resource"), "").unwrap();
        assert_eq!(outcome, Outcome::Listed { items: vec![] });
    }

    #[test]
    fn test_list_error_status() {
        let doc = json!({"status": "ERROR", "message": "no access"});
        let outcome = Outcome::decode(doc, Expect::List("resource"), "").unwrap();
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_lookup_path_with_index() {
        let doc = json!({"items": [{"name": "a"}, {"name": "b"}]});
        assert_eq!(lookup_path(&doc, "items.1.name"), Some(&json!("b")));
        assert_eq!(lookup_path(&doc, "items.5.name"), None);
    }
}
