//! Property-based tests using proptest
//!
//! These tests verify identifier derivation, tag parsing and scope
//! resolution using randomized inputs.

use harness_cli::harness::{apply_scope, derive_identifier, parse_tags, Scope, ScopedIds};
use proptest::prelude::*;

/// Display names as people type them
fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9 _-]{0,100}"
}

fn arb_scope() -> impl Strategy<Value = Scope> {
    prop_oneof![Just(Scope::Account), Just(Scope::Org), Just(Scope::Project)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any non-empty printable name yields an identifier
    #[test]
    fn derive_never_fails_on_non_empty(name in "[ -~]{1,120}") {
        prop_assert!(derive_identifier(&name).is_ok());
    }

    /// Identifiers are capped at 64 characters
    #[test]
    fn derive_is_bounded(name in "[ -~]{1,200}") {
        let id = derive_identifier(&name).unwrap();
        prop_assert!(id.chars().count() <= 64);
    }

    /// Spaces and dashes never survive, and nothing is uppercase
    #[test]
    fn derive_normalizes_characters(name in "[ -~]{1,120}") {
        let id = derive_identifier(&name).unwrap();
        prop_assert!(!id.contains(' '));
        prop_assert!(!id.contains('-'));
        prop_assert!(!id.chars().any(|c| c.is_ascii_uppercase()));
    }

    /// Deriving again from an identifier changes nothing
    #[test]
    fn derive_is_idempotent(name in arb_name()) {
        let once = derive_identifier(&name).unwrap();
        let twice = derive_identifier(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// Well-formed names keep their length up to the cap
    #[test]
    fn derive_preserves_length(name in arb_name()) {
        let id = derive_identifier(&name).unwrap();
        prop_assert_eq!(id.chars().count(), name.chars().count().min(64));
    }

    /// Every `key:value` pair comes back out of the map
    #[test]
    fn tags_roundtrip(
        pairs in prop::collection::btree_map("[a-z]{1,10}", "[a-z0-9:]{0,10}", 0..10)
    ) {
        let flags: Vec<String> = pairs.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
        let parsed = parse_tags(&flags).unwrap();
        prop_assert_eq!(parsed, pairs);
    }

    /// Tags without a separator are rejected
    #[test]
    fn tags_without_colon_rejected(tag in "[a-z0-9]{1,20}") {
        prop_assert!(parse_tags(&[tag]).is_err());
    }

    /// Only the identifiers a scope owns ever reach the query string
    #[test]
    fn scoped_ids_only_send_owned_params(
        scope in arb_scope(),
        org in "[a-z]{1,10}",
        project in prop::option::of("[a-z]{1,10}"),
    ) {
        let ids = ScopedIds::new(scope, &org, project.as_deref());
        let keys: Vec<&str> = ids.query_params().iter().map(|(k, _)| *k).collect();

        match scope {
            Scope::Account => prop_assert!(keys.is_empty()),
            Scope::Org => prop_assert_eq!(keys, vec!["orgIdentifier"]),
            Scope::Project => prop_assert_eq!(keys, vec!["orgIdentifier", "projectIdentifier"]),
        }
    }

    /// Account scope forwards exactly the non-empty identifiers it is given
    #[test]
    fn account_scope_is_permissive(org in "[a-z]{0,5}", project in "[a-z]{0,5}") {
        let params = apply_scope(Scope::Account, &org, &project);
        let expected = usize::from(!org.is_empty()) + usize::from(!project.is_empty());
        prop_assert_eq!(params.len(), expected);
        prop_assert!(params.iter().all(|(_, v)| !v.is_empty()));
    }
}

#[test]
fn leading_digit_and_dollar_are_dropped() {
    assert_eq!(derive_identifier("1$Foo Bar").unwrap(), "foo_bar");
    assert_eq!(derive_identifier("1").unwrap(), "");
    assert!(derive_identifier("").is_err());
}
