//! Route table files.
//!
//! A route table is a YAML (`.yaml`/`.yml`) or JSON file listing route
//! descriptors, either as a top-level sequence or under a `routes` key:
//!
//! ```yaml
//! routes:
//!   - path: /users/([0-9]+)
//!     callback: Users::show
//!   - path: /users/([0-9]+)
//!     method: DELETE
//!     secure: true
//!     callback: Users::destroy
//! ```
//!
//! Files can only carry `Class::method` callbacks; they are resolved through
//! the router's instantiation strategy at dispatch time.
//!
//! An empty (or `null`) document is rejected rather than read as an empty
//! table: editors truncate a file before rewriting it, and a watcher must not
//! publish that intermediate state. An explicit empty table is `routes: []`.

use crate::router::RouteDescriptor;
use anyhow::{bail, Context};
use serde_json::Value;
use std::path::Path;

/// Read a route table file into descriptors, in file order.
pub fn load_routes<R>(path: impl AsRef<Path>) -> anyhow::Result<Vec<RouteDescriptor<R>>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    parse_routes(&content, is_yaml)
        .with_context(|| format!("invalid route table {}", path.display()))
}

/// Parse route table text. `yaml` selects YAML, otherwise JSON.
pub fn parse_routes<R>(content: &str, yaml: bool) -> anyhow::Result<Vec<RouteDescriptor<R>>> {
    if content.trim().is_empty() {
        bail!("route table is empty");
    }
    let value: Value = if yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };

    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("routes") {
            Some(Value::Array(entries)) => entries,
            Some(_) => bail!("\"routes\" must be a sequence"),
            None => bail!("route table has no \"routes\" key"),
        },
        Value::Null => bail!("route table is empty"),
        _ => bail!("route table must be a sequence or a mapping with a \"routes\" key"),
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            RouteDescriptor::from_value(entry).with_context(|| format!("route entry #{i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RouterError;

    #[test]
    fn test_parse_yaml_routes_key() {
        let yaml = r#"
routes:
  - path: /users/([0-9]+)
    callback: Users::show
  - path: /login
    method: POST
    secure: true
    callback: Auth::login
"#;
        let routes = parse_routes::<()>(yaml, true).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].method.as_deref(), Some("POST"));
        assert_eq!(routes[1].secure, Some(true));
    }

    #[test]
    fn test_parse_json_sequence() {
        let json = r#"[{"path": "/", "callback": "Home::index"}]"#;
        let routes = parse_routes::<()>(json, false).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path.as_deref(), Some("/"));
    }

    #[test]
    fn test_empty_document_is_rejected() {
        assert!(parse_routes::<()>("null", false).is_err());
        assert!(parse_routes::<()>("", true).is_err());
        assert!(parse_routes::<()>("  \n", false).is_err());
        assert!(parse_routes::<()>("~\n", true).is_err());
    }

    #[test]
    fn test_explicit_empty_table() {
        assert!(parse_routes::<()>("routes: []", true).unwrap().is_empty());
        assert!(parse_routes::<()>("[]", false).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_field_type_keeps_router_error() {
        let err = parse_routes::<()>(r#"[{"path": 5, "callback": "A::b"}]"#, false).unwrap_err();
        assert!(err.to_string().contains("route entry #0"));
        let cause = err.downcast_ref::<RouterError>().unwrap();
        assert!(matches!(cause, RouterError::InvalidArgument { param: "path", .. }));
    }

    #[test]
    fn test_rejects_scalar_document() {
        assert!(parse_routes::<()>("42", false).is_err());
        assert!(parse_routes::<()>("routes: 3", true).is_err());
        assert!(parse_routes::<()>("other: []", true).is_err());
    }
}
