//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the router's matching
//! behavior.
//!
//! ## Environment Variables
//!
//! ### `ROUNDABOUT_METHOD_OVERRIDE`
//!
//! Enables the query-string verb override: a request carrying
//! `?method=delete` also matches routes bound to `delete`, whatever its real
//! HTTP method. Useful for clients that can only send GET and POST.
//! Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
//!
//! Default: `true`
//!
//! ### `ROUNDABOUT_OVERRIDE_PARAM`
//!
//! Name of the query parameter consulted by the override.
//!
//! Default: `method`
//!
//! ## Usage
//!
//! ```rust
//! use roundabout::runtime_config::RouterConfig;
//!
//! let config = RouterConfig::from_env();
//! println!("override via ?{}=", config.override_param);
//! ```

use std::env;

/// Query parameter consulted by the verb override unless configured otherwise.
pub const DEFAULT_OVERRIDE_PARAM: &str = "method";

/// Matching configuration for a [`crate::Router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Whether the query-string verb override is honoured (default: true)
    pub method_override: bool,
    /// Query parameter holding the overriding verb (default: `method`)
    pub override_param: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            method_override: true,
            override_param: DEFAULT_OVERRIDE_PARAM.to_string(),
        }
    }
}

impl RouterConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or unparsable values fall
    /// back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let method_override = lookup("ROUNDABOUT_METHOD_OVERRIDE")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(defaults.method_override);
        let override_param = lookup("ROUNDABOUT_OVERRIDE_PARAM")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.override_param);
        RouterConfig {
            method_override,
            override_param,
        }
    }

    /// The override parameter name, or `None` when the override is off.
    #[must_use]
    pub fn override_param(&self) -> Option<&str> {
        self.method_override.then_some(self.override_param.as_str())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RouterConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.override_param(), Some("method"));
    }

    #[test]
    fn test_override_disabled() {
        let config = RouterConfig::from_lookup(lookup(&[("ROUNDABOUT_METHOD_OVERRIDE", "off")]));
        assert!(!config.method_override);
        assert_eq!(config.override_param(), None);
    }

    #[test]
    fn test_custom_param_name() {
        let config = RouterConfig::from_lookup(lookup(&[("ROUNDABOUT_OVERRIDE_PARAM", "_method")]));
        assert_eq!(config.override_param(), Some("_method"));
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let config = RouterConfig::from_lookup(lookup(&[
            ("ROUNDABOUT_METHOD_OVERRIDE", "maybe"),
            ("ROUNDABOUT_OVERRIDE_PARAM", "   "),
        ]));
        assert_eq!(config, RouterConfig::default());
    }
}
