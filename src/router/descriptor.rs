//! Route descriptors consumed by [`Router::import`](super::Router::import).

use super::core::Route;
use crate::error::RouterError;
use crate::handler::Callback;
use serde_json::Value;

/// Method used when a descriptor does not name one
pub const DEFAULT_METHOD: &str = "get";

/// A route record for batch import.
///
/// `path` and `callback` are required; `method` defaults to `get`
/// (case-insensitive) and `secure` to `false`.
pub struct RouteDescriptor<R> {
    /// Path pattern
    pub path: Option<String>,
    /// HTTP method, any case
    pub method: Option<String>,
    /// Transport security requirement
    pub secure: Option<bool>,
    /// Handler reference
    pub callback: Option<Callback<R>>,
}

impl<R> Default for RouteDescriptor<R> {
    fn default() -> Self {
        Self {
            path: None,
            method: None,
            secure: None,
            callback: None,
        }
    }
}

impl<R> RouteDescriptor<R> {
    /// Descriptor with the two required fields set.
    pub fn new(path: impl Into<String>, callback: impl Into<Callback<R>>) -> Self {
        Self {
            path: Some(path.into()),
            callback: Some(callback.into()),
            ..Self::default()
        }
    }

    /// Set the HTTP method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the transport security requirement.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Read a descriptor from an untyped record such as one entry of a
    /// YAML or JSON route table.
    ///
    /// Fields present with the wrong type are rejected with
    /// [`RouterError::InvalidArgument`] naming the type found; `null` counts
    /// as absent. The callback must be a `Class::method` string.
    pub fn from_value(value: &Value) -> Result<Self, RouterError> {
        let Value::Object(record) = value else {
            return Err(RouterError::invalid(
                "route",
                format!("must be a mapping, {} given", type_name(value)),
            ));
        };

        let field = |name: &str| record.get(name).filter(|v| !v.is_null());

        let path = field("path")
            .map(|v| expect_str("path", v))
            .transpose()?;
        let method = field("method")
            .map(|v| expect_str("method", v))
            .transpose()?;
        let secure = field("secure")
            .map(|v| {
                v.as_bool().ok_or_else(|| {
                    RouterError::invalid(
                        "secure",
                        format!("must be a boolean, {} given", type_name(v)),
                    )
                })
            })
            .transpose()?;
        let callback = field("callback")
            .map(|v| expect_str("callback", v).map(Callback::Reference))
            .transpose()?;

        Ok(Self {
            path,
            method,
            secure,
            callback,
        })
    }

    /// Check required fields, apply defaults and build the route.
    pub(crate) fn into_route(self) -> Result<Route<R>, RouterError> {
        let path = self.path.ok_or(RouterError::MissingField("path"))?;
        let callback = self.callback.ok_or(RouterError::MissingField("callback"))?;
        let method = self.method.unwrap_or_else(|| DEFAULT_METHOD.to_string());
        Route::new(&path, &method, self.secure.unwrap_or(false), callback)
    }
}

impl<R> Clone for RouteDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            method: self.method.clone(),
            secure: self.secure,
            callback: self.callback.clone(),
        }
    }
}

impl<R> std::fmt::Debug for RouteDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("secure", &self.secure)
            .field("callback", &self.callback)
            .finish()
    }
}

fn expect_str(param: &'static str, value: &Value) -> Result<String, RouterError> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        RouterError::invalid(param, format!("must be a string, {} given", type_name(value)))
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
