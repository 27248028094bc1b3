//! # Handlers and instantiation strategies
//!
//! A route's handler is either a direct callable or a deferred
//! `Class::method` reference that is only turned into something invocable
//! when a request actually matches.
//!
//! ## Callbacks vs. handlers
//!
//! Callers hand [`Callback`]s to `bind`. A callback may still be an
//! unchecked string reference; `bind` validates it and stores the resolved
//! [`Handler`] on the route, so a malformed reference is rejected at
//! registration time instead of at dispatch time.
//!
//! ## Instantiation
//!
//! Deferred handlers are resolved through an [`Instantiate`] strategy:
//!
//! - [`ControllerRegistry`] (the default) default-constructs a registered
//!   [`Controller`] by class name for every dispatch and calls the method on it
//! - any `Fn(&str, &str, &[String]) -> R` closure acts as a custom strategy;
//!   its return value becomes the dispatch result unchanged
//!
//! ```
//! use roundabout::{Controller, ControllerRegistry, Instantiate};
//!
//! #[derive(Default)]
//! struct Users;
//!
//! impl Controller<String> for Users {
//!     fn call(&self, method: &str, params: &[String]) -> Option<String> {
//!         match method {
//!             "show" => Some(format!("user {}", params[0])),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::<String>::new();
//! registry.register::<Users>("Users");
//! let out = registry.instantiate("Users", "show", &["42".to_string()]).unwrap();
//! assert_eq!(out, "user 42");
//! ```

use crate::error::RouterError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared directly-invocable handler. Receives the captured path parameters
/// in order.
pub type HandlerFn<R> = Arc<dyn Fn(&[String]) -> R + Send + Sync>;

/// Handler reference as supplied to `bind`, before validation.
pub enum Callback<R> {
    /// A function, closure or bound method value.
    Direct(HandlerFn<R>),
    /// A `Class::method` reference resolved at dispatch time.
    Reference(String),
}

impl<R> Callback<R> {
    /// Wrap a closure or function as a direct callback.
    pub fn direct<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> R + Send + Sync + 'static,
    {
        Callback::Direct(Arc::new(f))
    }

    /// A `Class::method` reference. Validated when the route is bound.
    pub fn reference(reference: impl Into<String>) -> Self {
        Callback::Reference(reference.into())
    }

    /// Validate the callback and turn it into a route [`Handler`].
    pub(crate) fn into_handler(self) -> Result<Handler<R>, RouterError> {
        match self {
            Callback::Direct(f) => Ok(Handler::Direct(f)),
            Callback::Reference(reference) => Handler::parse_reference(&reference),
        }
    }
}

impl<R> Clone for Callback<R> {
    fn clone(&self) -> Self {
        match self {
            Callback::Direct(f) => Callback::Direct(Arc::clone(f)),
            Callback::Reference(r) => Callback::Reference(r.clone()),
        }
    }
}

impl<R> fmt::Debug for Callback<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Direct(_) => f.write_str("Callback::Direct(<fn>)"),
            Callback::Reference(r) => write!(f, "Callback::Reference({r:?})"),
        }
    }
}

impl<R> From<&str> for Callback<R> {
    fn from(reference: &str) -> Self {
        Callback::Reference(reference.to_string())
    }
}

impl<R> From<String> for Callback<R> {
    fn from(reference: String) -> Self {
        Callback::Reference(reference)
    }
}

impl<R> From<HandlerFn<R>> for Callback<R> {
    fn from(f: HandlerFn<R>) -> Self {
        Callback::Direct(f)
    }
}

/// Validated handler stored on a route.
pub enum Handler<R> {
    /// Invoked with the captured parameters spread in order.
    Direct(HandlerFn<R>),
    /// Resolved through the router's [`Instantiate`] strategy.
    Deferred {
        /// Controller name, possibly module-qualified (`admin::Users`)
        class: String,
        /// Method to call on the controller instance
        method: String,
    },
}

impl<R> Handler<R> {
    /// Parse a `Class::method` reference.
    ///
    /// The last `::` separates the method, so module-qualified class names
    /// such as `admin::Users::show` are accepted.
    pub fn parse_reference(reference: &str) -> Result<Self, RouterError> {
        let Some((class, method)) = reference.rsplit_once("::") else {
            return Err(RouterError::invalid(
                "callback",
                format!("must be a valid callback, {reference:?} is not of the form Class::method"),
            ));
        };
        if !is_name(class) || !is_name(method) || method.contains(':') {
            return Err(RouterError::invalid(
                "callback",
                format!("must be a valid callback, {reference:?} has an empty or malformed class or method"),
            ));
        }
        Ok(Handler::Deferred {
            class: class.to_string(),
            method: method.to_string(),
        })
    }

    /// Run the handler with the captured parameters.
    ///
    /// Errors only when a deferred handler cannot be resolved; whatever the
    /// handler itself returns is passed back untouched.
    pub fn invoke(
        &self,
        params: &[String],
        strategy: &dyn Instantiate<R>,
    ) -> Result<R, RouterError> {
        match self {
            Handler::Direct(f) => Ok(f(params)),
            Handler::Deferred { class, method } => strategy.instantiate(class, method, params),
        }
    }
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && !s.starts_with(':') && !s.ends_with(':') && !s.chars().any(char::is_whitespace)
}

impl<R> Clone for Handler<R> {
    fn clone(&self) -> Self {
        match self {
            Handler::Direct(f) => Handler::Direct(Arc::clone(f)),
            Handler::Deferred { class, method } => Handler::Deferred {
                class: class.clone(),
                method: method.clone(),
            },
        }
    }
}

impl<R> fmt::Display for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Direct(_) => f.write_str("<fn>"),
            Handler::Deferred { class, method } => write!(f, "{class}::{method}"),
        }
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({self})")
    }
}

/// Strategy turning a deferred `Class::method` handler into a result.
pub trait Instantiate<R>: Send + Sync {
    /// Instantiate `class`, call `method` with `params` and return its result.
    fn instantiate(&self, class: &str, method: &str, params: &[String]) -> Result<R, RouterError>;
}

impl<R, F> Instantiate<R> for F
where
    F: Fn(&str, &str, &[String]) -> R + Send + Sync,
{
    fn instantiate(&self, class: &str, method: &str, params: &[String]) -> Result<R, RouterError> {
        Ok(self(class, method, params))
    }
}

/// A controller whose methods can be addressed by name.
///
/// Return `None` for method names the controller does not define; the
/// router reports those as [`RouterError::UnresolvedHandler`].
pub trait Controller<R> {
    /// Call `method` with the captured path parameters.
    fn call(&self, method: &str, params: &[String]) -> Option<R>;
}

type Factory<R> = Box<dyn Fn() -> Box<dyn Controller<R>> + Send + Sync>;

/// Default instantiation strategy: a name → constructor table.
///
/// Every dispatch builds a fresh instance with `Default::default()`, the
/// no-argument constructor.
pub struct ControllerRegistry<R> {
    factories: HashMap<String, Factory<R>>,
}

impl<R> ControllerRegistry<R> {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register controller type `C` under `class`. A later registration
    /// with the same name replaces the earlier one.
    pub fn register<C>(&mut self, class: impl Into<String>) -> &mut Self
    where
        C: Controller<R> + Default + 'static,
    {
        let factory: Factory<R> = Box::new(|| -> Box<dyn Controller<R>> { Box::new(C::default()) });
        self.factories.insert(class.into(), factory);
        self
    }

    /// Whether a controller is registered under `class`.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.factories.contains_key(class)
    }

    /// Registered class names, sorted.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<R> Default for ControllerRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Instantiate<R> for ControllerRegistry<R> {
    fn instantiate(&self, class: &str, method: &str, params: &[String]) -> Result<R, RouterError> {
        let factory = self
            .factories
            .get(class)
            .ok_or_else(|| RouterError::unresolved(class, method))?;
        let controller = factory();
        controller
            .call(method, params)
            .ok_or_else(|| RouterError::unresolved(class, method))
    }
}
