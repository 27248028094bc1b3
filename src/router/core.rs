//! Router core module - route table, match predicate and dispatch.

use crate::error::RouterError;
use crate::handler::{Callback, ControllerRegistry, Handler, Instantiate};
use crate::request::Request;
use crate::runtime_config::RouterConfig;
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::descriptor::RouteDescriptor;

/// Maximum number of captured path parameters before heap allocation.
/// Most routes capture ≤4 groups (e.g. `/users/([0-9]+)/posts/([a-z-]+)`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured path parameters, in capture-group order (group 0 excluded).
///
/// Each match attempt produces its own buffer, so concurrent dispatches
/// never observe each other's parameters.
pub type Params = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// A registered (path pattern, method, security requirement, handler) binding.
pub struct Route<R> {
    path: String,
    pattern: Regex,
    method: String,
    secure: bool,
    handler: Handler<R>,
}

impl<R> Route<R> {
    /// Validate the four bind arguments and build a route.
    ///
    /// `path` is a regular expression matched against the whole request
    /// path; it is compiled as `^(?:path)$` so alternations stay anchored.
    /// `method` is stored lowercased.
    pub fn new(
        path: &str,
        method: &str,
        secure: bool,
        callback: Callback<R>,
    ) -> Result<Self, RouterError> {
        let pattern = Regex::new(&format!("^(?:{path})$")).map_err(|e| {
            RouterError::invalid("path", format!("{path:?} is not a valid pattern: {e}"))
        })?;
        validate_method(method)?;
        let handler = callback.into_handler()?;
        Ok(Self {
            path: path.to_string(),
            pattern,
            method: method.to_ascii_lowercase(),
            secure,
            handler,
        })
    }

    /// The path pattern as supplied at bind time.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Lowercase method this route accepts.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// `true` if the route requires a secure transport, `false` if it forbids one.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// The validated handler.
    #[must_use]
    pub fn handler(&self) -> &Handler<R> {
        &self.handler
    }

    /// Test this route against a request.
    ///
    /// Checks, in order: the method (or the override query parameter when
    /// `override_param` is set), the transport security flag, then the path
    /// pattern. Returns the captured parameters on success. Optional groups
    /// that did not participate in the match yield empty strings.
    pub fn matches<Q>(&self, req: &Q, override_param: Option<&str>) -> Option<Params>
    where
        Q: Request + ?Sized,
    {
        let method_ok = req.http_method().eq_ignore_ascii_case(&self.method)
            || override_param
                .and_then(|name| req.query_param(name))
                .is_some_and(|verb| verb.eq_ignore_ascii_case(&self.method));
        if !method_ok {
            return None;
        }

        if req.is_secure() != self.secure {
            return None;
        }

        let captures = self.pattern.captures(req.request_path())?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

impl<R> Clone for Route<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            pattern: self.pattern.clone(),
            method: self.method.clone(),
            secure: self.secure,
            handler: self.handler.clone(),
        }
    }
}

impl<R> fmt::Debug for Route<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("secure", &self.secure)
            .field("handler", &self.handler)
            .finish()
    }
}

impl<R> fmt::Display for Route<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "https" } else { "http" };
        write!(
            f,
            "{} {} [{scheme}] -> {}",
            self.method.to_ascii_uppercase(),
            self.path,
            self.handler
        )
    }
}

/// RFC 7230 `token` characters
fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

fn validate_method(method: &str) -> Result<(), RouterError> {
    if method.is_empty() {
        return Err(RouterError::invalid("method", "must be a non-empty string"));
    }
    if !method.chars().all(is_tchar) {
        return Err(RouterError::invalid(
            "method",
            format!("{method:?} is not a valid HTTP method token"),
        ));
    }
    Ok(())
}

/// Result of successfully matching a request against the route table.
#[derive(Debug)]
pub struct RouteMatch<'a, R> {
    /// The first route that matched
    pub route: &'a Route<R>,
    /// Position of the route in registration order
    pub index: usize,
    /// Captured path parameters
    pub params: Params,
}

/// Outcome of [`Router::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<R> {
    /// A route matched; carries whatever its handler returned.
    Handled(R),
    /// No route matched. Callers usually turn this into a 404.
    NoMatch,
}

impl<R> Dispatch<R> {
    /// `true` if a route handled the request.
    #[must_use]
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled(_))
    }

    /// The handler result, if any.
    pub fn handled(self) -> Option<R> {
        match self {
            Dispatch::Handled(out) => Some(out),
            Dispatch::NoMatch => None,
        }
    }
}

/// First-match request router.
///
/// Routes are tested in registration order and the first one whose method,
/// transport security and path pattern all match wins; there is no
/// specificity ordering. Register everything before serving. To swap tables
/// while requests are in flight, publish complete routers through
/// [`crate::SharedRouter`].
pub struct Router<R> {
    routes: Vec<Route<R>>,
    instantiator: Box<dyn Instantiate<R>>,
    config: RouterConfig,
}

impl<R: 'static> Router<R> {
    /// Create an empty router whose deferred handlers resolve through an
    /// empty [`ControllerRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ControllerRegistry::new())
    }

    /// Create an empty router resolving deferred handlers through `registry`.
    #[must_use]
    pub fn with_registry(registry: ControllerRegistry<R>) -> Self {
        Self::with_instantiator(registry)
    }

    /// Create an empty router with a custom instantiation strategy.
    ///
    /// Closures of the form `Fn(&str, &str, &[String]) -> R` receive
    /// `(class, method, params)` and their result is returned by [`Router::run`].
    pub fn with_instantiator<I>(instantiator: I) -> Self
    where
        I: Instantiate<R> + 'static,
    {
        Self {
            routes: Vec::new(),
            instantiator: Box::new(instantiator),
            config: RouterConfig::default(),
        }
    }
}

impl<R: 'static> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Router<R> {
    /// Replace the matching configuration.
    #[must_use]
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Matching configuration in effect.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Validate and append a route.
    ///
    /// `path` must compile as a regular expression. `method` must be a
    /// non-empty HTTP token (RFC 7230 `tchar`s only, so `"PATCH"` or
    /// `"purge"` but not `"my verb"`); it is matched case-insensitively.
    /// `callback` is either a closure or a `Class::method` reference.
    /// Any violation is reported as [`RouterError::InvalidArgument`] and
    /// nothing is appended.
    pub fn bind(
        &mut self,
        path: &str,
        method: &str,
        secure: bool,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        let route = Route::new(path, method, secure, callback.into())?;
        info!(
            method = %route.method,
            path = %route.path,
            secure = route.secure,
            handler = %route.handler,
            position = self.routes.len(),
            "Route bound"
        );
        self.routes.push(route);
        Ok(())
    }

    /// Bind an insecure GET route.
    pub fn get(&mut self, path: &str, callback: impl Into<Callback<R>>) -> Result<(), RouterError> {
        self.bind(path, "get", false, callback)
    }

    /// Bind a GET route that requires a secure transport.
    pub fn get_secure(
        &mut self,
        path: &str,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        self.bind(path, "get", true, callback)
    }

    /// Bind an insecure POST route.
    pub fn post(&mut self, path: &str, callback: impl Into<Callback<R>>) -> Result<(), RouterError> {
        self.bind(path, "post", false, callback)
    }

    /// Bind a POST route that requires a secure transport.
    pub fn post_secure(
        &mut self,
        path: &str,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        self.bind(path, "post", true, callback)
    }

    /// Bind an insecure PUT route.
    pub fn put(&mut self, path: &str, callback: impl Into<Callback<R>>) -> Result<(), RouterError> {
        self.bind(path, "put", false, callback)
    }

    /// Bind a PUT route that requires a secure transport.
    pub fn put_secure(
        &mut self,
        path: &str,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        self.bind(path, "put", true, callback)
    }

    /// Bind an insecure DELETE route.
    pub fn delete(
        &mut self,
        path: &str,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        self.bind(path, "delete", false, callback)
    }

    /// Bind a DELETE route that requires a secure transport.
    pub fn delete_secure(
        &mut self,
        path: &str,
        callback: impl Into<Callback<R>>,
    ) -> Result<(), RouterError> {
        self.bind(path, "delete", true, callback)
    }

    /// Register a batch of route descriptors in order.
    ///
    /// Every descriptor is validated before any is appended: if one is
    /// missing `path` or `callback`, or carries an invalid value, the call
    /// fails and the route table is left untouched. Returns the number of
    /// routes added.
    pub fn import<I>(&mut self, descriptors: I) -> Result<usize, RouterError>
    where
        I: IntoIterator<Item = RouteDescriptor<R>>,
    {
        let staged = descriptors
            .into_iter()
            .enumerate()
            .map(|(i, descriptor)| {
                descriptor.into_route().inspect_err(|e| {
                    warn!(entry = i, error = %e, "Rejected imported route");
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let added = staged.len();
        self.routes.extend(staged);
        info!(
            imported = added,
            routes_count = self.routes.len(),
            "Route descriptors imported"
        );
        Ok(added)
    }

    /// Registered routes in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route<R>] {
        &self.routes
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Write all registered routes to `out`, one `#index route` line each,
    /// in match order.
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump_routes<W: io::Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (index, route) in self.routes.iter().enumerate() {
            writeln!(out, "#{index} {route}")?;
        }
        Ok(())
    }

    /// Find the first route matching `req`.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the earliest-registered matching route and its
    ///   captured parameters
    /// * `None` - if no route matches
    pub fn route<Q>(&self, req: &Q) -> Option<RouteMatch<'_, R>>
    where
        Q: Request + ?Sized,
    {
        debug!(
            method = %req.http_method(),
            path = %req.request_path(),
            secure = req.is_secure(),
            routes_count = self.routes.len(),
            "Route match attempt"
        );

        let match_start = Instant::now();
        let override_param = self.config.override_param();

        let found = self.routes.iter().enumerate().find_map(|(index, route)| {
            route
                .matches(req, override_param)
                .map(|params| RouteMatch {
                    route,
                    index,
                    params,
                })
        });

        let match_duration = match_start.elapsed();

        match &found {
            Some(m) if match_duration > Duration::from_millis(1) => warn!(
                method = %req.http_method(),
                path = %req.request_path(),
                route_pattern = %m.route.path,
                position = m.index,
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            ),
            Some(m) => debug!(
                method = %req.http_method(),
                path = %req.request_path(),
                route_pattern = %m.route.path,
                position = m.index,
                path_params = ?m.params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            None => debug!(
                method = %req.http_method(),
                path = %req.request_path(),
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }

        found
    }

    /// Dispatch `req` to the first matching route's handler.
    ///
    /// Returns [`Dispatch::NoMatch`] when no route matches; that is a normal
    /// outcome, not an error. The only error is
    /// [`RouterError::UnresolvedHandler`] for deferred handlers the
    /// instantiation strategy cannot resolve. Handler results, including
    /// any error values they carry, are returned unchanged.
    pub fn run<Q>(&self, req: &Q) -> Result<Dispatch<R>, RouterError>
    where
        Q: Request + ?Sized,
    {
        let Some(matched) = self.route(req) else {
            return Ok(Dispatch::NoMatch);
        };

        let handler = matched.route.handler();
        info!(
            method = %req.http_method(),
            path = %req.request_path(),
            handler = %handler,
            position = matched.index,
            "Dispatching request"
        );

        handler
            .invoke(&matched.params, self.instantiator.as_ref())
            .map(Dispatch::Handled)
            .inspect_err(|e| {
                warn!(
                    path = %req.request_path(),
                    handler = %handler,
                    error = %e,
                    "Handler could not be resolved"
                );
            })
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
