//! # Roundabout
//!
//! **Roundabout** is a minimal, first-match HTTP request router. It binds
//! `(method, path pattern, transport security, handler)` tuples and, given an
//! incoming request, invokes the handler of the first binding that matches
//! with the parameters captured from the path.
//!
//! ## Overview
//!
//! - **[`router`]** - route registration (`bind`, `get`/`post`/... shortcuts,
//!   `import`), the match predicate and dispatch
//! - **[`handler`]** - direct and deferred (`Class::method`) handlers and the
//!   instantiation strategies that resolve deferred ones
//! - **[`request`]** - the [`Request`] abstraction supplied by the server layer
//! - **[`table`]** - loading route tables from YAML or JSON files
//! - **[`shared`]** / **[`hot_reload`]** - publishing whole route tables to
//!   concurrent readers and rebuilding them when a table file changes
//! - **[`runtime_config`]** / **[`logging`]** - environment-driven configuration
//! - **[`cli`]** - the `roundabout` command-line tool
//!
//! ## Matching rules
//!
//! A route matches a request when, in this order:
//!
//! 1. the request method equals the route method (case-insensitive), or the
//!    query string carries `method=<route method>`
//! 2. the request's secure-transport flag equals the route's `secure` flag
//! 3. the route's regex, anchored at both ends, matches the request path
//!
//! Routes are tried in registration order and the first match wins.
//! Capture groups (group 0 excluded) are handed to the handler in order.
//!
//! ## Quick Start
//!
//! ```rust
//! use roundabout::{Callback, Controller, ControllerRegistry, Dispatch, IncomingRequest, Router};
//!
//! #[derive(Default)]
//! struct Users;
//!
//! impl Controller<String> for Users {
//!     fn call(&self, method: &str, params: &[String]) -> Option<String> {
//!         match method {
//!             "destroy" => Some(format!("deleted {}", params[0])),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), roundabout::RouterError> {
//! let mut registry = ControllerRegistry::<String>::new();
//! registry.register::<Users>("Users");
//!
//! let mut router = Router::with_registry(registry);
//! router.get("/users/([0-9]+)", Callback::direct(|p: &[String]| format!("user {}", p[0])))?;
//! router.delete_secure("/users/([0-9]+)", "Users::destroy")?;
//!
//! let show = IncomingRequest::new("GET", "/users/7", false);
//! assert_eq!(router.run(&show)?, Dispatch::Handled("user 7".to_string()));
//!
//! // Verb override through the query string, over TLS
//! let destroy = IncomingRequest::new("GET", "/users/7?method=delete", true);
//! assert_eq!(router.run(&destroy)?, Dispatch::Handled("deleted 7".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod handler;
pub mod hot_reload;
pub mod logging;
pub mod request;
pub mod router;
pub mod runtime_config;
pub mod shared;
pub mod table;

pub use error::RouterError;
pub use handler::{Callback, Controller, ControllerRegistry, Handler, HandlerFn, Instantiate};
pub use request::{IncomingRequest, Request};
pub use router::{Dispatch, Params, Route, RouteDescriptor, RouteMatch, Router};
pub use runtime_config::RouterConfig;
pub use shared::SharedRouter;
pub use table::load_routes;
