//! # Router Module
//!
//! Route registration, matching and dispatch.
//!
//! ## Overview
//!
//! The router keeps an insertion-ordered list of [`Route`]s. Each route binds
//! a regular-expression path pattern, a method, a transport-security
//! requirement and a [`Handler`](crate::Handler). For an incoming request the
//! router:
//!
//! 1. tests routes in registration order
//! 2. accepts the first route whose method (or `?method=` override), security
//!    flag and anchored path pattern all match
//! 3. calls its handler with the pattern's capture groups, in order
//!
//! When nothing matches, [`Router::run`] returns [`Dispatch::NoMatch`].
//!
//! ## Example
//!
//! ```rust
//! use roundabout::{Callback, Dispatch, IncomingRequest, Router};
//!
//! # fn main() -> Result<(), roundabout::RouterError> {
//! let mut router = Router::new();
//! router.get("/users/([0-9]+)", Callback::direct(|p: &[String]| format!("user {}", p[0])))?;
//!
//! let req = IncomingRequest::new("GET", "/users/42", false);
//! assert_eq!(router.run(&req)?, Dispatch::Handled("user 42".to_string()));
//!
//! let missing = IncomingRequest::new("GET", "/posts", false);
//! assert_eq!(router.run(&missing)?, Dispatch::NoMatch);
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! Matching is a linear scan, O(n) in the number of routes, which is fine
//! for a handful to a few hundred routes. Captured parameters are kept in a
//! [`Params`] `SmallVec`, so routes with ≤8 groups do not allocate the
//! buffer on the heap.

mod core;
mod descriptor;

pub use self::core::{Dispatch, Params, Route, RouteMatch, Router, MAX_INLINE_PARAMS};
pub use self::descriptor::{RouteDescriptor, DEFAULT_METHOD};
