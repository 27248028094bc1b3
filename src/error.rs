//! Router error taxonomy.
//!
//! Registration problems ([`RouterError::InvalidArgument`] and
//! [`RouterError::MissingField`]) surface synchronously from `bind`/`import`,
//! so a malformed route never enters the table. Dispatch only fails with
//! [`RouterError::UnresolvedHandler`]; "no route matched" is a normal outcome
//! and is reported as [`crate::Dispatch::NoMatch`] instead.

use thiserror::Error;

/// Errors raised while registering routes or resolving deferred handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// A bind argument was rejected.
    ///
    /// `param` names the offending argument (`path`, `method`, `secure` or
    /// `callback`); `reason` describes what was wrong with it, including the
    /// offending type for untyped descriptors.
    #[error("route {param} is invalid: {reason}")]
    InvalidArgument {
        /// Name of the rejected argument
        param: &'static str,
        /// Human readable description of the violation
        reason: String,
    },

    /// An imported route descriptor lacks a required field.
    #[error("the \"{0}\" field is missing from imported route")]
    MissingField(&'static str),

    /// A `Class::method` handler could not be instantiated or invoked.
    #[error("cannot resolve handler {class}::{method}")]
    UnresolvedHandler {
        /// Class (controller) name from the handler reference
        class: String,
        /// Method name from the handler reference
        method: String,
    },
}

impl RouterError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        RouterError::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    pub(crate) fn unresolved(class: &str, method: &str) -> Self {
        RouterError::UnresolvedHandler {
            class: class.to_string(),
            method: method.to_string(),
        }
    }
}
