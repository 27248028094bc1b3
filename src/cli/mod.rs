//! # CLI Module
//!
//! Command-line tooling for inspecting route tables.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Load a route table file, validate every entry and list the routes in
//! match order:
//!
//! ```bash
//! roundabout routes --file routes.yaml
//! ```
//!
//! ### `match`
//!
//! Run a synthetic request against a route table and show which route wins,
//! the captured parameters and the deferred handler call it resolves to:
//!
//! ```bash
//! roundabout match --file routes.yaml --method GET --uri '/users/42?method=delete' --secure
//! ```
//!
//! Prints `no match` when no route accepts the request.
//!
//! ## Usage from Code
//!
//! ```rust,no_run
//! use roundabout::cli::{run_cli, Cli};
//! use clap::Parser;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cli = Cli::parse();
//! run_cli(cli, &mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

mod commands;

pub use commands::{run_cli, Cli, Commands};
