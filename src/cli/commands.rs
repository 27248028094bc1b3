use crate::logging::{init_logging_with_config, LogConfig, LogOutput};
use crate::request::IncomingRequest;
use crate::router::{Dispatch, Router};
use crate::runtime_config::RouterConfig;
use crate::table::load_routes;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Command-line interface for Roundabout
#[derive(Parser)]
#[command(name = "roundabout")]
#[command(about = "Inspect and exercise Roundabout route tables", long_about = None)]
pub struct Cli {
    /// Log level for router diagnostics (trace/debug/info/warn/error)
    #[arg(long, global = true, env = "ROUNDABOUT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a route table and list its routes in match order
    Routes {
        /// Path to the route table (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Dispatch a synthetic request against a route table
    Match {
        /// Path to the route table (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// HTTP method of the request
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Request path, optionally with a query string
        #[arg(short, long)]
        uri: String,

        /// Treat the request as arriving over a secure transport
        #[arg(long, default_value_t = false)]
        secure: bool,
    },
}

/// Router whose deferred handlers render the call they would make.
pub(crate) fn describing_router(
    file: &Path,
    config: RouterConfig,
) -> anyhow::Result<Router<String>> {
    let descriptors = load_routes(file)?;
    let mut router = Router::with_instantiator(|class: &str, method: &str, params: &[String]| {
        format!("{class}::{method}({})", params.join(", "))
    })
    .with_config(config);
    router
        .import(descriptors)
        .with_context(|| format!("route table {} rejected", file.display()))?;
    Ok(router)
}

/// Logging setup for the CLI: diagnostics go to stderr so they never mix
/// with command output.
pub(crate) fn cli_log_config(cli: &Cli) -> LogConfig {
    let mut log_config = LogConfig::from_env();
    log_config.log_level = cli.log_level.clone();
    log_config.output = LogOutput::Stderr;
    log_config
}

/// Execute a parsed command line, writing results to `out`.
///
/// Matching behavior follows [`RouterConfig::from_env`].
pub fn run_cli<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    // A subscriber may already be installed (tests, embedding applications).
    let _guard = init_logging_with_config(&cli_log_config(&cli)).ok().flatten();
    run_with_config(cli.command, RouterConfig::from_env(), out)
}

pub(crate) fn run_with_config<W: Write>(
    command: Commands,
    config: RouterConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Routes { file } => {
            let router = describing_router(&file, config)?;
            writeln!(out, "{} route(s) in {}", router.len(), file.display())?;
            router.dump_routes(out)?;
        }
        Commands::Match {
            file,
            method,
            uri,
            secure,
        } => {
            let router = describing_router(&file, config)?;
            let req = IncomingRequest::new(method, &uri, secure);
            let Some(matched) = router.route(&req) else {
                writeln!(out, "no match")?;
                return Ok(());
            };
            writeln!(out, "matched #{} {}", matched.index, matched.route)?;
            writeln!(out, "params: {:?}", matched.params.as_slice())?;
            match router.run(&req)? {
                Dispatch::Handled(call) => writeln!(out, "handler: {call}")?,
                Dispatch::NoMatch => writeln!(out, "no match")?,
            }
        }
    }
    Ok(())
}
