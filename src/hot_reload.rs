//! # Hot Reload Module
//!
//! Live reloading of route table files.
//!
//! ## Overview
//!
//! [`watch_routes`] watches a route table file and, when it changes:
//!
//! 1. **Parse** - the file is loaded with [`crate::table::load_routes`]
//! 2. **Build** - the caller's builder turns the descriptors into a complete
//!    [`Router`] (typically: new router with the usual registry, then `import`)
//! 3. **Publish** - the new router replaces the current one in the
//!    [`SharedRouter`]
//!
//! ## Error Handling
//!
//! If the file fails to parse or a route is rejected, the error is logged
//! and the previous table keeps serving.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use roundabout::{hot_reload::watch_routes, ControllerRegistry, RouteDescriptor, Router, SharedRouter};
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let build = |routes: Vec<RouteDescriptor<String>>| -> anyhow::Result<Router<String>> {
//!     let mut router = Router::with_registry(ControllerRegistry::new());
//!     router.import(routes)?;
//!     Ok(router)
//! };
//! let shared = Arc::new(SharedRouter::new(Router::new()));
//! let _watcher = watch_routes("routes.yaml", Arc::clone(&shared), build)?;
//! # Ok(())
//! # }
//! ```

use crate::router::{RouteDescriptor, Router};
use crate::shared::SharedRouter;
use crate::table::load_routes;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Load `path`, build a router from it and publish it.
///
/// Returns the number of routes in the published table. On error nothing is
/// published.
pub fn reload<R, F>(path: &Path, shared: &SharedRouter<R>, build: &F) -> anyhow::Result<usize>
where
    F: Fn(Vec<RouteDescriptor<R>>) -> anyhow::Result<Router<R>>,
{
    let descriptors = load_routes(path)?;
    let router = build(descriptors)?;
    let count = router.len();
    shared.publish(router);
    Ok(count)
}

/// Watch a route table file and republish the router whenever it changes.
///
/// The returned watcher stops watching when dropped.
pub fn watch_routes<P, R, F>(
    path: P,
    shared: Arc<SharedRouter<R>>,
    build: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    R: 'static,
    F: Fn(Vec<RouteDescriptor<R>>) -> anyhow::Result<Router<R>> + Send + 'static,
{
    let path: PathBuf = path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload(&watch_path, &shared, &build) {
                        Ok(count) => info!(
                            path = %watch_path.display(),
                            routes_count = count,
                            "hot-reload: route table applied"
                        ),
                        Err(e) => error!(
                            path = %watch_path.display(),
                            error = ?e,
                            "hot-reload: keeping previous route table"
                        ),
                    }
                }
            }
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
