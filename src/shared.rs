//! Route table publication for concurrent readers.
//!
//! [`Router`] itself is built with `&mut self` and read with `&self`; it does
//! no locking. When the table must change while requests are being served,
//! build a complete new router and [`publish`](SharedRouter::publish) it:
//! readers keep the snapshot they loaded and later requests see the new
//! table. A reader never observes a half-registered table.

use crate::error::RouterError;
use crate::request::Request;
use crate::router::{Dispatch, Router};
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::info;

/// Lock-free holder of the current route table.
pub struct SharedRouter<R> {
    current: ArcSwap<Router<R>>,
}

impl<R> SharedRouter<R> {
    /// Start serving `router`.
    #[must_use]
    pub fn new(router: Router<R>) -> Self {
        Self {
            current: ArcSwap::from_pointee(router),
        }
    }

    /// Snapshot of the current table.
    #[must_use]
    pub fn load(&self) -> Arc<Router<R>> {
        self.current.load_full()
    }

    /// Replace the table, returning the previous one.
    pub fn publish(&self, router: Router<R>) -> Arc<Router<R>> {
        let routes_count = router.len();
        let previous = self.current.swap(Arc::new(router));
        info!(
            routes_count,
            previous_routes_count = previous.len(),
            "Route table published"
        );
        previous
    }

    /// Dispatch against the current snapshot.
    pub fn run<Q>(&self, req: &Q) -> Result<Dispatch<R>, RouterError>
    where
        Q: Request + ?Sized,
    {
        self.current.load().run(req)
    }
}

impl<R> From<Router<R>> for SharedRouter<R> {
    fn from(router: Router<R>) -> Self {
        Self::new(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Callback, IncomingRequest};
    use std::thread;

    fn router_returning(value: u32) -> Router<u32> {
        let mut router = Router::new();
        router
            .get("/version", Callback::direct(move |_: &[String]| value))
            .unwrap();
        router
    }

    #[test]
    fn test_publish_swaps_table() {
        let shared = SharedRouter::new(router_returning(1));
        let req = IncomingRequest::new("GET", "/version", false);
        assert_eq!(shared.run(&req).unwrap(), Dispatch::Handled(1));

        let old = shared.publish(router_returning(2));
        assert_eq!(shared.run(&req).unwrap(), Dispatch::Handled(2));
        assert_eq!(old.run(&req).unwrap(), Dispatch::Handled(1));
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let shared = SharedRouter::new(router_returning(1));
        let snapshot = shared.load();
        shared.publish(Router::new());
        let req = IncomingRequest::new("GET", "/version", false);
        assert_eq!(snapshot.run(&req).unwrap(), Dispatch::Handled(1));
        assert_eq!(shared.run(&req).unwrap(), Dispatch::NoMatch);
    }

    #[test]
    fn test_concurrent_readers_see_whole_tables() {
        let shared = Arc::new(SharedRouter::new(router_returning(0)));
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let req = IncomingRequest::new("GET", "/version", false);
                    for _ in 0..500 {
                        let out = shared.run(&req).unwrap();
                        assert!(matches!(out, Dispatch::Handled(v) if v < 50));
                    }
                })
            })
            .collect();
        for v in 1..50 {
            shared.publish(router_returning(v));
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
