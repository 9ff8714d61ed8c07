//! Request-scoped memoization of async lookups.
//!
//! A [`RequestMemo`] lives for exactly one inbound request. The first call
//! for a given argument set starts the lookup and stores its shared future;
//! every later call with the same arguments, whether the lookup is still in
//! flight or already finished, receives a clone of that future. Nothing
//! survives the request: no TTL, no eviction, no cross-request sharing.
//!
//! All work for a request runs on one logical task, so the memo uses
//! `RefCell` and local (non-`Send`) futures rather than locks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;

use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::Serialize;

/// A lookup result that can be awaited by any number of callers.
pub type SharedLookup<V> = Shared<LocalBoxFuture<'static, V>>;

/// Per-request memo table keyed by serialized arguments.
pub struct RequestMemo<V> {
    name: &'static str,
    entries: RefCell<HashMap<String, SharedLookup<V>>>,
    started: Cell<usize>,
}

impl<V: Clone + 'static> RequestMemo<V> {
    /// Create an empty memo. `name` only appears in log output.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RefCell::new(HashMap::new()),
            started: Cell::new(0),
        }
    }

    /// Return the shared lookup for `args`, starting it with `start` if this
    /// is the first request for these arguments.
    pub fn get_or_start<A, F, Fut>(&self, args: &A, start: F) -> SharedLookup<V>
    where
        A: Serialize + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + 'static,
    {
        let key = match serde_json::to_string(args) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("{}: arguments not serializable ({e}), running uncached", self.name);
                self.started.set(self.started.get() + 1);
                return start().boxed_local().shared();
            }
        };

        if let Some(existing) = self.entries.borrow().get(&key) {
            log::debug!("{}: reusing lookup for {key}", self.name);
            return existing.clone();
        }

        log::debug!("{}: starting lookup for {key}", self.name);
        self.started.set(self.started.get() + 1);
        let lookup = start().boxed_local().shared();
        self.entries.borrow_mut().insert(key, lookup.clone());
        lookup
    }

    /// Number of distinct lookups started through this memo.
    pub fn started(&self) -> usize {
        self.started.get()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
