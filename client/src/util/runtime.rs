//! Timer and task-spawn seams over the browser event loop.
//!
//! SYSTEM CONTEXT
//! ==============
//! Background session work (refresh ticks) needs to sleep and to run detached
//! tasks. In the browser these map to `gloo-timers` and
//! `wasm_bindgen_futures::spawn_local`; tests drive a `ManualClock` and a
//! `futures` `LocalPool` instead.

#[cfg(test)]
#[path = "runtime_test.rs"]
mod runtime_test;

use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::{LocalFutureObj, LocalSpawn, SpawnError};

/// Source of wall-clock delays.
pub trait Timer {
    /// Future that resolves once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// `Timer` backed by `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

impl Timer for BrowserTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        #[cfg(feature = "csr")]
        {
            gloo_timers::future::sleep(duration).boxed_local()
        }
        #[cfg(not(feature = "csr"))]
        {
            // No event loop outside the browser; the delay never elapses.
            let _ = duration;
            futures::future::pending().boxed_local()
        }
    }
}

/// `LocalSpawn` onto the browser microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        #[cfg(feature = "csr")]
        {
            wasm_bindgen_futures::spawn_local(future);
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            drop(future);
            Err(SpawnError::shutdown())
        }
    }
}

#[cfg(test)]
pub(crate) use manual::ManualClock;

#[cfg(test)]
mod manual {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use futures::channel::oneshot;
    use futures::future::{FutureExt, LocalBoxFuture};

    use super::Timer;

    #[derive(Default)]
    struct ClockInner {
        now: Duration,
        sleepers: Vec<(Duration, oneshot::Sender<()>)>,
    }

    /// Deterministic `Timer`: sleeps resolve only when `advance` passes
    /// their deadline.
    #[derive(Clone, Default)]
    pub(crate) struct ManualClock {
        inner: Rc<RefCell<ClockInner>>,
    }

    impl ManualClock {
        pub(crate) fn now(&self) -> Duration {
            self.inner.borrow().now
        }

        /// Move time forward, waking every sleeper whose deadline passed.
        pub(crate) fn advance(&self, by: Duration) {
            let due = {
                let mut inner = self.inner.borrow_mut();
                inner.now += by;
                let now = inner.now;
                let (due, pending): (Vec<_>, Vec<_>) =
                    std::mem::take(&mut inner.sleepers).into_iter().partition(|(deadline, _)| *deadline <= now);
                inner.sleepers = pending;
                due
            };
            for (_, tx) in due {
                let _ = tx.send(());
            }
        }

        /// Sleeps still waiting on a live future.
        pub(crate) fn pending_sleepers(&self) -> usize {
            self.inner.borrow().sleepers.iter().filter(|(_, tx)| !tx.is_canceled()).count()
        }
    }

    impl Timer for ManualClock {
        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            let (tx, rx) = oneshot::channel();
            {
                let mut inner = self.inner.borrow_mut();
                let deadline = inner.now + duration;
                inner.sleepers.push((deadline, tx));
            }
            async move {
                let _ = rx.await;
            }
            .boxed_local()
        }
    }
}
