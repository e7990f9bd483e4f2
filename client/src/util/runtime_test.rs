use super::*;

use std::cell::Cell;
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

#[test]
fn manual_sleep_resolves_only_after_deadline() {
    let mut pool = LocalPool::new();
    let clock = ManualClock::default();
    let done = Rc::new(Cell::new(false));

    let flag = done.clone();
    let sleep = clock.sleep(Duration::from_secs(5));
    pool.spawner()
        .spawn_local(async move {
            sleep.await;
            flag.set(true);
        })
        .unwrap();

    pool.run_until_stalled();
    assert!(!done.get());

    clock.advance(Duration::from_secs(4));
    pool.run_until_stalled();
    assert!(!done.get());

    clock.advance(Duration::from_secs(1));
    pool.run_until_stalled();
    assert!(done.get());
    assert_eq!(clock.now(), Duration::from_secs(5));
}

#[test]
fn dropped_sleep_is_not_counted_as_pending() {
    let clock = ManualClock::default();
    let sleep = clock.sleep(Duration::from_secs(1));
    assert_eq!(clock.pending_sleepers(), 1);
    drop(sleep);
    assert_eq!(clock.pending_sleepers(), 0);
}

#[cfg(not(feature = "csr"))]
#[test]
fn browser_spawner_refuses_outside_browser() {
    let result = BrowserSpawner.spawn_local(async {});
    assert!(result.is_err());
}
