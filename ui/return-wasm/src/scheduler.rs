use std::time::Duration;

use futures::future::LocalBoxFuture;
use wslp_return_core::{MAX_BALANCE_POLL_MS, Scheduler};

/// Browser event loop: microtask spawning and `setTimeout` sleeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()> {
        // setTimeout wraps delays beyond i32::MAX ms
        let period = period.min(Duration::from_millis(MAX_BALANCE_POLL_MS));
        Box::pin(gloo_timers::future::sleep(period))
    }
}
