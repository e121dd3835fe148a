use std::time::Duration;

use futures::future::LocalBoxFuture;

/// Where background work runs. Everything is single-threaded, so tasks are
/// `!Send` and spawned onto the local executor.
pub trait Scheduler {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>);
    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Tokio-backed scheduler. Spawning requires a running `LocalSet`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[cfg(not(target_arch = "wasm32"))]
impl Scheduler for TokioScheduler {
    fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }

    fn sleep(&self, period: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(period))
    }
}
