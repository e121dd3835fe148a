//! Periodic balance polling for the selected token.
//!
//! Each subscription owns its own watch channel and poll task. Changing the
//! query key means a new subscription; the old task is aborted and its
//! channel closes, so a value fetched for one key is never seen under another.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{AbortHandle, Abortable};
use tokio::sync::watch;
use tracing::{debug, warn};
use wslp_bridge_client::BridgeClient;
use wslp_types::{AccountAddress, BalanceView, TokenAddress};

use crate::scheduler::Scheduler;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BalanceQueryKey {
    pub provider_present: bool,
    pub account: Option<AccountAddress>,
    pub token: TokenAddress,
}

pub struct BalancePoller<B> {
    bridge: Rc<B>,
    scheduler: Rc<dyn Scheduler>,
    interval: Duration,
}

impl<B> BalancePoller<B>
where
    B: BridgeClient + 'static,
{
    pub fn new(bridge: Rc<B>, scheduler: Rc<dyn Scheduler>, interval: Duration) -> Self {
        Self {
            bridge,
            scheduler,
            interval,
        }
    }

    /// Fetch now, then once per interval until the subscription is cancelled
    /// or dropped.
    pub fn start(
        &self,
        provider: Option<&B::Provider>,
        account: Option<&AccountAddress>,
        token: &TokenAddress,
    ) -> BalanceSubscription {
        let key = BalanceQueryKey {
            provider_present: provider.is_some(),
            account: account.cloned(),
            token: token.clone(),
        };
        debug!(?key, "starting balance poll");

        let (tx, rx) = watch::channel(BalanceView::loading());
        let (abort, registration) = AbortHandle::new_pair();

        let task = poll_balance(
            self.bridge.clone(),
            self.scheduler.clone(),
            self.interval,
            provider.cloned(),
            account.cloned(),
            token.clone(),
            tx,
        );
        self.scheduler
            .spawn_local(Abortable::new(task, registration).map(|_| ()).boxed_local());

        BalanceSubscription { key, rx, abort }
    }
}

async fn poll_balance<B: BridgeClient>(
    bridge: Rc<B>,
    scheduler: Rc<dyn Scheduler>,
    interval: Duration,
    provider: Option<B::Provider>,
    account: Option<AccountAddress>,
    token: TokenAddress,
    tx: watch::Sender<BalanceView>,
) {
    loop {
        tx.send_modify(|view| view.loading = true);

        let value = match (&provider, &account) {
            (Some(provider), Some(account)) => {
                match bridge.query_token_balance(provider, account, &token).await {
                    Ok(amount) => Some(amount),
                    Err(err) => {
                        warn!(token = %token.as_str(), "balance query failed: {:#}", err);
                        None
                    }
                }
            }
            _ => None,
        };

        tx.send_modify(move |view| {
            view.value = value;
            view.loading = false;
        });

        if tx.is_closed() {
            break;
        }
        scheduler.sleep(interval).await;
    }
}

/// A running poll for one [`BalanceQueryKey`]. Dropping it cancels the poll.
pub struct BalanceSubscription {
    key: BalanceQueryKey,
    rx: watch::Receiver<BalanceView>,
    abort: AbortHandle,
}

impl BalanceSubscription {
    pub fn key(&self) -> &BalanceQueryKey {
        &self.key
    }

    pub fn watch(&self) -> watch::Receiver<BalanceView> {
        self.rx.clone()
    }

    pub fn current(&self) -> BalanceView {
        self.rx.borrow().clone()
    }

    /// Wait for the next update. `false` once the poll has stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    pub fn cancel(&self) {
        if !self.abort.is_aborted() {
            debug!(key = ?self.key, "cancelling balance poll");
            self.abort.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

impl Drop for BalanceSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns at most one subscription and re-keys it as inputs change.
pub struct BalanceSlot<B> {
    poller: BalancePoller<B>,
    current: RefCell<Option<BalanceSubscription>>,
}

impl<B> BalanceSlot<B>
where
    B: BridgeClient + 'static,
{
    pub fn new(poller: BalancePoller<B>) -> Self {
        Self {
            poller,
            current: RefCell::new(None),
        }
    }

    /// Keep polling when the key is unchanged; otherwise cancel the old poll
    /// and start a fresh one with an immediate fetch.
    pub fn observe(
        &self,
        provider: Option<&B::Provider>,
        account: Option<&AccountAddress>,
        token: &TokenAddress,
    ) -> watch::Receiver<BalanceView> {
        let key = BalanceQueryKey {
            provider_present: provider.is_some(),
            account: account.cloned(),
            token: token.clone(),
        };

        if let Some(running) = self.current.borrow().as_ref() {
            if running.key == key {
                return running.watch();
            }
        }

        let subscription = self.poller.start(provider, account, token);
        let rx = subscription.watch();
        if let Some(previous) = self.current.replace(Some(subscription)) {
            previous.cancel();
        }
        rx
    }

    pub fn stop(&self) {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }
    }

    pub fn current_key(&self) -> Option<BalanceQueryKey> {
        self.current.borrow().as_ref().map(|sub| sub.key.clone())
    }

    pub fn watch(&self) -> Option<watch::Receiver<BalanceView>> {
        self.current.borrow().as_ref().map(BalanceSubscription::watch)
    }

    pub fn is_observing(&self) -> bool {
        self.current.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TokioScheduler;
    use tokio::task::LocalSet;
    use tokio::time::Instant;
    use wslp_bridge_client::testing::{StubBridge, StubProvider};

    const TOKEN: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
    const INTERVAL: Duration = Duration::from_secs(20);

    fn poller(bridge: &Rc<StubBridge>) -> BalancePoller<StubBridge> {
        BalancePoller::new(bridge.clone(), Rc::new(TokioScheduler), INTERVAL)
    }

    fn account() -> AccountAddress {
        AccountAddress("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_owned())
    }

    async fn settled(rx: &mut watch::Receiver<BalanceView>) -> BalanceView {
        rx.wait_for(|view| !view.loading).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_interval() {
        LocalSet::new()
            .run_until(async {
                let bridge = Rc::new(StubBridge::new());
                bridge.set_balance(TOKEN, "10");
                let poller = poller(&bridge);
                let provider = StubProvider::new("metamask");
                let started = Instant::now();

                let sub = poller.start(Some(&provider), Some(&account()), &TokenAddress(TOKEN.to_owned()));
                assert_eq!(sub.current(), BalanceView::loading());

                let mut rx = sub.watch();
                assert_eq!(settled(&mut rx).await.value.as_deref(), Some("10"));
                assert_eq!(bridge.balance_calls_for(TOKEN), 1);
                assert!(started.elapsed() < INTERVAL);

                bridge.set_balance(TOKEN, "11");
                let release = bridge.hold_next_balance(TOKEN);
                rx.changed().await.unwrap();
                let refetching = rx.borrow_and_update().clone();
                assert!(refetching.loading);
                assert_eq!(refetching.value.as_deref(), Some("10"));
                assert!(started.elapsed() >= INTERVAL);

                release.send(()).unwrap();
                assert_eq!(settled(&mut rx).await.value.as_deref(), Some("11"));
                assert_eq!(bridge.balance_calls_for(TOKEN), 2);
                assert!(started.elapsed() >= INTERVAL);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn missing_wallet_or_failed_query_is_no_value() {
        LocalSet::new()
            .run_until(async {
                let bridge = Rc::new(StubBridge::new());
                bridge.fail_balance(TOKEN, "execution reverted");
                let poller = poller(&bridge);
                let token = TokenAddress(TOKEN.to_owned());

                let no_wallet = poller.start(None, None, &token);
                assert_eq!(settled(&mut no_wallet.watch()).await, BalanceView::default());
                assert_eq!(bridge.balance_calls_for(TOKEN), 0);

                let provider = StubProvider::new("metamask");
                let failing = poller.start(Some(&provider), Some(&account()), &token);
                assert_eq!(settled(&mut failing.watch()).await.value, None);
                assert_eq!(bridge.balance_calls_for(TOKEN), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_poll_stops_fetching() {
        LocalSet::new()
            .run_until(async {
                let bridge = Rc::new(StubBridge::new());
                bridge.set_balance(TOKEN, "10");
                let poller = poller(&bridge);
                let provider = StubProvider::new("metamask");

                let mut sub = poller.start(Some(&provider), Some(&account()), &TokenAddress(TOKEN.to_owned()));
                while sub.current().loading {
                    assert!(sub.changed().await);
                }
                assert_eq!(sub.current().value.as_deref(), Some("10"));

                sub.cancel();
                assert!(sub.is_cancelled());
                tokio::time::sleep(INTERVAL * 3).await;

                assert_eq!(bridge.balance_calls_for(TOKEN), 1);
                assert!(!sub.changed().await);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn slot_keeps_same_key_and_restarts_on_change() {
        LocalSet::new()
            .run_until(async {
                let bridge = Rc::new(StubBridge::new());
                bridge.set_balance(TOKEN, "10");
                let slot = BalanceSlot::new(poller(&bridge));
                let provider = StubProvider::new("metamask");
                let token = TokenAddress(TOKEN.to_owned());

                let mut first = slot.observe(Some(&provider), Some(&account()), &token);
                settled(&mut first).await;
                slot.observe(Some(&provider), Some(&account()), &token);
                tokio::task::yield_now().await;
                assert_eq!(bridge.balance_calls_for(TOKEN), 1);

                let mut rekeyed = slot.observe(Some(&provider), None, &token);
                assert_eq!(rekeyed.borrow().clone(), BalanceView::loading());
                assert_eq!(settled(&mut rekeyed).await.value, None);
                assert_eq!(
                    slot.current_key().map(|key| key.account),
                    Some(None)
                );

                slot.stop();
                assert!(!slot.is_observing());
                assert!(rekeyed.changed().await.is_err());
            })
            .await;
    }
}
