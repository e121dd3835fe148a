use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use tokio::sync::watch;
use wslp_address::{AddressRule, CashAddrRule, EvmAddressRule};
use wslp_bridge_client::{BridgeClient, WalletSession};
use wslp_types::{BalanceView, TokenAddress, TokenDescriptor};

use crate::balance::{BalancePoller, BalanceQueryKey, BalanceSlot};
use crate::config::ReturnConfig;
use crate::directory::TokenDirectoryCache;
use crate::error::ConfigError;
use crate::form::ReturnForm;
use crate::notify::Notifier;
use crate::scheduler::Scheduler;
use crate::submit::{SubmissionController, SubmissionState, SubmitOutcome};

/// Everything the return form drives, wired together.
pub struct ReturnWorkflow<B, N, F> {
    config: ReturnConfig,
    source_rule: EvmAddressRule,
    destination_rule: CashAddrRule,
    directory: TokenDirectoryCache<B>,
    balance: BalanceSlot<B>,
    controller: SubmissionController<B, N, F>,
    form: Rc<F>,
    selected_token: RefCell<Option<TokenAddress>>,
}

impl<B, N, F> ReturnWorkflow<B, N, F>
where
    B: BridgeClient + 'static,
    N: Notifier,
    F: ReturnForm,
{
    pub fn new(
        bridge: Rc<B>,
        notifier: Rc<N>,
        form: Rc<F>,
        scheduler: Rc<dyn Scheduler>,
        config: ReturnConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let poller = BalancePoller::new(bridge.clone(), scheduler, config.balance_poll_interval());
        let controller = SubmissionController::new(
            bridge.clone(),
            notifier,
            form.clone(),
            config.messages.clone(),
            config.wallet_not_connected.clone(),
        );

        Ok(Self {
            source_rule: EvmAddressRule,
            destination_rule: CashAddrRule::new(config.destination_prefix.as_str()),
            directory: TokenDirectoryCache::new(bridge),
            balance: BalanceSlot::new(poller),
            controller,
            form,
            selected_token: RefCell::new(None),
            config,
        })
    }

    pub fn config(&self) -> &ReturnConfig {
        &self.config
    }

    pub fn is_valid_source_token(&self, text: &str) -> bool {
        self.source_rule.is_valid_address(text)
    }

    /// Advisory only; submission never depends on it.
    pub fn destination_looks_valid(&self, text: &str) -> bool {
        self.destination_rule.is_valid_address(text)
    }

    /// Show the balance for `text` when it is a valid token address, hide it
    /// otherwise.
    pub fn source_token_changed(
        &self,
        session: &WalletSession<B::Provider>,
        text: &str,
    ) -> Option<watch::Receiver<BalanceView>> {
        if !self.is_valid_source_token(text) {
            self.selected_token.replace(None);
            self.balance.stop();
            return None;
        }

        let token = TokenAddress(text.to_owned());
        self.selected_token.replace(Some(token.clone()));
        Some(
            self.balance
                .observe(session.provider.as_ref(), session.account.as_ref(), &token),
        )
    }

    /// Re-key the balance poll after the wallet connects, disconnects or
    /// switches account.
    pub fn session_changed(
        &self,
        session: &WalletSession<B::Provider>,
    ) -> Option<watch::Receiver<BalanceView>> {
        let token = self.selected_token.borrow().clone()?;
        Some(
            self.balance
                .observe(session.provider.as_ref(), session.account.as_ref(), &token),
        )
    }

    pub fn balance(&self) -> Option<watch::Receiver<BalanceView>> {
        self.balance.watch()
    }

    pub fn balance_key(&self) -> Option<BalanceQueryKey> {
        self.balance.current_key()
    }

    pub async fn token_suggestions(
        &self,
        session: &WalletSession<B::Provider>,
    ) -> Rc<[TokenDescriptor]> {
        self.directory
            .fetch_directory(session.provider.as_ref())
            .await
    }

    /// Submit what the form currently holds. `None` while a previous submit
    /// is still processing.
    pub fn submit<'a>(
        &'a self,
        session: &WalletSession<B::Provider>,
    ) -> Option<LocalBoxFuture<'a, SubmitOutcome>> {
        self.controller.submit(session, self.form.snapshot())
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.controller.state()
    }

    pub fn is_processing(&self) -> bool {
        self.controller.is_processing()
    }

    pub fn teardown(&self) {
        self.balance.stop();
        self.selected_token.replace(None);
    }
}
