use std::cell::Cell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use tracing::{debug, info, warn};
use wslp_bridge_client::{BridgeClient, ReturnRequest, WalletSession};
use wslp_types::{NoticeMessages, SubmissionInput, TokenAddress};

use crate::error::ReturnError;
use crate::form::ReturnForm;
use crate::notify::{NotificationBridge, Notifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Processing,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Returned,
    Failed(ReturnError),
}

impl SubmitOutcome {
    pub fn is_returned(&self) -> bool {
        matches!(self, SubmitOutcome::Returned)
    }
}

/// Holds the controller in `Processing`; dropping it goes back to `Idle`.
pub struct ProcessingGuard<'a> {
    state: &'a Cell<SubmissionState>,
}

impl<'a> ProcessingGuard<'a> {
    pub fn acquire(state: &'a Cell<SubmissionState>) -> Option<Self> {
        if state.get() == SubmissionState::Processing {
            return None;
        }
        state.set(SubmissionState::Processing);
        Some(Self { state })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.state.set(SubmissionState::Idle);
    }
}

pub struct SubmissionController<B, N, F> {
    bridge: Rc<B>,
    notices: NotificationBridge<N>,
    form: Rc<F>,
    messages: NoticeMessages,
    wallet_not_connected: String,
    state: Cell<SubmissionState>,
}

impl<B, N, F> SubmissionController<B, N, F>
where
    B: BridgeClient,
    N: Notifier,
    F: ReturnForm,
{
    pub fn new(
        bridge: Rc<B>,
        notifier: Rc<N>,
        form: Rc<F>,
        messages: NoticeMessages,
        wallet_not_connected: String,
    ) -> Self {
        Self {
            bridge,
            notices: NotificationBridge::new(notifier),
            form,
            messages,
            wallet_not_connected,
            state: Cell::new(SubmissionState::Idle),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    pub fn is_processing(&self) -> bool {
        self.state() == SubmissionState::Processing
    }

    /// Start a return for `input`.
    ///
    /// Returns `None` without side effects while another submission is still
    /// processing. Otherwise the controller is `Processing` and the pending
    /// notice is shown before this returns; the future settles the attempt.
    pub fn submit<'a>(
        &'a self,
        session: &WalletSession<B::Provider>,
        input: SubmissionInput,
    ) -> Option<LocalBoxFuture<'a, SubmitOutcome>> {
        let Some(guard) = ProcessingGuard::acquire(&self.state) else {
            debug!("return already processing, ignoring submit");
            return None;
        };

        let active = session
            .active()
            .map(|(provider, account)| (provider.clone(), account.clone()));

        info!(
            token = %input.source_token_address,
            destination = %input.destination_address,
            "submitting wrapped token return"
        );

        let operation = async move {
            let (provider, account) = active
                .ok_or_else(|| ReturnError::WalletNotConnected(self.wallet_not_connected.clone()))?;
            let request = ReturnRequest {
                account,
                source_token: TokenAddress(input.source_token_address),
                amount: input.amount,
                destination: input.destination_address,
            };
            self.bridge.return_wrapped_token(&provider, &request).await?;
            Ok::<(), ReturnError>(())
        };
        let tracked = self.notices.track(&self.messages, operation);

        Some(Box::pin(async move {
            let _guard = guard;
            match tracked.await {
                Ok(()) => {
                    self.form.reset();
                    info!("wrapped token return submitted");
                    SubmitOutcome::Returned
                }
                Err(err) => {
                    warn!("wrapped token return failed: {}", err);
                    SubmitOutcome::Failed(err)
                }
            }
        }))
    }
}
