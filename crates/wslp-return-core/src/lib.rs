//! Return flow for wrapped SLP tokens.
//!
//! [`ReturnWorkflow`] ties together the pieces the return form needs: the
//! single-flight [`SubmissionController`], the three-phase
//! [`NotificationBridge`], the [`TokenDirectoryCache`] behind autocomplete and
//! the [`BalanceSlot`] that polls the selected token's balance. Chain access
//! goes through [`wslp_bridge_client::BridgeClient`].
//!
//! All of it runs on one thread. Background polling is spawned through a
//! [`Scheduler`].

mod balance;
mod config;
mod directory;
mod error;
mod form;
mod notify;
mod scheduler;
mod submit;
mod workflow;

pub use balance::{BalancePoller, BalanceQueryKey, BalanceSlot, BalanceSubscription};
pub use config::{ENV_BALANCE_POLL_MS, ENV_DESTINATION_PREFIX, MAX_BALANCE_POLL_MS, ReturnConfig};
pub use directory::{DirectoryQueryKey, TokenDirectoryCache};
pub use error::{ConfigError, ReturnError};
pub use form::{FormState, ReturnForm};
pub use notify::{NotificationBridge, Notifier, RecordingNotifier};
pub use scheduler::Scheduler;
#[cfg(not(target_arch = "wasm32"))]
pub use scheduler::TokioScheduler;
pub use submit::{ProcessingGuard, SubmissionController, SubmissionState, SubmitOutcome};
pub use workflow::ReturnWorkflow;
