//! Three-phase notices for tracked operations.
//!
//! Every tracked attempt shows one `Pending` notice when tracking starts and
//! exactly one terminal notice (`Success` or `Error`) with the same id.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use wslp_types::{Notice, NoticeId, NoticeMessages, NoticePhase};

use crate::error::ReturnError;

/// Rendering seam for notices. A terminal notice replaces the pending one
/// with the same id.
pub trait Notifier {
    fn show(&self, notice: &Notice);
}

pub struct NotificationBridge<N> {
    notifier: Rc<N>,
    next_id: Cell<u64>,
}

impl<N: Notifier> NotificationBridge<N> {
    pub fn new(notifier: Rc<N>) -> Self {
        Self {
            notifier,
            next_id: Cell::new(1),
        }
    }

    /// Show the pending notice now and return a future that drives
    /// `operation` and shows its terminal notice.
    ///
    /// Dropping the returned future before it settles still shows a terminal
    /// error notice carrying the fallback message.
    pub fn track<'a, T, Fut>(
        &'a self,
        messages: &'a NoticeMessages,
        operation: Fut,
    ) -> impl Future<Output = Result<T, ReturnError>> + 'a
    where
        T: 'a,
        Fut: Future<Output = Result<T, ReturnError>> + 'a,
    {
        let id = NoticeId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.notifier.show(&Notice {
            id,
            phase: NoticePhase::Pending,
            message: messages.pending.clone(),
        });

        let mut terminal = TerminalNotice {
            notifier: &*self.notifier,
            id,
            fallback: &messages.error_fallback,
            settled: false,
        };

        async move {
            let result = operation.await;
            match &result {
                Ok(_) => terminal.settle(NoticePhase::Success, messages.success.clone()),
                Err(err) => terminal.settle(
                    NoticePhase::Error,
                    err.user_message()
                        .unwrap_or_else(|| messages.error_fallback.clone()),
                ),
            }
            result
        }
    }
}

struct TerminalNotice<'a, N: Notifier> {
    notifier: &'a N,
    id: NoticeId,
    fallback: &'a str,
    settled: bool,
}

impl<N: Notifier> TerminalNotice<'_, N> {
    fn settle(&mut self, phase: NoticePhase, message: String) {
        self.settled = true;
        self.notifier.show(&Notice {
            id: self.id,
            phase,
            message,
        });
    }
}

impl<N: Notifier> Drop for TerminalNotice<'_, N> {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(NoticePhase::Error, self.fallback.to_owned());
        }
    }
}

/// Keeps every notice in order. Useful headless and in tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn latest(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }

    pub fn terminal_for(&self, id: NoticeId) -> Vec<Notice> {
        self.notices
            .borrow()
            .iter()
            .filter(|notice| notice.id == id && notice.phase.is_terminal())
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use futures::channel::oneshot;

    fn bridge() -> (Rc<RecordingNotifier>, NotificationBridge<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::new());
        (notifier.clone(), NotificationBridge::new(notifier))
    }

    #[tokio::test]
    async fn pending_is_shown_before_the_operation_runs() {
        let (notifier, bridge) = bridge();
        let messages = NoticeMessages::default();

        let tracked = bridge.track(&messages, async { Ok::<_, ReturnError>(()) });
        assert_eq!(
            notifier.notices(),
            vec![Notice {
                id: NoticeId(1),
                phase: NoticePhase::Pending,
                message: "Processing...".to_owned(),
            }]
        );

        tracked.await.unwrap();
        assert_eq!(
            notifier.latest(),
            Some(Notice {
                id: NoticeId(1),
                phase: NoticePhase::Success,
                message: "Success! Wait for swap.".to_owned(),
            })
        );
        assert_eq!(notifier.terminal_for(NoticeId(1)).len(), 1);
    }

    #[tokio::test]
    async fn error_uses_its_own_message_or_fallback() {
        let (notifier, bridge) = bridge();
        let messages = NoticeMessages::default();

        let failed = bridge
            .track(&messages, async {
                Err::<(), _>(ReturnError::from(anyhow!("insufficient funds")))
            })
            .await;
        assert!(failed.is_err());
        assert_eq!(notifier.latest().unwrap().message, "insufficient funds");

        let _ = bridge
            .track(&messages, async { Err::<(), _>(ReturnError::from(anyhow!(""))) })
            .await;
        let latest = notifier.latest().unwrap();
        assert_eq!(latest.id, NoticeId(2));
        assert_eq!(latest.phase, NoticePhase::Error);
        assert_eq!(latest.message, "Unknown error occurred");
    }

    #[tokio::test]
    async fn pending_precedes_terminal_per_attempt() {
        let (notifier, bridge) = bridge();
        let messages = NoticeMessages::default();
        let (tx, rx) = oneshot::channel::<()>();

        let first = bridge.track(&messages, async move {
            let _ = rx.await;
            Ok::<_, ReturnError>(())
        });
        let second = bridge.track(&messages, async { Ok::<_, ReturnError>(()) });
        second.await.unwrap();
        tx.send(()).unwrap();
        first.await.unwrap();

        let notices = notifier.notices();
        for id in [NoticeId(1), NoticeId(2)] {
            let phases: Vec<_> = notices
                .iter()
                .filter(|notice| notice.id == id)
                .map(|notice| notice.phase)
                .collect();
            assert_eq!(phases, vec![NoticePhase::Pending, NoticePhase::Success]);
        }
    }

    #[tokio::test]
    async fn dropped_operation_still_gets_one_terminal_notice() {
        let (notifier, bridge) = bridge();
        let messages = NoticeMessages::default();

        let tracked = bridge.track(&messages, futures::future::pending::<Result<(), ReturnError>>());
        drop(tracked);

        let terminal = notifier.terminal_for(NoticeId(1));
        assert_eq!(terminal.len(), 1);
        assert_eq!(terminal[0].phase, NoticePhase::Error);
        assert_eq!(terminal[0].message, "Unknown error occurred");
    }
}
