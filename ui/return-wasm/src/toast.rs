//! Toast notices.
//!
//! One toast per tracked attempt: the pending toast is rewritten in place by
//! its terminal notice, which then dismisses itself.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use web_sys::Element;
use wslp_return_core::Notifier;
use wslp_types::{Notice, NoticeId, NoticePhase};

use crate::dom;

const DISMISS_AFTER_MS: u32 = 4_000;

pub struct DomNotifier {
    container: Element,
    toasts: RefCell<HashMap<NoticeId, Element>>,
}

impl DomNotifier {
    pub fn new(container: Element) -> Self {
        Self {
            container,
            toasts: RefCell::new(HashMap::new()),
        }
    }

    fn toast_for(&self, id: NoticeId) -> Option<Element> {
        if let Some(existing) = self.toasts.borrow().get(&id) {
            return Some(existing.clone());
        }
        let toast = dom::create_element("div").ok()?;
        dom::add_class(&toast, "toast");
        self.container.append_child(&toast).ok()?;
        self.toasts.borrow_mut().insert(id, toast.clone());
        Some(toast)
    }
}

fn phase_class(phase: NoticePhase) -> &'static str {
    match phase {
        NoticePhase::Pending => "toast-loading",
        NoticePhase::Success => "toast-success",
        NoticePhase::Error => "toast-error",
    }
}

impl Notifier for DomNotifier {
    fn show(&self, notice: &Notice) {
        let Some(toast) = self.toast_for(notice.id) else {
            gloo_console::warn!("could not render notice:", notice.message.clone());
            return;
        };

        for phase in [NoticePhase::Pending, NoticePhase::Success, NoticePhase::Error] {
            dom::toggle_class(&toast, phase_class(phase), phase == notice.phase);
        }
        dom::set_text(&toast, &notice.message);

        if notice.phase.is_terminal() {
            self.toasts.borrow_mut().remove(&notice.id);
            Timeout::new(DISMISS_AFTER_MS, move || toast.remove()).forget();
        }
    }
}
