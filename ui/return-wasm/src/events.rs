//! Event binding.
//!
//! Wires the form's listeners to the workflow. Async work is spawned via
//! `wasm_bindgen_futures::spawn_local`.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::Context;

use tokio::sync::watch;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wslp_return_core::SubmitOutcome;
use wslp_types::BalanceView;

use crate::dom::{self, Elements};
use crate::state::Workflow;
use crate::wallet;

/// Attach an `Event` listener; the closure lives as long as the page.
macro_rules! on_event {
    ($target:expr, $event:expr, $cb:expr) => {{
        let cb = Closure::wrap(Box::new($cb) as Box<dyn FnMut(web_sys::Event)>);
        $target.add_event_listener_with_callback($event, cb.as_ref().unchecked_ref())?;
        cb.forget();
    }};
}

/// Bind all form listeners. Call once after mounting.
pub fn bind_events(els: &Elements, workflow: &Rc<Workflow>) -> Result<(), JsValue> {
    // ── Source token ──
    {
        let els2 = els.clone();
        let workflow = workflow.clone();
        on_event!(els.token_input, "input", move |_: web_sys::Event| {
            let text = dom::get_input_value(&els2.token_input);
            on_source_token_changed(&els2, &workflow, &text);
        });
    }
    {
        let els2 = els.clone();
        let workflow = workflow.clone();
        on_event!(els.token_input, "focus", move |_: web_sys::Event| {
            refresh_suggestions(&els2, &workflow);
        });
    }

    // ── Destination hint ──
    {
        let els2 = els.clone();
        let workflow = workflow.clone();
        on_event!(els.destination_input, "input", move |_: web_sys::Event| {
            let text = dom::get_input_value(&els2.destination_input);
            let suspicious = !text.is_empty() && !workflow.destination_looks_valid(&text);
            dom::toggle_class(&els2.destination_hint, "invalid", suspicious);
            let hint = if suspicious {
                format!("does not look like a {} address", workflow.config().destination_prefix)
            } else {
                String::new()
            };
            dom::set_text(&els2.destination_hint, &hint);
        });
    }

    // ── Submit ──
    {
        let els2 = els.clone();
        let workflow = workflow.clone();
        on_event!(els.form, "submit", move |event: web_sys::Event| {
            event.prevent_default();
            on_submit(&els2, &workflow);
        });
    }

    // ── Wallet ──
    {
        let els2 = els.clone();
        let workflow = workflow.clone();
        wallet::on_change(move || {
            let session = wallet::current_session();
            let before = workflow.balance_key();
            if let Some(rx) = workflow.session_changed(&session) {
                if workflow.balance_key() != before {
                    watch_balance(&els2, rx);
                }
            }
            refresh_suggestions(&els2, &workflow);
        })?;
    }

    Ok(())
}

fn on_source_token_changed(els: &Elements, workflow: &Rc<Workflow>, text: &str) {
    let session = wallet::current_session();
    let before = workflow.balance_key();
    match workflow.source_token_changed(&session, text) {
        Some(rx) => {
            els.balance_row.set_hidden(false);
            if workflow.balance_key() != before {
                watch_balance(els, rx);
            }
        }
        None => {
            els.balance_row.set_hidden(true);
            dom::set_text(&els.balance_value, "");
        }
    }
}

fn on_submit(els: &Elements, workflow: &Rc<Workflow>) {
    let els = els.clone();
    let workflow = workflow.clone();
    // the processing flag and form snapshot are taken inside the listener
    spawn_eager(async move {
        let session = wallet::current_session();
        let Some(pending) = workflow.submit(&session) else {
            gloo_console::debug!("return already processing");
            return;
        };

        els.submit_btn.set_disabled(true);
        let outcome = pending.await;
        els.submit_btn.set_disabled(false);

        if let SubmitOutcome::Returned = outcome {
            // the form was cleared, so the balance widget goes with it
            on_source_token_changed(&els, &workflow, "");
        }
    });
}

/// Run `task` up to its first suspension point now, then hand the rest to
/// the microtask queue.
fn spawn_eager<F>(task: F)
where
    F: Future<Output = ()> + 'static,
{
    start_eagerly(task, wasm_bindgen_futures::spawn_local);
}

fn start_eagerly<F, S>(task: F, spawn: S)
where
    F: Future<Output = ()> + 'static,
    S: FnOnce(Pin<Box<F>>),
{
    let mut task = Box::pin(task);
    let waker = futures::task::noop_waker();
    if task.as_mut().poll(&mut Context::from_waker(&waker)).is_pending() {
        spawn(task);
    }
}

/// Render every update of one balance subscription until it is replaced.
fn watch_balance(els: &Elements, mut rx: watch::Receiver<BalanceView>) {
    let value_el = els.balance_value.clone();
    wasm_bindgen_futures::spawn_local(async move {
        loop {
            let text = rx.borrow_and_update().display().to_owned();
            dom::set_text(&value_el, &text);
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
}

/// Reload the token datalist for the current wallet.
pub fn refresh_suggestions(els: &Elements, workflow: &Rc<Workflow>) {
    let els = els.clone();
    let workflow = workflow.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let session = wallet::current_session();
        let tokens = workflow.token_suggestions(&session).await;

        dom::set_text(&els.token_list, "");
        for token in tokens.iter() {
            match dom::create_option(&token.address, &token.label()) {
                Ok(option) => {
                    let _ = els.token_list.append_child(&option);
                }
                Err(err) => gloo_console::warn!("could not add token option:", err),
            }
        }
    });
}
