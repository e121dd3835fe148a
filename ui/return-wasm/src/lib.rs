//! WSLP return form, WASM front end.
//!
//! Builds the return form in the page, binds the `slpShip` bridge library and
//! the injected wallet, and drives everything through
//! [`wslp_return_core::ReturnWorkflow`].

pub mod bridge_js;
pub mod dom;
pub mod events;
pub mod form;
pub mod scheduler;
pub mod state;
pub mod toast;
pub mod wallet;

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wslp_return_core::ReturnWorkflow;

use crate::bridge_js::JsBridge;
use crate::form::DomForm;
use crate::scheduler::BrowserScheduler;
use crate::toast::DomNotifier;

/// Element the form is mounted under; falls back to `<body>`.
pub const MOUNT_ID: &str = "wslp-return";

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();

    init()
}

fn init() -> Result<(), JsValue> {
    let config = state::load_config();
    let els = dom::Elements::mount(MOUNT_ID)?;

    let workflow = ReturnWorkflow::new(
        Rc::new(JsBridge),
        Rc::new(DomNotifier::new(els.toasts.clone())),
        Rc::new(DomForm::new(&els)),
        Rc::new(BrowserScheduler),
        config,
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let workflow = Rc::new(workflow);

    events::bind_events(&els, &workflow)?;
    events::refresh_suggestions(&els, &workflow);
    state::set_workflow(workflow);

    gloo_console::log!("wslp return form mounted");
    Ok(())
}

/// Stop background polling, e.g. before the host page removes the form.
#[wasm_bindgen]
pub fn teardown() {
    if let Some(workflow) = state::take_workflow() {
        workflow.teardown();
    }
}
