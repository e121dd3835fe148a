//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).

use std::cell::RefCell;
use std::rc::Rc;

use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use wslp_return_core::{ReturnConfig, ReturnWorkflow};

use crate::bridge_js::JsBridge;
use crate::form::DomForm;
use crate::toast::DomNotifier;

pub const CONFIG_KEY: &str = "wslp_return_config";

pub type Workflow = ReturnWorkflow<JsBridge, DomNotifier, DomForm>;

thread_local! {
    static WORKFLOW: RefCell<Option<Rc<Workflow>>> = const { RefCell::new(None) };
}

pub fn set_workflow(workflow: Rc<Workflow>) {
    WORKFLOW.with(|w| *w.borrow_mut() = Some(workflow));
}

pub fn take_workflow() -> Option<Rc<Workflow>> {
    WORKFLOW.with(|w| w.borrow_mut().take())
}

/// Defaults, overridden by a partial JSON object stored under
/// [`CONFIG_KEY`]. An unreadable or invalid override is ignored.
pub fn load_config() -> ReturnConfig {
    let config = match LocalStorage::get::<ReturnConfig>(CONFIG_KEY) {
        Ok(config) => config,
        Err(StorageError::KeyNotFound(_)) => return ReturnConfig::default(),
        Err(err) => {
            gloo_console::warn!("ignoring stored return config:", err.to_string());
            return ReturnConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            gloo_console::warn!("ignoring stored return config:", err.to_string());
            ReturnConfig::default()
        }
    }
}
