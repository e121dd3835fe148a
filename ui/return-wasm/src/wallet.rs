//! The injected EIP-1193 wallet (`window.ethereum`).
//!
//! Connection is managed by the wallet itself; this module only reads the
//! current state and listens for changes.

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wslp_bridge_client::WalletSession;
use wslp_types::AccountAddress;

#[derive(Debug, Clone)]
pub struct EthereumProvider(JsValue);

impl EthereumProvider {
    pub fn as_js(&self) -> &JsValue {
        &self.0
    }
}

fn injected() -> Option<JsValue> {
    Reflect::get(&gloo_utils::window(), &JsValue::from_str("ethereum"))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

pub fn current_session() -> WalletSession<EthereumProvider> {
    let Some(ethereum) = injected() else {
        return WalletSession::disconnected();
    };

    let account = Reflect::get(&ethereum, &JsValue::from_str("selectedAddress"))
        .ok()
        .and_then(|value| value.as_string())
        .filter(|address| !address.is_empty())
        .map(AccountAddress);

    WalletSession {
        provider: Some(EthereumProvider(ethereum)),
        account,
    }
}

/// Call `handler` whenever the wallet switches account or chain. Does nothing
/// when no wallet is injected.
pub fn on_change(handler: impl FnMut() + 'static) -> Result<(), JsValue> {
    let Some(ethereum) = injected() else {
        return Ok(());
    };
    let on: Function = Reflect::get(&ethereum, &JsValue::from_str("on"))?.dyn_into()?;

    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
    for event in ["accountsChanged", "chainChanged"] {
        on.call2(&ethereum, &JsValue::from_str(event), cb.as_ref().unchecked_ref())?;
    }
    cb.forget();
    Ok(())
}
