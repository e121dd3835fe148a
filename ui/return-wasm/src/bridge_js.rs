//! Bindings to the page's bridge library.
//!
//! The library is loaded by the host page and exposed as the global
//! `slpShip` namespace. Every call takes the injected wallet provider.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wslp_bridge_client::{BridgeClient, ReturnRequest};
use wslp_types::{AccountAddress, TokenAddress, TokenDescriptor};

use crate::wallet::EthereumProvider;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = slpShip, js_name = fromWSLP)]
    async fn from_wslp(
        provider: &JsValue,
        account: &str,
        token: &str,
        amount: &str,
        destination: &str,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = slpShip, js_name = getLatestWSLPTokens)]
    async fn get_latest_wslp_tokens(provider: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch, js_namespace = slpShip, js_name = getBalance)]
    async fn get_balance(provider: &JsValue, account: &str, token: &str) -> Result<JsValue, JsValue>;
}

/// Text of a thrown JS value. `Error` objects give their `message`; anything
/// without text gives an empty message.
fn js_error(err: JsValue) -> anyhow::Error {
    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_default();
    anyhow!(message)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsBridge;

#[async_trait(?Send)]
impl BridgeClient for JsBridge {
    type Provider = EthereumProvider;

    async fn return_wrapped_token(&self, provider: &EthereumProvider, req: &ReturnRequest) -> Result<()> {
        from_wslp(
            provider.as_js(),
            req.account.as_str(),
            req.source_token.as_str(),
            &req.amount,
            &req.destination,
        )
        .await
        .map_err(js_error)?;
        Ok(())
    }

    async fn list_known_wrapped_tokens(&self, provider: &EthereumProvider) -> Result<Vec<TokenDescriptor>> {
        let tokens = get_latest_wslp_tokens(provider.as_js())
            .await
            .map_err(js_error)?;
        serde_wasm_bindgen::from_value(tokens).map_err(|e| anyhow!("unexpected token list: {}", e))
    }

    async fn query_token_balance(
        &self,
        provider: &EthereumProvider,
        account: &AccountAddress,
        token: &TokenAddress,
    ) -> Result<String> {
        let balance = get_balance(provider.as_js(), account.as_str(), token.as_str())
            .await
            .map_err(js_error)?;
        balance
            .as_string()
            .or_else(|| balance.as_f64().map(|n| n.to_string()))
            .ok_or_else(|| anyhow!("unexpected balance value"))
    }
}
