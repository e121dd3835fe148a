use anyhow::Result;
use async_trait::async_trait;
use wslp_types::{AccountAddress, TokenAddress, TokenDescriptor};

#[cfg(feature = "testing")]
pub mod testing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnRequest {
    pub account: AccountAddress,
    pub source_token: TokenAddress,
    pub amount: String,
    pub destination: String,
}

/// The bridge operations the return flow depends on.
///
/// Implementations own everything chain-specific: amount parsing, address
/// checks at protocol level, signing and submission. Futures are `!Send`;
/// the whole flow runs on one thread.
#[async_trait(?Send)]
pub trait BridgeClient {
    /// Opaque handle of a connected wallet.
    type Provider: Clone + 'static;

    async fn return_wrapped_token(&self, provider: &Self::Provider, req: &ReturnRequest) -> Result<()>;

    async fn list_known_wrapped_tokens(&self, provider: &Self::Provider) -> Result<Vec<TokenDescriptor>>;

    async fn query_token_balance(
        &self,
        provider: &Self::Provider,
        account: &AccountAddress,
        token: &TokenAddress,
    ) -> Result<String>;
}

/// Snapshot of the externally managed wallet connection.
#[derive(Debug, Clone)]
pub struct WalletSession<P> {
    pub provider: Option<P>,
    pub account: Option<AccountAddress>,
}

impl<P> Default for WalletSession<P> {
    fn default() -> Self {
        Self::disconnected()
    }
}

impl<P> WalletSession<P> {
    pub fn disconnected() -> Self {
        Self {
            provider: None,
            account: None,
        }
    }

    pub fn connected(provider: P, account: AccountAddress) -> Self {
        Self {
            provider: Some(provider),
            account: Some(account),
        }
    }

    pub fn provider_present(&self) -> bool {
        self.provider.is_some()
    }

    /// Provider and account, only when both are known.
    pub fn active(&self) -> Option<(&P, &AccountAddress)> {
        Some((self.provider.as_ref()?, self.account.as_ref()?))
    }
}
