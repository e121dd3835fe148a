use std::rc::Rc;

use tracing::warn;
use wslp_bridge_client::BridgeClient;
use wslp_query_cache::QueryCache;
use wslp_types::TokenDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirectoryQueryKey {
    pub provider_present: bool,
}

/// Known wrapped tokens for autocomplete, cached per provider presence.
pub struct TokenDirectoryCache<B> {
    bridge: Rc<B>,
    cache: QueryCache<DirectoryQueryKey, Rc<[TokenDescriptor]>>,
}

impl<B> TokenDirectoryCache<B>
where
    B: BridgeClient + 'static,
{
    pub fn new(bridge: Rc<B>) -> Self {
        Self {
            bridge,
            cache: QueryCache::new("token-directory"),
        }
    }

    /// Token list for the current wallet. Never fails: with no provider, or
    /// when the lookup errors, the list is empty.
    pub async fn fetch_directory(&self, provider: Option<&B::Provider>) -> Rc<[TokenDescriptor]> {
        let key = DirectoryQueryKey {
            provider_present: provider.is_some(),
        };
        let bridge = self.bridge.clone();
        let provider = provider.cloned();

        self.cache
            .get_or_fetch(key, move || async move {
                let Some(provider) = provider else {
                    return Rc::from(Vec::new());
                };
                match bridge.list_known_wrapped_tokens(&provider).await {
                    Ok(tokens) => Rc::from(tokens),
                    Err(err) => {
                        warn!("failed to list wrapped tokens: {:#}", err);
                        Rc::from(Vec::new())
                    }
                }
            })
            .await
    }

    /// Last settled list for `key`, if any.
    pub fn cached(&self, key: DirectoryQueryKey) -> Option<Rc<[TokenDescriptor]>> {
        self.cache.peek(&key)
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}
