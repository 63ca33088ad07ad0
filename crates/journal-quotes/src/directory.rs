//! Stock name lookup with caching and provider fallback.

use journal_core::traits::StockInfoProvider;
use journal_core::types::StockInfo;
use journal_data::InfoCache;
use tracing::{debug, warn};

/// Resolves display metadata for instrument codes.
///
/// Providers are asked in order; the first one that knows the code wins.
/// When none does, a placeholder name is used. Every outcome, placeholder
/// included, is cached so each code hits the network at most once.
#[derive(Default)]
pub struct StockDirectory {
    providers: Vec<Box<dyn StockInfoProvider>>,
    cache: InfoCache,
}

impl StockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl StockInfoProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Look up `code`, consulting the cache first.
    pub async fn lookup(&mut self, code: &str) -> StockInfo {
        if let Some(info) = self.cache.get(code) {
            return info.clone();
        }

        let info = self.query(code).await;
        self.cache.put(code, info.clone());
        info
    }

    async fn query(&self, code: &str) -> StockInfo {
        for provider in &self.providers {
            match provider.fetch_info(code).await {
                Ok(Some(info)) => {
                    debug!("{} resolved {} as {}", provider.name(), code, info.name);
                    return info;
                }
                Ok(None) => debug!("{} has no info for {}", provider.name(), code),
                Err(e) => warn!("{} info lookup failed for {}: {}", provider.name(), code, e),
            }
        }
        StockInfo::placeholder(code)
    }

    /// Number of cached codes.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use journal_core::error::QuoteError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedInfo {
        answer: Result<Option<StockInfo>, QuoteError>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl StockInfoProvider for FixedInfo {
        async fn fetch_info(&self, _code: &str) -> Result<Option<StockInfo>, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn provider(answer: Result<Option<StockInfo>, QuoteError>) -> (FixedInfo, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            FixedInfo {
                answer,
                calls: calls.clone(),
            },
            calls,
        )
    }

    #[tokio::test]
    async fn test_fallback_and_cache() {
        let (broken, broken_calls) = provider(Err(QuoteError::Timeout));
        let (tencent, tencent_calls) = provider(Ok(Some(StockInfo::named("平安银行"))));

        let mut directory = StockDirectory::new().with_provider(broken).with_provider(tencent);

        assert_eq!(directory.lookup("000001").await.name, "平安银行");
        assert_eq!(directory.lookup("000001").await.name, "平安银行");
        assert_eq!(broken_calls.load(Ordering::SeqCst), 1);
        assert_eq!(tencent_calls.load(Ordering::SeqCst), 1);
        assert_eq!(directory.cached(), 1);
    }

    #[tokio::test]
    async fn test_placeholder_is_cached() {
        let (unknown, calls) = provider(Ok(None));
        let mut directory = StockDirectory::new().with_provider(unknown);

        let info = directory.lookup("300001").await;
        assert_eq!(info, StockInfo::placeholder("300001"));
        directory.lookup("300001").await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
