//! Ordered fallback across quote providers.
//!
//! Providers are tried in order. The first one to return a non-empty bar
//! set wins; errors and empty answers move on to the next stage. A stage
//! with a retry policy re-tries only when the provider reports throttling.

use chrono::NaiveDate;
use journal_core::error::QuoteError;
use journal_core::traits::QuoteProvider;
use journal_core::types::PriceBar;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Back-off for throttled providers.
///
/// Attempt `n` (zero-based, `n > 0`) waits a uniform random
/// `[min_delay_secs, max_delay_secs]` scaled by `n + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_delay_secs: 2.0,
            max_delay_secs: 5.0,
        }
    }
}

impl RetryPolicy {
    /// One attempt, no waiting.
    pub fn single() -> Self {
        Self {
            max_attempts: 1,
            min_delay_secs: 0.0,
            max_delay_secs: 0.0,
        }
    }

    /// Delay before the given zero-based attempt.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 || self.max_delay_secs <= 0.0 {
            return Duration::ZERO;
        }
        let base = if self.max_delay_secs > self.min_delay_secs {
            rand::thread_rng().gen_range(self.min_delay_secs..=self.max_delay_secs)
        } else {
            self.max_delay_secs
        };
        Duration::from_secs_f64(base.max(0.0) * f64::from(attempt + 1))
    }

    fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Bars plus the provider that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBars {
    pub source: String,
    pub bars: Vec<PriceBar>,
}

struct Stage {
    provider: Box<dyn QuoteProvider>,
    retry: RetryPolicy,
}

/// Provider chain for daily bars.
#[derive(Default)]
pub struct PriceResolver {
    stages: Vec<Stage>,
}

impl PriceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider that is tried once.
    pub fn with_provider(self, provider: impl QuoteProvider + 'static) -> Self {
        self.with_retrying_provider(provider, RetryPolicy::single())
    }

    /// Append a provider that is retried when throttled.
    pub fn with_retrying_provider(
        mut self,
        provider: impl QuoteProvider + 'static,
        retry: RetryPolicy,
    ) -> Self {
        self.stages.push(Stage {
            provider: Box::new(provider),
            retry,
        });
        self
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.provider.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Resolve bars for `code` over `[start, end]`. `None` when every
    /// provider failed or had nothing.
    pub async fn resolve(&self, code: &str, start: NaiveDate, end: NaiveDate) -> Option<ResolvedBars> {
        for stage in &self.stages {
            let name = stage.provider.name();
            match fetch_with_retry(stage, code, start, end).await {
                Ok(bars) if !bars.is_empty() => {
                    info!("Fetched {} bars for {} from {}", bars.len(), code, name);
                    return Some(ResolvedBars {
                        source: name.to_string(),
                        bars,
                    });
                }
                Ok(_) => warn!("{} returned no data for {}", name, code),
                Err(e) => warn!("{} failed for {}: {}", name, code, e),
            }
        }

        warn!("All quote providers failed for {}", code);
        None
    }
}

async fn fetch_with_retry(
    stage: &Stage,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<PriceBar>, QuoteError> {
    let attempts = stage.retry.attempts();
    let mut attempt = 0;

    loop {
        let delay = stage.retry.delay_before(attempt);
        if !delay.is_zero() {
            debug!("Waiting {:.1}s before retrying {}", delay.as_secs_f64(), stage.provider.name());
            tokio::time::sleep(delay).await;
        }

        match stage.provider.fetch_bars(code, start, end).await {
            Err(e) if e.is_rate_limited() && attempt + 1 < attempts => {
                warn!(
                    "{} rate limited for {} (attempt {}/{}): {}",
                    stage.provider.name(),
                    code,
                    attempt + 1,
                    attempts,
                    e
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}
