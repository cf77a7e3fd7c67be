use std::time::Duration;

use crate::error::Result;
use crate::models::{Indicator, IndicatorYearRow, YearRange};

pub mod world_bank_client;
pub use world_bank_client::WorldBankClient;

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// Source of macroeconomic indicator observations keyed by (country, year).
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IndicatorProvider {
    /// Fetch one row per (country, year) present in the provider response,
    /// with one value entry per requested indicator.
    async fn fetch_indicator_rows(
        &self,
        indicators: &[Indicator],
        countries: &[String],
        years: YearRange,
    ) -> Result<Vec<IndicatorYearRow>>;
}
