use tracing::info;

use crate::api::IndicatorProvider;
use crate::error::Result;
use crate::loader;
use crate::models::{Indicator, ReconciledRecord, YearRange};
use crate::reconcile;

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub tenure_path: String,
    pub countries: Vec<String>,
    pub years: YearRange,
    pub indicators: Vec<Indicator>,
}

/// Single-pass batch transform: load tenures, fetch indicator rows,
/// reconcile. No state survives a run; the entry point invokes it once.
pub struct Pipeline<P> {
    provider: P,
    config: PipelineConfig,
}

impl<P: IndicatorProvider> Pipeline<P> {
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        Self { provider, config }
    }

    pub async fn run(&self) -> Result<Vec<ReconciledRecord>> {
        info!("📋 Loading tenure records from {}", self.config.tenure_path);
        let tenures = loader::load_tenures(&self.config.tenure_path)?;
        info!("Loaded {} tenure records", tenures.len());

        info!(
            "📊 Fetching {} indicators for {} countries, {}..={}",
            self.config.indicators.len(),
            self.config.countries.len(),
            self.config.years.start,
            self.config.years.end
        );
        let rows = self
            .provider
            .fetch_indicator_rows(
                &self.config.indicators,
                &self.config.countries,
                self.config.years,
            )
            .await?;
        info!("Fetched {} indicator rows", rows.len());

        let records = reconcile::reconcile(&tenures, &rows)?;
        info!("✅ Reconciled into {} rows", records.len());
        Ok(records)
    }
}
