use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{ApiRateLimiter, IndicatorProvider};
use crate::error::{Error, Result};
use crate::models::{
    normalize_country_code, Config, Indicator, IndicatorObservation, IndicatorYearRow, YearRange,
};

/// Observations per page requested from the API.
const PER_PAGE: u32 = 1000;

/// Concurrent in-flight indicator requests.
const CONCURRENT_REQUESTS: usize = 2;

/// World Bank v2 API client.
///
/// One GET per indicator code, all requested countries in a single path
/// segment, paged until the response envelope is exhausted.
pub struct WorldBankClient {
    client: Client,
    base_url: Url,
    rate_limiter: ApiRateLimiter,
}

impl WorldBankClient {
    /// Create a new World Bank client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("polistats/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&config.api_base_url)?;
        let rate_limiter = ApiRateLimiter::new(config.rate_limit_per_minute);

        Ok(Self {
            client,
            base_url,
            rate_limiter,
        })
    }

    fn indicator_url(
        &self,
        code: &str,
        countries: &[String],
        years: YearRange,
        page: u32,
    ) -> Url {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}/country/{}/indicator/{}",
            url.path().trim_end_matches('/'),
            countries.join(";"),
            code
        );
        url.set_path(&path);
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("date", &format!("{}:{}", years.start, years.end))
            .append_pair("page", &page.to_string());
        url
    }

    /// Make a request and hand back the raw JSON body
    async fn fetch_page(&self, url: Url) -> Result<Value> {
        self.rate_limiter.wait().await;

        debug!("Making request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable(format!(
                "request to {} failed with status {}",
                url,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Fetch every observation page for one indicator code.
    async fn fetch_observations(
        &self,
        indicator: &Indicator,
        countries: &[String],
        years: YearRange,
    ) -> Result<Vec<IndicatorObservation>> {
        let mut observations = Vec::new();
        let mut page = 1;

        loop {
            let url = self.indicator_url(&indicator.code, countries, years, page);
            let body = self.fetch_page(url).await?;
            let pages = envelope_pages(&body, &indicator.code)?;

            if let Some(entries) = body.get(1).and_then(Value::as_array) {
                for entry in entries {
                    match parse_observation(entry) {
                        Some(observation) => observations.push(observation),
                        None => warn!("Skipping unparseable observation entry: {}", entry),
                    }
                }
            }

            if page >= pages {
                break;
            }
            page += 1;
        }

        debug!(
            "Retrieved {} observations for {} across {} countries",
            observations.len(),
            indicator.code,
            countries.len()
        );
        Ok(observations)
    }
}

#[async_trait::async_trait]
impl IndicatorProvider for WorldBankClient {
    async fn fetch_indicator_rows(
        &self,
        indicators: &[Indicator],
        countries: &[String],
        years: YearRange,
    ) -> Result<Vec<IndicatorYearRow>> {
        if countries.is_empty() {
            return Err(Error::InvalidRequest(
                "country set must not be empty".to_string(),
            ));
        }
        if years.end < years.start {
            return Err(Error::InvalidRequest(format!(
                "year range must satisfy end >= start, got {}:{}",
                years.start, years.end
            )));
        }
        let indicators = Indicator::dedup_by_code(indicators);
        if indicators.is_empty() {
            return Err(Error::InvalidRequest(
                "indicator set must not be empty".to_string(),
            ));
        }

        let countries: Vec<String> = countries
            .iter()
            .map(|c| normalize_country_code(c))
            .collect();

        let futures: Vec<_> = indicators
            .iter()
            .map(|indicator| self.fetch_observations(indicator, &countries, years))
            .collect();
        let per_indicator: Vec<Vec<IndicatorObservation>> = stream::iter(futures)
            .buffered(CONCURRENT_REQUESTS)
            .try_collect()
            .await?;

        let observations: Vec<IndicatorObservation> =
            per_indicator.into_iter().flatten().collect();

        Ok(pivot_rows(&indicators, observations))
    }
}

/// Inspect a response envelope, surfacing provider error messages, and
/// return the page count.
fn envelope_pages(body: &Value, code: &str) -> Result<u32> {
    let Some(head) = body.get(0) else {
        return Err(Error::ProviderUnavailable(
            "empty response envelope".to_string(),
        ));
    };

    if let Some(messages) = head.get("message").and_then(Value::as_array) {
        // Error id 120 is "Invalid value": the requested indicator (the only
        // free-form parameter we send per request) was not recognized.
        let invalid_value = messages
            .iter()
            .any(|m| m.get("id").and_then(Value::as_str) == Some("120"));
        if invalid_value {
            return Err(Error::InvalidIndicator(code.to_string()));
        }

        let detail: Vec<&str> = messages
            .iter()
            .filter_map(|m| m.get("value").and_then(Value::as_str))
            .collect();
        return Err(Error::ProviderUnavailable(detail.join("; ")));
    }

    Ok(head.get("pages").and_then(Value::as_u64).unwrap_or(1) as u32)
}

fn parse_observation(entry: &Value) -> Option<IndicatorObservation> {
    let country = entry
        .get("countryiso3code")
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
        .or_else(|| {
            entry
                .get("country")
                .and_then(|c| c.get("id"))
                .and_then(Value::as_str)
        })?;
    let year: i32 = entry.get("date").and_then(Value::as_str)?.parse().ok()?;
    let indicator = entry
        .get("indicator")
        .and_then(|i| i.get("id"))
        .and_then(Value::as_str)?;
    // Null here is real: the provider reports the key with no data.
    let value = entry.get("value").and_then(Value::as_f64);

    Some(IndicatorObservation {
        country: normalize_country_code(country),
        year,
        indicator: indicator.to_string(),
        value,
    })
}

/// Pivot flat observations into one row per (country, year), seeding every
/// requested indicator label so missing data shows up as `None` rather than
/// a dropped row.
fn pivot_rows(
    indicators: &[Indicator],
    observations: Vec<IndicatorObservation>,
) -> Vec<IndicatorYearRow> {
    let label_by_code: HashMap<&str, &str> = indicators
        .iter()
        .map(|i| (i.code.as_str(), i.label.as_str()))
        .collect();

    let mut rows: std::collections::BTreeMap<(String, i32), IndicatorYearRow> =
        std::collections::BTreeMap::new();

    for observation in observations {
        let Some(label) = label_by_code.get(observation.indicator.as_str()) else {
            warn!(
                "Provider returned unrequested indicator {}",
                observation.indicator
            );
            continue;
        };

        let row = rows
            .entry((observation.country.clone(), observation.year))
            .or_insert_with(|| IndicatorYearRow {
                country: observation.country.clone(),
                year: observation.year,
                values: indicators
                    .iter()
                    .map(|i| (i.label.clone(), None))
                    .collect(),
            });
        row.values.insert(label.to_string(), observation.value);
    }

    rows.into_values().collect()
}
