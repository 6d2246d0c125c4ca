//! ECB Data Portal client.
//!
//! Each series is fetched with a single GET. Any failure (transport, HTTP
//! status, body decoding, empty result) is absorbed into a
//! [`FetchOutcome::Defaulted`] carrying a constant series and the reason, so
//! callers always receive a usable series.

use std::time::Duration;

use log::{info, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::data::sdmx;
use crate::domain::{FetchFailure, FetchOutcome, FetchRequest, ObservationSeries, SeriesSpec};
use crate::error::AppError;
use crate::math::resample_linear;

pub const DEFAULT_BASE_URL: &str = "https://data-api.ecb.europa.eu/service/data";
pub const BASE_URL_ENV: &str = "ECB_API_BASE_URL";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// The portal rejects requests that do not look like they come from a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";
const SDMX_JSON: &str = "application/vnd.sdmx.data+json;version=1.0.0-wd";

#[derive(Debug, Clone)]
pub struct EcbClient {
    client: Client,
    base_url: String,
}

impl EcbClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AppError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(SDMX_JSON));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve the base URL from an explicit override, then `ECB_API_BASE_URL`
    /// (a `.env` file is honoured), then the public portal.
    pub fn from_env(base_url: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn series_url(&self, spec: &SeriesSpec) -> String {
        format!(
            "{}/{}/{}?startPeriod={}&endPeriod={}",
            self.base_url, spec.flow, spec.key, spec.start_period, spec.end_period
        )
    }

    /// Fetch one series, falling back to `request.default_series()` on failure.
    ///
    /// Monthly requests that come back shorter than `years * 12` points are
    /// linearly interpolated onto that length.
    pub fn fetch(&self, spec: &SeriesSpec, request: FetchRequest) -> FetchOutcome {
        let url = self.series_url(spec);
        match self.fetch_raw(&url) {
            Ok(values) => {
                let n_raw = values.len();
                let series = expand_to_target(values, request);
                info!(
                    "Fetched {} ({} observations, {} after resampling).",
                    spec.identifier(),
                    n_raw,
                    series.len()
                );
                FetchOutcome::Fetched(series)
            }
            Err(reason) => {
                match &reason {
                    FetchFailure::NotFound => {
                        warn!("404 Error: data not found for the URL: {url}. Returning default values.")
                    }
                    FetchFailure::Status(code) => warn!("HTTP error {code} for {url}. Returning default values."),
                    other => warn!("Error fetching data from {url}: {other}. Returning default values."),
                }
                FetchOutcome::Defaulted {
                    series: request.default_series(),
                    reason,
                }
            }
        }
    }

    fn fetch_raw(&self, url: &str) -> Result<Vec<f64>, FetchFailure> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchFailure::NotFound);
        }
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let body = resp.text().map_err(|e| FetchFailure::Transport(e.to_string()))?;
        sdmx::extract_observations(&body)
    }
}

/// Interpolate a monthly request up to its target length; leave everything
/// else untouched.
pub fn expand_to_target(values: Vec<f64>, request: FetchRequest) -> ObservationSeries {
    let target = request.target_len();
    if request.monthly && values.len() < target {
        ObservationSeries::new(resample_linear(&values, target))
    } else {
        ObservationSeries::new(values)
    }
}
