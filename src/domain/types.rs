//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the fetch, resample and rule stages
//! - exported to JSON/CSV
//! - rendered by any of the front-ends (summary, SVG chart, dashboard)

use chrono::{Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// An ordered sequence of observations, indexed implicitly by position.
///
/// No timestamps are carried; the presentation layer assigns a synthetic
/// monthly axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationSeries(Vec<f64>);

impl ObservationSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// A series of `len` copies of `value`.
    pub fn filled(value: f64, len: usize) -> Self {
        Self(vec![value; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<f64> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Min/max over finite values.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &v in self.0.iter().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// Copy of the series resized to `len`.
    ///
    /// Shorter targets truncate; longer targets repeat the last value
    /// (or NaN for an empty series).
    pub fn resized(&self, len: usize) -> Self {
        let mut out: Vec<f64> = self.0.iter().copied().take(len).collect();
        let fill = self.last().unwrap_or(f64::NAN);
        out.resize(len, fill);
        Self(out)
    }
}

impl From<Vec<f64>> for ObservationSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl FromIterator<f64> for ObservationSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Why a fetch fell back to its default series.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchFailure {
    #[error("series not found (HTTP 404)")]
    NotFound,
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid SDMX-JSON body: {0}")]
    Decode(String),
    #[error("SDMX-JSON body has no `{0}`")]
    MissingField(String),
    #[error("no observations extracted")]
    Empty,
}

/// Result of a best-effort series acquisition.
///
/// Both arms carry a usable series; consumers that only need the numbers call
/// [`FetchOutcome::series`], while reports and charts can tell real data from
/// synthetic defaults.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched(ObservationSeries),
    Defaulted {
        series: ObservationSeries,
        reason: FetchFailure,
    },
}

impl FetchOutcome {
    pub fn series(&self) -> &ObservationSeries {
        match self {
            FetchOutcome::Fetched(series) => series,
            FetchOutcome::Defaulted { series, .. } => series,
        }
    }

    pub fn into_series(self) -> ObservationSeries {
        match self {
            FetchOutcome::Fetched(series) => series,
            FetchOutcome::Defaulted { series, .. } => series,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, FetchOutcome::Defaulted { .. })
    }

    pub fn reason(&self) -> Option<&FetchFailure> {
        match self {
            FetchOutcome::Fetched(_) => None,
            FetchOutcome::Defaulted { reason, .. } => Some(reason),
        }
    }

    pub fn status(&self) -> InputStatus {
        match self {
            FetchOutcome::Fetched(_) => InputStatus::Fetched,
            FetchOutcome::Defaulted { reason, .. } => InputStatus::Defaulted(reason.clone()),
        }
    }
}

/// Serializable provenance of one pipeline input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    Fetched,
    Defaulted(FetchFailure),
}

impl InputStatus {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, InputStatus::Defaulted(_))
    }

    pub fn label(&self) -> String {
        match self {
            InputStatus::Fetched => "fetched".to_string(),
            InputStatus::Defaulted(reason) => format!("default ({reason})"),
        }
    }
}

/// Provenance of every remote input used in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProvenance {
    pub inflation: InputStatus,
    pub gdp: InputStatus,
    pub potential_gdp: InputStatus,
    pub policy_rate: InputStatus,
}

impl InputProvenance {
    /// `(name, status)` pairs in display order.
    pub fn entries(&self) -> [(&'static str, &InputStatus); 4] {
        [
            ("inflation", &self.inflation),
            ("gdp", &self.gdp),
            ("potential_gdp", &self.potential_gdp),
            ("policy_rate", &self.policy_rate),
        ]
    }

    pub fn output_gap_defaulted(&self) -> bool {
        self.gdp.is_defaulted() || self.potential_gdp.is_defaulted()
    }
}

/// One remote series: dataflow, series key and period window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub flow: String,
    pub key: String,
    pub start_period: String,
    pub end_period: String,
}

impl SeriesSpec {
    pub fn new(
        flow: impl Into<String>,
        key: impl Into<String>,
        start_period: impl Into<String>,
        end_period: impl Into<String>,
    ) -> Self {
        Self {
            flow: flow.into(),
            key: key.into(),
            start_period: start_period.into(),
            end_period: end_period.into(),
        }
    }

    /// Parse a `FLOW/KEY` identifier.
    pub fn parse_identifier(
        identifier: &str,
        start_period: &str,
        end_period: &str,
    ) -> Result<Self, AppError> {
        let (flow, key) = identifier
            .split_once('/')
            .filter(|(flow, key)| !flow.is_empty() && !key.is_empty())
            .ok_or_else(|| {
                AppError::usage(format!(
                    "Invalid series identifier '{identifier}' (expected FLOW/KEY, e.g. ICP/M.U2.N.000000.4.ANR)."
                ))
            })?;
        Ok(Self::new(flow, key, start_period, end_period))
    }

    /// `FLOW/KEY`, the path segment used in the request URL.
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.flow, self.key)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_period(&self.start_period)?;
        validate_period(&self.end_period)?;
        Ok(())
    }
}

/// Which remote series feed the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesCatalog {
    pub inflation: SeriesSpec,
    pub gdp: SeriesSpec,
    pub potential_gdp: SeriesSpec,
    pub policy_rate: SeriesSpec,
}

pub const DEFAULT_INFLATION_SERIES: &str = "ICP/M.U2.N.000000.4.ANR";
pub const DEFAULT_GDP_SERIES: &str = "MNA/Q.Y.I9.W2.S1.S1.B.B1GQ._Z._Z._Z.EUR.LR.N";
pub const DEFAULT_POTENTIAL_GDP_SERIES: &str = "AME/A.EA19.1.0.0.0.OVGDP";
pub const DEFAULT_POLICY_RATE_SERIES: &str = "FM/B.U2.EUR.4F.KR.MRR_FR.LEV";

pub const DEFAULT_START_PERIOD: &str = "2000-01";
pub const DEFAULT_END_PERIOD: &str = "2024-01";

impl SeriesCatalog {
    /// Build the catalog for a `[start, end]` window.
    ///
    /// Monthly series use the periods as given; GDP series are queried by
    /// year (`YYYY`).
    pub fn with_window(
        inflation: &str,
        gdp: &str,
        potential_gdp: &str,
        policy_rate: &str,
        start: &str,
        end: &str,
    ) -> Result<Self, AppError> {
        validate_period(start)?;
        validate_period(end)?;
        let start_year = year_of_period(start);
        let end_year = year_of_period(end);
        Ok(Self {
            inflation: SeriesSpec::parse_identifier(inflation, start, end)?,
            gdp: SeriesSpec::parse_identifier(gdp, start_year, end_year)?,
            potential_gdp: SeriesSpec::parse_identifier(potential_gdp, start_year, end_year)?,
            policy_rate: SeriesSpec::parse_identifier(policy_rate, start, end)?,
        })
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.inflation.validate()?;
        self.gdp.validate()?;
        self.potential_gdp.validate()?;
        self.policy_rate.validate()?;
        Ok(())
    }

    /// True when GDP and potential GDP point at the same remote series.
    pub fn gdp_series_shared(&self) -> bool {
        self.gdp.identifier() == self.potential_gdp.identifier()
    }
}

impl Default for SeriesCatalog {
    fn default() -> Self {
        Self {
            inflation: SeriesSpec::new("ICP", "M.U2.N.000000.4.ANR", "2000-01", "2024-01"),
            gdp: SeriesSpec::new("MNA", "Q.Y.I9.W2.S1.S1.B.B1GQ._Z._Z._Z.EUR.LR.N", "2000", "2024"),
            potential_gdp: SeriesSpec::new("AME", "A.EA19.1.0.0.0.OVGDP", "2000", "2024"),
            policy_rate: SeriesSpec::new("FM", "B.U2.EUR.4F.KR.MRR_FR.LEV", "2000-01", "2024-01"),
        }
    }
}

/// Check a period string matches `YYYY` or `YYYY-MM`.
pub fn validate_period(period: &str) -> Result<(), AppError> {
    let invalid = || AppError::usage(format!("Invalid period '{period}' (expected YYYY or YYYY-MM)."));

    match period.len() {
        4 if period.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        7 if period.as_bytes()[4] == b'-' && period[..4].bytes().all(|b| b.is_ascii_digit()) => {
            NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

fn year_of_period(period: &str) -> &str {
    period.get(..4).unwrap_or(period)
}

/// Parameters of one fetch call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    /// Value used to fill the series when the fetch fails.
    pub default_value: f64,
    /// Horizon in years.
    pub years: usize,
    /// Target monthly resolution (`years * 12` points) instead of one per year.
    pub monthly: bool,
}

impl FetchRequest {
    pub fn monthly(default_value: f64, years: usize) -> Self {
        Self {
            default_value,
            years,
            monthly: true,
        }
    }

    pub fn native(default_value: f64, years: usize) -> Self {
        Self {
            default_value,
            years,
            monthly: false,
        }
    }

    pub fn target_len(&self) -> usize {
        if self.monthly {
            self.years * 12
        } else {
            self.years
        }
    }

    pub fn default_series(&self) -> ObservationSeries {
        ObservationSeries::filled(self.default_value, self.target_len())
    }
}

/// How the orchestrator equalizes series of different lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LengthPolicy {
    /// Cut every series to the shortest one.
    Truncate,
    /// Extend every series to the longest one by repeating its last value.
    PadLast,
}

/// What the output gap becomes where potential GDP is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPotentialPolicy {
    /// Emit NaN at that position (counted and logged).
    Nan,
    /// Emit a zero gap at that position.
    Zero,
}

/// Rule parameters, months, defaults and policies for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub catalog: SeriesCatalog,
    /// Override for the API base URL (otherwise env / built-in default).
    pub base_url: Option<String>,

    pub equilibrium_rate: f64,
    pub target_inflation: f64,
    pub inflation_weight: f64,
    pub output_gap_weight: f64,

    pub years: usize,
    pub inflation_default: f64,
    pub policy_rate_default: f64,
    pub gdp_default: f64,
    pub potential_gdp_default: f64,

    /// Upsample GDP series to the monthly horizon before smoothing.
    pub upsample_gdp: bool,
    pub rolling_window: usize,
    pub length_policy: LengthPolicy,
    pub zero_potential: ZeroPotentialPolicy,
    /// Fetch the four inputs concurrently.
    pub parallel: bool,
    /// Accept GDP and potential GDP pointing at the same series.
    pub allow_shared_gdp_series: bool,

    /// First month of the synthetic chart axis.
    pub epoch: NaiveDate,
}

pub const DEFAULT_YEARS: usize = 24;
pub const DEFAULT_ROLLING_WINDOW: usize = 12;
pub const MAX_YEARS: usize = 1000;

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            catalog: SeriesCatalog::default(),
            base_url: None,
            equilibrium_rate: 1.0,
            target_inflation: 2.0,
            inflation_weight: 1.5,
            output_gap_weight: 0.5,
            years: DEFAULT_YEARS,
            inflation_default: 2.5,
            policy_rate_default: 2.0,
            gdp_default: 100.0,
            potential_gdp_default: 102.0,
            upsample_gdp: true,
            rolling_window: DEFAULT_ROLLING_WINDOW,
            length_policy: LengthPolicy::Truncate,
            zero_potential: ZeroPotentialPolicy::Nan,
            parallel: true,
            allow_shared_gdp_series: false,
            epoch: default_epoch(),
        }
    }
}

pub fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.years == 0 {
            return Err(AppError::usage("Years must be > 0."));
        }
        if self.years > MAX_YEARS {
            return Err(AppError::usage(format!("Years must be <= {MAX_YEARS} (got {}).", self.years)));
        }
        // The chart/export axis needs a month-end date for every position.
        let horizon_months = u32::try_from(self.monthly_len() + 1).unwrap_or(u32::MAX);
        if self.epoch.checked_add_months(Months::new(horizon_months)).is_none() {
            return Err(AppError::usage(format!(
                "Epoch {} plus {} years runs past the supported date range.",
                self.epoch.format("%Y-%m"),
                self.years
            )));
        }
        if self.rolling_window == 0 {
            return Err(AppError::usage("Rolling window must be >= 1."));
        }
        let numbers = [
            ("equilibrium rate", self.equilibrium_rate),
            ("target inflation", self.target_inflation),
            ("inflation weight", self.inflation_weight),
            ("output gap weight", self.output_gap_weight),
            ("inflation default", self.inflation_default),
            ("policy rate default", self.policy_rate_default),
            ("GDP default", self.gdp_default),
            ("potential GDP default", self.potential_gdp_default),
        ];
        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(AppError::usage(format!("Invalid {name}: {value} (must be finite).")));
            }
        }
        self.catalog.validate()?;

        if self.catalog.gdp_series_shared() && !self.allow_shared_gdp_series {
            return Err(AppError::usage(format!(
                "GDP and potential GDP both use series '{}'; the output gap would be identically zero. \
                 Pass distinct identifiers or --allow-shared-gdp-series.",
                self.catalog.gdp.identifier()
            )));
        }
        Ok(())
    }

    pub fn inflation_request(&self) -> FetchRequest {
        FetchRequest::monthly(self.inflation_default, self.years)
    }

    pub fn policy_rate_request(&self) -> FetchRequest {
        FetchRequest::monthly(self.policy_rate_default, self.years)
    }

    pub fn gdp_request(&self) -> FetchRequest {
        FetchRequest::native(self.gdp_default, self.years)
    }

    pub fn potential_gdp_request(&self) -> FetchRequest {
        FetchRequest::native(self.potential_gdp_default, self.years)
    }

    /// Monthly horizon length (`years * 12`).
    pub fn monthly_len(&self) -> usize {
        self.years * 12
    }
}

/// Four aligned series produced by one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub rates: ObservationSeries,
    pub inflation: ObservationSeries,
    pub output_gap: ObservationSeries,
    pub policy_rate: ObservationSeries,
    pub provenance: InputProvenance,
    /// Positions where potential GDP was exactly zero.
    pub zero_potential_positions: usize,
}

impl SimulationOutput {
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn periods_accept_year_and_month_forms() {
        assert!(validate_period("2000").is_ok());
        assert!(validate_period("2024-01").is_ok());
        assert!(validate_period("2024-13").is_err());
        assert!(validate_period("24-01").is_err());
        assert!(validate_period("2024/01").is_err());
        assert!(validate_period("").is_err());
    }

    #[test]
    fn request_target_len_depends_on_frequency() {
        assert_eq!(FetchRequest::monthly(2.5, 24).target_len(), 288);
        assert_eq!(FetchRequest::native(100.0, 24).target_len(), 24);
        let series = FetchRequest::monthly(2.0, 2).default_series();
        assert_eq!(series.len(), 24);
        assert!(series.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn catalog_window_uses_year_periods_for_gdp() {
        let catalog = SeriesCatalog::with_window(
            DEFAULT_INFLATION_SERIES,
            DEFAULT_GDP_SERIES,
            DEFAULT_POTENTIAL_GDP_SERIES,
            DEFAULT_POLICY_RATE_SERIES,
            "2010-06",
            "2020-03",
        )
        .unwrap();
        assert_eq!(catalog.inflation.start_period, "2010-06");
        assert_eq!(catalog.gdp.start_period, "2010");
        assert_eq!(catalog.potential_gdp.end_period, "2020");
        assert_eq!(catalog.policy_rate.identifier(), DEFAULT_POLICY_RATE_SERIES);
    }

    #[test]
    fn identifier_requires_flow_and_key() {
        assert!(SeriesSpec::parse_identifier("ICP", "2000", "2001").is_err());
        assert!(SeriesSpec::parse_identifier("/KEY", "2000", "2001").is_err());
        let spec = SeriesSpec::parse_identifier("FM/B.U2", "2000", "2001").unwrap();
        assert_eq!(spec.identifier(), "FM/B.U2");
    }

    #[test]
    fn shared_gdp_series_is_rejected_unless_allowed() {
        let mut config = SimulationConfig::default();
        config.catalog.potential_gdp = config.catalog.gdp.clone();
        assert_eq!(config.validate().unwrap_err().exit_code(), 2);

        config.allow_shared_gdp_series = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn horizon_must_fit_the_date_range() {
        let too_long = SimulationConfig {
            years: MAX_YEARS + 1,
            ..SimulationConfig::default()
        };
        assert_eq!(too_long.validate().unwrap_err().exit_code(), 2);

        let late_epoch = SimulationConfig {
            epoch: NaiveDate::MAX.with_day(1).unwrap(),
            ..SimulationConfig::default()
        };
        assert_eq!(late_epoch.validate().unwrap_err().exit_code(), 2);

        let max_horizon = SimulationConfig {
            years: MAX_YEARS,
            ..SimulationConfig::default()
        };
        assert!(max_horizon.validate().is_ok());
    }

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monthly_len(), 288);
        assert_eq!(config.epoch, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn resized_truncates_or_repeats_last() {
        let s = ObservationSeries::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(s.resized(2).values(), &[1.0, 2.0]);
        assert_eq!(s.resized(5).values(), &[1.0, 2.0, 3.0, 3.0, 3.0]);
        assert!(ObservationSeries::default().resized(1).values()[0].is_nan());
    }

    #[test]
    fn outcome_exposes_status() {
        let fetched = FetchOutcome::Fetched(ObservationSeries::new(vec![1.0]));
        assert_eq!(fetched.status(), InputStatus::Fetched);
        assert!(fetched.reason().is_none());

        let defaulted = FetchOutcome::Defaulted {
            series: ObservationSeries::filled(2.0, 3),
            reason: FetchFailure::NotFound,
        };
        assert!(defaulted.is_defaulted());
        assert_eq!(defaulted.series().len(), 3);
        assert_eq!(defaulted.status().label(), "default (series not found (HTTP 404))");
    }
}
