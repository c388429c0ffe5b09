//! World Bank API integration for the CPI inflation indicator.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```text
//! [ { "page": 1, "pages": 2, "per_page": 50, "total": 66, ... }, [ row, row, ... ] ]
//! ```
//!
//! On a bad request the envelope is a single element carrying a `message`
//! list instead, and when the query matches nothing the row list is `null`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::domain::{Country, RawObservation};
use crate::error::{AppError, DataError};

pub const DEFAULT_BASE_URL: &str = "https://api.worldbank.org/v2";
/// Annual consumer-price inflation, percent.
pub const INFLATION_INDICATOR: &str = "FP.CPI.TOTL.ZG";

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_PER_PAGE: u32 = 100;
const COUNTRIES_PER_PAGE: u32 = 400;
/// Upper bound on followed pages; the CPI range never needs more than a few.
const MAX_PAGES: u32 = 50;

/// Client settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct WorldBankConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub per_page: u32,
}

impl Default for WorldBankConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl WorldBankConfig {
    /// Read `INFLATIO_API_BASE`, `INFLATIO_TIMEOUT_SECS`, `INFLATIO_PER_PAGE`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(base) = lookup("INFLATIO_API_BASE") {
            let base = base.trim().trim_end_matches('/');
            if base.is_empty() {
                return Err(AppError::new(2, "INFLATIO_API_BASE is set but empty."));
            }
            config.base_url = base.to_string();
        }
        if let Some(raw) = lookup("INFLATIO_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| AppError::new(2, format!("Invalid INFLATIO_TIMEOUT_SECS '{raw}'.")))?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("INFLATIO_PER_PAGE") {
            config.per_page = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=1000).contains(n))
                .ok_or_else(|| AppError::new(2, format!("Invalid INFLATIO_PER_PAGE '{raw}'.")))?;
        }

        Ok(config)
    }
}

#[derive(Clone)]
pub struct WorldBankClient {
    client: Client,
    config: WorldBankConfig,
}

impl WorldBankClient {
    pub fn from_env() -> Result<Self, AppError> {
        Self::new(WorldBankConfig::from_env()?)
    }

    pub fn new(config: WorldBankConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Fetch annual inflation for `country_code` over `start_year..=end_year`.
    ///
    /// Rows come back in the API's order (most recent first); missing years
    /// are kept with `rate = None`.
    pub fn fetch_inflation(
        &self,
        country_code: &str,
        start_year: i32,
        end_year: i32,
    ) -> Result<InflationResponse, DataError> {
        let url = format!(
            "{}/country/{country_code}/indicator/{INFLATION_INDICATOR}",
            self.config.base_url
        );
        let query = [
            ("date", format!("{start_year}:{end_year}")),
            ("format", "json".to_string()),
            ("per_page", self.config.per_page.to_string()),
        ];

        log::info!("fetching {INFLATION_INDICATOR} for {country_code} {start_year}:{end_year}");
        let rows: Vec<ObservationRow> = self.fetch_pages(&url, &query)?;
        InflationResponse::from_rows(rows)
    }

    /// Fetch all countries, excluding regional/income aggregates, sorted by name.
    pub fn fetch_countries(&self) -> Result<Vec<Country>, DataError> {
        let url = format!("{}/country", self.config.base_url);
        let query = [
            ("format", "json".to_string()),
            ("per_page", COUNTRIES_PER_PAGE.to_string()),
        ];

        log::info!("fetching country list");
        let rows: Vec<CountryRow> = self.fetch_pages(&url, &query)?;
        Ok(crate::data::countries::countries_from_rows(rows))
    }

    fn fetch_pages<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DataError> {
        let mut rows = Vec::new();
        let mut page = 1u32;

        loop {
            let body = self.get_text(url, query, page)?;
            let (meta, mut batch) = parse_envelope::<T>(&body)?;
            rows.append(&mut batch);

            if page >= meta.pages || page >= MAX_PAGES {
                break;
            }
            log::debug!("{url}: page {page}/{} done, following", meta.pages);
            page += 1;
        }

        Ok(rows)
    }

    fn get_text(&self, url: &str, query: &[(&str, String)], page: u32) -> Result<String, DataError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .query(&[("page", page.to_string())])
            .send()
            .map_err(|e| DataError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DataError::Network(format!("status {}", resp.status())));
        }

        resp.text().map_err(|e| DataError::Network(e.to_string()))
    }
}

/// Paging metadata (first envelope element).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub page: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub pages: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub per_page: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub total: u32,
}

/// Split an envelope into its metadata and rows.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<(PageMeta, Vec<T>), DataError> {
    let parts: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| DataError::Malformed(format!("not a JSON array: {e}")))?;
    let mut parts = parts.into_iter();

    let head = parts
        .next()
        .ok_or_else(|| DataError::Malformed("empty envelope".to_string()))?;
    if let Some(message) = api_error_message(&head) {
        return Err(DataError::Api(message));
    }

    let meta: PageMeta = serde_json::from_value(head)
        .map_err(|e| DataError::Malformed(format!("invalid page metadata: {e}")))?;

    let rows = match parts.next() {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| DataError::Malformed(format!("invalid rows: {e}")))?,
    };

    Ok((meta, rows))
}

/// Inflation rows for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct InflationResponse {
    /// Display name reported alongside the rows, if any.
    pub country_name: Option<String>,
    pub observations: Vec<RawObservation>,
}

impl InflationResponse {
    fn from_rows(rows: Vec<ObservationRow>) -> Result<Self, DataError> {
        let country_name = rows
            .iter()
            .find_map(|r| r.country.as_ref())
            .map(|c| c.value.trim().to_string())
            .filter(|name| !name.is_empty());
        let observations = rows
            .into_iter()
            .map(ObservationRow::into_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            country_name,
            observations,
        })
    }
}

/// Parse one page of the inflation indicator.
pub fn parse_inflation_page(body: &str) -> Result<(PageMeta, InflationResponse), DataError> {
    let (meta, rows) = parse_envelope::<ObservationRow>(body)?;
    Ok((meta, InflationResponse::from_rows(rows)?))
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    date: String,
    value: Option<f64>,
    #[serde(default)]
    country: Option<NamedRef>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    #[serde(default)]
    value: String,
}

impl ObservationRow {
    fn into_raw(self) -> Result<RawObservation, DataError> {
        let year = self
            .date
            .trim()
            .parse::<i32>()
            .map_err(|_| DataError::Malformed(format!("invalid year '{}'", self.date)))?;
        Ok(RawObservation::new(year, self.value))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CountryRow {
    pub(crate) id: String,
    #[serde(rename = "iso2Code")]
    pub(crate) iso2_code: String,
    pub(crate) name: String,
    pub(crate) region: RegionRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegionRef {
    #[serde(default)]
    pub(crate) value: String,
}

fn api_error_message(head: &serde_json::Value) -> Option<String> {
    let messages = head.get("message")?.as_array()?;
    let parts: Vec<String> = messages
        .iter()
        .map(|m| {
            let key = m.get("key").and_then(|v| v.as_str()).unwrap_or("error");
            let value = m.get("value").and_then(|v| v.as_str()).unwrap_or("").trim();
            if value.is_empty() {
                key.to_string()
            } else {
                format!("{key}: {value}")
            }
        })
        .collect();
    Some(if parts.is_empty() {
        "unknown error".to_string()
    } else {
        parts.join("; ")
    })
}

/// The API is inconsistent about numbers vs numeric strings in metadata.
fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(u32),
        Str(String),
        Null(()),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse::<u32>().map_err(serde::de::Error::custom),
        NumOrStr::Null(()) => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const US_PAGE: &str = r#"[
        {"page":1,"pages":1,"per_page":100,"total":3,"sourceid":"2","lastupdated":"2025-07-01"},
        [
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"US","value":"United States"},"countryiso3code":"USA",
             "date":"2023","value":4.11633838374488,"unit":"","obs_status":"","decimal":1},
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"US","value":"United States"},"countryiso3code":"USA",
             "date":"2022","value":null,"unit":"","obs_status":"","decimal":1},
            {"indicator":{"id":"FP.CPI.TOTL.ZG","value":"Inflation, consumer prices (annual %)"},
             "country":{"id":"US","value":"United States"},"countryiso3code":"USA",
             "date":"2021","value":4.69785886363742,"unit":"","obs_status":"","decimal":1}
        ]
    ]"#;

    #[test]
    fn parses_observation_page() {
        let (meta, resp) = parse_inflation_page(US_PAGE).unwrap();
        let obs = resp.observations;
        assert_eq!(resp.country_name.as_deref(), Some("United States"));
        assert_eq!(meta.pages, 1);
        assert_eq!(meta.total, 3);
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0].year, 2023);
        assert!((obs[0].rate.unwrap() - 4.11633838374488).abs() < 1e-12);
        assert_eq!(obs[1], RawObservation::new(2022, None));
    }

    #[test]
    fn null_rows_are_empty() {
        let body = r#"[{"page":0,"pages":0,"per_page":"50","total":0}, null]"#;
        let (meta, resp) = parse_inflation_page(body).unwrap();
        assert_eq!(meta.per_page, 50);
        assert!(resp.observations.is_empty());
        assert_eq!(resp.country_name, None);
    }

    #[test]
    fn string_metadata_is_accepted() {
        let body = r#"[{"page":"2","pages":"3","per_page":"50","total":"120"}, []]"#;
        let (meta, _) = parse_inflation_page(body).unwrap();
        assert_eq!(meta, PageMeta { page: 2, pages: 3, per_page: 50, total: 120 });
    }

    #[test]
    fn error_envelope_maps_to_api_error() {
        let body = r#"[{"message":[{"id":"120","key":"Invalid value","value":"The provided parameter value is not valid"}]}]"#;
        let err = parse_inflation_page(body).unwrap_err();
        assert_eq!(
            err,
            DataError::Api("Invalid value: The provided parameter value is not valid".to_string())
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(parse_inflation_page("<html>"), Err(DataError::Malformed(_))));
        assert!(matches!(parse_inflation_page("[]"), Err(DataError::Malformed(_))));
        let bad_year = r#"[{"page":1,"pages":1}, [{"date":"20x1","value":1.0}]]"#;
        assert!(matches!(parse_inflation_page(bad_year), Err(DataError::Malformed(_))));
    }

    #[test]
    fn config_reads_overrides() {
        let config = WorldBankConfig::from_lookup(|key| match key {
            "INFLATIO_API_BASE" => Some("http://localhost:8080/v2/".to_string()),
            "INFLATIO_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.per_page, DEFAULT_PER_PAGE);

        let err = WorldBankConfig::from_lookup(|key| {
            (key == "INFLATIO_PER_PAGE").then(|| "0".to_string())
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
