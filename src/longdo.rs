//! Longdo Map HTTP adapter: driving routes and place search.

use serde::Deserialize;
use tracing::debug;

use crate::place::{GeoPoint, Path, PlaceSuggestion};
use crate::traits::{PlaceSearch, RouteLeg, RoutingError, RoutingService, SearchError};

/// Suggest requests below this keyword length return an empty list
/// without touching the network.
pub const MIN_SUGGEST_KEYWORD_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct LongdoConfig {
    pub route_base_url: String,
    pub search_base_url: String,
    pub api_key: String,
    /// Travel mode; "d" is driving.
    pub mode: String,
    /// Longdo route type bitmask.
    pub route_type: u32,
    pub locale: String,
    /// Optional province area code to scope search suggestions.
    pub search_area: Option<u32>,
    pub search_limit: u32,
    pub timeout_secs: u64,
}

impl Default for LongdoConfig {
    fn default() -> Self {
        Self {
            route_base_url: "https://api.longdo.com".to_string(),
            search_base_url: "https://search.longdo.com".to_string(),
            api_key: String::new(),
            mode: "d".to_string(),
            route_type: 25,
            locale: "th".to_string(),
            search_area: None,
            search_limit: 10,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LongdoClient {
    config: LongdoConfig,
    client: reqwest::blocking::Client,
}

impl LongdoClient {
    pub fn new(config: LongdoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RoutingService for LongdoClient {
    fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, RoutingError> {
        let url = format!(
            "{}/RouteService/json/route/guide?flon={:.6}&flat={:.6}&tlon={:.6}&tlat={:.6}&mode={}&type={}&locale={}&key={}",
            self.config.route_base_url,
            from.lon,
            from.lat,
            to.lon,
            to.lat,
            self.config.mode,
            self.config.route_type,
            self.config.locale,
            self.config.api_key,
        );

        debug!(?from, ?to, "requesting route leg");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status));
        }

        let body: RouteGuideResponse = response.json()?;
        let leg = body
            .data
            .into_iter()
            .next()
            .ok_or(RoutingError::EmptyResponse)?;

        Ok(RouteLeg {
            distance_m: leg.distance,
            duration_secs: leg.interval,
            path: Path::new(
                leg.path
                    .into_iter()
                    .map(|point| GeoPoint::new(point.lat, point.lon))
                    .collect(),
            ),
            guide: body.guide.into_iter().map(|entry| entry.text).collect(),
        })
    }
}

impl PlaceSearch for LongdoClient {
    fn suggest(&self, keyword: &str) -> Result<Vec<PlaceSuggestion>, SearchError> {
        if keyword.chars().count() < MIN_SUGGEST_KEYWORD_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/mapsearch/json/suggest", self.config.search_base_url);
        let limit = self.config.search_limit.to_string();
        let mut query: Vec<(&str, String)> = vec![
            ("keyword", keyword.to_string()),
            ("limit", limit),
            ("key", self.config.api_key.clone()),
        ];
        if let Some(area) = self.config.search_area {
            query.push(("area", area.to_string()));
        }

        debug!(keyword, "requesting place suggestions");

        let response = self.client.get(url).query(&query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body: SuggestResponse = response.json()?;
        Ok(body
            .data
            .into_iter()
            .map(|entry| PlaceSuggestion {
                name: entry.w,
                description: entry.d,
                lat: entry.lat,
                lon: entry.lon,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct RouteGuideResponse {
    #[serde(default)]
    data: Vec<RouteGuideLeg>,
    #[serde(default)]
    guide: Vec<GuideEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteGuideLeg {
    /// Meters.
    #[serde(default)]
    distance: f64,
    /// Seconds.
    #[serde(default)]
    interval: f64,
    #[serde(default)]
    path: Vec<WirePoint>,
}

#[derive(Debug, Deserialize)]
struct WirePoint {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct GuideEntry {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    data: Vec<SuggestEntry>,
}

#[derive(Debug, Deserialize)]
struct SuggestEntry {
    #[serde(default)]
    w: String,
    #[serde(default)]
    d: String,
    lat: Option<f64>,
    lon: Option<f64>,
}
