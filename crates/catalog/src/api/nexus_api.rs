//! Nexus Mods API client
//!
//! This module wraps the two read-only endpoints the catalog needs:
//! - game information (including the full category taxonomy)
//! - mod information by game domain and numeric id
//!
//! Rate limit headers are recorded after every response so callers can report
//! them, but they never influence request pacing.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::common::{CatalogError, GameDomain, Result};

/// Longest response body echoed back inside an error message
const MAX_ECHOED_BODY: usize = 512;

/// Read-only metadata lookups the pipelines depend on
#[async_trait]
pub trait NexusMetadata: Send + Sync {
    /// Fetch game information, including its category taxonomy
    async fn game_info(&self, domain: &GameDomain) -> Result<NexusGame>;

    /// Fetch a single mod's metadata
    async fn mod_info(&self, domain: &GameDomain, mod_id: u64) -> Result<NexusMod>;
}

/// Nexus game information
#[derive(Debug, Clone, Deserialize)]
pub struct NexusGame {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub domain_name: Option<String>,
    #[serde(default)]
    pub categories: Vec<NexusCategory>,
}

/// One node of a game's category taxonomy
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NexusCategory {
    pub category_id: u32,
    pub name: String,
    /// Nexus sends `false` for top-level categories
    #[serde(default, deserialize_with = "deserialize_parent_category")]
    pub parent_category: Option<u32>,
}

/// Nexus mod information
///
/// Hidden or removed mods come back with most fields missing, so everything
/// is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NexusMod {
    pub mod_id: Option<u64>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub category_id: Option<u32>,
}

/// Treat `false`, `null`, `0` and missing as "no parent"
fn deserialize_parent_category<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
    .filter(|id| *id != 0))
}

/// Rate limit snapshot taken from the last response headers
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub daily_limit: u32,
    pub daily_remaining: u32,
    pub daily_reset: SystemTime,
    pub hourly_limit: u32,
    pub hourly_remaining: u32,
    pub hourly_reset: SystemTime,
}

impl RateLimitStatus {
    pub fn is_blocked(&self) -> bool {
        self.daily_remaining == 0 || self.hourly_remaining == 0
    }

    /// Format rate limit status for display
    pub fn format_status(&self) -> String {
        fn percent(remaining: u32, limit: u32) -> u32 {
            if limit == 0 {
                0
            } else {
                ((remaining as f64 / limit as f64) * 100.0) as u32
            }
        }

        format!(
            "Rate Limits - Daily: {}/{} ({}%) | Hourly: {}/{} ({}%){}",
            self.daily_remaining,
            self.daily_limit,
            percent(self.daily_remaining, self.daily_limit),
            self.hourly_remaining,
            self.hourly_limit,
            percent(self.hourly_remaining, self.hourly_limit),
            if self.is_blocked() { " [blocked]" } else { "" }
        )
    }

    /// Get time until reset as human-readable string
    pub fn time_until_reset(&self) -> String {
        let now = SystemTime::now();

        let daily_remaining_secs = self.daily_reset.duration_since(now)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let hourly_remaining_secs = self.hourly_reset.duration_since(now)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        format!(
            "Next reset: Hourly in {}m, Daily in {}h",
            hourly_remaining_secs / 60,
            daily_remaining_secs / 3600
        )
    }
}

/// Nexus API client
#[derive(Clone)]
pub struct NexusAPI {
    api_key: String,
    api_base: String,
    client: Client,
    rate_limit: Arc<Mutex<Option<RateLimitStatus>>>,
}

impl std::fmt::Debug for NexusAPI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NexusAPI")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl NexusAPI {
    /// Create a client from validated configuration
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
                field: None,
                suggestion: None,
            })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            client,
            rate_limit: Arc::new(Mutex::new(None)),
        })
    }

    pub fn game_url(&self, domain: &GameDomain) -> String {
        format!("{}/v1/games/{}.json", self.api_base, domain)
    }

    pub fn mod_url(&self, domain: &GameDomain, mod_id: u64) -> String {
        format!("{}/v1/games/{}/mods/{}.json", self.api_base, domain, mod_id)
    }

    /// Get game information from Nexus API
    pub async fn get_game(&self, domain: &GameDomain) -> Result<NexusGame> {
        let url = self.game_url(domain);
        let game: NexusGame = self.get_json(&url).await?;
        debug!("Nexus game {} has {} categories", domain, game.categories.len());
        Ok(game)
    }

    /// Get mod information from Nexus API
    pub async fn get_mod(&self, domain: &GameDomain, mod_id: u64) -> Result<NexusMod> {
        let url = self.mod_url(domain, mod_id);
        self.get_json(&url).await
    }

    /// Get current rate limit information
    pub fn rate_limit_status(&self) -> Option<RateLimitStatus> {
        self.rate_limit.lock().ok().and_then(|guard| guard.clone())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self.create_authenticated_request(url);
        let response = self.execute_request(url, request).await?;

        let response_text = response.text().await
            .map_err(|e| CatalogError::from_reqwest(url, e))?;

        debug!("Nexus API response body: {}", response_text);

        serde_json::from_str(&response_text).map_err(|e| {
            let mut echoed: String = response_text.chars().take(MAX_ECHOED_BODY).collect();
            if echoed.len() < response_text.len() {
                echoed.push_str("...");
            }
            CatalogError::InvalidResponse {
                url: url.to_string(),
                message: format!("{} - Response was: {}", e, echoed),
            }
        })
    }

    /// Create an authenticated request with proper headers
    fn create_authenticated_request(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header("apikey", &self.api_key)
            .header("Application-Name", "catalog")
            .header("Application-Version", env!("CARGO_PKG_VERSION"))
    }

    /// Execute request and update rate limit information
    async fn execute_request(&self, url: &str, request: RequestBuilder) -> Result<reqwest::Response> {
        debug!("Nexus API request: GET {}", url);
        let response = request.send().await
            .map_err(|e| CatalogError::from_reqwest(url, e))?;
        debug!("Nexus API response: {} for {}", response.status(), url);

        self.update_rate_limit_from_headers(&response);

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Update rate limit information from response headers
    fn update_rate_limit_from_headers(&self, response: &reqwest::Response) {
        let headers = response.headers();
        let header_u32 = |name: &str| parse_header::<u32>(headers, name);
        let header_u64 = |name: &str| parse_header::<u64>(headers, name);

        // Only non-Nexus servers omit these entirely; leave the last snapshot alone then
        if header_u32("x-rl-hourly-remaining").is_none() && header_u32("x-rl-daily-remaining").is_none() {
            return;
        }

        let daily_limit = header_u32("x-rl-daily-limit").unwrap_or(2400);
        let daily_remaining = header_u32("x-rl-daily-remaining").unwrap_or(daily_limit);
        let hourly_limit = header_u32("x-rl-hourly-limit").unwrap_or(100);
        let hourly_remaining = header_u32("x-rl-hourly-remaining").unwrap_or(hourly_limit);

        let daily_reset = header_u64("x-rl-daily-reset")
            .map(|ts| UNIX_EPOCH + Duration::from_secs(ts))
            .unwrap_or_else(|| SystemTime::now() + Duration::from_secs(24 * 3600));
        let hourly_reset = header_u64("x-rl-hourly-reset")
            .map(|ts| UNIX_EPOCH + Duration::from_secs(ts))
            .unwrap_or_else(|| SystemTime::now() + Duration::from_secs(3600));

        debug!("Rate limit updated: daily {}/{}, hourly {}/{}",
               daily_remaining, daily_limit, hourly_remaining, hourly_limit);

        if let Ok(mut guard) = self.rate_limit.lock() {
            *guard = Some(RateLimitStatus {
                daily_limit,
                daily_remaining,
                daily_reset,
                hourly_limit,
                hourly_remaining,
                hourly_reset,
            });
        }
    }
}

/// Header value parsed as `T`; absent, non-numeric and out-of-range values are `None`
fn parse_header<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl NexusMetadata for NexusAPI {
    async fn game_info(&self, domain: &GameDomain) -> Result<NexusGame> {
        self.get_game(domain).await
    }

    async fn mod_info(&self, domain: &GameDomain, mod_id: u64) -> Result<NexusMod> {
        self.get_mod(domain, mod_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> NexusAPI {
        let config = CatalogConfig::builder()
            .api_key("test_api_key_123")
            .api_base(server.uri())
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        NexusAPI::new(&config).unwrap()
    }

    fn skyrim() -> GameDomain {
        GameDomain::parse("skyrimspecialedition").unwrap()
    }

    #[tokio::test]
    async fn test_get_game_parses_categories() {
        let mock_server = MockServer::start().await;

        let game_response = r#"{
            "id": 1704,
            "name": "Skyrim Special Edition",
            "domain_name": "skyrimspecialedition",
            "categories": [
                {"category_id": 1, "name": "Skyrim Special Edition", "parent_category": false},
                {"category_id": 5, "name": "Weapons", "parent_category": 1},
                {"category_id": 7, "name": "Armour", "parent_category": null}
            ]
        }"#;

        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition.json"))
            .and(header("apikey", "test_api_key_123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(game_response)
                    .insert_header("content-type", "application/json")
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        let game = api.get_game(&skyrim()).await.unwrap();

        assert_eq!(game.id, Some(1704));
        assert_eq!(game.categories.len(), 3);
        assert_eq!(game.categories[0].parent_category, None);
        assert_eq!(game.categories[1].parent_category, Some(1));
        assert_eq!(game.categories[2].parent_category, None);
    }

    #[tokio::test]
    async fn test_get_game_without_categories_defaults_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/games/fallout4.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id": 1151, "name": "Fallout 4"}"#))
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        let game = api.get_game(&GameDomain::parse("fallout4").unwrap()).await.unwrap();
        assert!(game.categories.is_empty());
    }

    #[tokio::test]
    async fn test_get_mod_with_sparse_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition/mods/42.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"name": "Test Mod X", "summary": "", "category_id": 5}"#)
            )
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        let mod_info = api.get_mod(&skyrim(), 42).await.unwrap();

        assert_eq!(mod_info.name.as_deref(), Some("Test Mod X"));
        assert_eq!(mod_info.summary.as_deref(), Some(""));
        assert_eq!(mod_info.category_id, Some(5));
        assert_eq!(mod_info.mod_id, None);
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition/mods/404.json"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message": "No Mod Found"}"#))
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        match api.get_mod(&skyrim(), 404).await {
            Err(CatalogError::HttpStatus { status, url }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/v1/games/skyrimspecialedition/mods/404.json"));
            }
            other => panic!("Expected HttpStatus error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        match api.get_game(&skyrim()).await {
            Err(CatalogError::InvalidResponse { message, .. }) => assert!(message.contains("maintenance")),
            other => panic!("Expected InvalidResponse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_headers_are_recorded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition/mods/1.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"name": "One"}"#)
                    .insert_header("x-rl-daily-limit", "2400")
                    .insert_header("x-rl-daily-remaining", "2350")
                    .insert_header("x-rl-hourly-limit", "100")
                    .insert_header("x-rl-hourly-remaining", "95")
                    .insert_header("x-rl-daily-reset", "1234567890")
                    .insert_header("x-rl-hourly-reset", "1234567890")
            )
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        assert!(api.rate_limit_status().is_none());

        api.get_mod(&skyrim(), 1).await.unwrap();

        let status = api.rate_limit_status().unwrap();
        assert_eq!(status.daily_remaining, 2350);
        assert_eq!(status.hourly_remaining, 95);
        assert!(!status.is_blocked());
        assert!(status.format_status().contains("Hourly: 95/100 (95%)"));
    }

    #[tokio::test]
    async fn test_oversized_rate_limit_headers_fall_back_to_defaults() {
        let mock_server = MockServer::start().await;

        // 2^32 + 5 would truncate to 5 if narrowed with `as u32`
        Mock::given(method("GET"))
            .and(path("/v1/games/skyrimspecialedition/mods/1.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"name": "One"}"#)
                    .insert_header("x-rl-daily-limit", "4294967301")
                    .insert_header("x-rl-daily-remaining", "2350")
                    .insert_header("x-rl-hourly-limit", "100")
                    .insert_header("x-rl-hourly-remaining", "4294967301")
            )
            .mount(&mock_server)
            .await;

        let api = api_for(&mock_server);
        api.get_mod(&skyrim(), 1).await.unwrap();

        let status = api.rate_limit_status().unwrap();
        assert_eq!(status.daily_limit, 2400);
        assert_eq!(status.daily_remaining, 2350);
        assert_eq!(status.hourly_limit, 100);
        assert_eq!(status.hourly_remaining, 100);
        assert!(!status.is_blocked());
    }

    #[test]
    fn test_parent_category_variants() {
        let parse = |json: &str| serde_json::from_str::<NexusCategory>(json).unwrap().parent_category;

        assert_eq!(parse(r#"{"category_id": 2, "name": "A", "parent_category": false}"#), None);
        assert_eq!(parse(r#"{"category_id": 2, "name": "A", "parent_category": 0}"#), None);
        assert_eq!(parse(r#"{"category_id": 2, "name": "A"}"#), None);
        assert_eq!(parse(r#"{"category_id": 2, "name": "A", "parent_category": 9}"#), Some(9));
        assert_eq!(parse(r#"{"category_id": 2, "name": "A", "parent_category": "9"}"#), Some(9));
    }

    #[test]
    fn test_blocked_status_format() {
        let status = RateLimitStatus {
            daily_limit: 2400,
            daily_remaining: 100,
            daily_reset: SystemTime::now() + Duration::from_secs(3600),
            hourly_limit: 100,
            hourly_remaining: 0,
            hourly_reset: SystemTime::now() + Duration::from_secs(300),
        };

        assert!(status.is_blocked());
        assert!(status.format_status().ends_with("[blocked]"));
        assert!(status.time_until_reset().starts_with("Next reset: Hourly in"));
    }
}
