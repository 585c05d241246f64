//! JSON-over-HTTP client for the compute gateway.
//!
//! Endpoints (relative to the configured base URL):
//!
//! - `POST /v1/auth/token`  service-account exchange, returns a bearer token
//! - `GET  /v1/bands?dataset=ID`
//! - `GET  /v1/extent?dataset=ID`  first/last `system:time_start` in ms
//! - `POST /v1/maps`  monthly single-band tile layer
//! - `POST /v1/reductions`  region statistic

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use metrics::counter;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::credentials::ServiceAccount;
use crate::error::ComputeError;
use crate::service::ComputeService;
use crate::types::{LayerRequest, ReductionRequest, TileLayer, TimeExtent};

/// Connection settings for [`HttpComputeService`].
#[derive(Debug, Clone)]
pub struct HttpComputeConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Attribution attached to tile layers
    pub attribution: String,
}

impl Default for HttpComputeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            request_timeout: Duration::from_secs(60),
            attribution: "Google Earth Engine / ERA5-Land".to_string(),
        }
    }
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

pub struct HttpComputeService {
    client: Client,
    config: HttpComputeConfig,
    credentials: Option<ServiceAccount>,
    token: RwLock<Option<CachedToken>>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_email: &'a str,
    project_id: &'a str,
    private_key_id: &'a str,
    private_key: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct BandsResponse {
    bands: Vec<String>,
}

#[derive(Deserialize)]
struct ExtentResponse {
    start_ms: i64,
    end_ms: i64,
}

#[derive(Serialize)]
struct MapRequestBody<'a> {
    dataset: &'a str,
    band: &'a str,
    start: String,
    end: String,
    min: f64,
    max: f64,
    palette: Vec<String>,
}

#[derive(Deserialize)]
struct MapResponse {
    url_format: String,
    #[serde(default)]
    attribution: Option<String>,
}

#[derive(Deserialize)]
struct ReductionResponse {
    value: Option<f64>,
}

impl HttpComputeService {
    pub fn new(
        config: HttpComputeConfig,
        credentials: Option<ServiceAccount>,
    ) -> Result<Self, ComputeError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self {
            client,
            config: HttpComputeConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            credentials,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Bearer token, refreshed a minute before expiry.
    async fn bearer_token(&self) -> Result<Option<String>, ComputeError> {
        let Some(account) = &self.credentials else {
            return Ok(None);
        };

        {
            let guard = self.token.read().await;
            if let Some(cached) = guard.as_ref() {
                if Instant::now() < cached.expires_at {
                    return Ok(Some(cached.token.clone()));
                }
            }
        }

        let mut guard = self.token.write().await;
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(Some(cached.token.clone()));
            }
        }

        let response = self
            .client
            .post(self.url("/v1/auth/token"))
            .json(&TokenRequest {
                client_email: &account.client_email,
                project_id: &account.project_id,
                private_key_id: &account.private_key_id,
                private_key: &account.private_key,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ComputeError::Auth(format!(
                "token exchange returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ComputeError::Auth(format!("malformed token response: {}", e)))?;

        let lifetime = Duration::from_secs(token.expires_in.saturating_sub(60).max(1));
        debug!(
            client_email = %account.client_email,
            lifetime_secs = lifetime.as_secs(),
            "Compute service token refreshed"
        );

        *guard = Some(CachedToken {
            token: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(Some(token.access_token))
    }

    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Response, ComputeError> {
        counter!("compute_requests_total", "endpoint" => endpoint).increment(1);

        let request = match self.bearer_token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(response);
        }

        counter!("compute_errors_total", "endpoint" => endpoint).increment(1);
        let message = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Force a token refresh on the next call.
            *self.token.write().await = None;
            return Err(ComputeError::Auth(format!("HTTP {}", status.as_u16())));
        }
        Err(ComputeError::Http {
            status: status.as_u16(),
            message,
        })
    }

    fn not_found(status: StatusCode, what: &str) -> Result<(), ComputeError> {
        if status == StatusCode::NOT_FOUND {
            return Err(ComputeError::Http {
                status: 404,
                message: format!("{} not found", what),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ComputeService for HttpComputeService {
    #[instrument(skip(self))]
    async fn band_names(&self, dataset_id: &str) -> Result<Vec<String>, ComputeError> {
        let request = self
            .client
            .get(self.url("/v1/bands"))
            .query(&[("dataset", dataset_id)]);
        let response = self.send("bands", request).await?;
        Self::not_found(response.status(), dataset_id)?;

        let body: BandsResponse = response.json().await?;
        Ok(body.bands)
    }

    #[instrument(skip(self))]
    async fn time_extent(&self, dataset_id: &str) -> Result<TimeExtent, ComputeError> {
        let request = self
            .client
            .get(self.url("/v1/extent"))
            .query(&[("dataset", dataset_id)]);
        let response = self.send("extent", request).await?;
        Self::not_found(response.status(), dataset_id)?;

        let body: ExtentResponse = response.json().await?;
        let to_utc = |ms: i64| {
            Utc.timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| ComputeError::InvalidResponse(format!("bad timestamp {}", ms)))
        };

        Ok(TimeExtent {
            start: to_utc(body.start_ms)?,
            end: to_utc(body.end_ms)?,
        })
    }

    #[instrument(skip(self, request), fields(band = %request.band, month = %request.month))]
    async fn month_layer(&self, request: &LayerRequest) -> Result<TileLayer, ComputeError> {
        let (start, end) = request.month.date_range();
        let body = MapRequestBody {
            dataset: &request.dataset_id,
            band: &request.band,
            start: start.to_string(),
            end: end.to_string(),
            min: request.vis.min,
            max: request.vis.max,
            palette: request.vis.palette_hex(),
        };

        let response = self
            .send("maps", self.client.post(self.url("/v1/maps")).json(&body))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ComputeError::NoData {
                band: request.band.clone(),
                month: request.month.to_string(),
            });
        }

        let map: MapResponse = response.json().await?;
        Ok(TileLayer {
            url_template: map.url_format,
            attribution: map
                .attribution
                .unwrap_or_else(|| self.config.attribution.clone()),
        })
    }

    #[instrument(skip(self, request), fields(band = %request.band, reducer = ?request.reducer))]
    async fn reduce_region(&self, request: &ReductionRequest) -> Result<Option<f64>, ComputeError> {
        let response = self
            .send(
                "reductions",
                self.client.post(self.url("/v1/reductions")).json(request),
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: ReductionResponse = response.json().await?;
        Ok(body.value.filter(|v| v.is_finite()))
    }
}
