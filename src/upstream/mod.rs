// src/upstream/mod.rs
//
// Thin client for the externally owned records API. Every request carries
// the `x-api-key` header; nothing is retried or cached here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{CallRecord, LoadRecord, Results};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Raw upstream answer: status and JSON body, both forwarded unchanged.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Filters for `GET /loads/search`. Absent filters are sent as empty strings.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoadSearch {
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub equipment_type: String,
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("reqwest build error: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET {base}/calls
    pub async fn calls(&self) -> Result<UpstreamResponse, AppError> {
        self.get("/calls", None).await
    }

    /// GET {base}/loads/search?origin=&destination=&equipment_type=
    pub async fn search_loads(&self, search: &LoadSearch) -> Result<UpstreamResponse, AppError> {
        self.get("/loads/search", Some(search)).await
    }

    pub async fn fetch_calls(&self) -> Result<Vec<CallRecord>, AppError> {
        decode_results(self.calls().await?)
    }

    pub async fn fetch_loads(&self, search: &LoadSearch) -> Result<Vec<LoadRecord>, AppError> {
        decode_results(self.search_loads(search).await?)
    }

    async fn get(&self, path: &str, search: Option<&LoadSearch>) -> Result<UpstreamResponse, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.http.get(&url).header(API_KEY_HEADER, &self.api_key);
        if let Some(search) = search {
            req = req.query(search);
        }

        let resp = req.send().await?;
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        tracing::debug!(path, status = status.as_u16(), "upstream responded");

        let bytes = resp.bytes().await?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::UpstreamBody(format!("{path}: {e}")))?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Decodes each row of `{ "results": [...] }` on its own. Rows that do not
/// match `T` are logged and skipped so one bad record cannot hide the rest.
fn decode_results<T: DeserializeOwned>(resp: UpstreamResponse) -> Result<Vec<T>, AppError> {
    if !resp.status.is_success() {
        return Err(AppError::UpstreamStatus(resp.status.as_u16()));
    }
    let envelope: Results<Value> =
        serde_json::from_value(resp.body).map_err(|e| AppError::UpstreamSchema(e.to_string()))?;

    let total = envelope.results.len();
    let rows: Vec<T> = envelope
        .results
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable upstream row");
                None
            }
        })
        .collect();

    if rows.len() < total {
        tracing::warn!(kept = rows.len(), total, "some upstream rows were skipped");
    }
    Ok(rows)
}
