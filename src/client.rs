//! REST client for the soutenance platform backend.
//!
//! All endpoints go through one configured base URL; the bearer token is
//! attached when present. No automatic retry anywhere: failed requests
//! surface their error and the user decides whether to re-run the command.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::Settings;
use crate::models::{AnalysisResult, RawAnalysis};

/// API failure taxonomy.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{0}'")]
    BaseUrl(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("authentication required or token rejected")]
    Unauthorized,
    #[error("server error (HTTP {status}): {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    Parse(String),
}

/// HTTP client for plagiarism analysis endpoints.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    reanalyze_delay: Duration,
}

impl ApiClient {
    /// Build a client from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.api.base_url)
            .map_err(|_| ApiError::BaseUrl(settings.api.base_url.clone()))?;
        let http = Client::builder()
            .timeout(settings.timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ApiError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: settings.auth.token.clone(),
            reanalyze_delay: settings.reanalyze_delay(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|_| ApiError::BaseUrl(format!("{}{}", self.base_url, path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        check_status(response).await
    }

    /// Fetch and normalize one analysis.
    pub async fn get_analysis(&self, analysis_id: i64) -> Result<AnalysisResult, ApiError> {
        let url = self.endpoint(&format!("/api/plagiat/analysis/{analysis_id}"))?;
        debug!(%url, "fetching analysis");

        let response = self.send(self.http.get(url)).await?;
        let raw: RawAnalysis = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(AnalysisResult::from_raw(raw, analysis_id))
    }

    /// Trigger a reanalysis of a rapport.
    ///
    /// Fire-and-forget from the client's perspective: the backend starts the
    /// analysis and returns immediately.
    pub async fn trigger_reanalysis(&self, rapport_id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/plagiat/analyze/{rapport_id}"))?;
        info!(rapport_id, "triggering reanalysis");
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    /// Trigger a reanalysis, wait the configured delay, then re-fetch.
    ///
    /// The fixed pause mirrors how the platform UI refreshes after a
    /// reanalysis; there is no polling loop.
    pub async fn reanalyze_and_fetch(
        &self,
        rapport_id: i64,
        analysis_id: i64,
    ) -> Result<AnalysisResult, ApiError> {
        self.trigger_reanalysis(rapport_id).await?;
        tokio::time::sleep(self.reanalyze_delay).await;
        self.get_analysis(analysis_id).await
    }

    /// Download the source rapport PDF.
    pub async fn fetch_rapport_pdf(&self, rapport_id: i64) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&format!("/api/jury/rapports/{rapport_id}/view"))?;
        debug!(%url, "downloading rapport PDF");

        let response = self.send(self.http.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Generate and download the plagiarism report PDF for an analysis.
    pub async fn generate_report(&self, analysis_id: i64) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint(&format!("/api/plagiat/generate-report/{analysis_id}"))?;
        info!(analysis_id, "generating plagiarism report");

        let response = self.send(self.http.post(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Map a non-success response to an `ApiError`.
///
/// The backend usually reports failures as `{"error": "..."}`; that message
/// is surfaced when present, with a generic fallback otherwise.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message: extract_error_message(&body),
    })
}

/// Pull the server-provided message out of an error body.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    "Erreur serveur".to_string()
}
