use std::time::Duration;

use copydesk_logging::{desk_debug, desk_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::map_reqwest_error;
use crate::{
    AddAuthorRequest, ApiError, AuthorsResponse, PipelineResultResponse, PipelineStartRequest,
    PipelineStartResponse, PipelineStatusResponse, TitlesRequest, TitlesResponse, VoicesResponse,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Service origin, e.g. `http://localhost:8000`. Paths are appended verbatim.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_millis(20_000),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The pipeline service as seen by the client. One request per call:
/// no retries, caching or batching.
#[async_trait::async_trait]
pub trait PipelineApi: Send + Sync {
    async fn generate_titles(&self, request: &TitlesRequest) -> Result<TitlesResponse, ApiError>;
    async fn list_authors(&self) -> Result<AuthorsResponse, ApiError>;
    async fn add_author(&self, request: &AddAuthorRequest) -> Result<AuthorsResponse, ApiError>;
    async fn list_voices(&self, author: &str) -> Result<VoicesResponse, ApiError>;
    async fn start_pipeline(
        &self,
        request: &PipelineStartRequest,
    ) -> Result<PipelineStartResponse, ApiError>;
    async fn pipeline_status(&self, job_id: &str) -> Result<PipelineStatusResponse, ApiError>;
    async fn pipeline_result(&self, job_id: &str) -> Result<PipelineResultResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let base = self.settings.base_url.trim().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|err| ApiError::InvalidUrl(format!("{base}{path}: {err}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        desk_debug!("GET {}", url);
        self.execute(self.client.get(url)).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path, &[])?;
        let payload = serde_json::to_vec(body).map_err(|err| ApiError::Decode(err.to_string()))?;
        desk_debug!("POST {} ({} bytes)", url, payload.len());
        self.execute(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(payload),
        )
        .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }

        if !status.is_success() {
            let err = ApiError::from_error_body(status.as_u16(), &body);
            desk_warn!("pipeline service error: {}", err);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait::async_trait]
impl PipelineApi for ReqwestApi {
    async fn generate_titles(&self, request: &TitlesRequest) -> Result<TitlesResponse, ApiError> {
        self.post_json("/api/p0/titles", request).await
    }

    async fn list_authors(&self) -> Result<AuthorsResponse, ApiError> {
        self.get_json("/api/authors", &[]).await
    }

    async fn add_author(&self, request: &AddAuthorRequest) -> Result<AuthorsResponse, ApiError> {
        self.post_json("/api/authors", request).await
    }

    async fn list_voices(&self, author: &str) -> Result<VoicesResponse, ApiError> {
        self.get_json("/api/voices", &[("author", author)]).await
    }

    async fn start_pipeline(
        &self,
        request: &PipelineStartRequest,
    ) -> Result<PipelineStartResponse, ApiError> {
        self.post_json("/api/pipeline/start", request).await
    }

    async fn pipeline_status(&self, job_id: &str) -> Result<PipelineStatusResponse, ApiError> {
        self.get_json("/api/pipeline/status", &[("job_id", job_id)])
            .await
    }

    async fn pipeline_result(&self, job_id: &str) -> Result<PipelineResultResponse, ApiError> {
        self.get_json("/api/pipeline/result", &[("job_id", job_id)])
            .await
    }
}
