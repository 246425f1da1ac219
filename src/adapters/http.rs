use crate::domain::model::{
    HealthStatus, InteractionRecord, NextRecommendation, ProfileCreated, ProfilePayload, SessionId,
};
use crate::domain::ports::{ConfigProvider, RecommendationService};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// reqwest-backed client for the recommendation service's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct HttpRecommendationService {
    base_url: Url,
    client: Client,
}

impl HttpRecommendationService {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        validate_url("backend_url", config.backend_url())?;
        let mut base_url =
            Url::parse(config.backend_url()).map_err(|e| ClientError::InvalidConfigValueError {
                field: "backend_url".to_string(),
                value: config.backend_url().to_string(),
                reason: e.to_string(),
            })?;

        // 確保 join 時保留原有路徑前綴
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::ConfigError {
                message: format!("Cannot build URL for '{}': {}", path, e),
            })
    }

    fn next_recommendation_url(&self, session: &SessionId) -> Result<Url> {
        let mut url = self.endpoint("api/next-recommendation")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::ConfigError {
                message: format!("Backend URL cannot be a base: {}", self.base_url),
            })?
            .push(session.as_str());
        Ok(url)
    }

    async fn ensure_success(operation: &str, response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("{} response status: {}", operation, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::ServiceError {
            operation: operation.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidResponse {
            operation: operation.to_string(),
            message: format!("{} (body: {})", e, body),
        })
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationService {
    async fn create_profile(&self, payload: &ProfilePayload) -> Result<ProfileCreated> {
        let url = self.endpoint("api/profile")?;
        tracing::debug!("Making API request to: POST {}", url);

        let response = self.client.post(url).json(payload).send().await?;
        let response = Self::ensure_success("create_profile", response).await?;
        Self::decode("create_profile", response).await
    }

    async fn next_recommendation(&self, session: &SessionId) -> Result<NextRecommendation> {
        let url = self.next_recommendation_url(session)?;
        tracing::debug!("Making API request to: GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success("next_recommendation", response).await?;
        Self::decode("next_recommendation", response).await
    }

    async fn record_interaction(&self, record: &InteractionRecord) -> Result<()> {
        let url = self.endpoint("api/interaction")?;
        tracing::debug!("Making API request to: POST {}", url);

        let response = self.client.post(url).json(record).send().await?;
        Self::ensure_success("record_interaction", response).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = self.endpoint("api/health")?;
        tracing::debug!("Making API request to: GET {}", url);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success("health", response).await?;
        Self::decode("health", response).await
    }
}
