use crate::domain::model::{
    HealthStatus, InteractionRecord, NextRecommendation, ProfileCreated, ProfilePayload, SessionId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn backend_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

/// The remote recommendation service the session flow talks to.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn create_profile(&self, payload: &ProfilePayload) -> Result<ProfileCreated>;
    async fn next_recommendation(&self, session: &SessionId) -> Result<NextRecommendation>;
    async fn record_interaction(&self, record: &InteractionRecord) -> Result<()>;
    async fn health(&self) -> Result<HealthStatus>;
}
