use crate::core::flow::{Pending, Request, SessionFlow, Step};
use crate::domain::model::{Decision, HealthStatus, ProfileField};
use crate::domain::ports::RecommendationService;
use crate::utils::error::Result;

/// Drives a [`SessionFlow`] against a [`RecommendationService`].
///
/// Action methods return `Err` only when the action itself is rejected (wrong
/// phase, busy, invalid draft). Network failures are absorbed by the flow and
/// surface as a notice; see [`FlowController::take_notice`].
pub struct FlowController<S: RecommendationService> {
    flow: SessionFlow,
    service: S,
}

impl<S: RecommendationService> FlowController<S> {
    pub fn new(service: S) -> Self {
        Self {
            flow: SessionFlow::new(),
            service,
        }
    }

    pub fn flow(&self) -> &SessionFlow {
        &self.flow
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.flow.take_notice()
    }

    pub fn edit_field(&mut self, field: ProfileField, value: impl Into<String>) -> Result<()> {
        self.flow.edit(field, value)
    }

    /// Submits the draft; on success the first recommendation is fetched
    /// before this returns.
    pub async fn submit_profile(&mut self) -> Result<()> {
        let pending = self.flow.submit()?;
        self.run(pending).await;
        Ok(())
    }

    /// Records the decision for the current card and loads the next one.
    pub async fn advance(&mut self, decision: Decision) -> Result<()> {
        let pending = self.flow.decide(decision)?;
        self.run(pending).await;
        Ok(())
    }

    pub async fn retry(&mut self) -> Result<()> {
        let pending = self.flow.retry()?;
        self.run(pending).await;
        Ok(())
    }

    pub fn restart(&mut self) -> Result<()> {
        self.flow.restart()
    }

    pub async fn check_health(&self) -> Result<HealthStatus> {
        self.service.health().await
    }

    async fn run(&mut self, mut pending: Pending) {
        loop {
            match self.dispatch(pending).await {
                Step::Continue(next) => pending = next,
                Step::Idle | Step::Stale => break,
            }
        }
    }

    async fn dispatch(&mut self, pending: Pending) -> Step {
        let Pending { ticket, request } = pending;
        match request {
            Request::CreateProfile(payload) => {
                let outcome = self.service.create_profile(&payload).await;
                self.flow.on_profile_created(ticket, outcome)
            }
            Request::RecordInteraction(record) => {
                let outcome = self.service.record_interaction(&record).await;
                self.flow.on_interaction_recorded(ticket, outcome)
            }
            Request::NextRecommendation(session) => {
                let outcome = self.service.next_recommendation(&session).await;
                self.flow.on_next_recommendation(ticket, outcome)
            }
        }
    }
}
