use crate::domain::model::{
    Decision, InteractionRecord, NextRecommendation, ProfileCreated, ProfileDraft, ProfileField,
    ProfilePayload, Recommendation, SessionId,
};
use crate::utils::error::{ClientError, Result};
use std::collections::HashSet;

/// What the recommendation area of the browsing screen currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Loading,
    Showing(Recommendation),
    Exhausted { message: String },
    /// 取得下一張卡片失敗，等待使用者重試
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Browsing {
    session: SessionId,
    card: Card,
    liked: Vec<Recommendation>,
    acted: HashSet<String>,
    shown: usize,
}

impl Browsing {
    fn new(session: SessionId) -> Self {
        Self {
            session,
            card: Card::Loading,
            liked: Vec::new(),
            acted: HashSet::new(),
            shown: 0,
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn current(&self) -> Option<&Recommendation> {
        match &self.card {
            Card::Showing(recommendation) => Some(recommendation),
            _ => None,
        }
    }

    pub fn liked(&self) -> &[Recommendation] {
        &self.liked
    }

    /// Number of cards displayed so far in this session.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.card, Card::Exhausted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Capturing { draft: ProfileDraft },
    Browsing(Browsing),
}

impl FlowState {
    fn describe(&self) -> &'static str {
        match self {
            FlowState::Capturing { .. } => "capturing the profile",
            FlowState::Browsing(browsing) => match browsing.card {
                Card::Loading => "loading a recommendation",
                Card::Showing(_) => "showing a recommendation",
                Card::Exhausted { .. } => "recommendations are exhausted",
                Card::Unavailable => "the next recommendation is unavailable",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    CreateProfile,
    RecordInteraction(Decision),
    NextRecommendation,
}

/// Identifies one in-flight request. A completion is applied only when it
/// presents the ticket the flow is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    serial: u64,
    kind: RequestKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateProfile(ProfilePayload),
    NextRecommendation(SessionId),
    RecordInteraction(InteractionRecord),
}

/// A request the flow wants executed, together with the ticket its
/// completion must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub ticket: Ticket,
    pub request: Request,
}

/// Result of feeding a completion back into the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Idle,
    Continue(Pending),
    Stale,
}

/// Client-side session state machine.
///
/// All mutation goes through the action handlers (`edit`, `submit`, `decide`,
/// `retry`, `restart`) and the completion handlers (`on_*`). Action handlers
/// that need the network return a [`Pending`] request instead of performing I/O;
/// the caller executes it and reports the outcome with the matching ticket.
#[derive(Debug, Clone)]
pub struct SessionFlow {
    state: FlowState,
    in_flight: Option<Ticket>,
    next_serial: u64,
    notice: Option<String>,
}

impl Default for SessionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Capturing {
                draft: ProfileDraft::default(),
            },
            in_flight: None,
            next_serial: 0,
            notice: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        match &self.state {
            FlowState::Capturing { draft } => Some(draft),
            FlowState::Browsing(_) => None,
        }
    }

    pub fn browsing(&self) -> Option<&Browsing> {
        match &self.state {
            FlowState::Browsing(browsing) => Some(browsing),
            FlowState::Capturing { .. } => None,
        }
    }

    pub fn session(&self) -> Option<&SessionId> {
        self.browsing().map(Browsing::session)
    }

    pub fn current(&self) -> Option<&Recommendation> {
        self.browsing().and_then(Browsing::current)
    }

    pub fn liked(&self) -> &[Recommendation] {
        self.browsing().map(Browsing::liked).unwrap_or(&[])
    }

    /// Message left by the last failed call, for a notification layer to show.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn edit(&mut self, field: ProfileField, value: impl Into<String>) -> Result<()> {
        if let FlowState::Capturing { draft } = &mut self.state {
            draft.set(field, value);
            return Ok(());
        }
        Err(self.invalid("edit"))
    }

    pub fn submit(&mut self) -> Result<Pending> {
        self.ensure_idle("submit")?;
        let payload = match &self.state {
            FlowState::Capturing { draft } => draft.to_payload()?,
            FlowState::Browsing(_) => return Err(self.invalid("submit")),
        };

        tracing::info!("📝 Submitting profile");
        Ok(self.issue(RequestKind::CreateProfile, Request::CreateProfile(payload)))
    }

    pub fn on_profile_created(
        &mut self,
        ticket: Ticket,
        outcome: Result<ProfileCreated>,
    ) -> Step {
        if !self.accept(ticket, RequestKind::CreateProfile) {
            return Step::Stale;
        }

        match outcome {
            Ok(created) => {
                tracing::info!("✅ Profile created, session {}", created.user_id);
                let session = created.user_id;
                self.state = FlowState::Browsing(Browsing::new(session.clone()));
                Step::Continue(self.issue(
                    RequestKind::NextRecommendation,
                    Request::NextRecommendation(session),
                ))
            }
            Err(e) => {
                tracing::error!("❌ Failed to create profile: {}", e);
                self.notice = Some(notice_for(&e));
                Step::Idle
            }
        }
    }

    pub fn decide(&mut self, decision: Decision) -> Result<Pending> {
        self.ensure_idle("advance")?;
        let record = match self.browsing().map(|b| (b.session(), b.current())) {
            Some((session, Some(current))) => InteractionRecord {
                user_id: session.clone(),
                experience_id: current.id.clone(),
                action: decision,
            },
            _ => return Err(self.invalid("advance")),
        };

        tracing::debug!("Recording '{}' for {}", decision, record.experience_id);
        Ok(self.issue(
            RequestKind::RecordInteraction(decision),
            Request::RecordInteraction(record),
        ))
    }

    pub fn on_interaction_recorded(&mut self, ticket: Ticket, outcome: Result<()>) -> Step {
        let decision = match ticket.kind {
            RequestKind::RecordInteraction(decision) => decision,
            _ => return Step::Stale,
        };
        if !self.accept(ticket, ticket.kind) {
            return Step::Stale;
        }

        // 服務有回應即視為已送出；只有連線層失敗才停留在同一張卡片
        match outcome {
            Ok(()) => {}
            Err(e @ ClientError::ServiceError { .. }) => {
                tracing::warn!("⚠️ Interaction not accepted by the service: {}", e);
            }
            Err(e) => {
                tracing::error!("❌ Failed to record interaction: {}", e);
                self.notice = Some(notice_for(&e));
                return Step::Idle;
            }
        }

        let FlowState::Browsing(browsing) = &mut self.state else {
            return Step::Idle;
        };
        let recommendation = match std::mem::replace(&mut browsing.card, Card::Loading) {
            Card::Showing(recommendation) => recommendation,
            other => {
                browsing.card = other;
                return Step::Idle;
            }
        };

        browsing.acted.insert(recommendation.id.clone());
        if decision == Decision::Liked {
            tracing::info!("💖 Liked '{}'", recommendation.title);
            browsing.liked.push(recommendation);
        }

        let session = browsing.session.clone();
        Step::Continue(self.issue(
            RequestKind::NextRecommendation,
            Request::NextRecommendation(session),
        ))
    }

    pub fn on_next_recommendation(
        &mut self,
        ticket: Ticket,
        outcome: Result<NextRecommendation>,
    ) -> Step {
        if !self.accept(ticket, RequestKind::NextRecommendation) {
            return Step::Stale;
        }
        let FlowState::Browsing(browsing) = &mut self.state else {
            return Step::Idle;
        };

        browsing.card = match outcome {
            Ok(NextRecommendation::Item(recommendation)) => {
                if browsing.acted.contains(&recommendation.id) {
                    // 已處理過的卡片不再顯示，視為推薦已用盡
                    tracing::warn!(
                        "⚠️ Service returned already reviewed recommendation {}",
                        recommendation.id
                    );
                    Card::Exhausted {
                        message: "No more recommendations available".to_string(),
                    }
                } else {
                    browsing.shown += 1;
                    Card::Showing(recommendation)
                }
            }
            Ok(NextRecommendation::Exhausted { message }) => {
                tracing::info!(
                    "🎉 Recommendations exhausted after {} cards, {} liked",
                    browsing.shown,
                    browsing.liked.len()
                );
                Card::Exhausted { message }
            }
            Err(e) => {
                tracing::error!("❌ Failed to load recommendation: {}", e);
                self.notice = Some(notice_for(&e));
                Card::Unavailable
            }
        };
        Step::Idle
    }

    /// Re-requests the next recommendation after a failed fetch. The interaction
    /// that preceded the failed fetch is not sent again.
    pub fn retry(&mut self) -> Result<Pending> {
        self.ensure_idle("retry")?;
        let session = match &self.state {
            FlowState::Browsing(browsing) if browsing.card == Card::Unavailable => {
                browsing.session.clone()
            }
            _ => return Err(self.invalid("retry")),
        };
        if let FlowState::Browsing(browsing) = &mut self.state {
            browsing.card = Card::Loading;
        }

        Ok(self.issue(
            RequestKind::NextRecommendation,
            Request::NextRecommendation(session),
        ))
    }

    /// Back to an empty form. Any request still in flight is abandoned and its
    /// completion will be reported as [`Step::Stale`].
    pub fn restart(&mut self) -> Result<()> {
        if matches!(self.state, FlowState::Capturing { .. }) {
            return Err(self.invalid("restart"));
        }

        if let Some(ticket) = self.in_flight.take() {
            tracing::debug!("Abandoning in-flight {:?}", ticket.kind);
        }
        tracing::info!("🔄 Starting a new session");
        self.state = FlowState::Capturing {
            draft: ProfileDraft::default(),
        };
        self.notice = None;
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind, request: Request) -> Pending {
        self.next_serial += 1;
        let ticket = Ticket {
            serial: self.next_serial,
            kind,
        };
        self.in_flight = Some(ticket);
        self.notice = None;
        Pending { ticket, request }
    }

    fn accept(&mut self, ticket: Ticket, expected: RequestKind) -> bool {
        if ticket.kind != expected || self.in_flight != Some(ticket) {
            tracing::debug!("Dropping stale completion for {:?}", ticket.kind);
            return false;
        }
        self.in_flight = None;
        true
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.is_busy() {
            return Err(ClientError::Busy {
                action: action.to_string(),
            });
        }
        Ok(())
    }

    fn invalid(&self, action: &str) -> ClientError {
        ClientError::InvalidAction {
            action: action.to_string(),
            state: self.state.describe().to_string(),
        }
    }
}

fn notice_for(error: &ClientError) -> String {
    if error.is_retryable() {
        format!("{}; try again in a moment", error.user_friendly_message())
    } else {
        format!("{}. {}", error.user_friendly_message(), error.recovery_suggestion())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(id: &str) -> Recommendation {
        Recommendation {
            id: id.to_string(),
            title: format!("Title {}", id),
            category: "Crafts".to_string(),
            description: "Description".to_string(),
            reasoning: "Reasoning".to_string(),
        }
    }

    fn service_down() -> ClientError {
        ClientError::ServiceError {
            operation: "test".to_string(),
            status: 500,
            body: String::new(),
        }
    }

    fn fill(flow: &mut SessionFlow) {
        flow.edit(ProfileField::Age, "34").unwrap();
        flow.edit(ProfileField::WorkGroup, "Tech").unwrap();
        flow.edit(ProfileField::WorkRole, "Data Scientist").unwrap();
        flow.edit(ProfileField::WorkResume, "4 years in data science").unwrap();
        flow.edit(ProfileField::HobbiesInterests, "rock climbing").unwrap();
    }

    fn expect_continue(step: Step) -> Pending {
        match step {
            Step::Continue(pending) => pending,
            other => panic!("expected follow-up request, got {:?}", other),
        }
    }

    /// Submits a filled draft and returns the first next-recommendation request.
    fn start_browsing(flow: &mut SessionFlow) -> Pending {
        fill(flow);
        let submit = flow.submit().unwrap();
        let created = ProfileCreated {
            user_id: SessionId::new("session-1"),
            message: None,
        };
        expect_continue(flow.on_profile_created(submit.ticket, Ok(created)))
    }

    fn show(flow: &mut SessionFlow, pending: Pending, id: &str) {
        let step =
            flow.on_next_recommendation(pending.ticket, Ok(NextRecommendation::Item(recommendation(id))));
        assert_eq!(step, Step::Idle);
    }

    fn act(flow: &mut SessionFlow, decision: Decision) -> Pending {
        let pending = flow.decide(decision).unwrap();
        expect_continue(flow.on_interaction_recorded(pending.ticket, Ok(())))
    }

    #[test]
    fn test_submit_builds_integer_age_payload() {
        let mut flow = SessionFlow::new();
        fill(&mut flow);

        let pending = flow.submit().unwrap();
        match pending.request {
            Request::CreateProfile(payload) => assert_eq!(payload.age, 34),
            other => panic!("unexpected request {:?}", other),
        }
        assert!(flow.is_busy());
    }

    #[test]
    fn test_submit_success_issues_exactly_one_fetch() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);

        assert_eq!(
            pending.request,
            Request::NextRecommendation(SessionId::new("session-1"))
        );
        assert_eq!(flow.browsing().unwrap().card(), &Card::Loading);
        assert_eq!(flow.session().unwrap().as_str(), "session-1");
        assert!(flow.is_busy());
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut flow = SessionFlow::new();
        fill(&mut flow);
        let before = flow.draft().unwrap().clone();

        let pending = flow.submit().unwrap();
        assert_eq!(flow.on_profile_created(pending.ticket, Err(service_down())), Step::Idle);

        assert_eq!(flow.draft(), Some(&before));
        assert!(!flow.is_busy());
        assert!(flow
            .take_notice()
            .is_some_and(|notice| notice.ends_with("try again in a moment")));
    }

    #[test]
    fn test_invalid_draft_is_rejected_before_any_request() {
        let mut flow = SessionFlow::new();
        flow.edit(ProfileField::Age, "34").unwrap();

        assert!(matches!(
            flow.submit(),
            Err(ClientError::ValidationError { .. })
        ));
        assert!(!flow.is_busy());
    }

    #[test]
    fn test_busy_rejects_overlapping_actions() {
        let mut flow = SessionFlow::new();
        fill(&mut flow);
        let _pending = flow.submit().unwrap();

        assert!(matches!(flow.submit(), Err(ClientError::Busy { .. })));
    }

    #[test]
    fn test_liked_count_at_exhaustion() {
        let mut flow = SessionFlow::new();
        let mut pending = start_browsing(&mut flow);

        for (id, decision) in [
            ("exp1", Decision::Liked),
            ("exp2", Decision::Disliked),
            ("exp3", Decision::Liked),
        ] {
            show(&mut flow, pending, id);
            pending = act(&mut flow, decision);
        }
        let exhausted = NextRecommendation::Exhausted {
            message: "No more recommendations available".to_string(),
        };
        flow.on_next_recommendation(pending.ticket, Ok(exhausted));

        let browsing = flow.browsing().unwrap();
        assert!(browsing.is_exhausted());
        assert!(flow.current().is_none());
        assert_eq!(browsing.shown(), 3);
        let liked: Vec<&str> = flow.liked().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(liked, vec!["exp1", "exp3"]);
    }

    #[test]
    fn test_acted_recommendation_is_never_shown_again() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        show(&mut flow, pending, "exp1");
        let pending = act(&mut flow, Decision::Liked);

        show(&mut flow, pending, "exp1");

        assert!(flow.current().is_none());
        assert!(flow.browsing().unwrap().is_exhausted());
        assert_eq!(flow.liked().len(), 1);
    }

    #[test]
    fn test_rejected_interaction_still_advances() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        show(&mut flow, pending, "exp1");

        let pending = flow.decide(Decision::Liked).unwrap();
        let next = expect_continue(flow.on_interaction_recorded(pending.ticket, Err(service_down())));
        assert_eq!(
            next.request,
            Request::NextRecommendation(SessionId::new("session-1"))
        );
        show(&mut flow, next, "exp2");

        assert_eq!(flow.current().map(|r| r.id.as_str()), Some("exp2"));
        let liked: Vec<&str> = flow.liked().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(liked, vec!["exp1"]);
        assert!(flow.take_notice().is_none());
    }

    #[test]
    fn test_unsent_interaction_keeps_card() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        show(&mut flow, pending, "exp1");

        let pending = flow.decide(Decision::Liked).unwrap();
        let connection_reset = ClientError::IoError(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ));
        assert_eq!(
            flow.on_interaction_recorded(pending.ticket, Err(connection_reset)),
            Step::Idle
        );

        assert_eq!(flow.current().map(|r| r.id.as_str()), Some("exp1"));
        assert!(flow.liked().is_empty());
        assert!(!flow.is_busy());
        assert!(flow.take_notice().is_some());
        assert!(flow.decide(Decision::Liked).is_ok());
    }

    #[test]
    fn test_failed_fetch_offers_retry() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        flow.on_next_recommendation(pending.ticket, Err(service_down()));

        assert_eq!(flow.browsing().unwrap().card(), &Card::Unavailable);
        assert!(!flow.is_busy());
        assert!(flow.decide(Decision::Liked).is_err());

        let retry = flow.retry().unwrap();
        assert!(matches!(retry.request, Request::NextRecommendation(_)));
        show(&mut flow, retry, "exp2");
        assert_eq!(flow.current().map(|r| r.id.as_str()), Some("exp2"));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        show(&mut flow, pending, "exp1");
        let pending = act(&mut flow, Decision::Liked);
        flow.on_next_recommendation(
            pending.ticket,
            Ok(NextRecommendation::Exhausted {
                message: "done".to_string(),
            }),
        );

        flow.restart().unwrap();

        assert_eq!(flow.draft(), Some(&ProfileDraft::default()));
        assert!(flow.draft().unwrap().is_empty());
        assert!(flow.liked().is_empty());
        assert!(flow.session().is_none());
    }

    #[test]
    fn test_stale_completion_after_restart_is_dropped() {
        let mut flow = SessionFlow::new();
        let pending = start_browsing(&mut flow);
        flow.restart().unwrap();

        let step = flow.on_next_recommendation(
            pending.ticket,
            Ok(NextRecommendation::Item(recommendation("exp1"))),
        );

        assert_eq!(step, Step::Stale);
        assert!(flow.draft().is_some());
        assert!(!flow.is_busy());
    }

    #[test]
    fn test_actions_outside_their_phase_are_invalid() {
        let mut flow = SessionFlow::new();
        assert!(matches!(
            flow.decide(Decision::Liked),
            Err(ClientError::InvalidAction { .. })
        ));
        assert!(flow.retry().is_err());
        assert!(flow.restart().is_err());

        let _pending = start_browsing(&mut flow);
        assert!(matches!(
            flow.edit(ProfileField::Age, "40"),
            Err(ClientError::InvalidAction { .. })
        ));
    }
}
