pub mod controller;
pub mod flow;

pub use crate::domain::model::{Decision, ProfileDraft, ProfileField, Recommendation, SessionId};
pub use crate::domain::ports::{ConfigProvider, RecommendationService};
pub use crate::utils::error::Result;
