pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::HttpRecommendationService;
pub use app::terminal::TerminalApp;
pub use config::ClientConfig;
pub use core::{controller::FlowController, flow::SessionFlow};
pub use utils::error::{ClientError, Result};
