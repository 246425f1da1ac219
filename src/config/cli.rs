use super::toml_config::TomlConfig;
use super::ClientConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "experience-swipe")]
#[command(about = "Swipe through experience recommendations from the terminal")]
pub struct CliConfig {
    /// Base URL of the recommendation service
    #[arg(long, env = "SWIPE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Per-request timeout; requests never time out when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Check service health before starting
    #[arg(long)]
    pub check: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// 合併設定：命令列 / 環境變數 > TOML 檔案 > 預設值
    pub fn resolve(&self) -> Result<ClientConfig> {
        let file = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        let mut config = ClientConfig::from_toml(&file);
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        if let Some(seconds) = self.timeout_seconds {
            config.timeout = Some(Duration::from_secs(seconds));
        }
        config.verbose |= self.verbose;
        config.json_logs |= self.json_logs;

        config.validate()?;
        Ok(config)
    }
}
