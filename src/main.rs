use clap::Parser;
use experience_swipe::utils::error::ErrorSeverity;
use experience_swipe::utils::logger;
use experience_swipe::{CliConfig, FlowController, HttpRecommendationService, TerminalApp};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 解析並驗證配置
    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting experience-swipe against {}", config.backend_url);
    tracing::debug!("Resolved config: {:?}", config);

    let service = HttpRecommendationService::new(&config)?;
    let controller = FlowController::new(service);

    if cli.check {
        match controller.check_health().await {
            Ok(health) if health.is_healthy() => {
                println!("✅ Service is healthy");
            }
            Ok(health) => {
                eprintln!("⚠️ Service reported status '{}'", health.status);
            }
            Err(e) => {
                tracing::error!(
                    "❌ Health check failed: {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                std::process::exit(2);
            }
        }
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut app = TerminalApp::new(controller, stdin, std::io::stdout());

    if let Err(e) = app.run().await {
        tracing::error!(
            "❌ Session ended with error: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
