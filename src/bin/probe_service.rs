use clap::Parser;
use experience_swipe::core::RecommendationService;
use experience_swipe::domain::model::{
    Decision, InteractionRecord, NextRecommendation, ProfilePayload, SessionId,
};
use experience_swipe::utils::logger;
use experience_swipe::utils::validation::Validate;
use experience_swipe::{ClientConfig, HttpRecommendationService, Result};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "probe-service")]
#[command(about = "Exercise every recommendation service endpoint once")]
struct Args {
    /// Base URL of the recommendation service
    #[arg(long, env = "SWIPE_BACKEND_URL", default_value = experience_swipe::config::DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_seconds: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct ProbeReport {
    run: usize,
    passed: usize,
}

impl ProbeReport {
    fn record<T>(&mut self, name: &str, outcome: &Result<T>) -> bool {
        self.run += 1;
        println!("\n🔍 Testing {}...", name);
        match outcome {
            Ok(_) => {
                self.passed += 1;
                println!("✅ Passed");
                true
            }
            Err(e) => {
                println!("❌ Failed - {}", e);
                false
            }
        }
    }
}

fn sample_profile() -> ProfilePayload {
    ProfilePayload {
        age: 28,
        work_group: "Tech".to_string(),
        work_role: "Software Engineer".to_string(),
        work_resume: "5 years in web development, worked at startups".to_string(),
        hobbies_interests: "coding, gaming, reading sci-fi".to_string(),
    }
}

async fn fetch_next(
    service: &HttpRecommendationService,
    report: &mut ProbeReport,
    session: &SessionId,
) -> Option<String> {
    let next = service.next_recommendation(session).await;
    if !report.record("Get Next Recommendation", &next) {
        return None;
    }
    match next {
        Ok(NextRecommendation::Item(recommendation)) => {
            println!("Next recommendation: {}", recommendation.title);
            if recommendation.reasoning.trim().is_empty() {
                println!("⚠️ No reasoning provided");
            }
            Some(recommendation.id)
        }
        Ok(NextRecommendation::Exhausted { message }) => {
            println!("Stream exhausted: {}", message);
            None
        }
        Err(_) => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let config = ClientConfig {
        timeout: Some(Duration::from_secs(args.timeout_seconds)),
        ..ClientConfig::new(args.backend_url.clone())
    };
    config.validate()?;
    let service = HttpRecommendationService::new(&config)?;
    let mut report = ProbeReport::default();

    println!("🚀 Probing {}", service.base_url());

    let health = service.health().await;
    if report.record("Health Check", &health) {
        if let Ok(status) = &health {
            println!("Health check response: {:?}", status);
        }
    }

    let created = service.create_profile(&sample_profile()).await;
    if report.record("Create Profile", &created) {
        if let Ok(created) = created {
            let session = created.user_id;
            println!("Created profile with user_id: {}", session);

            if let Some(experience_id) = fetch_next(&service, &mut report, &session).await {
                let record = InteractionRecord {
                    user_id: session.clone(),
                    experience_id,
                    action: Decision::Liked,
                };
                let recorded = service.record_interaction(&record).await;
                if report.record("Record Interaction", &recorded) {
                    fetch_next(&service, &mut report, &session).await;
                }
            }
        }
    }

    println!("\n📊 Tests passed: {}/{}", report.passed, report.run);
    if report.passed != report.run {
        std::process::exit(1);
    }
    Ok(())
}
