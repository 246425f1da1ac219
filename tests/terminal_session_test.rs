use anyhow::Result;
use experience_swipe::{ClientConfig, FlowController, HttpRecommendationService, TerminalApp};
use httpmock::prelude::*;
use serde_json::json;

fn app_for(
    server: &MockServer,
    script: &'static str,
) -> TerminalApp<HttpRecommendationService, tokio::io::BufReader<&'static [u8]>, Vec<u8>> {
    let service = HttpRecommendationService::new(&ClientConfig::new(server.base_url())).unwrap();
    TerminalApp::new(
        FlowController::new(service),
        tokio::io::BufReader::new(script.as_bytes()),
        Vec::new(),
    )
}

#[tokio::test]
async fn test_terminal_session_like_then_restart() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(POST).path("/api/profile").json_body(json!({
            "age": 30,
            "work_group": "Tech",
            "work_role": "Product Manager",
            "work_resume": "8 years in product management",
            "hobbies_interests": "hiking, photography"
        }));
        then.status(200)
            .json_body(json!({"user_id": "term-1", "message": "Profile created successfully"}));
    });
    // 服務每次都回傳同一張卡片；已處理過的卡片應視為推薦結束
    let next_mock = server.mock(|when, then| {
        when.method(GET).path("/api/next-recommendation/term-1");
        then.status(200).json_body(json!({
            "id": "exp10",
            "title": "Falconry",
            "category": "Animal Training",
            "description": "Train and hunt with birds of prey",
            "reasoning": "Patient planners enjoy working with animals"
        }));
    });
    let interaction_mock = server.mock(|when, then| {
        when.method(POST).path("/api/interaction").json_body(json!({
            "user_id": "term-1",
            "experience_id": "exp10",
            "action": "liked"
        }));
        then.status(200)
            .json_body(json!({"message": "Interaction recorded successfully"}));
    });

    let script =
        "30\nTech\nProduct Manager\n8 years in product management\n\nhiking, photography\n\ny\ns\n:q\n";
    let mut app = app_for(&server, script);
    app.run().await.unwrap();

    profile_mock.assert_hits(1);
    next_mock.assert_hits(2);
    interaction_mock.assert_hits(1);
    assert!(app.controller().flow().draft().unwrap().is_empty());

    let output = String::from_utf8(app.into_output()).unwrap();
    assert!(output.contains("Falconry  [Animal Training]"));
    assert!(output.contains("You've explored all recommendations!"));
    assert!(output.contains("discovered 1 new experiences"));
    assert!(output.contains("Falconry (Animal Training)"));
    assert!(output.contains("👋 Bye!"));
}

#[tokio::test]
async fn test_terminal_rejects_incomplete_profile() {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(POST).path("/api/profile");
        then.status(200).json_body(json!({"user_id": "term-2"}));
    });

    // 第一輪漏填最後一個欄位，第二輪按 Enter 保留既有值後以 :q 離開
    let script = "25\nMarketing\nDigital Marketer\n3 years\n\n\n\n:q\n";
    let mut app = app_for(&server, script);
    app.run().await.unwrap();

    profile_mock.assert_hits(0);
    let draft = app.controller().flow().draft().unwrap().clone();
    assert_eq!(draft.age, "25");
    assert_eq!(draft.work_resume, "3 years");

    let output = String::from_utf8(app.into_output()).unwrap();
    assert!(output.contains("hobbies_interests"));
    assert!(output.contains("Age: 25"));
}

#[tokio::test]
async fn test_terminal_reports_service_failure() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/profile");
        then.status(500);
    });

    let script = "41\nHealth\nNurse\nICU\n\ngardening\n\n:q\n";
    let mut app = app_for(&server, script);
    app.run().await?;

    assert_eq!(app.controller().flow().draft().unwrap().work_role, "Nurse");
    let output = String::from_utf8(app.into_output())?;
    assert!(output.contains("⚠️ The recommendation service could not complete the request"));
    Ok(())
}

#[tokio::test]
async fn test_terminal_keeps_multi_line_answers_as_typed() -> Result<()> {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(POST).path("/api/profile").json_body(json!({
            "age": 52,
            "work_group": "Education",
            "work_role": "  High School Teacher",
            "work_resume": "Taught physics for 20 years\n  Coached the robotics team",
            "hobbies_interests": "astronomy"
        }));
        then.status(200).json_body(json!({"user_id": "term-4"}));
    });
    let next_mock = server.mock(|when, then| {
        when.method(GET).path("/api/next-recommendation/term-4");
        then.status(200)
            .json_body(json!({"message": "No more recommendations available"}));
    });

    let script = "52\nEducation\n  High School Teacher\nTaught physics for 20 years\n  Coached the robotics team\n\nastronomy\n\nq\n";
    let mut app = app_for(&server, script);
    app.run().await?;

    profile_mock.assert();
    next_mock.assert();
    assert!(app.controller().flow().browsing().is_some_and(|b| b.is_exhausted()));
    Ok(())
}

#[tokio::test]
async fn test_terminal_clears_a_field() -> Result<()> {
    let server = MockServer::start();
    let profile_mock = server.mock(|when, then| {
        when.method(POST).path("/api/profile");
        then.status(200).json_body(json!({"user_id": "term-5"}));
    });

    // 第二輪清空職稱後，表單再次被拒絕
    let script = "33\nRetail\nStore Manager\nRan two stores\n\n\n\n\n:clear\n\n\n:q\n";
    let mut app = app_for(&server, script);
    app.run().await?;

    profile_mock.assert_hits(0);
    let draft = app.controller().flow().draft().cloned().unwrap_or_default();
    assert_eq!(draft.work_group, "Retail");
    assert!(draft.work_role.is_empty());
    Ok(())
}
