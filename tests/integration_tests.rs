// HTTP surface tests for everything answerable without AWS credentials:
// static routes, cache headers and request validation.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use awspulse::aggregator::Aggregator;
use awspulse::aws_repo::AwsRepo;
use awspulse::chat::{PersonaChat, PromptLibrary};
use awspulse::config::AppConfig;
use awspulse::pricing::{PriceCache, PricingRepo};
use awspulse::routes;
use axum_test::TestServer;

const CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[cache]
max_age_secs = 45

[chat]
model_id = "anthropic.claude-3-5-sonnet-20241022-v2:0"
prompt_dir = "prompts"
"#;

async fn test_server() -> TestServer {
    let config = AppConfig::load_from_str(CONFIG).expect("test config");

    let conf = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .load()
        .await;
    let aws = Arc::new(AwsRepo::new(&conf, "us-east-1", "111122223333"));
    let pricing = Arc::new(PricingRepo::new(
        aws_sdk_pricing::Client::new(&conf),
        Arc::new(PriceCache::new()),
        "us-east-1",
    ));
    let aggregator = Arc::new(Aggregator::new(
        aws.clone(),
        pricing,
        config.metrics.clone(),
    ));

    let dir = tempfile::TempDir::new().unwrap();
    for file in ["base_head.txt", "base_foot.txt", "ec2.txt", "rds.txt", "alb.txt"] {
        std::fs::write(dir.path().join(file), "prompt\n").unwrap();
    }
    let prompts = PromptLibrary::load(dir.path()).unwrap();
    let chat = Arc::new(PersonaChat::new(
        aws_sdk_bedrockruntime::Client::new(&conf),
        prompts,
        config.chat.model_id.clone(),
        config.chat.max_tokens,
    ));

    TestServer::new(routes::app(aws, aggregator, chat, config)).expect("test server")
}

#[tokio::test]
async fn test_root_banner() {
    let server = test_server().await;
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("awspulse"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server().await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "awspulse");
    assert!(!body["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_is_never_cached() {
    let server = test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(response.header("cache-control"), "no-store");
}

#[tokio::test]
async fn test_version_carries_configured_cache_header() {
    let server = test_server().await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    assert_eq!(response.header("cache-control"), "public, max-age=45");
}

#[tokio::test]
async fn test_costs_rejects_out_of_range_days() {
    let server = test_server().await;
    for days in ["0", "366"] {
        let response = server.get("/costs").add_query_param("days", days).await;
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("days"));
        assert!(!body["details"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_chat_rejects_malformed_arn() {
    let server = test_server().await;
    let response = server.post("/chat").form(&[("arn", "not-an-arn")]).await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("malformed"));
}

#[tokio::test]
async fn test_chat_rejects_unsupported_service_arn() {
    let server = test_server().await;
    let response = server
        .post("/chat")
        .form(&[("arn", "arn:aws:s3:::my-bucket")])
        .await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("unsupported"));
}

#[tokio::test]
async fn test_talk_rejects_malformed_arn() {
    let server = test_server().await;
    let response = server
        .post("/talk")
        .json(&serde_json::json!({ "arn": "nope" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = test_server().await;
    let response = server.get("/nope").await;
    response.assert_status_not_found();
}
