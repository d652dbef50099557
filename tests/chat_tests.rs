// Prompt library composition and chat session payload tests

use std::path::Path;

use aws_config::{BehaviorVersion, Region};
use awspulse::chat::{ChatMessage, ChatSession, PersonaChat, PromptLibrary};
use awspulse::models::{BucketedMetrics, ResourceArn, ServiceKind};

fn write_prompts(dir: &Path) {
    std::fs::write(dir.join("base_head.txt"), "HEAD\n").unwrap();
    std::fs::write(dir.join("base_foot.txt"), "FOOT\n").unwrap();
    std::fs::write(dir.join("ec2.txt"), "I am a compute instance.\n").unwrap();
    std::fs::write(dir.join("rds.txt"), "I am a database.\n").unwrap();
    std::fs::write(dir.join("alb.txt"), "I am a load balancer.\n").unwrap();
}

#[test]
fn persona_is_head_body_foot() {
    let dir = tempfile::TempDir::new().unwrap();
    write_prompts(dir.path());
    let prompts = PromptLibrary::load(dir.path()).unwrap();

    assert_eq!(
        prompts.persona(ServiceKind::Ec2),
        "HEAD\nI am a compute instance.\nFOOT\n"
    );
    assert_eq!(
        prompts.persona(ServiceKind::Rds),
        "HEAD\nI am a database.\nFOOT\n"
    );
    assert_eq!(
        prompts.persona(ServiceKind::Alb),
        "HEAD\nI am a load balancer.\nFOOT\n"
    );
}

#[test]
fn missing_prompt_file_names_the_path() {
    let dir = tempfile::TempDir::new().unwrap();
    write_prompts(dir.path());
    std::fs::remove_file(dir.path().join("rds.txt")).unwrap();

    let err = PromptLibrary::load(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("rds.txt"));
}

#[test]
fn session_tracks_turns_in_order() {
    let mut session = ChatSession::new();
    assert!(session.is_empty());
    session.push("user", "hello");
    session.push("assistant", "hi there");
    assert_eq!(session.len(), 2);

    let payload = session.anthropic_payload(200);
    assert_eq!(payload["anthropic_version"], "bedrock-2023-05-31");
    assert_eq!(payload["max_tokens"], 200);
    let messages = payload["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "hello");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "hi there");
}

#[tokio::test]
async fn persona_session_replays_log_and_appends_metrics() {
    let dir = tempfile::TempDir::new().unwrap();
    write_prompts(dir.path());
    let prompts = PromptLibrary::load(dir.path()).unwrap();

    let conf = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .load()
        .await;
    let chat = PersonaChat::new(
        aws_sdk_bedrockruntime::Client::new(&conf),
        prompts,
        "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string(),
        200,
    );

    let log = vec![
        ChatMessage {
            role: "user".to_string(),
            message: "how are you?".to_string(),
        },
        ChatMessage {
            role: "assistant".to_string(),
            message: "running smoothly".to_string(),
        },
    ];
    let metrics = BucketedMetrics {
        arn: ResourceArn::ec2_instance("us-east-1", "111122223333", "i-abc"),
        buckets: Vec::new(),
    };

    let session = chat.session(ServiceKind::Ec2, &log, &metrics).unwrap();
    // Persona prompt, two replayed turns, metrics context turn.
    assert_eq!(session.len(), 4);

    let payload = session.anthropic_payload(200);
    let messages = payload["messages"].as_array().unwrap();
    assert!(
        messages[0]["content"]
            .as_str()
            .unwrap()
            .starts_with("HEAD\n")
    );
    assert_eq!(messages[1]["content"], "how are you?");
    assert_eq!(messages[2]["content"], "running smoothly");
    let last = messages[3]["content"].as_str().unwrap();
    assert!(last.contains("metrics_data:"));
    assert!(last.contains("i-abc"));
}
