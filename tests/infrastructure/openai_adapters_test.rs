use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skagen::application::ports::{
    ChatClient, ChatRequest, ImageGenerationClient, ImageGenerationError, ModerationEndpoint,
    TranscriptionEngine,
};
use skagen::domain::{ImageQuality, ImageSize};
use skagen::infrastructure::openai::{
    OpenAiChatClient, OpenAiConfig, OpenAiImageClient, OpenAiModerationEndpoint,
    OpenAiTranscriptionEngine,
};

fn config_for(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig::new("test-key".to_string())
        .with_base_url(format!("{}/v1", server.uri()))
        .with_timeout(Duration::from_secs(5))
}

#[tokio::test]
async fn transcription_posts_multipart_and_trims_the_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  a red balloon \n"))
        .mount(&server)
        .await;

    let engine = OpenAiTranscriptionEngine::new(config_for(&server), "whisper-1");
    let transcript = engine.transcribe(b"RIFF-fake-wav-bytes").await.unwrap();

    assert_eq!(transcript, "a red balloon");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("whisper-1"));
    assert!(body.contains("response_format"));
    assert!(body.contains("audio.wav"));
    assert!(
        requests[0]
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("Bearer "))
            .unwrap_or(false)
    );
}

#[tokio::test]
async fn transcription_surfaces_api_errors_as_typed_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let engine = OpenAiTranscriptionEngine::new(config_for(&server), "whisper-1");
    let error = engine.transcribe(b"bytes").await.unwrap_err();

    assert!(error.to_string().contains("500"));
}

#[tokio::test]
async fn moderation_parses_flags_and_computes_the_max_category_score() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "modr-1",
            "model": "omni-moderation-latest",
            "results": [{
                "flagged": true,
                "categories": {
                    "sexual": false,
                    "violence": true,
                    "hate": false,
                    "harassment": true,
                    "self-harm": false
                },
                "category_scores": {
                    "sexual": 0.01,
                    "violence": 0.88,
                    "hate": 0.05,
                    "harassment": 0.64,
                    "self-harm": 0.0
                }
            }]
        })))
        .mount(&server)
        .await;

    let endpoint = OpenAiModerationEndpoint::new(config_for(&server), "omni-moderation-latest");
    let screening = endpoint.screen_text("some text").await.unwrap();

    assert!(screening.flagged);
    assert!(screening.categories.violence);
    assert!(screening.categories.harassment);
    assert!(!screening.categories.sexual);
    assert!((screening.max_score - 0.88).abs() < f32::EPSILON);

    let requests = server.received_requests().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(json["input"], "some text");
    assert_eq!(json["model"], "omni-moderation-latest");
}

#[tokio::test]
async fn moderation_rejects_an_empty_results_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/moderations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "modr-2",
            "model": "omni-moderation-latest",
            "results": []
        })))
        .mount(&server)
        .await;

    let endpoint = OpenAiModerationEndpoint::new(config_for(&server), "omni-moderation-latest");
    let error = endpoint.screen_text("some text").await.unwrap_err();

    assert!(error.to_string().contains("empty results"));
}

#[tokio::test]
async fn chat_requests_carry_image_parts_and_json_response_mode() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "{\"is_violent\": false}" }
            }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiChatClient::new(config_for(&server), "gpt-4o");
    let content = client
        .complete(ChatRequest {
            system: "You are a content moderator.".to_string(),
            user_text: "Please analyze this image for content moderation.".to_string(),
            image_data_uri: Some("data:image/jpeg;base64,AAAA".to_string()),
            max_tokens: 300,
            json_response: true,
        })
        .await
        .unwrap();

    assert_eq!(content, "{\"is_violent\": false}");

    let requests = server.received_requests().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(json["model"], "gpt-4o");
    assert_eq!(json["max_tokens"], 300);
    assert_eq!(json["response_format"]["type"], "json_object");
    assert_eq!(json["messages"][0]["role"], "system");

    let user_content = json["messages"][1]["content"].as_array().unwrap();
    assert_eq!(user_content[0]["type"], "text");
    assert_eq!(user_content[1]["type"], "image_url");
    assert_eq!(
        user_content[1]["image_url"]["url"],
        "data:image/jpeg;base64,AAAA"
    );
}

#[tokio::test]
async fn chat_requests_without_images_stay_single_part() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "a moody oil painting" }
            }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiChatClient::new(config_for(&server), "gpt-4o");
    let content = client
        .complete(ChatRequest {
            system: "You rewrite prompts.".to_string(),
            user_text: "a boat".to_string(),
            image_data_uri: None,
            max_tokens: 200,
            json_response: false,
        })
        .await
        .unwrap();

    assert_eq!(content, "a moody oil painting");

    let requests = server.received_requests().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(json.get("response_format").is_none());
    assert_eq!(json["messages"][1]["content"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn image_generation_sends_one_image_request_and_reads_the_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "created": 1,
            "data": [{
                "url": "https://images.example/out.png",
                "revised_prompt": "a serene mountain lake at golden hour"
            }]
        })))
        .mount(&server)
        .await;

    let client = OpenAiImageClient::new(config_for(&server), "dall-e-3");
    let image = client
        .generate(
            "a peaceful mountain landscape at sunset",
            ImageSize::Square1024,
            ImageQuality::Standard,
        )
        .await
        .unwrap();

    assert_eq!(image.url, "https://images.example/out.png");
    assert_eq!(
        image.revised_prompt.as_deref(),
        Some("a serene mountain lake at golden hour")
    );

    let requests = server.received_requests().await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(json["model"], "dall-e-3");
    assert_eq!(json["n"], 1);
    assert_eq!(json["size"], "1024x1024");
    assert_eq!(json["quality"], "standard");
}

#[tokio::test]
async fn image_generation_classifies_error_bodies_by_content() {
    let cases = [
        (
            serde_json::json!({"error": {"code": "content_policy_violation", "message": "rejected"}}),
            400,
        ),
        (
            serde_json::json!({"error": {"code": "rate_limit_exceeded", "message": "slow down"}}),
            429,
        ),
        (
            serde_json::json!({"error": {"message": "billing hard limit reached"}}),
            402,
        ),
    ];

    for (body, status) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let client = OpenAiImageClient::new(config_for(&server), "dall-e-3");
        let error = client
            .generate("a boat", ImageSize::Square256, ImageQuality::Hd)
            .await
            .unwrap_err();

        match status {
            400 => assert!(matches!(error, ImageGenerationError::ContentPolicyViolation)),
            429 => assert!(matches!(error, ImageGenerationError::RateLimited)),
            402 => assert!(matches!(error, ImageGenerationError::QuotaExceeded)),
            _ => unreachable!(),
        }
    }
}
