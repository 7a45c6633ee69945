use mockito::Matcher;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use wordsmith::config::LlmConfig;
use wordsmith::{Completer, Error, ErrorCode, GeminiClient};

const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn config_for(server: &mockito::ServerGuard) -> LlmConfig
{   LlmConfig
    {   api_base: server.url()
      , ..LlmConfig::default()
    }
}

fn candidate_body(text: &str) -> String
{   json!({
      "candidates": [
        {   "content": { "role": "model", "parts": [{ "text": text }] }
          , "finishReason": "STOP"
        }
      ]
    }).to_string()
}

#[tokio::test]
async fn test_gemini_returns_candidate_text()
{   let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", GENERATE_PATH)
      .match_header("x-goog-api-key", "test-key")
      .match_body(Matcher::PartialJson(json!({
        "contents": [{ "parts": [{ "text": "Say hello" }] }],
        "generationConfig": { "maxOutputTokens": 2048 }
      })))
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(candidate_body("Hello there"))
      .create_async()
      .await;

    let client = GeminiClient::new(
      Some("test-key".to_string())
    , config_for(&server)
    );
    let text = assert_ok!(client.complete("Say hello".to_string()).await);

    assert_eq!(text, "Hello there");
    mock.assert_async().await;
    let _ = client.shutdown();
}

#[tokio::test]
async fn test_gemini_invalid_key_classifies()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", GENERATE_PATH)
      .with_status(400)
      .with_body(r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#)
      .create_async()
      .await;

    let client = GeminiClient::new(Some("bad".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);

    assert_eq!(ErrorCode::classify(&err), ErrorCode::InvalidApiKey);
}

#[tokio::test]
async fn test_gemini_quota_is_rate_limit()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", GENERATE_PATH)
      .with_status(429)
      .with_body(r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#)
      .create_async()
      .await;

    let client = GeminiClient::new(Some("k".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);

    assert_eq!(err, Error::RateLimitExceeded);
    assert_eq!(ErrorCode::classify(&err), ErrorCode::QuotaExceeded);
}

#[tokio::test]
async fn test_gemini_overloaded_is_service_unavailable()
{   let mut server = mockito::Server::new_async().await;
    let _overloaded = server
      .mock("POST", GENERATE_PATH)
      .with_status(503)
      .with_body(r#"{"error":{"code":503,"message":"The model is overloaded. Please try again later.","status":"UNAVAILABLE"}}"#)
      .expect(1)
      .create_async()
      .await;

    let client = GeminiClient::new(Some("k".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);
    assert_eq!(ErrorCode::classify(&err), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn test_gemini_plain_503_is_service_unavailable()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", GENERATE_PATH)
      .with_status(503)
      .with_body("upstream connect error")
      .create_async()
      .await;

    let client = GeminiClient::new(Some("k".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);

    assert_eq!(
      err
    , Error::ApiError("Service Unavailable: upstream connect error".to_string())
    );
    assert_eq!(ErrorCode::classify(&err), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn test_gemini_without_candidates()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", GENERATE_PATH)
      .with_status(200)
      .with_body(r#"{"candidates":[]}"#)
      .create_async()
      .await;

    let client = GeminiClient::new(Some("k".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);

    assert_eq!(err, Error::NoCandidatesInResponse);
    assert_eq!(ErrorCode::classify(&err), ErrorCode::UnknownError);
}

#[tokio::test]
async fn test_gemini_blank_text_is_empty_response()
{   let mut server = mockito::Server::new_async().await;
    let _mock = server
      .mock("POST", GENERATE_PATH)
      .with_status(200)
      .with_body(candidate_body("  \n "))
      .create_async()
      .await;

    let client = GeminiClient::new(Some("k".to_string()), config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);
    assert_eq!(err, Error::EmptyResponse);
}

#[tokio::test]
async fn test_gemini_missing_key_then_set()
{   let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", GENERATE_PATH)
      .match_header("x-goog-api-key", "late-key")
      .with_status(200)
      .with_body(candidate_body("ok"))
      .expect(1)
      .create_async()
      .await;

    let client = GeminiClient::new(None, config_for(&server));
    let err = assert_err!(client.complete("Hi".to_string()).await);
    assert!(matches!(err, Error::MissingApiKey(_)));
    assert_eq!(ErrorCode::classify(&err), ErrorCode::InvalidApiKey);

    assert_ok!(client.set_api_key("late-key".to_string()).await);
    let text = assert_ok!(client.complete("Hi".to_string()).await);
    assert_eq!(text, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_shutdown()
{   let client = GeminiClient::new(None, LlmConfig::default());
    assert_ok!(client.shutdown());
}

#[tokio::test]
#[ignore]
async fn test_gemini_live_prompt()
{   let api_key = match std::env::var("GEMINI_API_KEY")
    {   Ok(key) => key
      , Err(_) => {
          println!("Skipping: GEMINI_API_KEY not set");
          return;
        }
    };

    let client = GeminiClient::new(Some(api_key), LlmConfig::default());
    match client.complete("Reply with the single word: hello".to_string()).await
    {   Ok(response) => {
          println!("Response: {}", response);
          assert!(!response.trim().is_empty());
        }
      , Err(e) => {
          println!("API Error: {} ({})", e, ErrorCode::classify(&e));
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_gemini_live_grammar_round()
{   let api_key = match std::env::var("GEMINI_API_KEY")
    {   Ok(key) => key
      , Err(_) => {
          println!("Skipping: GEMINI_API_KEY not set");
          return;
        }
    };

    let client = std::sync::Arc::new(
      GeminiClient::new(Some(api_key), LlmConfig::default())
    );
    let adapter = wordsmith::ToolAdapter::from_config(
      client
    , &LlmConfig::default()
    );
    let request = wordsmith::ToolRequest::new("Their going to the park tomorow.");
    match adapter.check_grammar(&request).await
    {   Ok(reply) => {
          println!("Corrected: {}", reply.corrected_text);
          for c in &reply.corrections
          {   println!("  {} -> {} ({})", c.original, c.corrected, c.color);
          }
        }
      , Err(e) => println!("API Error: {}", e)
    }
}
