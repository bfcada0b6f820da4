//! Mock Telegram API Server for testing
//!
//! This module provides a mock HTTP server that simulates the Telegram Bot API
//! for testing purposes. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TEST_TOKEN: &str = "12345:test_token";

/// Mock Telegram API server for testing
pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    /// Create a new mock Telegram API server
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Bot whose API calls go to the mock server
    pub fn bot(&self) -> Bot {
        let url = url::Url::parse(&self.server.uri()).expect("mock server uri is a url");
        Bot::new(TEST_TOKEN).set_api_url(url)
    }

    /// teloxide names methods after their payload types, e.g. `SendMessage`
    fn endpoint(api_method: &str) -> String {
        format!("/bot{}/{}", TEST_TOKEN, api_method)
    }

    /// Message object as Telegram returns it for a private chat
    pub fn message_json(message_id: i32, chat_id: i64) -> Value {
        json!({
            "message_id": message_id,
            "from": {
                "id": 12345,
                "is_bot": true,
                "first_name": "KeyRoomBot",
                "username": "keyroom_bot"
            },
            "chat": {
                "id": chat_id,
                "first_name": "Alice",
                "username": "alice",
                "type": "private"
            },
            "date": 1640995200,
            "text": "ok"
        })
    }

    fn error_json(description: &str) -> Value {
        json!({
            "ok": false,
            "error_code": 400,
            "description": description
        })
    }

    async fn mount_message(&self, api_method: &str, message_id: i32, chat_id: i64) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint(api_method)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": Self::message_json(message_id, chat_id)
            })))
            .mount(&self.server)
            .await;
    }

    /// Setup mock for SendMessage endpoint
    pub async fn mock_send_message(&self, message_id: i32, chat_id: i64) {
        self.mount_message("SendMessage", message_id, chat_id).await;
    }

    /// Setup mock for SendPhoto endpoint
    pub async fn mock_send_photo(&self, message_id: i32, chat_id: i64) {
        self.mount_message("SendPhoto", message_id, chat_id).await;
    }

    /// Setup mock for EditMessageText endpoint
    pub async fn mock_edit_message_text(&self, message_id: i32, chat_id: i64) {
        self.mount_message("EditMessageText", message_id, chat_id).await;
    }

    /// Setup mock for DeleteMessage endpoint
    pub async fn mock_delete_message(&self, success: bool) {
        let response = if success {
            ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true }))
        } else {
            ResponseTemplate::new(400).set_body_json(Self::error_json("Bad Request: message to delete not found"))
        };

        Mock::given(method("POST"))
            .and(path(Self::endpoint("DeleteMessage")))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Make every SendMessage call fail
    pub async fn mock_send_message_failure(&self) {
        Mock::given(method("POST"))
            .and(path(Self::endpoint("SendMessage")))
            .respond_with(ResponseTemplate::new(400).set_body_json(Self::error_json("Bad Request: chat not found")))
            .mount(&self.server)
            .await;
    }

    /// Requests received for one API method, in arrival order
    pub async fn requests_to(&self, api_method: &str) -> Vec<Request> {
        let endpoint = Self::endpoint(api_method);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .collect()
    }

    /// JSON bodies of the requests received for one API method
    pub async fn json_bodies(&self, api_method: &str) -> Vec<Value> {
        self.requests_to(api_method)
            .await
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}
