//! DeepSeek 对话补全接口客户端
//!
//! 接口与 OpenAI chat/completions 兼容，只使用非流式调用。

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::analysis::prompt::SYSTEM_PROMPT;
use crate::config::DeepSeekConfig;
use crate::errors::GradeSysError;

const TOP_P: f32 = 0.95;
const FREQUENCY_PENALTY: f32 = 0.1;
const PRESENCE_PENALTY: f32 = 0.1;

/// 调用失败的原因
#[derive(Debug, Clone, PartialEq)]
pub enum DeepSeekError {
    MissingApiKey,
    Timeout(String),
    Authentication(String),
    RateLimited(String),
    Api { status: u16, body: String },
    Transport(String),
    InvalidResponse(String),
}

impl DeepSeekError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeepSeekError::Timeout(_))
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => DeepSeekError::Authentication(body),
            StatusCode::TOO_MANY_REQUESTS => DeepSeekError::RateLimited(body),
            _ => DeepSeekError::Api {
                status: status.as_u16(),
                body,
            },
        }
    }
}

impl std::fmt::Display for DeepSeekError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeepSeekError::MissingApiKey => write!(f, "未配置 DeepSeek API 密钥"),
            DeepSeekError::Timeout(msg) => write!(f, "DeepSeek 请求超时: {msg}"),
            DeepSeekError::Authentication(msg) => write!(f, "DeepSeek 认证失败: {msg}"),
            DeepSeekError::RateLimited(msg) => write!(f, "DeepSeek 请求频率超限: {msg}"),
            DeepSeekError::Api { status, body } => write!(f, "DeepSeek 接口错误 {status}: {body}"),
            DeepSeekError::Transport(msg) => write!(f, "DeepSeek 请求失败: {msg}"),
            DeepSeekError::InvalidResponse(msg) => write!(f, "DeepSeek 响应格式错误: {msg}"),
        }
    }
}

impl std::error::Error for DeepSeekError {}

impl From<reqwest::Error> for DeepSeekError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeepSeekError::Timeout(err.to_string())
        } else if err.is_decode() {
            DeepSeekError::InvalidResponse(err.to_string())
        } else {
            DeepSeekError::Transport(err.to_string())
        }
    }
}

impl From<DeepSeekError> for GradeSysError {
    fn from(err: DeepSeekError) -> Self {
        match err {
            DeepSeekError::MissingApiKey => GradeSysError::engine_not_configured(err.to_string()),
            _ => GradeSysError::external_service(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// 一次成功调用的结果
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub usage: Option<ChatUsage>,
}

#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl DeepSeekClient {
    pub fn new(config: &DeepSeekConfig) -> Result<Self, DeepSeekError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(DeepSeekError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| DeepSeekError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
            stream: false,
        }
    }

    /// 发送单轮对话，返回第一条候选回复
    pub async fn chat(&self, prompt: &str) -> Result<ChatCompletion, DeepSeekError> {
        let body = self.build_request(prompt);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(DeepSeekError::from_status(status, text));
        }

        let payload: ChatCompletionResponse = response.json().await?;
        into_completion(payload, &self.model)
    }
}

fn into_completion(
    payload: ChatCompletionResponse,
    requested_model: &str,
) -> Result<ChatCompletion, DeepSeekError> {
    let content = payload
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| DeepSeekError::InvalidResponse("响应中没有候选结果".to_string()))?;

    Ok(ChatCompletion {
        content,
        model: payload
            .model
            .unwrap_or_else(|| requested_model.to_string()),
        usage: payload.usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> DeepSeekConfig {
        DeepSeekConfig {
            api_key: api_key.to_string(),
            base_url: "https://api.deepseek.com/v1/".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            timeout: 60,
        }
    }

    #[test]
    fn test_missing_api_key() {
        let err = DeepSeekClient::new(&config("  ")).err().unwrap();
        assert_eq!(err, DeepSeekError::MissingApiKey);
        assert_eq!(GradeSysError::from(err).code(), "E014");
    }

    #[test]
    fn test_request_body() {
        let client = DeepSeekClient::new(&config("sk-test")).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://api.deepseek.com/v1/chat/completions"
        );

        let body = serde_json::to_value(client.build_request("分析该学生")).unwrap();
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["stream"], false);
        assert_eq!(body["max_tokens"], 4000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "分析该学生");
        assert!((body["top_p"].as_f64().unwrap() - 0.95).abs() < 1e-6);
        assert!((body["presence_penalty"].as_f64().unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_parse_response() {
        let payload: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "chatcmpl-1",
            "model": "deepseek-chat",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "# 报告"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        }))
        .unwrap();

        let completion = into_completion(payload, "deepseek-chat").unwrap();
        assert_eq!(completion.content, "# 报告");
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(15));

        let empty: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            into_completion(empty, "deepseek-chat"),
            Err(DeepSeekError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            DeepSeekError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            DeepSeekError::Authentication(_)
        ));
        assert!(matches!(
            DeepSeekError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            DeepSeekError::RateLimited(_)
        ));
        let err = DeepSeekError::from_status(StatusCode::BAD_GATEWAY, "upstream".to_string());
        assert_eq!(GradeSysError::from(err).code(), "E013");
    }
}
