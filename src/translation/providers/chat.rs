//! Chat completions 翻译客户端
//!
//! 把生成式模型当作翻译引擎使用。系统指令固定，要求模型只输出译文。

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{normalize_lang, truncate_body, ProviderKind, TranslationProvider};
use crate::translation::config::ChatConfig;
use crate::translation::error::ProviderError;

pub const PROVIDER_NAME: &str = "openai";

const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// 备用翻译服务
pub struct ChatCompletionTranslator {
    client: reqwest::Client,
    config: ChatConfig,
}

impl ChatCompletionTranslator {
    pub fn new(config: ChatConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }
}

/// 语言代码对应的英文名称，用于系统指令
pub fn language_name(code: &str) -> String {
    let code = normalize_lang(code);
    let name = match code.as_str() {
        "zh" | "zh-cn" | "zh-hans" => "Simplified Chinese",
        "zh-tw" | "zh-hk" | "zh-hant" | "cht" => "Traditional Chinese",
        "en" | "en-us" | "en-gb" => "English",
        "ja" | "jp" => "Japanese",
        "ko" | "kor" => "Korean",
        "fr" | "fra" => "French",
        "de" => "German",
        "es" | "spa" => "Spanish",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ar" | "ara" => "Arabic",
        "vi" | "vie" => "Vietnamese",
        "th" => "Thai",
        other => return other.to_string(),
    };
    name.to_string()
}

/// 构造系统指令
pub fn system_instruction(source_lang: &str, target_lang: &str) -> String {
    let target = language_name(target_lang);
    let direction = match normalize_lang(source_lang).as_str() {
        "" | "auto" => format!("Detect the language of the user's text and translate it into {}.", target),
        _ => format!(
            "Translate the user's text from {} into {}.",
            language_name(source_lang),
            target
        ),
    };

    format!(
        "You are a professional translation engine. {} \
         Output only the translated text. Do not add explanations, notes, quotation marks, \
         or any other commentary, and keep the original line breaks.",
        direction
    )
}

fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("{}: {}", e, truncate_body(body))))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("response contains no choices".to_string()))?;

    let content = choice.message.content.unwrap_or_default();
    let content = content.trim();
    if content.is_empty() {
        return Err(ProviderError::EmptyResult);
    }
    Ok(content.to_string())
}

#[async_trait]
impl TranslationProvider for ChatCompletionTranslator {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Secondary
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        let instruction = system_instruction(source_lang, target_lang);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &instruction,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: TEMPERATURE,
            stream: false,
        };

        tracing::debug!(provider = PROVIDER_NAME, model = %self.config.model, "调用备用翻译服务");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_response(&body)
    }
}
