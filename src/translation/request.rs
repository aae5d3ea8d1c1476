//! 翻译请求与结果模型
//!
//! 请求体解析是宽松的：无法解析的 JSON 或非对象 JSON 一律当作 `{}`，
//! 后续的验证步骤再给出清晰的 400 错误。

use serde::Serialize;
use serde_json::{Map, Value};

use crate::translation::config::{constants, ResponseField};
use crate::translation::error::{helpers, TranslationResult};

/// 单次翻译请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// 原文；字段缺失或不是字符串时为 `None`
    pub text: Option<String>,
    pub source_language: String,
    pub target_language: String,
    /// 是否优先使用主翻译服务
    pub prefer_primary: bool,
    pub skip_cache: bool,
}

impl Default for TranslationRequest {
    fn default() -> Self {
        Self {
            text: None,
            source_language: constants::DEFAULT_SOURCE_LANG.to_string(),
            target_language: constants::DEFAULT_TARGET_LANG.to_string(),
            prefer_primary: true,
            skip_cache: false,
        }
    }
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_language = source.into();
        self.target_language = target.into();
        self
    }

    pub fn with_skip_cache(mut self, skip_cache: bool) -> Self {
        self.skip_cache = skip_cache;
        self
    }

    pub fn with_prefer_primary(mut self, prefer_primary: bool) -> Self {
        self.prefer_primary = prefer_primary;
        self
    }

    /// 从原始请求体解析
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                if !body.is_empty() {
                    tracing::debug!(error = %e, "请求体不是合法 JSON，按空对象处理");
                }
                Value::Object(Map::new())
            }
        };
        Self::from_value(&value)
    }

    /// 从 JSON 值解析，兼容两套字段名
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let object = value.as_object().unwrap_or(&empty);
        let defaults = Self::default();

        Self {
            text: object
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string),
            source_language: language_field(object, &["sourceLanguage", "from"])
                .unwrap_or(defaults.source_language),
            target_language: language_field(object, &["targetLanguage", "to"])
                .unwrap_or(defaults.target_language),
            prefer_primary: bool_field(object, &["useBaidu", "usePrimary"])
                .unwrap_or(defaults.prefer_primary),
            skip_cache: bool_field(object, &["skipCache"]).unwrap_or(defaults.skip_cache),
        }
    }

    /// 验证请求，返回原文
    pub fn validate(&self, max_text_length: usize) -> TranslationResult<&str> {
        let text = match self.text.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                return Err(helpers::validation_error(
                    "Text is required and must be a non-empty string",
                ))
            }
        };

        let length = text.chars().count();
        if length > max_text_length {
            return Err(helpers::validation_error(format!(
                "Text is too long: {} characters (maximum {})",
                length, max_text_length
            )));
        }

        Ok(text)
    }
}

fn language_field(object: &Map<String, Value>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| object.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn bool_field(object: &Map<String, Value>, names: &[&str]) -> Option<bool> {
    names
        .iter()
        .find_map(|name| object.get(*name).and_then(Value::as_bool))
}

/// 返回给调用方的翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedText {
    pub translation: String,
    pub source_language: String,
    pub target_language: String,
    pub provider: String,
    pub from_cache: bool,
}

impl TranslatedText {
    /// 按路由约定的字段名渲染响应体
    pub fn to_json(&self, field: ResponseField) -> Value {
        let mut body = Map::new();
        body.insert(field.as_str().to_string(), Value::from(self.translation.as_str()));
        body.insert("sourceLanguage".to_string(), Value::from(self.source_language.as_str()));
        body.insert("targetLanguage".to_string(), Value::from(self.target_language.as_str()));
        body.insert("provider".to_string(), Value::from(self.provider.as_str()));
        body.insert("fromCache".to_string(), Value::from(self.from_cache));
        Value::Object(body)
    }
}
