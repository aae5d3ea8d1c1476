//! 翻译模块统一错误处理
//!
//! 按层划分错误类型：翻译服务调用错误、键值存储错误，以及请求级别的
//! `TranslationError`。只有 `TranslationError` 会到达 HTTP 边界。

use std::fmt;

use thiserror::Error;

/// 单个翻译服务调用失败的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// 网络错误
    #[error("network error: {0}")]
    Network(String),

    /// 超时错误
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 非 2xx 响应
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// 服务端返回的业务错误码
    #[error("provider error {code}: {message}")]
    Api { code: String, message: String },

    /// 响应结构无法解析
    #[error("malformed response: {0}")]
    Malformed(String),

    /// 译文为空
    #[error("provider returned an empty translation")]
    EmptyResult,
}

impl ProviderError {
    /// 检查是否为超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ProviderError::Timeout(error.to_string())
        } else if error.is_decode() {
            ProviderError::Malformed(error.to_string())
        } else {
            ProviderError::Network(error.to_string())
        }
    }
}

/// 键值存储错误
#[derive(Error, Debug, Clone)]
pub enum KvError {
    #[error("store unreachable: {0}")]
    Network(String),

    #[error("store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for KvError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            KvError::Serialization(error.to_string())
        } else {
            KvError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for KvError {
    fn from(error: serde_json::Error) -> Self {
        KvError::Serialization(error.to_string())
    }
}

/// 链路中某个翻译服务的失败记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    pub error: ProviderError,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.error)
    }
}

/// 请求级翻译错误
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 输入验证错误
    #[error("{0}")]
    InvalidInput(String),

    /// 所有翻译服务均失败
    #[error("Translation failed: all providers failed")]
    ProvidersExhausted { attempts: Vec<ProviderFailure> },

    /// 没有可用的翻译服务
    #[error("Translation failed: no translation provider is available")]
    NoProviderAvailable,
}

impl TranslationError {
    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            TranslationError::InvalidInput(_) => 400,
            TranslationError::ProvidersExhausted { .. } | TranslationError::NoProviderAvailable => {
                500
            }
        }
    }

    /// 翻译服务的错误详情，用于 500 响应体
    pub fn details(&self) -> Option<String> {
        match self {
            TranslationError::ProvidersExhausted { attempts } if !attempts.is_empty() => Some(
                attempts
                    .iter()
                    .map(ProviderFailure::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            _ => None,
        }
    }

    /// 是否为调用方的输入问题
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }
}
