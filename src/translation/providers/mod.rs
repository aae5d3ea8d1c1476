//! 翻译服务提供方
//!
//! - `BaiduTranslator`：主翻译服务（区域性机器翻译 API，app id + secret 签名）
//! - `ChatCompletionTranslator`：备用翻译服务（chat completions 接口，Bearer token）
//!
//! 每个提供方只尝试一次，不做重试；回退顺序由 `ProviderChain` 决定。

pub mod baidu;
pub mod chat;

use async_trait::async_trait;
use serde::Serialize;

use crate::translation::error::ProviderError;

pub use baidu::BaiduTranslator;
pub use chat::ChatCompletionTranslator;

/// 提供方在回退链中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Primary,
    Secondary,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Primary => "primary",
            ProviderKind::Secondary => "secondary",
        }
    }
}

/// 翻译服务接口
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 在回退链中的角色
    fn kind(&self) -> ProviderKind;

    /// 写入响应和缓存的提供方标识
    fn name(&self) -> &str;

    /// 翻译文本，返回去除首尾空白后的译文
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError>;
}

const MAX_ERROR_BODY_CHARS: usize = 300;

/// 截断错误响应体，避免把整页 HTML 写进日志和响应
pub(crate) fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut truncated: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    truncated.push('…');
    truncated
}

/// 规范化语言代码：去空白、转小写、下划线改为连字符
pub(crate) fn normalize_lang(code: &str) -> String {
    code.trim().to_lowercase().replace('_', "-")
}
