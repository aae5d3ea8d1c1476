//! 百度翻译开放平台客户端
//!
//! 通用翻译接口：表单 POST，签名为 `md5(appid + q + salt + secret)`。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{normalize_lang, truncate_body, ProviderKind, TranslationProvider};
use crate::translation::config::BaiduConfig;
use crate::translation::error::ProviderError;

pub const PROVIDER_NAME: &str = "baidu";

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    error_msg: Option<String>,
    #[serde(default)]
    trans_result: Option<Vec<BaiduSegment>>,
}

#[derive(Debug, Deserialize)]
struct BaiduSegment {
    dst: String,
}

/// 主翻译服务
pub struct BaiduTranslator {
    client: reqwest::Client,
    config: BaiduConfig,
}

impl BaiduTranslator {
    pub fn new(config: BaiduConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn sign(&self, text: &str, salt: &str) -> String {
        sign(&self.config.app_id, text, salt, &self.config.secret_key)
    }
}

/// 请求签名
pub fn sign(app_id: &str, text: &str, salt: &str, secret_key: &str) -> String {
    let input = format!("{}{}{}{}", app_id, text, salt, secret_key);
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// 把 ISO 639-1 风格的语言代码映射为百度使用的代码
pub fn map_language(code: &str) -> String {
    let code = normalize_lang(code);
    let mapped = match code.as_str() {
        "" | "auto" => "auto",
        "zh" | "zh-cn" | "zh-hans" | "zh-sg" => "zh",
        "zh-tw" | "zh-hk" | "zh-hant" | "cht" => "cht",
        "ja" | "jp" => "jp",
        "ko" | "kor" => "kor",
        "fr" | "fra" => "fra",
        "es" | "spa" => "spa",
        "ar" | "ara" => "ara",
        "vi" | "vie" => "vie",
        "bg" => "bul",
        "et" => "est",
        "da" => "dan",
        "fi" => "fin",
        "ro" => "rom",
        "sl" => "slo",
        "sv" => "swe",
        "yue" => "yue",
        "en-us" | "en-gb" => "en",
        other => return other.to_string(),
    };
    mapped.to_string()
}

fn parse_response(body: &str) -> Result<String, ProviderError> {
    let response: BaiduResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("{}: {}", e, truncate_body(body))))?;

    if let Some(code) = response.error_code {
        let code = match code {
            Value::String(code) => code,
            other => other.to_string(),
        };
        // 52000 表示成功，部分网关会显式返回
        if code != "52000" {
            return Err(ProviderError::Api {
                code,
                message: response.error_msg.unwrap_or_default(),
            });
        }
    }

    let segments = response
        .trans_result
        .ok_or_else(|| ProviderError::Malformed("missing trans_result".to_string()))?;

    let translation = segments
        .into_iter()
        .map(|segment| segment.dst)
        .collect::<Vec<_>>()
        .join("\n");

    let translation = translation.trim();
    if translation.is_empty() {
        return Err(ProviderError::EmptyResult);
    }
    Ok(translation.to_string())
}

#[async_trait]
impl TranslationProvider for BaiduTranslator {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Primary
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
        let salt = chrono::Utc::now().timestamp_millis().to_string();
        let from = map_language(source_lang);
        let to = map_language(target_lang);
        let sign = self.sign(text, &salt);

        let params = [
            ("q", text),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("appid", self.config.app_id.as_str()),
            ("salt", salt.as_str()),
            ("sign", sign.as_str()),
        ];

        tracing::debug!(provider = PROVIDER_NAME, from = %from, to = %to, "调用主翻译服务");

        let response = self
            .client
            .post(&self.config.api_url)
            .form(&params)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_matches_reference() {
        // 官方文档示例：appid=2015063000000001, q=apple, salt=1435660288, key=12345678
        assert_eq!(
            sign("2015063000000001", "apple", "1435660288", "12345678"),
            "f89f9594663708c1605f3d736d01d2d4"
        );
    }

    #[test]
    fn test_language_mapping() {
        assert_eq!(map_language("auto"), "auto");
        assert_eq!(map_language("zh-CN"), "zh");
        assert_eq!(map_language("zh_TW"), "cht");
        assert_eq!(map_language("ja"), "jp");
        assert_eq!(map_language("ko"), "kor");
        assert_eq!(map_language("fr"), "fra");
        assert_eq!(map_language("es"), "spa");
        assert_eq!(map_language("en"), "en");
        assert_eq!(map_language("de"), "de");
    }

    #[test]
    fn test_parse_joins_segments() {
        let body = r#"{"from":"en","to":"zh","trans_result":[{"src":"hello","dst":"你好"},{"src":"world","dst":"世界"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "你好\n世界");
    }

    #[test]
    fn test_parse_error_code() {
        let body = r#"{"error_code":"54001","error_msg":"Invalid Sign"}"#;
        assert_eq!(
            parse_response(body).unwrap_err(),
            ProviderError::Api {
                code: "54001".to_string(),
                message: "Invalid Sign".to_string()
            }
        );

        let numeric = r#"{"error_code":54003,"error_msg":"Invalid Access Limit"}"#;
        assert!(matches!(
            parse_response(numeric),
            Err(ProviderError::Api { ref code, .. }) if code == "54003"
        ));
    }

    #[test]
    fn test_parse_malformed_and_empty() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(ProviderError::Malformed(_))
        ));
        assert!(matches!(
            parse_response(r#"{"from":"en","to":"zh"}"#),
            Err(ProviderError::Malformed(_))
        ));
        assert_eq!(
            parse_response(r#"{"trans_result":[{"src":"a","dst":"  "}]}"#).unwrap_err(),
            ProviderError::EmptyResult
        );
    }
}
