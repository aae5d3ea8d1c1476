//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问。凭据类变量没有默认值，
//! 缺失时由调用方视为"服务不可用"，而不是启动失败。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 读取可选变量：未设置或为空白时返回 `None`，值非法时仍然报错
    fn get_optional() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) if !value.trim().is_empty() => Self::parse(&value).map(Some),
            _ => Ok(None),
        }
    }

    /// 读取失败时使用给定的值，用于配置加载之前的启动阶段
    fn get_or_default(fallback: T) -> T {
        Self::get().unwrap_or(fallback)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "EDGE_TRANSLATE_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.trim().to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "EDGE_TRANSLATE_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Web server bind address";

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "EDGE_TRANSLATE_PORT";
        const DEFAULT: Option<u16> = Some(8787);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;

            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }

            Ok(port)
        }
    }
}

/// 主翻译服务（百度翻译开放平台）相关环境变量
pub mod primary {
    use super::*;

    /// 应用 ID
    pub struct AppId;
    impl EnvVar<String> for AppId {
        const NAME: &'static str = "BAIDU_APP_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Primary translation provider app id";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 应用密钥
    pub struct SecretKey;
    impl EnvVar<String> for SecretKey {
        const NAME: &'static str = "BAIDU_SECRET_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Primary translation provider secret key";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// API 地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "BAIDU_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("https://fanyi-api.baidu.com/api/trans/vip/translate".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Primary translation provider endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_url(value, Self::NAME)
        }
    }
}

/// 备用翻译服务（OpenAI 兼容的 chat completions 接口）相关环境变量
pub mod secondary {
    use super::*;

    /// Bearer token
    pub struct ApiKey;
    impl EnvVar<String> for ApiKey {
        const NAME: &'static str = "LLM_API_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Chat completion API bearer token";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// API 基础地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "LLM_API_URL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("https://api.openai.com/v1".to_string()),
            }
        }
        const DESCRIPTION: &'static str =
            "Chat completion API base URL (/chat/completions is appended)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_url(value, Self::NAME).map(|url| url.trim_end_matches('/').to_string())
        }
    }

    /// 模型名称
    pub struct Model;
    impl EnvVar<String> for Model {
        const NAME: &'static str = "LLM_MODEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("gpt-4o-mini".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Chat completion model used as a translator";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 翻译服务通用环境变量
pub mod providers {
    use super::*;

    /// 单次调用超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "PROVIDER_TIMEOUT_SECONDS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(25));
        const DESCRIPTION: &'static str = "Timeout for a single provider call in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout must be greater than 0".to_string(),
                });
            }

            if seconds > 120 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Timeout too long (max 120 seconds)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 缓存启用状态
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "EDGE_TRANSLATE_CACHE_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable the translation cache";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// REST 键值存储地址
    pub struct RestUrl;
    impl EnvVar<String> for RestUrl {
        const NAME: &'static str = "KV_REST_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "REST key-value store URL";

        fn parse(value: &str) -> EnvResult<String> {
            parse_url(value, Self::NAME).map(|url| url.trim_end_matches('/').to_string())
        }
    }

    /// REST 键值存储令牌
    pub struct RestToken;
    impl EnvVar<String> for RestToken {
        const NAME: &'static str = "KV_REST_API_TOKEN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "REST key-value store bearer token";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 缓存TTL
    pub struct Ttl;
    impl EnvVar<Duration> for Ttl {
        const NAME: &'static str = "CACHE_TTL_SECONDS";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(604_800));
        const DESCRIPTION: &'static str = "Cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of seconds".to_string(),
            })?;

            if seconds < 60 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too short (minimum 60 seconds)".to_string(),
                });
            }

            if seconds > 86400 * 30 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "TTL too long (maximum 30 days)".to_string(),
                });
            }

            Ok(Duration::from_secs(seconds))
        }
    }

    /// 进程内缓存容量
    pub struct MemoryMaxEntries;
    impl EnvVar<usize> for MemoryMaxEntries {
        const NAME: &'static str = "CACHE_MEMORY_MAX_ENTRIES";
        const DEFAULT: Option<usize> = Some(10_000);
        const DESCRIPTION: &'static str =
            "Maximum entries kept by the in-process cache when no REST store is configured";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1_000_000)
        }
    }
}

/// 输入长度限制
pub mod limits {
    use super::*;

    /// `/api/translate` 的最大字符数
    pub struct ApiMaxTextLength;
    impl EnvVar<usize> for ApiMaxTextLength {
        const NAME: &'static str = "API_MAX_TEXT_LENGTH";
        const DEFAULT: Option<usize> = Some(5000);
        const DESCRIPTION: &'static str = "Maximum text length (characters) on /api/translate";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }

    /// `/translate` 的最大字符数
    pub struct LegacyMaxTextLength;
    impl EnvVar<usize> for LegacyMaxTextLength {
        const NAME: &'static str = "LEGACY_MAX_TEXT_LENGTH";
        const DEFAULT: Option<usize> = Some(1000);
        const DESCRIPTION: &'static str = "Maximum text length (characters) on /translate";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_url(value: &str, var_name: &str) -> EnvResult<String> {
    let url = value.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: "URL must start with http:// or https://".to_string(),
        })
    }
}

fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn doc_line<T: fmt::Debug>(name: &str, description: &str, default: Option<T>) -> String {
    match default {
        Some(default) => format!("- `{}`: {} (default: {:?})\n", name, description, default),
        None => format!("- `{}`: {}\n", name, description),
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&doc_line(core::LogLevel::NAME, core::LogLevel::DESCRIPTION, Some("info")));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&doc_line(web::BindAddress::NAME, web::BindAddress::DESCRIPTION, Some("127.0.0.1")));
    docs.push_str(&doc_line(web::Port::NAME, web::Port::DESCRIPTION, web::Port::DEFAULT));

    docs.push_str("\n## Primary Provider\n\n");
    docs.push_str(&doc_line::<String>(primary::AppId::NAME, primary::AppId::DESCRIPTION, None));
    docs.push_str(&doc_line::<String>(primary::SecretKey::NAME, primary::SecretKey::DESCRIPTION, None));
    docs.push_str(&doc_line(
        primary::ApiUrl::NAME,
        primary::ApiUrl::DESCRIPTION,
        Some("https://fanyi-api.baidu.com/api/trans/vip/translate"),
    ));

    docs.push_str("\n## Secondary Provider\n\n");
    docs.push_str(&doc_line::<String>(secondary::ApiKey::NAME, secondary::ApiKey::DESCRIPTION, None));
    docs.push_str(&doc_line(
        secondary::ApiUrl::NAME,
        secondary::ApiUrl::DESCRIPTION,
        Some("https://api.openai.com/v1"),
    ));
    docs.push_str(&doc_line(secondary::Model::NAME, secondary::Model::DESCRIPTION, Some("gpt-4o-mini")));
    docs.push_str(&doc_line(
        providers::Timeout::NAME,
        providers::Timeout::DESCRIPTION,
        providers::Timeout::DEFAULT,
    ));

    docs.push_str("\n## Cache Configuration\n\n");
    docs.push_str(&doc_line(cache::Enabled::NAME, cache::Enabled::DESCRIPTION, cache::Enabled::DEFAULT));
    docs.push_str(&doc_line::<String>(cache::RestUrl::NAME, cache::RestUrl::DESCRIPTION, None));
    docs.push_str(&doc_line::<String>(cache::RestToken::NAME, cache::RestToken::DESCRIPTION, None));
    docs.push_str(&doc_line(cache::Ttl::NAME, cache::Ttl::DESCRIPTION, cache::Ttl::DEFAULT));
    docs.push_str(&doc_line(
        cache::MemoryMaxEntries::NAME,
        cache::MemoryMaxEntries::DESCRIPTION,
        cache::MemoryMaxEntries::DEFAULT,
    ));

    docs.push_str("\n## Limits\n\n");
    docs.push_str(&doc_line(
        limits::ApiMaxTextLength::NAME,
        limits::ApiMaxTextLength::DESCRIPTION,
        limits::ApiMaxTextLength::DEFAULT,
    ));
    docs.push_str(&doc_line(
        limits::LegacyMaxTextLength::NAME,
        limits::LegacyMaxTextLength::DESCRIPTION,
        limits::LegacyMaxTextLength::DEFAULT,
    ));

    docs
}
