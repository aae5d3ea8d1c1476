//! 翻译配置模块
//!
//! 配置在启动时从环境变量加载一次，然后通过构造函数注入到各组件中。
//! 缺失凭据的翻译服务被视为不可用，而不是配置错误。

use std::time::Duration;

use serde::Serialize;

use crate::env::{self, EnvResult, EnvVar};
use crate::kv_store::RestKvConfig;
use crate::translation::providers::ProviderKind;

/// 翻译配置常量
pub mod constants {
    use std::time::Duration;

    pub const DEFAULT_SOURCE_LANG: &str = "auto";
    pub const DEFAULT_TARGET_LANG: &str = "zh";
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    pub const DEFAULT_KV_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_API_MAX_TEXT_LENGTH: usize = 5000;
    pub const DEFAULT_LEGACY_MAX_TEXT_LENGTH: usize = 1000;
    pub const DEFAULT_MEMORY_CAPACITY: usize = crate::kv_store::DEFAULT_MEMORY_CAPACITY;
}

/// 主翻译服务配置
#[derive(Debug, Clone)]
pub struct BaiduConfig {
    pub app_id: String,
    pub secret_key: String,
    pub api_url: String,
}

impl BaiduConfig {
    /// 从环境变量创建配置，凭据不全时返回 `None`
    pub fn from_env() -> EnvResult<Option<Self>> {
        let app_id = env::primary::AppId::get_optional()?;
        let secret_key = env::primary::SecretKey::get_optional()?;

        match (app_id, secret_key) {
            (Some(app_id), Some(secret_key)) => Ok(Some(Self {
                app_id,
                secret_key,
                api_url: env::primary::ApiUrl::get()?,
            })),
            _ => Ok(None),
        }
    }
}

/// 备用翻译服务配置
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl ChatConfig {
    /// 从环境变量创建配置，未设置 API key 时返回 `None`
    pub fn from_env() -> EnvResult<Option<Self>> {
        let Some(api_key) = env::secondary::ApiKey::get_optional()? else {
            return Ok(None);
        };

        Ok(Some(Self {
            api_key,
            api_url: env::secondary::ApiUrl::get()?,
            model: env::secondary::Model::get()?,
        }))
    }
}

/// 翻译服务配置汇总
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub primary: Option<BaiduConfig>,
    pub secondary: Option<ChatConfig>,
    pub timeout: Duration,
}

impl ProvidersConfig {
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            primary: BaiduConfig::from_env()?,
            secondary: ChatConfig::from_env()?,
            timeout: env::providers::Timeout::get()?,
        })
    }
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    /// 未配置时使用进程内存储
    pub rest_store: Option<RestKvConfig>,
    /// 两个路由共用的缓存有效期
    pub ttl: Duration,
    /// 进程内存储的最大条目数
    pub memory_capacity: usize,
}

impl CacheSettings {
    pub fn from_env() -> EnvResult<Self> {
        let rest_store = match (
            env::cache::RestUrl::get_optional()?,
            env::cache::RestToken::get_optional()?,
        ) {
            (Some(url), Some(token)) => Some(RestKvConfig {
                url,
                token,
                timeout: constants::DEFAULT_KV_TIMEOUT,
            }),
            _ => None,
        };

        Ok(Self {
            enabled: env::cache::Enabled::get()?,
            rest_store,
            ttl: env::cache::Ttl::get()?,
            memory_capacity: env::cache::MemoryMaxEntries::get()?,
        })
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rest_store: None,
            ttl: constants::DEFAULT_CACHE_TTL,
            memory_capacity: constants::DEFAULT_MEMORY_CAPACITY,
        }
    }
}

/// 响应中译文字段的名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseField {
    /// `translation`
    Translation,
    /// `translatedText`
    TranslatedText,
}

impl ResponseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseField::Translation => "translation",
            ResponseField::TranslatedText => "translatedText",
        }
    }
}

/// 单个路由的翻译策略
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// 翻译服务尝试顺序
    pub provider_order: Vec<ProviderKind>,
    pub cache_ttl: Duration,
    /// 最大字符数（按 Unicode 标量计）
    pub max_text_length: usize,
    pub response_field: ResponseField,
}

impl RoutePolicy {
    /// `/api/translate` 的默认策略
    pub fn api_default() -> Self {
        Self {
            provider_order: vec![ProviderKind::Primary, ProviderKind::Secondary],
            cache_ttl: constants::DEFAULT_CACHE_TTL,
            max_text_length: constants::DEFAULT_API_MAX_TEXT_LENGTH,
            response_field: ResponseField::Translation,
        }
    }

    /// `/translate` 的默认策略
    pub fn legacy_default() -> Self {
        Self {
            provider_order: vec![ProviderKind::Primary, ProviderKind::Secondary],
            cache_ttl: constants::DEFAULT_CACHE_TTL,
            max_text_length: constants::DEFAULT_LEGACY_MAX_TEXT_LENGTH,
            response_field: ResponseField::TranslatedText,
        }
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_max_text_length(mut self, max_text_length: usize) -> Self {
        self.max_text_length = max_text_length;
        self
    }

    pub fn with_provider_order(mut self, order: Vec<ProviderKind>) -> Self {
        self.provider_order = order;
        self
    }
}

/// 各路由的策略
#[derive(Debug, Clone)]
pub struct RoutePolicies {
    pub api: RoutePolicy,
    pub legacy: RoutePolicy,
}

impl RoutePolicies {
    /// 从环境变量加载长度限制，缓存有效期取自缓存配置
    pub fn from_env(cache: &CacheSettings) -> EnvResult<Self> {
        let mut policies = Self::for_cache(cache);
        policies.api.max_text_length = env::limits::ApiMaxTextLength::get()?;
        policies.legacy.max_text_length = env::limits::LegacyMaxTextLength::get()?;
        Ok(policies)
    }

    /// 默认策略，缓存有效期使用 `cache.ttl`
    pub fn for_cache(cache: &CacheSettings) -> Self {
        Self {
            api: RoutePolicy::api_default().with_cache_ttl(cache.ttl),
            legacy: RoutePolicy::legacy_default().with_cache_ttl(cache.ttl),
        }
    }
}

impl Default for RoutePolicies {
    fn default() -> Self {
        Self {
            api: RoutePolicy::api_default(),
            legacy: RoutePolicy::legacy_default(),
        }
    }
}
