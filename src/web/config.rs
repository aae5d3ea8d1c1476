//! Web 服务器配置
//!
//! 使用类型安全的环境变量系统进行配置管理

use crate::env::{self, EnvError, EnvResult, EnvVar};
use crate::translation::config::{CacheSettings, ProvidersConfig, RoutePolicies};

/// Web 服务器配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// 绑定地址
    pub bind_addr: String,
    /// 端口
    pub port: u16,
}

impl WebConfig {
    /// 从环境变量创建配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            bind_addr: env::web::BindAddress::get()?,
            port: env::web::Port::get()?,
        })
    }

    /// 验证配置
    pub fn validate(&self) -> EnvResult<()> {
        if self.bind_addr.is_empty() {
            return Err(EnvError {
                variable: env::web::BindAddress::NAME.to_string(),
                message: "Bind address cannot be empty".to_string(),
            });
        }

        if self.port == 0 {
            return Err(EnvError {
                variable: env::web::Port::NAME.to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// 获取完整的监听地址
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// 应用配置汇总
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub web: WebConfig,
    pub providers: ProvidersConfig,
    pub cache: CacheSettings,
    pub policies: RoutePolicies,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        let cache = CacheSettings::from_env()?;
        let config = Self {
            log_level: env::core::LogLevel::get()?,
            web: WebConfig::from_env()?,
            providers: ProvidersConfig::from_env()?,
            policies: RoutePolicies::from_env(&cache)?,
            cache,
        };
        config.web.validate()?;
        Ok(config)
    }

    /// 打印配置摘要（隐藏敏感信息）
    pub fn log_summary(&self) {
        let configured = |present: bool| if present { "configured" } else { "missing" };

        tracing::info!(
            listen = %self.web.listen_address(),
            log_level = %self.log_level,
            "Web 服务器配置"
        );
        tracing::info!(
            primary = configured(self.providers.primary.is_some()),
            secondary = configured(self.providers.secondary.is_some()),
            timeout_secs = self.providers.timeout.as_secs(),
            "翻译服务配置"
        );
        tracing::info!(
            enabled = self.cache.enabled,
            backend = if self.cache.rest_store.is_some() { "rest" } else { "memory" },
            ttl_secs = self.cache.ttl.as_secs(),
            memory_capacity = self.cache.memory_capacity,
            "缓存配置"
        );
        tracing::info!(
            api_max_text_length = self.policies.api.max_text_length,
            legacy_max_text_length = self.policies.legacy.max_text_length,
            "输入长度限制"
        );
    }
}
