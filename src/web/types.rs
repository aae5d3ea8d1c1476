//! Web 模块的数据类型定义

use serde::Serialize;

use crate::translation::config::RoutePolicies;
use crate::translation::storage::CacheStatsSnapshot;
use crate::translation::TranslationService;

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: TranslationService,
    pub policies: RoutePolicies,
}

impl AppState {
    pub fn new(service: TranslationService, policies: RoutePolicies) -> Self {
        Self { service, policies }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: ProvidersHealth,
    pub cache: Option<CacheHealth>,
}

/// 已配置的翻译服务
#[derive(Debug, Serialize)]
pub struct ProvidersHealth {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

/// 缓存状态
#[derive(Debug, Serialize)]
pub struct CacheHealth {
    pub backend: &'static str,
    #[serde(flatten)]
    pub stats: CacheStatsSnapshot,
}
