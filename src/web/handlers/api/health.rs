//! 健康检查处理器

use std::sync::Arc;

use axum::{
    extract::State,
    response::{Json, Response},
};

use crate::translation::ProviderKind;
use crate::web::handlers::api::translation::method_not_allowed;
use crate::web::types::{AppState, CacheHealth, HealthResponse, ProvidersHealth};

/// 报告已配置的翻译服务和缓存状态，不包含任何凭据
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let service = &state.service;

    Json(HealthResponse {
        status: "ok",
        providers: ProvidersHealth {
            primary: service.provider_name(ProviderKind::Primary),
            secondary: service.provider_name(ProviderKind::Secondary),
        },
        cache: service.cache().map(|cache| CacheHealth {
            backend: cache.backend(),
            stats: cache.stats(),
        }),
    })
}

/// `/health` 只接受 GET / HEAD
pub async fn health_method_not_allowed() -> Response {
    method_not_allowed("GET, HEAD")
}
