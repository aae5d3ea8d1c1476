//! Web 路由定义

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};

use crate::web::{handlers::*, types::AppState};

/// 创建路由结构
///
/// 翻译路由接受任意方法，由处理器自己返回 204 / 405。
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/translate", any(api_translate))
        .route("/api/translate/", any(api_translate))
        .route("/translate", any(legacy_translate))
        .route("/translate/", any(legacy_translate))
        .route("/health", get(health).fallback(health_method_not_allowed))
        .fallback(not_found)
}
