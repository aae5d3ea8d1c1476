//! Web 路由处理器

pub mod api;

pub use api::*;

use axum::{http::StatusCode, response::Json};

use crate::web::types::ErrorResponse;

/// 未匹配路由
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Not found".to_string(),
            details: None,
        }),
    )
}
