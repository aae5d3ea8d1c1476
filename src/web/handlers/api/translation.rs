//! 翻译API处理器
//!
//! `/api/translate` 与 `/translate` 共用同一套流程，只是路由策略不同
//! （响应字段名、长度限制等）。

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::translation::config::RoutePolicy;
use crate::translation::{TranslationError, TranslationRequest};
use crate::web::types::{AppState, ErrorResponse};

/// `/api/translate`
pub async fn api_translate(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle_translate(&state, "/api/translate", &state.policies.api, method, body).await
}

/// `/translate`
pub async fn legacy_translate(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    handle_translate(&state, "/translate", &state.policies.legacy, method, body).await
}

async fn handle_translate(
    state: &AppState,
    route: &'static str,
    policy: &RoutePolicy,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match method {
        Method::OPTIONS => StatusCode::NO_CONTENT.into_response(),
        Method::POST => match body {
            Ok(body) => translate(state, route, policy, &body).await,
            Err(rejection) => body_rejected(route, rejection),
        },
        other => {
            tracing::debug!(route, method = %other, "不支持的请求方法");
            method_not_allowed("POST, OPTIONS")
        }
    }
}

/// 请求体读取失败（超过大小限制或连接中断）
fn body_rejected(route: &'static str, rejection: BytesRejection) -> Response {
    let status = rejection.status();
    tracing::info!(route, status = %status, error = %rejection.body_text(), "请求体读取失败");

    let error = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body is too large".to_string()
    } else {
        rejection.body_text()
    };
    (status, Json(ErrorResponse { error, details: None })).into_response()
}

async fn translate(state: &AppState, route: &'static str, policy: &RoutePolicy, body: &[u8]) -> Response {
    let started = Instant::now();
    let request = TranslationRequest::from_body(body);

    match state.service.translate(&request, policy).await {
        Ok(result) => {
            tracing::info!(
                route,
                provider = %result.provider,
                from_cache = result.from_cache,
                source = %result.source_language,
                target = %result.target_language,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "翻译请求完成"
            );
            (StatusCode::OK, Json(result.to_json(policy.response_field))).into_response()
        }
        Err(error) => {
            if error.is_client_error() {
                tracing::info!(route, error = %error, "翻译请求验证失败");
            } else {
                tracing::error!(
                    route,
                    error = %error,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "翻译请求失败"
                );
            }
            error_response(&error)
        }
    }
}

/// 把翻译错误转换为 JSON 响应
pub fn error_response(error: &TranslationError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        error: error.to_string(),
        details: error.details(),
    };
    (status, Json(body)).into_response()
}

/// 405 响应，`allow` 为该路径支持的方法
pub fn method_not_allowed(allow: &'static str) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, allow)],
        Json(ErrorResponse {
            error: "Method not allowed".to_string(),
            details: None,
        }),
    )
        .into_response()
}
