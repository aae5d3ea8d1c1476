//! 错误处理集成测试
//!
//! 缓存不可用或数据损坏时，翻译请求仍然成功

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{HttpHelper, ScriptedProvider, UnreachableKvStore};
use edge_translate::kv_store::{KvStore, MemoryKvStore};
use edge_translate::translation::{
    CacheKey, ProviderChain, ProviderKind, RoutePolicies, RoutePolicy, TranslationCache,
    TranslationProvider, TranslationRequest, TranslationService,
};
use edge_translate::web::{create_router, error_response, AppState};
use edge_translate::TranslationError;

fn service_with_store(store: Arc<dyn KvStore>) -> (TranslationService, Arc<ScriptedProvider>) {
    let primary = ScriptedProvider::succeeding(ProviderKind::Primary, "baidu", "你好");
    let chain = ProviderChain::new([primary.clone() as Arc<dyn TranslationProvider>]);
    let service = TranslationService::new(chain, Some(TranslationCache::new(store)));
    (service, primary)
}

/// 存储不可达时降级为实时翻译
#[tokio::test]
async fn test_unreachable_store_degrades_to_live_translation() {
    let store = Arc::new(UnreachableKvStore::default());
    let (service, primary) = service_with_store(store.clone());
    let policy = RoutePolicy::api_default();
    let request = TranslationRequest::new("Hello").with_languages("en", "zh");

    let first = service.translate(&request, &policy).await.unwrap();
    let second = service.translate(&request, &policy).await.unwrap();

    assert!(!first.from_cache);
    assert!(!second.from_cache);
    assert_eq!(primary.calls(), 2);
    assert_eq!(store.gets.load(Ordering::SeqCst), 2);
    assert_eq!(store.sets.load(Ordering::SeqCst), 2);

    let stats = service.cache().unwrap().stats();
    assert_eq!(stats.errors, 4);
    assert_eq!(stats.writes, 0);
    println!("✅ 缓存故障不影响翻译结果");
}

/// HTTP 层在缓存故障时仍返回 200
#[tokio::test]
async fn test_unreachable_store_over_http() {
    let (service, _primary) = service_with_store(Arc::new(UnreachableKvStore::default()));
    let router = create_router(Arc::new(AppState::new(service, RoutePolicies::default())));

    let response = HttpHelper::send(
        &router,
        HttpHelper::post_json("/api/translate", r#"{"text":"Hello"}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = HttpHelper::body_json(response).await;
    assert_eq!(json["translation"], "你好");
    assert_eq!(json["fromCache"], false);
}

/// 损坏的缓存条目被当作未命中并被覆盖
#[tokio::test]
async fn test_corrupt_cache_entry_is_overwritten() {
    let store = Arc::new(MemoryKvStore::new());
    let key = CacheKey::derive("Hello", "en", "zh");
    store.insert_raw(key.as_str(), "not json", Duration::from_secs(60));

    let (service, primary) = service_with_store(store.clone());
    let policy = RoutePolicy::api_default();
    let request = TranslationRequest::new("Hello").with_languages("en", "zh");

    let first = service.translate(&request, &policy).await.unwrap();
    assert!(!first.from_cache);
    assert_eq!(primary.calls(), 1);

    let second = service.translate(&request, &policy).await.unwrap();
    assert!(second.from_cache);
    assert_eq!(primary.calls(), 1);
}

/// 过期条目不会被返回
#[tokio::test]
async fn test_expired_entry_is_ignored() {
    let store = Arc::new(MemoryKvStore::new());
    let (service, primary) = service_with_store(store.clone());
    let policy = RoutePolicy::api_default().with_cache_ttl(Duration::from_millis(20));
    let request = TranslationRequest::new("Hello").with_languages("en", "zh");

    service.translate(&request, &policy).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let again = service.translate(&request, &policy).await.unwrap();

    assert!(!again.from_cache);
    assert_eq!(primary.calls(), 2);
}

/// 错误到 HTTP 响应的映射
#[tokio::test]
async fn test_error_response_mapping() {
    let response = error_response(&TranslationError::InvalidInput("bad".to_string()));
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = HttpHelper::body_json(response).await;
    assert_eq!(json["error"], "bad");
    assert!(json.get("details").is_none());

    let response = error_response(&TranslationError::NoProviderAvailable);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = HttpHelper::body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Translation failed"));
}
