// 集成测试公共模块
//
// 提供可编排的翻译服务、会失败的键值存储以及 HTTP 测试辅助工具

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use edge_translate::kv_store::{KvStore, MemoryKvStore};
use edge_translate::translation::{
    KvError, ProviderChain, ProviderError, ProviderKind, RoutePolicies, TranslationCache,
    TranslationProvider, TranslationService,
};
use edge_translate::web::{create_router, AppState};

/// 按脚本返回结果的翻译服务
pub struct ScriptedProvider {
    kind: ProviderKind,
    name: &'static str,
    outcome: Result<String, ProviderError>,
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, String, String)>>,
}

impl ScriptedProvider {
    pub fn succeeding(kind: ProviderKind, name: &'static str, translation: &str) -> Arc<Self> {
        Arc::new(Self {
            kind,
            name,
            outcome: Ok(translation.to_string()),
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    pub fn failing(kind: ProviderKind, name: &'static str, error: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            kind,
            name,
            outcome: Err(error),
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<(String, String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn name(&self) -> &str {
        self.name
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((
            text.to_string(),
            source_lang.to_string(),
            target_lang.to_string(),
        ));
        self.outcome.clone()
    }
}

/// 所有操作都失败的键值存储
#[derive(Default)]
pub struct UnreachableKvStore {
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

#[async_trait]
impl KvStore for UnreachableKvStore {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, KvError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Err(KvError::Network("connection refused".to_string()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), KvError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        Err(KvError::Network("connection refused".to_string()))
    }
}

/// 测试环境
pub struct TestEnvironment {
    pub primary: Arc<ScriptedProvider>,
    pub secondary: Arc<ScriptedProvider>,
    pub store: Arc<MemoryKvStore>,
    pub service: TranslationService,
}

impl TestEnvironment {
    pub fn new(primary: Arc<ScriptedProvider>, secondary: Arc<ScriptedProvider>) -> Self {
        let store = Arc::new(MemoryKvStore::new());
        let chain = ProviderChain::new([
            primary.clone() as Arc<dyn TranslationProvider>,
            secondary.clone() as Arc<dyn TranslationProvider>,
        ]);
        let service = TranslationService::new(
            chain,
            Some(TranslationCache::new(store.clone() as Arc<dyn KvStore>)),
        );

        Self {
            primary,
            secondary,
            store,
            service,
        }
    }

    /// 两个翻译服务都成功
    pub fn healthy() -> Self {
        Self::new(
            ScriptedProvider::succeeding(ProviderKind::Primary, "baidu", "你好"),
            ScriptedProvider::succeeding(ProviderKind::Secondary, "openai", "您好"),
        )
    }

    /// 主翻译服务网络故障
    pub fn primary_down() -> Self {
        Self::new(
            ScriptedProvider::failing(
                ProviderKind::Primary,
                "baidu",
                ProviderError::Network("connection reset".to_string()),
            ),
            ScriptedProvider::succeeding(ProviderKind::Secondary, "openai", "您好"),
        )
    }

    /// 两个翻译服务都失败
    pub fn all_down() -> Self {
        Self::new(
            ScriptedProvider::failing(
                ProviderKind::Primary,
                "baidu",
                ProviderError::Status {
                    status: 503,
                    body: "service unavailable".to_string(),
                },
            ),
            ScriptedProvider::failing(ProviderKind::Secondary, "openai", ProviderError::EmptyResult),
        )
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(self.service.clone(), RoutePolicies::default());
        create_router(Arc::new(state))
    }
}

/// HTTP 测试辅助工具
pub struct HttpHelper;

impl HttpHelper {
    pub fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn empty(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
        router.clone().oneshot(request).await.unwrap()
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = Self::body_bytes(response).await;
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    }
}
