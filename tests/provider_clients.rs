//! 外部服务客户端集成测试
//!
//! 使用 wiremock 模拟主、备翻译服务和 REST 键值存储

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edge_translate::kv_store::{KvStore, RestKvConfig, RestKvStore};
use edge_translate::translation::providers::{BaiduTranslator, ChatCompletionTranslator};
use edge_translate::translation::{
    BaiduConfig, ChatConfig, KvError, ProviderError, TranslationProvider,
};

const TIMEOUT: Duration = Duration::from_secs(5);

fn baidu(server: &MockServer) -> BaiduTranslator {
    let config = BaiduConfig {
        app_id: "test-app".to_string(),
        secret_key: "test-secret".to_string(),
        api_url: format!("{}/api/trans/vip/translate", server.uri()),
    };
    BaiduTranslator::new(config, TIMEOUT).unwrap()
}

fn chat(server: &MockServer) -> ChatCompletionTranslator {
    let config = ChatConfig {
        api_key: "sk-test".to_string(),
        api_url: format!("{}/v1/", server.uri()),
        model: "gpt-4o-mini".to_string(),
    };
    ChatCompletionTranslator::new(config, TIMEOUT).unwrap()
}

fn rest_store(server: &MockServer) -> RestKvStore {
    RestKvStore::new(RestKvConfig {
        url: server.uri(),
        token: "kv-token".to_string(),
        timeout: TIMEOUT,
    })
    .unwrap()
}

/// 主翻译服务：表单参数、语言代码映射和多段译文拼接
#[tokio::test]
async fn test_baidu_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/trans/vip/translate"))
        .and(body_string_contains("appid=test-app"))
        .and(body_string_contains("q=Hello"))
        .and(body_string_contains("from=en"))
        .and(body_string_contains("to=jp"))
        .and(body_string_contains("sign="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "from": "en",
            "to": "jp",
            "trans_result": [
                {"src": "Hello", "dst": "こんにちは"},
                {"src": "World", "dst": "世界"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translation = baidu(&server).translate("Hello", "en", "ja").await.unwrap();
    assert_eq!(translation, "こんにちは\n世界");
}

/// 主翻译服务：业务错误码转换为 Api 错误
#[tokio::test]
async fn test_baidu_error_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error_code": "54001",
            "error_msg": "Invalid Sign"
        })))
        .mount(&server)
        .await;

    let error = baidu(&server).translate("Hello", "en", "zh").await.unwrap_err();
    assert_eq!(
        error,
        ProviderError::Api {
            code: "54001".to_string(),
            message: "Invalid Sign".to_string(),
        }
    );
}

/// 主翻译服务：非 2xx 响应
#[tokio::test]
async fn test_baidu_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let error = baidu(&server).translate("Hello", "en", "zh").await.unwrap_err();
    assert!(matches!(error, ProviderError::Status { status: 502, .. }));
}

/// 备用翻译服务：请求带 Bearer token，译文去除首尾空白
#[tokio::test]
async fn test_chat_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4o-mini", "stream": false})))
        .and(body_string_contains(r#"{"role":"user","content":"Hello"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  你好\n"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translation = chat(&server).translate("Hello", "en", "zh").await.unwrap();
    assert_eq!(translation, "你好");
}

/// 备用翻译服务：空内容视为失败
#[tokio::test]
async fn test_chat_empty_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        })))
        .mount(&server)
        .await;

    let error = chat(&server).translate("Hello", "en", "zh").await.unwrap_err();
    assert_eq!(error, ProviderError::EmptyResult);
}

/// 备用翻译服务：鉴权失败返回 Status 错误
#[tokio::test]
async fn test_chat_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .mount(&server)
        .await;

    let error = chat(&server).translate("Hello", "en", "zh").await.unwrap_err();
    match error {
        ProviderError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad key"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

/// 超时被识别为 Timeout
#[tokio::test]
async fn test_chat_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = ChatConfig {
        api_key: "sk-test".to_string(),
        api_url: server.uri(),
        model: "gpt-4o-mini".to_string(),
    };
    let translator = ChatCompletionTranslator::new(config, Duration::from_millis(50)).unwrap();

    let error = translator.translate("Hello", "en", "zh").await.unwrap_err();
    assert!(error.is_timeout(), "unexpected error: {:?}", error);
}

/// REST 存储：GET 命中与未命中
#[tokio::test]
async fn test_rest_store_get() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(bearer_token("kv-token"))
        .and(body_json(json!(["GET", "translation:hit"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "cached"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!(["GET", "translation:miss"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
        .mount(&server)
        .await;

    let store = rest_store(&server);
    assert_eq!(
        store.get("translation:hit").await.unwrap().as_deref(),
        Some("cached")
    );
    assert_eq!(store.get("translation:miss").await.unwrap(), None);
}

/// REST 存储：SET 带 EX 过期时间
#[tokio::test]
async fn test_rest_store_set_with_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(bearer_token("kv-token"))
        .and(body_json(json!(["SET", "translation:k", "value", "EX", 604800])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    rest_store(&server)
        .set_ex("translation:k", "value", Duration::from_secs(604_800))
        .await
        .unwrap();
}

/// REST 存储：错误响应
#[tokio::test]
async fn test_rest_store_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
        )
        .mount(&server)
        .await;

    let error = rest_store(&server).get("translation:k").await.unwrap_err();
    match error {
        KvError::Store(message) => assert_eq!(message, "Unauthorized"),
        other => panic!("unexpected error: {:?}", other),
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let error = rest_store(&server).get("translation:k").await.unwrap_err();
    assert!(matches!(error, KvError::Status { status: 500, .. }));
}
