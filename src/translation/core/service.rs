//! 翻译服务核心实现
//!
//! 一次请求的完整流程：
//!
//! 1. 验证请求
//! 2. 查询缓存（`skip_cache` 时跳过）
//! 3. 未命中则调用回退链
//! 4. 成功后写入缓存
//!
//! 所有步骤在同一个请求内串行执行，组件之间不共享可变状态。

use std::sync::Arc;

use crate::translation::config::{CacheSettings, ProvidersConfig, RoutePolicy};
use crate::translation::core::chain::ProviderChain;
use crate::translation::error::TranslationResult;
use crate::translation::providers::{
    BaiduTranslator, ChatCompletionTranslator, ProviderKind, TranslationProvider,
};
use crate::translation::request::{TranslatedText, TranslationRequest};
use crate::translation::storage::{CacheKey, CachedTranslation, TranslationCache};
use crate::kv_store::{KvStore, MemoryKvStore, RestKvStore};

/// 统一的翻译服务
#[derive(Clone)]
pub struct TranslationService {
    chain: ProviderChain,
    cache: Option<TranslationCache>,
}

impl TranslationService {
    pub fn new(chain: ProviderChain, cache: Option<TranslationCache>) -> Self {
        Self { chain, cache }
    }

    /// 根据配置创建翻译服务
    ///
    /// 缺失凭据的翻译服务在这里记录一次警告，之后视为不可用。
    pub fn from_config(providers: &ProvidersConfig, cache: &CacheSettings) -> Self {
        let primary: Option<Arc<dyn TranslationProvider>> = match &providers.primary {
            Some(config) => match BaiduTranslator::new(config.clone(), providers.timeout) {
                Ok(translator) => Some(Arc::new(translator)),
                Err(e) => {
                    tracing::warn!(error = %e, "主翻译服务初始化失败，已禁用");
                    None
                }
            },
            None => {
                tracing::warn!("未配置 BAIDU_APP_ID / BAIDU_SECRET_KEY，主翻译服务不可用");
                None
            }
        };

        let secondary: Option<Arc<dyn TranslationProvider>> = match &providers.secondary {
            Some(config) => match ChatCompletionTranslator::new(config.clone(), providers.timeout) {
                Ok(translator) => Some(Arc::new(translator)),
                Err(e) => {
                    tracing::warn!(error = %e, "备用翻译服务初始化失败，已禁用");
                    None
                }
            },
            None => {
                tracing::warn!("未配置 LLM_API_KEY，备用翻译服务不可用");
                None
            }
        };

        Self::new(
            ProviderChain::new(primary.into_iter().chain(secondary)),
            build_cache(cache),
        )
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub fn cache(&self) -> Option<&TranslationCache> {
        self.cache.as_ref()
    }

    /// 执行一次翻译请求
    pub async fn translate(
        &self,
        request: &TranslationRequest,
        policy: &RoutePolicy,
    ) -> TranslationResult<TranslatedText> {
        let text = request.validate(policy.max_text_length)?;
        let source = request.source_language.as_str();
        let target = request.target_language.as_str();
        let key = CacheKey::derive(text, source, target);

        if let Some(cache) = &self.cache {
            if request.skip_cache {
                tracing::debug!(key = %key, "调用方要求跳过缓存");
            } else if let Some(cached) = cache.lookup(&key).await {
                return Ok(TranslatedText {
                    translation: cached.translation,
                    source_language: source.to_string(),
                    target_language: target.to_string(),
                    provider: cached.provider,
                    from_cache: true,
                });
            }
        }

        let outcome = self
            .chain
            .translate(text, source, target, &policy.provider_order, request.prefer_primary)
            .await?;

        if let Some(cache) = &self.cache {
            let entry = CachedTranslation::new(outcome.translation.as_str(), outcome.provider.as_str());
            cache.store(&key, &entry, policy.cache_ttl).await;
        }

        Ok(TranslatedText {
            translation: outcome.translation,
            source_language: source.to_string(),
            target_language: target.to_string(),
            provider: outcome.provider,
            from_cache: false,
        })
    }

    /// 已配置的翻译服务名称
    pub fn provider_name(&self, kind: ProviderKind) -> Option<String> {
        self.chain.provider(kind).map(|provider| provider.name().to_string())
    }
}

fn build_cache(settings: &CacheSettings) -> Option<TranslationCache> {
    if !settings.enabled {
        tracing::info!("翻译缓存已禁用");
        return None;
    }

    let store: Arc<dyn KvStore> = match &settings.rest_store {
        Some(config) => match RestKvStore::new(config.clone()) {
            Ok(store) => {
                tracing::info!(url = %config.url, "使用 REST 键值存储作为翻译缓存");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "REST 键值存储初始化失败，改用进程内缓存");
                Arc::new(MemoryKvStore::with_capacity(settings.memory_capacity))
            }
        },
        None => {
            tracing::warn!(
                capacity = settings.memory_capacity,
                "未配置 KV_REST_API_URL / KV_REST_API_TOKEN，使用进程内缓存"
            );
            Arc::new(MemoryKvStore::with_capacity(settings.memory_capacity))
        }
    };

    Some(TranslationCache::new(store))
}
