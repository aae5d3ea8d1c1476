//! 翻译缓存模块
//!
//! 在键值存储之上提供翻译结果缓存。缓存只是加速手段：任何读取或写入失败
//! 都会被记录并降级为"无缓存"，不会让请求失败。

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::kv_store::KvStore;

/// 缓存键命名空间前缀
pub const CACHE_KEY_PREFIX: &str = "translation:";

/// 缓存键
///
/// 由 (原文, 源语言, 目标语言) 经 blake3 摘要得到，输出 256 位。
/// 每个字段先写入长度再写入内容，字段边界不会产生歧义。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// 生成缓存键
    pub fn derive(text: &str, source_lang: &str, target_lang: &str) -> Self {
        let mut hasher = Hasher::new();
        for part in [text, source_lang, target_lang] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        CacheKey(format!("{}{}", CACHE_KEY_PREFIX, hasher.finalize().to_hex()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 存入键值存储的翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedTranslation {
    pub translation: String,
    pub provider: String,
    /// 写入时间（Unix 毫秒）
    pub timestamp: i64,
}

impl CachedTranslation {
    pub fn new(translation: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            provider: provider.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}

/// 缓存统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub errors: u64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl CacheStatsSnapshot {
    /// 计算命中率
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f32 / total as f32
        } else {
            0.0
        }
    }
}

/// 翻译缓存
#[derive(Clone)]
pub struct TranslationCache {
    store: Arc<dyn KvStore>,
    stats: Arc<CacheStats>,
}

impl TranslationCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            stats: Arc::new(CacheStats::default()),
        }
    }

    /// 存储后端名称
    pub fn backend(&self) -> &'static str {
        self.store.name()
    }

    /// 查询缓存
    ///
    /// 存储不可用或数据损坏都视为未命中。
    pub async fn lookup(&self, key: &CacheKey) -> Option<CachedTranslation> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "缓存未命中");
                return None;
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %e, "缓存查询失败，降级为实时翻译");
                return None;
            }
        };

        match serde_json::from_str::<CachedTranslation>(&raw) {
            Ok(cached) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, provider = %cached.provider, "缓存命中");
                Some(cached)
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %e, "缓存数据损坏，视为未命中");
                None
            }
        }
    }

    /// 写入缓存
    ///
    /// 失败只记录日志，返回是否写入成功。
    pub async fn store(&self, key: &CacheKey, entry: &CachedTranslation, ttl: Duration) -> bool {
        let serialized = match serde_json::to_string(entry) {
            Ok(serialized) => serialized,
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %e, "缓存序列化失败");
                return false;
            }
        };

        match self.store.set_ex(key.as_str(), &serialized, ttl).await {
            Ok(()) => {
                self.stats.writes.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "翻译结果已缓存");
                true
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %key, error = %e, "缓存写入失败");
                false
            }
        }
    }

    /// 获取统计信息
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}
