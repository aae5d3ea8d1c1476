//! 存储模块
//!
//! 提供翻译结果缓存功能。

pub mod cache;

pub use cache::{
    CacheKey, CacheStatsSnapshot, CachedTranslation, TranslationCache, CACHE_KEY_PREFIX,
};
