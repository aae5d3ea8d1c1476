//! 翻译模块
//!
//! 提供文本翻译的完整流程，采用清晰的模块化架构：
//! - **core**: 回退链和翻译服务
//! - **providers**: 主、备翻译服务客户端
//! - **storage**: 翻译结果缓存
//! - **request**: 请求解析、验证与响应结构
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use edge_translate::translation::{
//!     CacheSettings, ProvidersConfig, RoutePolicy, TranslationRequest, TranslationService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TranslationService::from_config(&ProvidersConfig::from_env()?, &CacheSettings::default());
//!
//! let request = TranslationRequest::new("Hello, world").with_languages("en", "zh");
//! let result = service.translate(&request, &RoutePolicy::api_default()).await?;
//! println!("{} ({})", result.translation, result.provider);
//! # Ok(())
//! # }
//! ```

/// 配置管理模块 - 翻译服务凭据、缓存设置与路由策略
pub mod config;

/// 核心模块 - 回退链与翻译服务
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 翻译服务客户端
pub mod providers;

/// 请求与响应模型
pub mod request;

/// 存储管理模块 - 翻译结果缓存
pub mod storage;

pub use config::{
    BaiduConfig, CacheSettings, ChatConfig, ProvidersConfig, ResponseField, RoutePolicies,
    RoutePolicy,
};
pub use self::core::{ProviderChain, ProviderOutcome, TranslationService};
pub use error::{KvError, ProviderError, ProviderFailure, TranslationError, TranslationResult};
pub use providers::{ProviderKind, TranslationProvider};
pub use request::{TranslatedText, TranslationRequest};
pub use storage::{CacheKey, CachedTranslation, TranslationCache};
