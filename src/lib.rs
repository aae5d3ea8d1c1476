//! # Edge Translate
//!
//! 文本翻译 HTTP 服务：主翻译服务失败时回退到生成式模型，
//! 并通过键值存储缓存相同输入的翻译结果。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量
//! - `kv_store` - 键值存储后端
//! - `translation` - 翻译流程（回退链、缓存、请求模型）
//! - `web` - Web服务器功能（可选）

pub mod env;
pub mod kv_store;
pub mod translation;
#[cfg(feature = "web")]
pub mod web;

pub use kv_store::{KvStore, MemoryKvStore, RestKvStore};
pub use translation::{TranslationError, TranslationRequest, TranslationService};
