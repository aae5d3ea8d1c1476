//! 翻译系统核心模块
//!
//! - **回退链** (`chain.rs`): 按顺序尝试主、备翻译服务
//! - **服务层** (`service.rs`): 缓存查询、回退链调用与缓存写入的完整流程

pub mod chain;
pub mod service;

pub use chain::{ProviderChain, ProviderOutcome};
pub use service::TranslationService;
