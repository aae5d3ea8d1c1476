//! API 处理器

pub mod health;
pub mod translation;

pub use health::*;
pub use translation::*;
