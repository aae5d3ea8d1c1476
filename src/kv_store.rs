//! 键值存储模块
//!
//! 为翻译缓存提供 GET / SET-with-TTL 语义的存储后端：
//! - `RestKvStore`：通过 HTTPS + Bearer token 访问的 REST 键值存储（Upstash 兼容）
//! - `MemoryKvStore`：进程内存储，用于未配置远程存储的场景和测试

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;

use crate::translation::error::KvError;

/// 键值存储接口
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 存储后端名称，仅用于日志和健康检查
    fn name(&self) -> &'static str;

    /// 读取键，不存在时返回 `None`
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// 写入键并设置过期时间
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError>;
}

/// REST 存储配置
#[derive(Debug, Clone)]
pub struct RestKvConfig {
    pub url: String,
    pub token: String,
    pub timeout: Duration,
}

/// REST 接口的统一响应包装
#[derive(Debug, Deserialize)]
struct RestEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// REST 键值存储客户端
///
/// 命令以 JSON 数组形式 POST 到根地址，例如 `["SET", key, value, "EX", 60]`，
/// 响应为 `{"result": ...}` 或 `{"error": "..."}`。
#[derive(Clone)]
pub struct RestKvStore {
    client: reqwest::Client,
    config: RestKvConfig,
}

impl RestKvStore {
    /// 创建新的 REST 存储客户端
    pub fn new(config: RestKvConfig) -> Result<Self, KvError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KvError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn command(&self, args: &[Value]) -> Result<Value, KvError> {
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(&self.config.token)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // 错误响应通常也带有 {"error": "..."}
            if let Ok(RestEnvelope { error: Some(message), .. }) = serde_json::from_str(&body) {
                return Err(KvError::Store(message));
            }
            return Err(KvError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: RestEnvelope = serde_json::from_str(&body)?;
        if let Some(message) = envelope.error {
            return Err(KvError::Store(message));
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl KvStore for RestKvStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let args = [Value::from("GET"), Value::from(key)];
        match self.command(&args).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Err(KvError::Serialization(format!(
                "unexpected GET result: {}",
                other
            ))),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        let args = [
            Value::from("SET"),
            Value::from(key),
            Value::from(value),
            Value::from("EX"),
            Value::from(ttl.as_secs().max(1)),
        ];
        match self.command(&args).await? {
            Value::String(ref reply) if reply == "OK" => Ok(()),
            other => Err(KvError::Store(format!("unexpected SET result: {}", other))),
        }
    }
}

/// 进程内存储的默认容量
pub const DEFAULT_MEMORY_CAPACITY: usize = 10_000;

/// 进程内键值存储
///
/// 每次写入前清理已过期条目；达到容量上限时淘汰最早过期的条目。
#[derive(Debug)]
pub struct MemoryKvStore {
    entries: DashMap<String, (String, Instant)>,
    max_entries: usize,
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_CAPACITY)
    }
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建指定容量的存储，容量至少为 1
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// 当前未过期条目数
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| entry.value().1 > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 清理过期条目，返回清理数量
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// 直接写入原始值，不经过序列化
    pub fn insert_raw(&self, key: &str, value: &str, ttl: Duration) {
        let removed = self.cleanup_expired();
        if removed > 0 {
            tracing::debug!(removed, "已清理过期的进程内缓存条目");
        }

        if !self.entries.contains_key(key) {
            while self.entries.len() >= self.max_entries {
                if !self.evict_soonest_expiring() {
                    break;
                }
            }
        }

        self.entries
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
    }

    fn evict_soonest_expiring(&self) -> bool {
        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().1)
            .map(|entry| entry.key().clone());

        match victim {
            Some(key) => {
                tracing::debug!(key = %key, "进程内缓存已满，淘汰最早过期的条目");
                self.entries.remove(&key).is_some()
            }
            None => false,
        }
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.value().1 > now => return Ok(Some(entry.value().0.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), KvError> {
        self.insert_raw(key, value, ttl);
        Ok(())
    }
}
