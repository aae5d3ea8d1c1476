//! 翻译服务回退链
//!
//! 按路由策略给出的顺序依次尝试翻译服务。每个服务只调用一次，
//! 串行执行；空白译文同样视为失败。

use std::sync::Arc;

use crate::translation::error::{ProviderError, ProviderFailure, TranslationError, TranslationResult};
use crate::translation::providers::{ProviderKind, TranslationProvider};

/// 回退链成功时的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub translation: String,
    pub provider: String,
}

/// 翻译服务回退链
#[derive(Clone, Default)]
pub struct ProviderChain {
    primary: Option<Arc<dyn TranslationProvider>>,
    secondary: Option<Arc<dyn TranslationProvider>>,
}

impl ProviderChain {
    /// 按各提供方自身的 `kind()` 放入对应位置
    ///
    /// 同一角色出现多次时保留最后一个。
    pub fn new(providers: impl IntoIterator<Item = Arc<dyn TranslationProvider>>) -> Self {
        let mut chain = Self::default();
        for provider in providers {
            let slot = match provider.kind() {
                ProviderKind::Primary => &mut chain.primary,
                ProviderKind::Secondary => &mut chain.secondary,
            };
            if let Some(previous) = slot.replace(provider) {
                tracing::warn!(
                    role = previous.kind().as_str(),
                    replaced = previous.name(),
                    "同一角色配置了多个翻译服务，保留最后一个"
                );
            }
        }
        chain
    }

    /// 指定角色的提供方（未配置时为 `None`）
    pub fn provider(&self, kind: ProviderKind) -> Option<&Arc<dyn TranslationProvider>> {
        match kind {
            ProviderKind::Primary => self.primary.as_ref(),
            ProviderKind::Secondary => self.secondary.as_ref(),
        }
    }

    /// 依次尝试翻译
    ///
    /// `prefer_primary` 为 `false` 时跳过主翻译服务。
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        order: &[ProviderKind],
        prefer_primary: bool,
    ) -> TranslationResult<ProviderOutcome> {
        let mut attempts: Vec<ProviderFailure> = Vec::new();

        for kind in order {
            if *kind == ProviderKind::Primary && !prefer_primary {
                tracing::debug!("调用方未选择主翻译服务，跳过");
                continue;
            }

            let Some(provider) = self.provider(*kind) else {
                tracing::debug!(role = kind.as_str(), "翻译服务未配置，跳过");
                continue;
            };

            let result = provider
                .translate(text, source_lang, target_lang)
                .await
                .and_then(|translation| {
                    if translation.trim().is_empty() {
                        Err(ProviderError::EmptyResult)
                    } else {
                        Ok(translation)
                    }
                });

            match result {
                Ok(translation) => {
                    tracing::info!(
                        provider = provider.name(),
                        role = kind.as_str(),
                        fallback = !attempts.is_empty(),
                        "翻译成功"
                    );
                    return Ok(ProviderOutcome {
                        translation,
                        provider: provider.name().to_string(),
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        role = kind.as_str(),
                        error = %error,
                        "翻译服务调用失败"
                    );
                    attempts.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        if attempts.is_empty() {
            tracing::error!("没有可用的翻译服务");
            Err(TranslationError::NoProviderAvailable)
        } else {
            tracing::error!(attempts = attempts.len(), "所有翻译服务均失败");
            Err(TranslationError::ProvidersExhausted { attempts })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProvider {
        kind: ProviderKind,
        name: &'static str,
    }

    #[async_trait]
    impl TranslationProvider for FixedProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn name(&self) -> &str {
            self.name
        }

        async fn translate(
            &self,
            text: &str,
            _source_lang: &str,
            _target_lang: &str,
        ) -> Result<String, ProviderError> {
            Ok(format!("{}:{}", self.name, text))
        }
    }

    fn provider(kind: ProviderKind, name: &'static str) -> Arc<dyn TranslationProvider> {
        Arc::new(FixedProvider { kind, name })
    }

    #[test]
    fn test_providers_are_slotted_by_kind() {
        // 传入顺序与角色无关
        let chain = ProviderChain::new(vec![
            provider(ProviderKind::Secondary, "openai"),
            provider(ProviderKind::Primary, "baidu"),
        ]);

        assert_eq!(chain.provider(ProviderKind::Primary).map(|p| p.name()), Some("baidu"));
        assert_eq!(chain.provider(ProviderKind::Secondary).map(|p| p.name()), Some("openai"));
    }

    #[test]
    fn test_duplicate_role_keeps_last() {
        let chain = ProviderChain::new(vec![
            provider(ProviderKind::Secondary, "first"),
            provider(ProviderKind::Secondary, "second"),
        ]);

        assert!(chain.provider(ProviderKind::Primary).is_none());
        assert_eq!(chain.provider(ProviderKind::Secondary).map(|p| p.name()), Some("second"));
    }

    #[tokio::test]
    async fn test_primary_runs_first_regardless_of_input_order() {
        let chain = ProviderChain::new(vec![
            provider(ProviderKind::Secondary, "openai"),
            provider(ProviderKind::Primary, "baidu"),
        ]);

        let outcome = chain
            .translate(
                "hi",
                "en",
                "zh",
                &[ProviderKind::Primary, ProviderKind::Secondary],
                true,
            )
            .await
            .unwrap();

        assert_eq!(outcome.provider, "baidu");
        assert_eq!(outcome.translation, "baidu:hi");
    }
}
