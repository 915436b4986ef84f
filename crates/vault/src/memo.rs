//! Per-run memoization of resolved secrets.
//!
//! Secrets rotate, so a [`MemoizingResolver`] must be created for a single
//! provisioning run and dropped afterwards. Failures are never cached.

use std::collections::HashMap;

use {async_trait::async_trait, secrecy::Secret, tokio::sync::RwLock, tracing::debug};

use crate::{error::Result, traits::SecretResolver};

/// Wraps a resolver so each distinct reference is looked up at most once.
pub struct MemoizingResolver<R> {
    inner: R,
    cache: RwLock<HashMap<String, Secret<String>>>,
}

impl<R: SecretResolver> MemoizingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of references resolved so far.
    pub async fn cached_count(&self) -> usize {
        self.cache.read().await.len()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: SecretResolver> SecretResolver for MemoizingResolver<R> {
    async fn resolve(&self, reference: &str) -> Result<Secret<String>> {
        if let Some(secret) = self.cache.read().await.get(reference) {
            debug!(reference, "secret reference served from run cache");
            return Ok(secret.clone());
        }

        let secret = self.inner.resolve(reference).await?;
        self.cache
            .write()
            .await
            .insert(reference.to_string(), secret.clone());
        Ok(secret)
    }
}
