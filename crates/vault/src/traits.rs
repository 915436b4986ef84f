//! Resolver trait for swappable secret backends.

use std::sync::Arc;

use {async_trait::async_trait, secrecy::Secret};

use crate::error::Result;

/// Turns one secret reference into its plaintext value.
///
/// Implementations must never log the resolved value. Tests inject an
/// in-memory implementation instead of shelling out.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<Secret<String>>;
}

#[async_trait]
impl<R: SecretResolver + ?Sized> SecretResolver for Arc<R> {
    async fn resolve(&self, reference: &str) -> Result<Secret<String>> {
        (**self).resolve(reference).await
    }
}

#[async_trait]
impl<'a, R: SecretResolver + ?Sized> SecretResolver for &'a R {
    async fn resolve(&self, reference: &str) -> Result<Secret<String>> {
        (**self).resolve(reference).await
    }
}
