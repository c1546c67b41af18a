//! Memoization of read operations.

use super::{CacheKey, CacheOps, Expiry};
use civic_core::{BoxFuture, CivicResult};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

type Operation<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>;

/// Factory returned by [`CacheOps::cached`].
#[derive(Debug, Clone)]
pub struct Cached {
    ops: CacheOps,
    expiry: Expiry,
    namespace: String,
}

impl Cached {
    pub(crate) fn new(ops: CacheOps, expiry: Expiry, namespace: String) -> Self {
        Self {
            ops,
            expiry,
            namespace,
        }
    }

    /// Wraps `f` under the name `operation`.
    ///
    /// Only `A` takes part in the key, so `f` should capture handles such as
    /// repositories or pools rather than receive them as arguments.
    pub fn wrap<A, T, F, Fut>(self, operation: impl Into<String>, f: F) -> Memoized<A, T>
    where
        A: Serialize + Send + 'static,
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CivicResult<T>> + Send + 'static,
    {
        Memoized {
            ops: self.ops,
            expiry: self.expiry,
            namespace: self.namespace,
            operation_name: operation.into(),
            operation: Arc::new(move |args: A| -> BoxFuture<'static, T> { Box::pin(f(args)) }),
        }
    }
}

/// A read operation with cache-aside behavior.
///
/// Concurrent misses for the same key may each run the operation; the
/// last store wins.
pub struct Memoized<A, T> {
    ops: CacheOps,
    expiry: Expiry,
    namespace: String,
    operation_name: String,
    operation: Operation<A, T>,
}

impl<A, T> Memoized<A, T>
where
    A: Serialize + Send + 'static,
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// The cache key a call with `args` reads and writes.
    pub fn key_for(&self, args: &A) -> CivicResult<String> {
        CacheKey::for_args(&self.namespace, &self.operation_name, args).map(String::from)
    }

    /// Returns the cached result for `args`, or runs the operation and
    /// caches what it returns.
    ///
    /// Errors from the operation are returned and not cached. A result that
    /// cannot be encoded is an error too.
    pub async fn call(&self, args: A) -> CivicResult<T> {
        let key = self.key_for(&args)?;

        if let Some(value) = self.ops.get::<T>(&key).await {
            return Ok(value);
        }

        debug!("Computing '{}'", key);
        let value = (self.operation)(args).await?;
        self.ops.set(&key, &value, self.expiry).await?;

        Ok(value)
    }

    /// The namespace this operation caches under.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The operation name used in keys.
    #[must_use]
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }
}

impl<A, T> Clone for Memoized<A, T> {
    fn clone(&self) -> Self {
        Self {
            ops: self.ops.clone(),
            expiry: self.expiry,
            namespace: self.namespace.clone(),
            operation_name: self.operation_name.clone(),
            operation: Arc::clone(&self.operation),
        }
    }
}

impl<A, T> std::fmt::Debug for Memoized<A, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoized")
            .field("namespace", &self.namespace)
            .field("operation", &self.operation_name)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
