//! Request Lifetimes
//!
//! Ties in-flight requests to the component that issued them. Once the
//! lifetime is cancelled, pending futures are aborted and any result that
//! still arrives is reported as `ApiError::Cancelled` instead of being
//! applied to state that may no longer exist.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{AbortHandle, Abortable};
use leptos::prelude::on_cleanup;

use crate::error::{ApiError, ApiResult};

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    next_key: AtomicU64,
    pending: Mutex<HashMap<u64, AbortHandle>>,
}

#[derive(Clone, Default)]
pub struct Lifetime {
    inner: Arc<Inner>,
}

impl Lifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lifetime cancelled when the current reactive owner is cleaned up
    pub fn for_component() -> Self {
        let lifetime = Self::new();
        let on_drop = lifetime.clone();
        on_cleanup(move || on_drop.cancel());
        lifetime
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        if let Ok(mut pending) = self.inner.pending.lock() {
            for (_, handle) in pending.drain() {
                handle.abort();
            }
        }
    }

    /// Run `fut` unless or until the lifetime is cancelled
    pub async fn run<F, T>(&self, fut: F) -> ApiResult<T>
    where
        F: Future<Output = ApiResult<T>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let (handle, registration) = AbortHandle::new_pair();
        let key = self.inner.next_key.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut pending) = self.inner.pending.lock() {
            pending.insert(key, handle);
        }

        let outcome = Abortable::new(fut, registration).await;

        if let Ok(mut pending) = self.inner.pending.lock() {
            pending.remove(&key);
        }
        match outcome {
            Ok(_) if self.is_cancelled() => Err(ApiError::Cancelled),
            Ok(result) => result,
            Err(_aborted) => Err(ApiError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_result_through() {
        let lifetime = Lifetime::new();
        let result = lifetime.run(async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let lifetime = Lifetime::new();
        lifetime.cancel();
        let result = lifetime.run(async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }

    #[tokio::test]
    async fn test_cancelled_while_in_flight() {
        let lifetime = Lifetime::new();
        let canceller = lifetime.clone();
        let result = lifetime
            .run(async move {
                canceller.cancel();
                Ok::<_, ApiError>(7)
            })
            .await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }
}
