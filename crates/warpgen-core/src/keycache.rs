// Single-slot keypair cache.

use std::future::Future;

use tokio::sync::Mutex;
use tracing::debug;

use crate::model::Keypair;

/// Holds at most one keypair. Concurrent callers serialize on the slot, so
/// a miss is filled by exactly one fetch.
#[derive(Debug, Default)]
pub struct KeyCache {
    slot: Mutex<Option<Keypair>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached keypair, or run `fetch` and cache its result.
    ///
    /// Failed fetches leave the slot empty.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<Keypair, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Keypair, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(keys) = slot.as_ref() {
            debug!("reusing cached keypair");
            return Ok(keys.clone());
        }
        let keys = fetch().await?;
        *slot = Some(keys.clone());
        Ok(keys)
    }

    /// Drop the cached keypair, if any.
    pub async fn invalidate(&self) {
        if self.slot.lock().await.take().is_some() {
            debug!("cached keypair invalidated");
        }
    }

    pub async fn is_populated(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::CoreError;

    fn keys() -> Keypair {
        Keypair::new("PUBKEY", "PRIVKEY").unwrap()
    }

    #[tokio::test]
    async fn fetches_once_then_reuses() {
        let cache = KeyCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_fetch(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CoreError>(keys())
                })
                .await
                .unwrap();
            assert_eq!(got.public_key(), "PUBKEY");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_is_not_cached() {
        let cache = KeyCache::new();

        let err = cache
            .get_or_fetch(|| async { Err::<Keypair, _>(CoreError::ProvisioningInProgress) })
            .await;
        assert!(err.is_err());
        assert!(!cache.is_populated().await);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = KeyCache::new();
        cache
            .get_or_fetch(|| async { Ok::<_, CoreError>(keys()) })
            .await
            .unwrap();
        cache.invalidate().await;
        assert!(!cache.is_populated().await);

        let fresh = cache
            .get_or_fetch(|| async { Ok::<_, CoreError>(Keypair::new("NEWPUB", "NEWPRIV").unwrap()) })
            .await
            .unwrap();
        assert_eq!(fresh.public_key(), "NEWPUB");
    }
}
