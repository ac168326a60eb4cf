use std::time::Duration;

use configs::QuoteConfig;
use moka::future::Cache;
use uuid::Uuid;

use super::wizard::QuoteWizard;

/// Open wizards keyed by draft id. Idle drafts expire; concurrent writers are last-write-wins.
#[derive(Clone)]
pub struct DraftStore {
    cache: Cache<Uuid, QuoteWizard>,
}

impl DraftStore {
    pub fn new(cfg: &QuoteConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(cfg.max_drafts)
            .time_to_idle(Duration::from_secs(cfg.draft_ttl_secs))
            .build();
        Self { cache }
    }

    pub async fn create(&self, wizard: QuoteWizard) -> Uuid {
        let id = Uuid::new_v4();
        self.cache.insert(id, wizard).await;
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<QuoteWizard> {
        self.cache.get(&id).await
    }

    pub async fn put(&self, id: Uuid, wizard: QuoteWizard) {
        self.cache.insert(id, wizard).await;
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.cache.remove(&id).await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_get_remove() {
        let store = DraftStore::new(&QuoteConfig::default());
        let id = store.create(QuoteWizard::open(None)).await;
        assert!(store.get(id).await.is_some());
        assert!(store.remove(id).await);
        assert!(store.get(id).await.is_none());
        assert!(!store.remove(id).await);
    }
}
