use shared::domain::UserRecord;
use storage::LocalStore;
use tracing::debug;

pub const USERS_STORAGE_KEY: &str = "saved_users";

/// Persists the dashboard's working set as one snapshot.
#[derive(Clone)]
pub struct WorkingSetStore {
    store: LocalStore,
}

impl WorkingSetStore {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn save(&self, users: &[UserRecord]) {
        debug!(count = users.len(), "saving working set");
        self.store.save_data(USERS_STORAGE_KEY, users).await;
    }

    pub async fn load(&self) -> Option<Vec<UserRecord>> {
        self.store.get_data(USERS_STORAGE_KEY).await
    }

    pub async fn clear(&self) {
        self.store.remove_data(USERS_STORAGE_KEY).await;
    }
}
