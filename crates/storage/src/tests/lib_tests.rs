use super::*;

struct FailingBackend;

#[async_trait]
impl KeyValueBackend for FailingBackend {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("storage quota exceeded"))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage quota exceeded"))
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Err(anyhow!("storage quota exceeded"))
    }

    async fn clear(&self) -> Result<()> {
        Err(anyhow!("storage quota exceeded"))
    }
}

#[tokio::test]
async fn stores_and_reads_back_entries() {
    let backend = SqliteBackend::new("sqlite::memory:").await.expect("db");
    backend.set("saved_users", "[1,2]").await.expect("set");
    assert_eq!(
        backend.get("saved_users").await.expect("get").as_deref(),
        Some("[1,2]")
    );

    backend.set("saved_users", "[3]").await.expect("overwrite");
    assert_eq!(
        backend.get("saved_users").await.expect("get").as_deref(),
        Some("[3]")
    );
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let backend = SqliteBackend::new("sqlite::memory:").await.expect("db");
    backend.health_check().await.expect("health check");
}

#[tokio::test]
async fn removes_single_key_and_clears_everything() {
    let backend = SqliteBackend::new("sqlite::memory:").await.expect("db");
    backend.set("a", "1").await.expect("set a");
    backend.set("b", "2").await.expect("set b");

    backend.remove("a").await.expect("remove");
    assert!(backend.get("a").await.expect("get a").is_none());
    assert_eq!(backend.get("b").await.expect("get b").as_deref(), Some("2"));

    backend.clear().await.expect("clear");
    assert!(backend.get("b").await.expect("get b").is_none());
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("dashboard.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let backend = SqliteBackend::new(&database_url).await.expect("db");
    drop(backend);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn local_store_treats_corrupt_text_as_missing() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .set("sort_preferences", "{not json")
        .await
        .expect("seed");
    let store = LocalStore::new(backend);

    let value: Option<Vec<String>> = store.get_data("sort_preferences").await;
    assert!(value.is_none());
}

#[tokio::test]
async fn local_store_swallows_backend_failures() {
    let store = LocalStore::new(Arc::new(FailingBackend));

    store.save_data("saved_users", &vec!["x".to_string()]).await;
    store.remove_data("saved_users").await;
    store.clear_all().await;
    let value: Option<Vec<String>> = store.get_data("saved_users").await;
    assert!(value.is_none());
}

#[tokio::test]
async fn local_store_round_trips_json_values() {
    let store = LocalStore::in_memory();
    store
        .save_data("saved_users", &vec!["ann".to_string(), "bob".to_string()])
        .await;

    let value: Option<Vec<String>> = store.get_data("saved_users").await;
    assert_eq!(value, Some(vec!["ann".to_string(), "bob".to_string()]));

    store.remove_data("saved_users").await;
    let value: Option<Vec<String>> = store.get_data("saved_users").await;
    assert!(value.is_none());
}

#[test]
fn memory_urls_have_no_file_path() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert!(sqlite_path("sqlite://file:profiles?mode=memory&cache=shared").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/dashboard.db?mode=rwc"),
        Some(PathBuf::from("./data/dashboard.db"))
    );
}
