use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_roundtrip_overwrites_values() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("darkMode").await.unwrap(), None);

    repo.set("darkMode", "true").await.unwrap();
    repo.set("darkMode", "false").await.unwrap();
    assert_eq!(
        repo.get("darkMode").await.unwrap().as_deref(),
        Some("false")
    );

    repo.remove("darkMode").await.unwrap();
    assert_eq!(repo.get("darkMode").await.unwrap(), None);
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.set("k", "v").await.unwrap();
    repo.migrate().await.expect("second migrate");
    assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("v"));
}

#[tokio::test]
async fn storage_sqlite_keeps_json_payload_verbatim() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_payload?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let payload = r#"{"Linear Algebra_https://youtu.be/v1":true}"#;
    storage
        .kv
        .set("prerequisiteRoadmapProgress", payload)
        .await
        .unwrap();
    assert_eq!(
        storage
            .kv
            .get("prerequisiteRoadmapProgress")
            .await
            .unwrap()
            .as_deref(),
        Some(payload)
    );
}
