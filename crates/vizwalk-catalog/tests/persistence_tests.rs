//! Persistence gateway behaviour across backends

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;
use vizwalk_catalog::{
    BackendKind, Catalog, CatalogConfig, DirectoryKeyValueStore, JsonFileHostStorage,
    KeyValueStore, MemoryKeyValueStore, PersistenceGateway, ProjectRecord, StorageCapabilities,
};
use vizwalk_test_utils::{sample_catalog, FailingHostStorage, ScriptedHostStorage};

fn host_gateway(host: Arc<ScriptedHostStorage>) -> PersistenceGateway {
    PersistenceGateway::detect(StorageCapabilities::none().with_host(host), &CatalogConfig::new())
}

fn local_gateway(store: Arc<dyn KeyValueStore>) -> PersistenceGateway {
    PersistenceGateway::detect(StorageCapabilities::none().with_local(store), &CatalogConfig::new())
}

prop_compose! {
    fn arb_record()(
        category in "(Enterprise|SME|US|[A-Za-z_ ]{0,10})",
        project_name in "[A-Za-z0-9 !_-]{1,16}",
        build_name in "[A-Za-z0-9 ]{1,12}",
        area_sqft in "[0-9,]{0,7}",
        industry in "[a-z ]{0,8}",
        launch_ref in "(|https://walks\\.example\\.com/[a-z]{1,6}\\?q=[0-9]{1,3}|/experience|C:\\\\[A-Za-z]{1,6}\\\\Blank\\.exe)",
        slot in 0u64..1_000_000,
    ) -> ProjectRecord {
        ProjectRecord {
            slot_id: format!("{project_name}-{slot}"),
            project_slot: project_name.clone(),
            category,
            project_name,
            build_name,
            build_version: "V1".to_string(),
            area_sqft,
            industry,
            launch_ref,
            ..ProjectRecord::default()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn host_round_trip_preserves_sequence(records in prop::collection::vec(arb_record(), 0..12)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let gateway = host_gateway(Arc::new(ScriptedHostStorage::holding(json!([]))));
            prop_assert!(gateway.save(&records).await);
            prop_assert_eq!(gateway.load().await, records.clone());
            Ok(())
        })?;
    }

    #[test]
    fn local_round_trip_preserves_sequence(records in prop::collection::vec(arb_record(), 0..12)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let gateway = local_gateway(Arc::new(MemoryKeyValueStore::new()));
            prop_assert!(gateway.save(&records).await);
            prop_assert_eq!(gateway.load().await, records.clone());
            Ok(())
        })?;
    }
}

#[tokio::test]
async fn non_array_host_values_load_empty() {
    for value in [
        json!(null),
        json!({ "projects": [] }),
        json!("[]"),
        json!(7),
        json!([{ "projectName": "Tower" }, "stray"]),
    ] {
        let gateway = host_gateway(Arc::new(ScriptedHostStorage::holding(value)));
        assert!(gateway.load().await.is_empty());
    }
}

#[tokio::test]
async fn malformed_local_value_loads_empty() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set_item("vizwalk_projects", "{\"oops\":").unwrap();

    let gateway = local_gateway(store);
    assert_eq!(gateway.kind(), BackendKind::LocalStore);
    assert!(gateway.load().await.is_empty());
}

#[tokio::test]
async fn failing_host_degrades_quietly() {
    let host = Arc::new(FailingHostStorage::default());
    let gateway =
        PersistenceGateway::detect(StorageCapabilities::none().with_host(host.clone()), &CatalogConfig::new());

    assert!(gateway.load().await.is_empty());
    assert!(!gateway.save(&sample_catalog()).await);
    assert!(!gateway.clear().await);
    // No retries
    assert_eq!(host.attempts(), 3);
}

#[tokio::test]
async fn catalog_reopens_from_file_host() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vizwalk_projects.json");
    let caps = || StorageCapabilities::none().with_host(Arc::new(JsonFileHostStorage::new(&path)));

    let mut catalog = Catalog::open(CatalogConfig::new(), PersistenceGateway::detect(caps(), &CatalogConfig::new())).await;
    for name in ["Tower", "Marina", "Annex"] {
        let draft = catalog.draft().named(name, "Walk");
        catalog.add(draft).await.unwrap();
    }
    let written = catalog.records().to_vec();

    let reopened = Catalog::open(CatalogConfig::new(), PersistenceGateway::detect(caps(), &CatalogConfig::new())).await;
    assert_eq!(reopened.records(), written.as_slice());
}

#[tokio::test]
async fn directory_store_clear_removes_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryKeyValueStore::new(dir.path()));

    let mut catalog = Catalog::open(CatalogConfig::new(), local_gateway(store.clone())).await;
    let draft = catalog.draft().named("Tower", "Lobby");
    catalog.add(draft).await.unwrap();
    assert!(store.get_item("vizwalk_projects").unwrap().is_some());

    assert!(catalog.clear().await);
    assert_eq!(store.get_item("vizwalk_projects").unwrap(), None);

    let reopened = Catalog::open(CatalogConfig::new(), local_gateway(store)).await;
    assert!(reopened.is_empty());
}

#[tokio::test]
async fn stored_data_survives_slow_first_load() {
    let host = Arc::new(ScriptedHostStorage::holding(serde_json::to_value(sample_catalog()).unwrap()));
    let mut catalog = Catalog::new(CatalogConfig::new(), host_gateway(host.clone()));

    // Nothing may be written until the initial load completes
    let draft = catalog.draft().named("Scratch", "Draft");
    catalog.add(draft).await.unwrap();
    assert_eq!(host.save_count(), 0);

    catalog.load().await;
    assert_eq!(catalog.records(), sample_catalog().as_slice());
    assert_eq!(host.save_count(), 0);
    assert_eq!(host.stored(), serde_json::to_value(sample_catalog()).unwrap());
}
