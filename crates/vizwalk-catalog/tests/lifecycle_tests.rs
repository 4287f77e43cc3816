//! Add and clear lifecycle against scripted storage

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use vizwalk_catalog::{
    BackendKind, Catalog, CatalogConfig, PersistenceGateway, StorageCapabilities, ValidationError,
};
use vizwalk_test_utils::{sample_catalog, ScriptedHostStorage, SteppingClock};

async fn host_catalog(host: Arc<ScriptedHostStorage>) -> Catalog {
    let config = CatalogConfig::new();
    let gateway = PersistenceGateway::detect(StorageCapabilities::none().with_host(host), &config);
    let mut catalog = Catalog::with_clock(config, gateway, Arc::new(SteppingClock::default()));
    catalog.load().await;
    catalog
}

#[tokio::test]
async fn add_assigns_slot_and_persists() {
    let host = Arc::new(ScriptedHostStorage::holding(json!([])));
    let mut catalog = host_catalog(host.clone()).await;
    assert_eq!(catalog.backend(), BackendKind::Host);

    let draft = catalog
        .draft()
        .named("Marina Office", "Floor 3")
        .with_category("SME")
        .with_launch_ref(r"C:\BUILDS\Marina\Windows\Blank.exe");
    let record = catalog.add(draft).await.unwrap();

    assert_eq!(record.slot_id, "Marina Office-1792143015000");
    assert_eq!(record.project_slot, "Marina Office");
    assert_eq!(record.build_version, "V1");
    assert_eq!(host.save_count(), 1);

    let stored = host.stored();
    assert_eq!(stored[0]["projectName"], "Marina Office");
    assert_eq!(stored[0]["sbu"], "SME");
    assert_eq!(stored[0]["url"], r"C:\BUILDS\Marina\Windows\Blank.exe");
    assert_eq!(stored[0]["projectSlotId"], "Marina Office-1792143015000");
}

#[tokio::test]
async fn successive_adds_get_distinct_slots() {
    let host = Arc::new(ScriptedHostStorage::holding(json!([])));
    let mut catalog = host_catalog(host.clone()).await;

    for _ in 0..3 {
        let draft = catalog.draft().named("Tower", "Lobby");
        catalog.add(draft).await.unwrap();
    }

    let slots: Vec<_> = catalog.records().iter().map(|r| r.slot_id.as_str()).collect();
    assert_eq!(
        slots,
        ["Tower-1792143015000", "Tower-1792143015001", "Tower-1792143015002"]
    );
    assert_eq!(host.save_count(), 3);
}

#[tokio::test]
async fn blank_required_fields_are_rejected() {
    let host = Arc::new(ScriptedHostStorage::holding(serde_json::to_value(sample_catalog()).unwrap()));
    let mut catalog = host_catalog(host.clone()).await;
    let before = catalog.records().to_vec();

    let draft = catalog.draft().named("Tower", "   ");
    assert_eq!(catalog.add(draft).await, Err(ValidationError::MissingBuildName));

    let draft = catalog.draft().named("", "Lobby");
    assert_eq!(catalog.add(draft).await, Err(ValidationError::MissingProjectName));

    assert_eq!(catalog.records(), before.as_slice());
    assert_eq!(host.save_count(), 0);
}

#[tokio::test]
async fn clear_persists_empty_catalog() {
    let host = Arc::new(ScriptedHostStorage::holding(serde_json::to_value(sample_catalog()).unwrap()));
    let mut catalog = host_catalog(host.clone()).await;
    assert_eq!(catalog.len(), 6);

    assert!(catalog.clear().await);
    assert!(catalog.is_empty());
    assert_eq!(host.stored(), json!([]));

    // Second clear has nothing to do
    assert!(!catalog.clear().await);
    assert_eq!(host.save_count(), 1);
}

#[tokio::test]
async fn unavailable_storage_keeps_session_in_memory() {
    let mut catalog = Catalog::open(CatalogConfig::new(), PersistenceGateway::in_memory()).await;
    assert_eq!(catalog.backend(), BackendKind::Unavailable);
    assert!(catalog.is_ready());

    let draft = catalog.draft().named("Tower", "Lobby");
    let record = catalog.add(draft).await.unwrap();
    assert_eq!(catalog.find(&record.slot_id), Some(&record));

    assert!(catalog.clear().await);
    assert!(catalog.is_empty());
}

#[tokio::test]
async fn view_groups_loaded_catalog() {
    let host = Arc::new(ScriptedHostStorage::holding(serde_json::to_value(sample_catalog()).unwrap()));
    let catalog = host_catalog(host).await;

    let groups = catalog.view("floor");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, "SME");
    assert_eq!(groups[0].records[0].project_name, "Marina Office");
}

#[test]
fn draft_reset_keeps_category_and_version() {
    let mut draft = vizwalk_catalog::ProjectDraft::new(&CatalogConfig::new())
        .named("Tower", "Lobby")
        .with_category("SME");
    draft.area_sqft = "1,200".to_string();

    draft.reset();
    assert_eq!(draft.category, "SME");
    assert_eq!(draft.build_version, "V1");
    assert!(draft.project_name.is_empty());
    assert!(draft.area_sqft.is_empty());
}
