use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{TimeZone, Utc};

use vmgr_api::{
    ApiErrorBody, BaseConfigInfoBacking, DiskFileBackingInfo, Id, IdList, VStorageObject,
    VStorageObjectConfigInfo, VslmTagEntry,
};
use vmgr_client::{ClientError, HostAccountManager, HttpClient, VStorageObjectManager};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiErrorBody>)>;

/// In-memory stand-in for the management API
#[derive(Default)]
struct FakeApi {
    datastores: HashMap<String, Vec<VStorageObject>>,
    tags: HashMap<String, Vec<VslmTagEntry>>,
    accounts: Mutex<Vec<(Option<String>, String)>>,
    reconciled: Mutex<Vec<String>>,
    fail_reconcile: bool,
}

fn disk(id: &str, name: &str) -> VStorageObject {
    VStorageObject {
        config: VStorageObjectConfigInfo {
            id: Id::new(id),
            name: name.to_string(),
            create_time: Utc
                .with_ymd_and_hms(2024, 3, 5, 10, 15, 30)
                .single()
                .map(|t| t.fixed_offset()),
            backing: Some(BaseConfigInfoBacking::DiskFile(DiskFileBackingInfo {
                datastore: "datastore-11".to_string(),
                file_path: format!("[datastore1] fcd/{name}.vmdk"),
                provisioning_type: "thin".to_string(),
                ..Default::default()
            })),
            capacity_in_mb: 1024,
            consumption_type: vec!["disk".to_string()],
            ..Default::default()
        },
    }
}

fn not_found(message: String) -> (StatusCode, Json<ApiErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ApiErrorBody::not_found(message)))
}

async fn list(State(api): State<Arc<FakeApi>>, Path(ds): Path<String>) -> ApiResult<IdList> {
    let objects = api
        .datastores
        .get(&ds)
        .ok_or_else(|| not_found(format!("datastore {ds}")))?;
    Ok(Json(IdList {
        ids: objects.iter().map(|o| o.config.id.clone()).collect(),
    }))
}

async fn retrieve(
    State(api): State<Arc<FakeApi>>,
    Path((ds, id)): Path<(String, String)>,
) -> ApiResult<VStorageObject> {
    api.datastores
        .get(&ds)
        .and_then(|objects| objects.iter().find(|o| o.id() == id))
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(format!("object {id}")))
}

async fn attached(
    State(api): State<Arc<FakeApi>>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResult<IdList> {
    let category = query.get("category").cloned().unwrap_or_default();
    let tag = query.get("tag").cloned().unwrap_or_default();

    let ids = api
        .tags
        .iter()
        .filter(|(_, tags)| {
            tags.iter()
                .any(|t| t.parent_category_name == category && t.tag_name == tag)
        })
        .map(|(id, _)| Id::new(id.clone()))
        .collect();
    Ok(Json(IdList { ids }))
}

async fn tags(
    State(api): State<Arc<FakeApi>>,
    Path(id): Path<String>,
) -> ApiResult<Vec<VslmTagEntry>> {
    Ok(Json(api.tags.get(&id).cloned().unwrap_or_default()))
}

async fn reconcile(
    State(api): State<Arc<FakeApi>>,
    Path(ds): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    if api.fail_reconcile {
        return Err((StatusCode::SERVICE_UNAVAILABLE, "inventory busy".to_string()));
    }
    api.reconciled.lock().unwrap().push(ds);
    Ok(StatusCode::NO_CONTENT)
}

fn remove_account(
    api: &FakeApi,
    host: Option<String>,
    id: String,
) -> Result<StatusCode, (StatusCode, Json<ApiErrorBody>)> {
    let mut accounts = api.accounts.lock().unwrap();
    let before = accounts.len();
    accounts.retain(|(h, a)| !(h == &host && a == &id));
    if accounts.len() == before {
        return Err(not_found(format!("account {id}")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_host_account(
    State(api): State<Arc<FakeApi>>,
    Path((host, id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<ApiErrorBody>)> {
    remove_account(&api, Some(host), id)
}

async fn remove_connected_account(
    State(api): State<Arc<FakeApi>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiErrorBody>)> {
    remove_account(&api, None, id)
}

async fn spawn_server(api: FakeApi) -> (SocketAddr, Arc<FakeApi>) {
    let api = Arc::new(api);
    let app = Router::new()
        .route("/datastores/{ds}/vstorage-objects", get(list))
        .route("/datastores/{ds}/vstorage-objects/{id}", get(retrieve))
        .route("/datastores/{ds}/reconcile", post(reconcile))
        .route("/vstorage-objects/attached", get(attached))
        .route("/vstorage-objects/{id}/tags", get(tags))
        .route("/hosts/{host}/accounts/{id}", delete(remove_host_account))
        .route("/host/accounts/{id}", delete(remove_connected_account))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, api)
}

fn sample_api() -> FakeApi {
    let mut api = FakeApi::default();
    api.datastores.insert(
        "datastore1".to_string(),
        vec![disk("id-1", "pvc-1"), disk("id-2", "pvc-2")],
    );
    api.datastores
        .insert("vsan Datastore".to_string(), vec![disk("id-9", "vsan-disk")]);
    api.tags.insert(
        "id-2".to_string(),
        vec![VslmTagEntry::new("k8s-region", "us-west-2")],
    );
    api.accounts
        .lock()
        .unwrap()
        .extend([(Some("esx-01".to_string()), "alice".to_string()), (None, "bob".to_string())]);
    api
}

fn client_for(addr: SocketAddr) -> HttpClient {
    HttpClient::new(format!("http://{addr}")).unwrap()
}

#[tokio::test]
async fn test_list_and_retrieve() {
    let (addr, _api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).vstorage_manager("datastore1");

    let ids = manager.list().await.unwrap();
    assert_eq!(ids, vec!["id-1", "id-2"]);

    let obj = manager.retrieve("id-2").await.unwrap();
    assert_eq!(obj.config.name, "pvc-2");
    assert_eq!(obj.disk_file_path(), Some("[datastore1] fcd/pvc-2.vmdk"));
}

#[tokio::test]
async fn test_retrieve_missing_is_not_found() {
    let (addr, _api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).vstorage_manager("datastore1");

    let err = manager.retrieve("gone").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "not found: object gone");
}

#[tokio::test]
async fn test_datastore_name_is_encoded() {
    let (addr, _api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).vstorage_manager("vsan Datastore");

    let ids = manager.list().await.unwrap();
    assert_eq!(ids, vec!["id-9"]);
}

#[tokio::test]
async fn test_list_attached_objects_and_tags() {
    let (addr, _api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).vstorage_manager("datastore1");

    let ids = manager
        .list_attached_objects("k8s-region", "us-west-2")
        .await
        .unwrap();
    assert_eq!(ids, vec!["id-2"]);

    let tags = manager.list_attached_tags("id-2").await.unwrap();
    assert_eq!(tags, vec![VslmTagEntry::new("k8s-region", "us-west-2")]);

    let none = manager.list_attached_tags("id-1").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_reconcile() {
    let (addr, api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).vstorage_manager("datastore1");

    manager.reconcile_datastore_inventory().await.unwrap();
    assert_eq!(*api.reconciled.lock().unwrap(), vec!["datastore1".to_string()]);
}

#[tokio::test]
async fn test_reconcile_failure_is_api_error() {
    let mut fake = sample_api();
    fake.fail_reconcile = true;
    let (addr, _api) = spawn_server(fake).await;
    let manager = client_for(addr).vstorage_manager("datastore1");

    let err = manager.reconcile_datastore_inventory().await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "inventory busy");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_remove_account() {
    let (addr, api) = spawn_server(sample_api()).await;
    let client = client_for(addr);

    client
        .host_account_manager(Some("esx-01".to_string()))
        .remove("alice")
        .await
        .unwrap();
    client.host_account_manager(None).remove("bob").await.unwrap();

    assert!(api.accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_missing_account() {
    let (addr, _api) = spawn_server(sample_api()).await;
    let manager = client_for(addr).host_account_manager(Some("esx-02".to_string()));

    let err = manager.remove("alice").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let manager = client_for(addr).vstorage_manager("datastore1");
    let err = manager.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
