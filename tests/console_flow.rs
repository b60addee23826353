//! Flujo completo de la consola contra un backend REST falso (axum en 127.0.0.1:0)

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use freight_console::clients::ApiClient;
use freight_console::config::EnvironmentConfig;
use freight_console::controllers::{EntityListView, SubmitOutcome};
use freight_console::models::{EntityKind, Freight, Transporter, Vehicle};
use freight_console::services::MemoryNotifier;
use freight_console::{AppError, AppState};

#[derive(Default)]
struct Backend {
    records: HashMap<String, BTreeMap<i64, Value>>,
    next_id: i64,
    calls: Vec<String>,
}

type Shared = Arc<Mutex<Backend>>;

impl Backend {
    fn seed(&mut self, entity: &str, record: Value) {
        let id = record["id"].as_i64().unwrap();
        self.next_id = self.next_id.max(id);
        self.records.entry(entity.to_string()).or_default().insert(id, record);
    }

    fn materialize(&self, id: i64, mut record: Value) -> Value {
        record["id"] = json!(id);
        for (field, entity) in [("transporter_id", "transporter"), ("driver_id", "driver")] {
            if let Some(ref_id) = record.get(field).and_then(Value::as_i64) {
                if let Some(referenced) = self.records.get(entity).and_then(|r| r.get(&ref_id)) {
                    record[entity] = referenced.clone();
                }
            }
        }
        record
    }
}

async fn list(
    State(backend): State<Shared>,
    Path(entity): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut backend = backend.lock().unwrap();
    backend.calls.push(format!("GET /{}", entity));
    let needle = params.values().next().map(|v| v.to_lowercase());
    let records: Vec<Value> = backend
        .records
        .get(&entity)
        .map(|records| records.values().cloned().collect())
        .unwrap_or_default();
    let filtered = records
        .into_iter()
        .filter(|record| match &needle {
            Some(needle) => record.to_string().to_lowercase().contains(needle),
            None => true,
        })
        .collect();
    Json(Value::Array(filtered))
}

async fn create(
    State(backend): State<Shared>,
    Path(entity): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut backend = backend.lock().unwrap();
    backend.calls.push(format!("POST /{}", entity));
    backend.next_id += 1;
    let id = backend.next_id;
    let record = backend.materialize(id, body);
    backend.records.entry(entity).or_default().insert(id, record.clone());
    (StatusCode::CREATED, Json(record))
}

async fn show(
    State(backend): State<Shared>,
    Path((entity, id)): Path<(String, i64)>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = backend.lock().unwrap();
    backend.calls.push(format!("GET /{}/{}", entity, id));
    backend
        .records
        .get(&entity)
        .and_then(|records| records.get(&id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update(
    State(backend): State<Shared>,
    Path((entity, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = backend.lock().unwrap();
    backend.calls.push(format!("PUT /{}/{}", entity, id));
    if !backend.records.get(&entity).is_some_and(|r| r.contains_key(&id)) {
        return Err(StatusCode::NOT_FOUND);
    }
    let record = backend.materialize(id, body);
    backend.records.entry(entity).or_default().insert(id, record.clone());
    Ok(Json(record))
}

async fn remove(State(backend): State<Shared>, Path((entity, id)): Path<(String, i64)>) -> StatusCode {
    let mut backend = backend.lock().unwrap();
    backend.calls.push(format!("DELETE /{}/{}", entity, id));
    match backend.records.get_mut(&entity).and_then(|r| r.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

struct TestApp {
    state: AppState,
    backend: Shared,
    notifier: Arc<MemoryNotifier>,
}

impl TestApp {
    fn calls(&self, call: &str) -> usize {
        self.backend.lock().unwrap().calls.iter().filter(|c| *c == call).count()
    }

    fn seed(&self, entity: &str, record: Value) {
        self.backend.lock().unwrap().seed(entity, record);
    }
}

async fn create_test_app() -> TestApp {
    let backend: Shared = Arc::new(Mutex::new(Backend::default()));
    let app = Router::new()
        .route("/:entity", get(list).post(create))
        .route("/:entity/:id", get(show).put(update).delete(remove))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = EnvironmentConfig {
        api_base_url: format!("http://{}", addr),
        search_debounce_ms: 0,
        ..EnvironmentConfig::default()
    };
    let notifier = Arc::new(MemoryNotifier::new());
    let client = ApiClient::new(&config).unwrap();
    let state = AppState::new(config, Arc::new(client), notifier.clone());

    TestApp { state, backend, notifier }
}

fn seed_freight(app: &TestApp, id: i64, number: &str) {
    app.seed(
        "freight",
        json!({
            "id": id,
            "freightNumber": number,
            "status": "WAITING_FOR_BID",
            "freightDate": "2024-05-01",
            "cargoType": "PERISHABLE",
            "vehicleType": "TRUCK",
            "totalCoast": 980.5,
            "transporter": { "id": 7, "name": "Rápido Sul" },
            "driver": null
        }),
    );
}

#[tokio::test]
async fn test_vehicle_create_refreshes_mounted_list() {
    let app = create_test_app().await;
    app.seed("transporter", json!({ "id": 7, "name": "Rápido Sul", "cnpj": "12345678000190" }));

    let view = EntityListView::<Vehicle>::new(app.state.clone());
    assert!(view.refresh().await.unwrap().is_empty());

    let panel = view.open_create();
    panel.load().await.unwrap();
    assert_eq!(panel.references(EntityKind::Transporter).len(), 1);
    panel.set_field("plateNumber", "ABC-1234").unwrap();
    panel.set_field("vehicleType", "VAN").unwrap();
    panel.set_field("transporter_id", "7").unwrap();

    let outcome = panel.submit().await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Created(Some(_))));
    assert!(!panel.is_open());

    assert_eq!(app.calls("POST /vehicle"), 1);
    assert_eq!(app.calls("GET /vehicle"), 2);
    assert_eq!(view.rows().await.unwrap(), vec![vec!["ABC-1234", "VAN", "Rápido Sul"]]);
    assert_eq!(app.notifier.messages(), vec!["Veículo criado com sucesso!"]);
}

#[tokio::test]
async fn test_transporter_round_trip_into_panel() {
    let app = create_test_app().await;
    app.seed("transporter", json!({ "id": 3, "name": "ACME", "cnpj": "12345678000190" }));

    let view = EntityListView::<Transporter>::new(app.state.clone());
    let panel = view.open_edit(3);
    panel.load().await.unwrap();

    assert_eq!(
        panel.values(),
        vec![("name", "ACME".to_string()), ("cnpj", "12345678000190".to_string())]
    );
    assert_eq!(app.calls("GET /transporter/3"), 1);
}

#[tokio::test]
async fn test_transporter_update_puts_once_and_refreshes() {
    let app = create_test_app().await;
    app.seed("transporter", json!({ "id": 3, "name": "ACME", "cnpj": "12345678000190" }));

    let view = EntityListView::<Transporter>::new(app.state.clone());
    view.refresh().await.unwrap();

    let panel = view.open_edit(3);
    panel.load().await.unwrap();
    panel.set_field("name", "ACME Logística").unwrap();
    let outcome = panel.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Updated(_)));
    assert_eq!(app.calls("PUT /transporter/3"), 1);
    assert_eq!(view.rows().await.unwrap()[0][0], "ACME Logística");
}

#[tokio::test]
async fn test_freight_delete_removes_row() {
    let app = create_test_app().await;
    seed_freight(&app, 41, "FR-41");
    seed_freight(&app, 42, "FR-42");

    let view = EntityListView::<Freight>::new(app.state.clone());
    assert_eq!(view.refresh().await.unwrap().len(), 2);
    assert!(view.render().await.unwrap().contains("R$ 980,50"));

    view.request_delete(42).confirm().await.unwrap();

    assert_eq!(app.calls("DELETE /freight/42"), 1);
    let rows = view.rows().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "FR-41");
    let messages = app.notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("42"));
}

#[tokio::test]
async fn test_invalid_freight_makes_no_request() {
    let app = create_test_app().await;
    let view = EntityListView::<Freight>::new(app.state.clone());
    let panel = view.open_create();
    panel.set_field("freightNumber", "FR-99").unwrap();
    panel.set_field("totalCost", "R$ 1.200,50").unwrap();

    match panel.submit().await.unwrap() {
        SubmitOutcome::Invalid(errors) => {
            assert!(errors.contains_key("status"));
            assert!(errors.contains_key("transporter_id"));
            assert!(!errors.contains_key("driver_id"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(app.calls("POST /freight"), 0);
    assert!(panel.is_open());
}

#[tokio::test]
async fn test_missing_record_surfaces_api_error() {
    let app = create_test_app().await;
    let view = EntityListView::<Vehicle>::new(app.state.clone());
    let panel = view.open_edit(999);

    let error = panel.load().await.unwrap_err();
    assert!(matches!(error, AppError::Query { .. }));
    assert!(error.is_network());
}
