use super::*;
use crate::testing::point_record;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, put},
    Json, Router,
};
use chrono::{TimeZone, Utc};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const AUTH: &str = "Basic test-token";

#[derive(Clone, Default)]
struct ServerState {
    seen_authorization: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

impl ServerState {
    fn record_auth(&self, headers: &HeaderMap) {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.seen_authorization.lock().expect("lock").push(value);
    }
}

fn fixture() -> PointRecord {
    point_record(
        "p-1",
        Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0).unwrap(),
        120,
        "amsterdam",
    )
}

async fn list_points(State(state): State<ServerState>, headers: HeaderMap) -> Json<Vec<PointRecord>> {
    state.record_auth(&headers);
    Json(vec![fixture()])
}

async fn create_point(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<NewPointRecord>,
) -> Json<PointRecord> {
    state.record_auth(&headers);
    Json(PointRecord {
        id: "server-7".to_string(),
        kind: payload.kind,
        base_price: payload.base_price,
        date_from: payload.date_from,
        date_to: payload.date_to,
        destination: payload.destination,
        is_favorite: payload.is_favorite,
        offers: payload.offers,
    })
}

async fn update_point(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<PointRecord>,
) -> Result<Json<PointRecord>, (StatusCode, Json<ApiError>)> {
    state.record_auth(&headers);
    if id != payload.id {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new(400, "id mismatch")),
        ));
    }
    if id == "missing" {
        return Err((StatusCode::NOT_FOUND, Json(ApiError::new(404, "Not found"))));
    }
    Ok(Json(payload))
}

async fn delete_point(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    state.record_auth(&headers);
    if id == "missing" {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    state.deleted.lock().expect("lock").push(id);
    StatusCode::NO_CONTENT
}

async fn spawn_trip_server() -> Result<(String, ServerState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = ServerState::default();
    let app = Router::new()
        .route("/points", get(list_points).post(create_point))
        .route("/points/:id", put(update_point).delete(delete_point))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/"), state))
}

#[tokio::test]
async fn lists_points_with_authorization_header() {
    let (server_url, state) = spawn_trip_server().await.expect("spawn server");
    let service = RestTripService::new(&server_url, AUTH).expect("service");

    let points = service.list_points().await.expect("points");

    assert_eq!(points, vec![fixture()]);
    assert_eq!(*state.seen_authorization.lock().expect("lock"), [AUTH]);
}

#[tokio::test]
async fn create_update_and_delete_round_trip() {
    let (server_url, state) = spawn_trip_server().await.expect("spawn server");
    let service = RestTripService::new(&server_url, AUTH).expect("service");
    let point = Point::try_from(fixture()).expect("point");

    let created = service
        .create_point(&NewPointRecord::from(&point.to_draft()))
        .await
        .expect("create");
    assert_eq!(created.id, "server-7");
    assert_eq!(created.base_price, 120);

    let mut record = fixture();
    record.base_price = 999;
    let updated = service.update_point(&record).await.expect("update");
    assert_eq!(updated, record);

    service
        .delete_point(&PointId::new("p-1"))
        .await
        .expect("delete");
    assert_eq!(*state.deleted.lock().expect("lock"), ["p-1"]);
}

#[tokio::test]
async fn surfaces_service_error_body() {
    let (server_url, _state) = spawn_trip_server().await.expect("spawn server");
    let service = RestTripService::new(&server_url, AUTH).expect("service");
    let mut record = fixture();
    record.id = "missing".to_string();

    let err = service.update_point(&record).await.expect_err("must fail");
    let api = err.downcast_ref::<ApiException>().expect("api exception");
    assert_eq!(api.status, 404);
    assert_eq!(api.message, "Not found");

    let err = service
        .delete_point(&PointId::new("missing"))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("500"), "unexpected error: {err}");
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let service = RestTripService::new(&format!("http://{addr}"), AUTH).expect("service");

    let err = service.list_offers().await.expect_err("must fail");
    assert!(err.to_string().contains("failed to reach trip service"));
}

#[test]
fn normalizes_and_validates_server_urls() {
    assert_eq!(
        normalize_server_url(" https://trip.example/big-trip/ ").expect("url"),
        "https://trip.example/big-trip"
    );
    assert!(normalize_server_url("").is_err());
    assert!(normalize_server_url("ftp://trip.example").is_err());
    assert!(normalize_server_url("not a url").is_err());
}
