use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use axum::routing::get as get_route;
use dunex::services::{ScorerError, SheetClient, TournamentScorer};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn setup_test_app() -> axum::Router {
    let dir = common::stage_dir(&[
        ("stage-a.geojson", common::SIMPLE_GEOJSON),
        ("stage-b.kml", common::SIMPLE_KML),
    ])
    .await;
    let state = common::test_state(dir, common::ok_scorer(), Some(common::ADMIN_PASSWORD));
    dunex::routes::create_router(state)
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let app = setup_test_app().await;

    let response = app.oneshot(get("/debug/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["checks"]["catalog"]["stages"], 2);
    assert_eq!(json["checks"]["scorer"], "ok");
}

#[tokio::test]
async fn test_list_stages() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(get("/api/uniraid2026/stages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stages = json["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 2);

    assert_eq!(stages[0]["id"], 1);
    assert_eq!(stages[0]["name"], "Etapa A");
    assert_eq!(stages[0]["type"], "trip");
    assert!(stages[0].get("description").is_none());
    assert_eq!(stages[0]["coords"][0], json!([-4.4265, 31.9314]));

    assert_eq!(stages[1]["type"], "stage");
    assert_eq!(stages[1]["description"], "Errachidia → Erg Chebbi");
    // GeoJSON and KML sources yield the same route
    assert_eq!(stages[0]["coords"], stages[1]["coords"]);
}

#[tokio::test]
async fn test_list_stages_fails_whole_catalog_on_bad_file() {
    let dir = common::stage_dir(&[
        ("stage-a.geojson", common::SIMPLE_GEOJSON),
        ("stage-b.kml", "<kml><Placemark><Point><coordinates>1,2</coordinates></Point></Placemark></kml>"),
    ])
    .await;
    let state = common::test_state(dir, common::ok_scorer(), None);
    let app = dunex::routes::create_router(state);

    let response = app
        .oneshot(get("/api/uniraid2026/stages"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("stage-b.kml"), "{}", error);
    assert!(json.get("stages").is_none());
}

#[tokio::test]
async fn test_stage_geojson_export() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(get("/api/uniraid2026/stages/2/geojson?points=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["type"], "FeatureCollection");
    let feature = &json["features"][0];
    assert_eq!(feature["geometry"]["type"], "LineString");
    assert_eq!(feature["geometry"]["coordinates"].as_array().unwrap().len(), 2);
    assert_eq!(feature["properties"]["name"], "Etapa B");
}

#[tokio::test]
async fn test_stage_geojson_unknown_stage() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(get("/api/uniraid2026/stages/42/geojson"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup_test_app().await;

    let response = app.oneshot(get("/api/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=30"
    );

    let json = body_json(response).await;
    assert_eq!(json["km"], 3200.0);
    assert_eq!(json["kg"], 84.0);
    assert_eq!(json["sponsors"], 10);
    assert_eq!(json["daysToGo"], 42);
}

#[tokio::test]
async fn test_auth_success() {
    let app = setup_test_app().await;

    let request = post_json(
        "/api/torneo/auth",
        json!({ "password": common::ADMIN_PASSWORD }).to_string(),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn test_auth_wrong_password() {
    let app = setup_test_app().await;

    let request = post_json("/api/torneo/auth", json!({ "password": "nope" }).to_string());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Invalid password" })
    );
}

#[tokio::test]
async fn test_auth_missing_password_field() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json("/api/torneo/auth", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_malformed_body() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json("/api/torneo/auth", "not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Invalid request" })
    );
}

#[tokio::test]
async fn test_auth_without_configured_secret() {
    let dir = common::stage_dir(&[]).await;
    let app = dunex::routes::create_router(common::test_state(dir, common::ok_scorer(), None));

    let request = post_json("/api/torneo/auth", json!({ "password": "" }).to_string());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "success": false, "error": "Server configuration error" })
    );
}

#[tokio::test]
async fn test_calculate_returns_scorer_output() {
    let app = setup_test_app().await;
    let data = json!({ "players": [{ "name": "Ana" }, { "name": "Luis" }] });

    let response = app
        .oneshot(post_json("/api/torneo/calculate", data.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "scored": data }));
}

#[tokio::test]
async fn test_calculate_process_failure() {
    let dir = common::stage_dir(&[]).await;
    let scorer = common::failing_scorer(ScorerError::ProcessFailed {
        details: "Traceback: KeyError 'groups'".to_string(),
    });
    let app = dunex::routes::create_router(common::test_state(dir, scorer, None));

    let response = app
        .oneshot(post_json("/api/torneo/calculate", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Scoring process failed");
    assert_eq!(json["details"], "Traceback: KeyError 'groups'");
}

#[tokio::test]
async fn test_calculate_non_json_output() {
    let dir = common::stage_dir(&[]).await;
    let scorer = common::failing_scorer(ScorerError::InvalidOutput {
        output: "hello".to_string(),
    });
    let app = dunex::routes::create_router(common::test_state(dir, scorer, None));

    let response = app
        .oneshot(post_json("/api/torneo/calculate", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Failed to parse scoring output");
    assert_eq!(json["output"], "hello");
}

#[tokio::test]
async fn test_calculate_rejects_invalid_json() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(post_json("/api/torneo/calculate", "{ nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn test_tournament_data_requires_sheet_url() {
    let app = setup_test_app().await;

    let response = app.oneshot(get("/api/torneo/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

fn sheet_fixture() -> Value {
    json!({
        "equipos": [
            { "nombre": "Arena Roja", "puntos": 12 },
            { "nombre": "Duna 4x4", "puntos": 9 }
        ]
    })
}

/// Serve a stand-in tournament sheet on an ephemeral local port.
///
/// `/sheet` returns the fixture, `/down` a 503 and `/garbage` a non-JSON 200.
async fn spawn_sheet_server() -> SocketAddr {
    let app = axum::Router::new()
        .route("/sheet", get_route(|| async { axum::Json(sheet_fixture()) }))
        .route(
            "/down",
            get_route(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route("/garbage", get_route(|| async { "<html>login</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    addr
}

async fn sheet_app(path: &str, scorer: Arc<dyn TournamentScorer>) -> axum::Router {
    let addr = spawn_sheet_server().await;
    let sheet = SheetClient::new(format!("http://{}{}", addr, path));
    let dir = common::stage_dir(&[]).await;
    let state = common::test_state_with_sheet(dir, scorer, None, Some(sheet));
    dunex::routes::create_router(state)
}

#[tokio::test]
async fn test_tournament_data_serves_scored_sheet() {
    let app = sheet_app("/sheet", common::ok_scorer()).await;

    let response = app.oneshot(get("/api/torneo/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, json!({ "scored": sheet_fixture() }));
}

#[tokio::test]
async fn test_tournament_data_falls_back_to_raw_when_scoring_fails() {
    let scorer = common::failing_scorer(ScorerError::ProcessFailed {
        details: "Traceback".to_string(),
    });
    let app = sheet_app("/sheet", scorer).await;

    let response = app.oneshot(get("/api/torneo/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, sheet_fixture());
}

#[tokio::test]
async fn test_tournament_data_sheet_error_is_bad_gateway() {
    let app = sheet_app("/down", common::ok_scorer()).await;

    let response = app.oneshot(get("/api/torneo/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("503"), "{}", error);
    assert!(error.contains("maintenance"), "{}", error);
}

#[tokio::test]
async fn test_tournament_data_non_json_sheet_is_bad_gateway() {
    let app = sheet_app("/garbage", common::ok_scorer()).await;

    let response = app.oneshot(get("/api/torneo/data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
