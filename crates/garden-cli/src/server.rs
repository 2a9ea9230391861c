//! HTTP surface over the garden operations.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use garden_core::{DecayConfig, now_utc};
use garden_store::Store;
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::garden::{self, GardenError, RefreshRequest, WaterRequest};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
    pub config: Arc<DecayConfig>,
    pub service_name: Arc<str>,
}

impl AppState {
    pub fn new(store: Store, config: DecayConfig, service_name: &str) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
            service_name: Arc::from(service_name),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn garden_error(e: GardenError) -> ApiError {
    match e {
        GardenError::NotFound { .. } => error_response(StatusCode::NOT_FOUND, "contact not found"),
        GardenError::Store(e) => {
            tracing::error!("store failure: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

/// Malformed or mistyped request bodies get the same JSON error shape as
/// every other failure.
fn json_body<T>(
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> std::result::Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(error_response(StatusCode::BAD_REQUEST, rejection.body_text())),
    }
}

/// Browser origins allowed to call the API. An empty list allows any origin.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(false)
        .max_age(Duration::from_secs(3600));

    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}: {e}");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        base
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/garden/{user_id}", get(get_garden))
        .route("/api/v1/refresh-garden", post(refresh_garden))
        .route("/api/v1/water/{contact_id}", post(water_plant))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "service": &*state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_garden(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let store = state.store.lock().await;
    let view = garden::garden_view(&store, &state.config, &user_id, now_utc()).map_err(garden_error)?;
    Ok(Json(view))
}

async fn refresh_garden(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RefreshRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let store = state.store.lock().await;
    let result = garden::refresh_garden(&store, &req.user_id, now_utc()).map_err(garden_error)?;
    Ok(Json(result))
}

async fn water_plant(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    payload: std::result::Result<Json<WaterRequest>, JsonRejection>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let req = json_body(payload)?;
    let contact_id = Uuid::parse_str(&contact_id).map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("invalid contact id: {contact_id}"),
        )
    })?;
    let store = state.store.lock().await;
    let resp = garden::water_plant(&store, &state.config, contact_id, &req, now_utc())
        .map_err(garden_error)?;
    Ok(Json(resp))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

/// Serve until Ctrl-C or SIGTERM, then checkpoint the WAL.
pub async fn serve(state: AppState, addr: SocketAddr, allowed_origins: &[String]) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        "{} listening on http://{}",
        state.service_name,
        listener.local_addr()?
    );

    axum::serve(listener, router(state.clone(), allowed_origins))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    let store = state.store.lock().await;
    if let Err(e) = store.checkpoint_truncate() {
        tracing::warn!("WAL checkpoint on shutdown failed: {e}");
    }
    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration as ChronoDuration;
    use garden_core::Tier;
    use garden_store::NewContact;
    use serde_json::Value;
    use tower::ServiceExt;

    const USER: &str = "user-1";

    fn test_state() -> (AppState, Uuid) {
        let store = Store::open_in_memory().unwrap();
        let mut new = NewContact::new(
            USER,
            "Sarah Chen",
            Tier::Orchid,
            0.0495,
            now_utc() - ChronoDuration::days(20),
        );
        new.health_score = 1.0;
        let id = store.insert_contact(&new).unwrap().id;
        (AppState::new(store, DecayConfig::default(), "garden-test"), id)
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.expect("response");
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_reports_alive() {
        let (state, _) = test_state();
        let (status, json) = send(router(state, &[]), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "alive");
        assert_eq!(json["service"], "garden-test");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn garden_returns_live_scores() {
        let (state, id) = test_state();
        let (status, json) = send(router(state, &[]), get_req(&format!("/api/v1/garden/{USER}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_plants"], 1);
        let plant = &json["plants"][0];
        assert_eq!(plant["id"], id.to_string());
        // 20 days at the orchid rate: e^(-0.99) ≈ 0.37
        let score = plant["health_score"].as_f64().unwrap();
        assert!((score - 0.3716).abs() < 0.01, "score {score}");
        assert_eq!(plant["status"], "at_risk");
        assert_eq!(json["needs_attention"], 1);
    }

    #[tokio::test]
    async fn garden_for_unknown_user_is_empty() {
        let (state, _) = test_state();
        let (status, json) = send(router(state, &[]), get_req("/api/v1/garden/nobody")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_plants"], 0);
        assert_eq!(json["avg_health"], 0.0);
    }

    #[tokio::test]
    async fn refresh_updates_stored_scores() {
        let (state, id) = test_state();
        let app = router(state.clone(), &[]);
        let (status, json) = send(
            app,
            post_json("/api/v1/refresh-garden", serde_json::json!({ "user_id": USER })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["contacts_updated"], 1);

        let stored = state.store.lock().await.get_contact(USER, id).unwrap().unwrap();
        assert!(stored.health_score < 0.5);
    }

    #[tokio::test]
    async fn water_resets_plant() {
        let (state, id) = test_state();
        let (status, json) = send(
            router(state, &[]),
            post_json(
                &format!("/api/v1/water/{id}"),
                serde_json::json!({ "user_id": USER, "type": "coffee", "notes": "caught up" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["contact_id"], id.to_string());
        assert_eq!(json["new_health"], 1.0);
        assert_eq!(json["new_stage"], "seed");
        assert_eq!(json["status"], "thriving");
    }

    #[tokio::test]
    async fn water_unknown_contact_is_404() {
        let (state, _) = test_state();
        let (status, json) = send(
            router(state, &[]),
            post_json(
                &format!("/api/v1/water/{}", Uuid::new_v4()),
                serde_json::json!({ "user_id": USER }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "contact not found");
    }

    #[tokio::test]
    async fn water_bad_id_is_400() {
        let (state, _) = test_state();
        let (status, json) = send(
            router(state, &[]),
            post_json("/api/v1/water/not-a-uuid", serde_json::json!({ "user_id": USER })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("not-a-uuid"));
    }

    #[tokio::test]
    async fn water_unknown_kind_is_rejected() {
        let (state, id) = test_state();
        let (status, json) = send(
            router(state, &[]),
            post_json(
                &format!("/api/v1/water/{id}"),
                serde_json::json!({ "user_id": USER, "type": "carrier_pigeon" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("carrier_pigeon"));
    }

    #[tokio::test]
    async fn refresh_without_user_is_json_400() {
        let (state, _) = test_state();
        let (status, json) = send(
            router(state, &[]),
            post_json("/api/v1/refresh-garden", serde_json::json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("user_id"));
    }

    #[tokio::test]
    async fn water_with_non_json_body_is_json_400() {
        let (state, id) = test_state();
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/v1/water/{id}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, json) = send(router(state, &[]), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/health")
            .header("origin", origin)
            .header("access-control-request-method", "GET")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn cors_allows_any_origin_when_unconfigured() {
        let (state, _) = test_state();
        let resp = router(state, &[])
            .oneshot(preflight("http://any.example"))
            .await
            .expect("response");
        assert_eq!(
            resp.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn cors_restricts_to_configured_origins() {
        let (state, _) = test_state();
        let app = router(state, &["http://localhost:8081".to_string()]);

        let allowed = app
            .clone()
            .oneshot(preflight("http://localhost:8081"))
            .await
            .expect("response");
        assert_eq!(
            allowed.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("http://localhost:8081"))
        );

        let blocked = app
            .oneshot(preflight("http://evil.example"))
            .await
            .expect("response");
        assert!(blocked.headers().get("access-control-allow-origin").is_none());
    }
}
