use crate::config::Config;
use crate::things::ThingStorage;
use crate::types::OkResponse;
use axum::{
    Json, Router,
    extract::{Extension, Request},
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{any, get},
};
use debug_api_table::{TableConfig, TableRenderer, Tz};
use opentelemetry::{global, propagation::Extractor};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub mod admin;
pub mod config;
pub mod extract;
pub mod telemetry;
pub mod things;
pub mod types;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState<T> {
    pub thing_storage: T,
    pub renderer: Arc<TableRenderer>,
    pub table_config: Arc<TableConfig>,
    /// Configured display timezone, if any.
    pub display_timezone: Option<Tz>,
}

impl<T> AppState<T> {
    pub fn new(thing_storage: T, config: &Config) -> Self {
        let table_config = config.table_config();
        Self {
            thing_storage,
            renderer: Arc::new(TableRenderer::new(&table_config)),
            table_config: Arc::new(table_config),
            display_timezone: config.display_timezone(),
        }
    }
}

struct HeaderExtractor<'a>(&'a axum::http::HeaderMap);

impl<'a> Extractor for HeaderExtractor<'a> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Builds the full application router over the given thing storage.
pub async fn routes<T: ThingStorage>(thing_storage: T, config: Config) -> Router {
    let state = AppState::new(thing_storage, &config);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/things", things::routes::routes::<T>())
        .merge(admin::routes::routes::<T>())
        .fallback(any(catch_all))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let parent_context = global::get_text_map_propagator(|propagator| {
                    propagator.extract(&HeaderExtractor(request.headers()))
                });

                let span = tracing::info_span!(
                    "http_request",
                    http_request.method = ?request.method(),
                    http_request.uri = ?request.uri(),
                    http_request.version = ?request.version(),
                    http_request.user_agent = ?request.headers().get(axum::http::header::USER_AGENT),
                );

                span.set_parent(parent_context);

                span
            }),
        )
        .layer(Extension(config))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    extract::found(admin::ADMIN_PATH)
}

/// `{ "ok": true }` with the environment and build in response headers.
async fn health_check(Extension(config): Extension<Config>) -> impl IntoResponse {
    let mut response = (StatusCode::OK, Json(OkResponse::ok())).into_response();

    if let Ok(env_value) = HeaderValue::from_str(&config.environment().to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-service-env"), env_value);
    }

    let version = format!("{}+{}", env!("CARGO_PKG_VERSION"), env!("BUILD_COMMIT"));
    if let Ok(version_value) = HeaderValue::from_str(&version) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("x-service-version"), version_value);
    }

    response
}

async fn catch_all() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "nothing to see here")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::things::MemoryThingStorage;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let app = routes(MemoryThingStorage::new(), Config::new_for_test()).await;

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-service-env"], "local");
        assert!(
            response.headers()["x-service-version"]
                .to_str()
                .unwrap()
                .starts_with(env!("CARGO_PKG_VERSION"))
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_root_redirects_to_admin() {
        let app = routes(MemoryThingStorage::new(), Config::new_for_test()).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/_fake/admin");
    }

    #[tokio::test]
    async fn test_catch_all() {
        let app = routes(MemoryThingStorage::new(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/does/not/exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"nothing to see here");
    }
}
