//! JSON/form CRUD endpoints under `/things`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::{NewThing, Thing, ThingStorage};
use crate::AppState;
use crate::admin::ADMIN_PATH;
use crate::extract::{JsonOrForm, found, wants_html};
use crate::types::{ErrorResponse, OkResponse};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateThingResponse {
    pub ok: bool,
    pub thing: Thing,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListThingsResponse {
    pub things: Vec<Thing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetThingResponse {
    pub thing: Thing,
}

/// Body or query naming one thing.
#[derive(Debug, Deserialize)]
pub struct ThingIdParams {
    pub thing_id: String,
}

pub fn routes<T: ThingStorage>() -> Router<AppState<T>> {
    Router::new()
        .route("/create", get(create::<T>).post(create::<T>))
        .route("/list", get(list::<T>))
        .route("/get", get(get_thing::<T>))
        .route("/delete", axum::routing::delete(delete::<T>).post(delete::<T>))
}

/// Create a thing.
///
/// GET|POST /things/create
pub async fn create<T: ThingStorage>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    JsonOrForm(payload): JsonOrForm<NewThing>,
) -> Response {
    let thing = match state.thing_storage.add_thing(payload).await {
        Ok(thing) => thing,
        Err(e) => {
            // Storage validation errors surface as their message.
            tracing::warn!("Failed to create thing: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::bad_request(e.to_string())),
            )
                .into_response();
        }
    };

    tracing::info!(thing_id = %thing.thing_id, "Thing created");

    if wants_html(&headers) {
        return found(ADMIN_PATH);
    }

    (
        StatusCode::OK,
        Json(CreateThingResponse { ok: true, thing }),
    )
        .into_response()
}

/// List all things in insertion order.
///
/// GET /things/list
pub async fn list<T: ThingStorage>(State(state): State<AppState<T>>) -> Response {
    match state.thing_storage.list_things().await {
        Ok(things) => (StatusCode::OK, Json(ListThingsResponse { things })).into_response(),
        Err(e) => {
            tracing::error!("Failed to list things: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error("Failed to list things")),
            )
                .into_response()
        }
    }
}

/// Fetch one thing.
///
/// GET /things/get?thing_id=
pub async fn get_thing<T: ThingStorage>(
    State(state): State<AppState<T>>,
    Query(params): Query<ThingIdParams>,
) -> Response {
    match state.thing_storage.get_thing(&params.thing_id).await {
        Ok(Some(thing)) => (StatusCode::OK, Json(GetThingResponse { thing })).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Thing not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to get thing: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error("Failed to get thing")),
            )
                .into_response()
        }
    }
}

/// Delete a thing.
///
/// DELETE|POST /things/delete
pub async fn delete<T: ThingStorage>(
    State(state): State<AppState<T>>,
    headers: HeaderMap,
    JsonOrForm(params): JsonOrForm<ThingIdParams>,
) -> Response {
    match state.thing_storage.delete_thing(&params.thing_id).await {
        Ok(true) => {
            tracing::info!(thing_id = %params.thing_id, "Thing deleted");
            if wants_html(&headers) {
                found(ADMIN_PATH)
            } else {
                (StatusCode::OK, Json(OkResponse::ok())).into_response()
            }
        }
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Thing not found")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete thing: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal_error("Failed to delete thing")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routes;
    use crate::things::MemoryThingStorage;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tower::ServiceExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_from_json() {
        let storage = MemoryThingStorage::new();
        let app = routes(storage.clone(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/things/create")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Thing1","description":"Thing1 Description"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["thing"]["name"], "Thing1");
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_create_from_form_redirects_browsers() {
        let storage = MemoryThingStorage::new();
        let app = routes(storage.clone(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/things/create")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .header(header::ACCEPT, "text/html")
                    .body(Body::from("name=Thing1&description=From+a+form"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/_fake/admin")
        );
        let things = storage.list_things().await.unwrap();
        assert_eq!(things[0].description, "From a form");
    }

    #[tokio::test]
    async fn test_create_from_query_string() {
        let storage = MemoryThingStorage::new();
        let app = routes(storage.clone(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/things/create?name=Q&description=via+get")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let storage = MemoryThingStorage::new();
        let app = routes(storage.clone(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/things/create")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":" ","description":"d"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_scalar_metadata() {
        let storage = MemoryThingStorage::new();
        let app = routes(storage.clone(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/things/create")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"n","description":"d","metadata":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "bad_request");
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_thing() {
        let app = routes(MemoryThingStorage::new(), Config::new_for_test()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/things/delete")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"thing_id":"missing"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Thing not found");
    }

    #[tokio::test]
    async fn test_get_thing_by_id() {
        let storage = MemoryThingStorage::new();
        let thing = storage
            .add_thing(NewThing::new("Thing1", "d"))
            .await
            .unwrap();
        let app = routes(storage, Config::new_for_test()).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/things/get?thing_id={}", thing.thing_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["thing"]["thing_id"], thing.thing_id.as_str());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/things/get?thing_id=missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
