//! Album endpoints under /api/v1/albums

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::{AlbumId, JsonBody};
use crate::http::server::AppState;
use crate::models::{Album, AlbumInput, BatchReport};

/// GET /api/v1/albums - list all albums
async fn list_albums(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Album>>, ApiError> {
    let albums = state.albums.get_all().await?;
    Ok(Json(albums))
}

/// POST /api/v1/albums - create an album
async fn create_album(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody<AlbumInput>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    input.validate()?;
    let album = state.albums.create(input).await?;

    Ok((StatusCode::CREATED, Json(album)))
}

/// POST /api/v1/albums/batch - create many albums in one transaction
///
/// Rows are checked one by one in the repository and the report says which
/// ones were rejected. 207 when any row failed.
async fn batch_create(
    State(state): State<Arc<AppState>>,
    JsonBody(inputs): JsonBody<Vec<AlbumInput>>,
) -> Result<(StatusCode, Json<BatchReport>), ApiError> {
    let report = state.albums.batch_create(inputs).await?;

    let status = if report.is_complete() {
        StatusCode::CREATED
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok((status, Json(report)))
}

/// GET /api/v1/albums/{id} - get a single album
async fn get_album(
    State(state): State<Arc<AppState>>,
    AlbumId(id): AlbumId,
) -> Result<Json<Album>, ApiError> {
    let album = state.albums.get(id).await?;
    Ok(Json(album))
}

/// PUT /api/v1/albums/{id} - replace title, artist and price
async fn update_album(
    State(state): State<Arc<AppState>>,
    AlbumId(id): AlbumId,
    JsonBody(input): JsonBody<AlbumInput>,
) -> Result<StatusCode, ApiError> {
    input.validate()?;
    state.albums.update(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/albums/{id}
async fn delete_album(
    State(state): State<Arc<AppState>>,
    AlbumId(id): AlbumId,
) -> Result<StatusCode, ApiError> {
    state.albums.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Album routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/albums", get(list_albums).post(create_album))
        .route("/api/v1/albums/", get(list_albums).post(create_album))
        .route("/api/v1/albums/batch", post(batch_create))
        .route(
            "/api/v1/albums/{id}",
            get(get_album).put(update_album).delete(delete_album),
        )
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::repos::MemoryAlbumRepo;
    use crate::http::server::{build_router, AppState};
    use crate::usecase::AlbumUsecase;

    fn app() -> Router {
        let albums = AlbumUsecase::new(std::sync::Arc::new(MemoryAlbumRepo::new()));
        build_router(AppState { albums })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn empty_list_is_array() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/v1/albums", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&app, "GET", "/api/v1/albums/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_then_get() {
        let app = app();
        let (status, created) = send(
            &app,
            "POST",
            "/api/v1/albums/",
            Some(json!({"title": "Blue Train", "artist": "John Coltrane", "price": 56.99})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, fetched) = send(&app, "GET", &format!("/api/v1/albums/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert_eq!(fetched["title"], "Blue Train");
        assert_eq!(fetched["artist"], "John Coltrane");
        assert_eq!(fetched["price"], 56.99);
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/albums",
            Some(json!({"title": "", "artist": "John Coltrane", "price": 56.99})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn update_changes_reads() {
        let app = app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/v1/albums",
            Some(json!({"title": "Jeru", "artist": "Gerry Mulligan", "price": 17.99})),
        )
        .await;
        let uri = format!("/api/v1/albums/{}", created["id"]);

        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"id": 999, "title": "Jeru", "artist": "Gerry Mulligan", "price": 24.99})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["id"], created["id"]);
        assert_eq!(fetched["price"], 24.99);
    }

    #[tokio::test]
    async fn delete_then_get_is_404() {
        let app = app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/v1/albums",
            Some(json!({"title": "Sarah Vaughan", "artist": "Sarah Vaughan", "price": 39.99})),
        )
        .await;
        let uri = format!("/api/v1/albums/{}", created["id"]);

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_missing_is_404() {
        let app = app();
        let (status, _) = send(
            &app,
            "PUT",
            "/api/v1/albums/41",
            Some(json!({"title": "A", "artist": "B", "price": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_integer_id_is_400() {
        let app = app();
        let (status, body) = send(&app, "GET", "/api/v1/albums/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "id: must be an integer");
    }

    #[tokio::test]
    async fn batch_creates_all_rows() {
        let app = app();
        let (status, report) = send(
            &app,
            "POST",
            "/api/v1/albums/batch",
            Some(json!([
                {"title": "A", "artist": "Artist", "price": 1.0},
                {"title": "B", "artist": "Artist", "price": 2.0}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(report["created"].as_array().unwrap().len(), 2);
        assert_eq!(report["failed"], json!([]));

        let (_, all) = send(&app, "GET", "/api/v1/albums", None).await;
        let titles: Vec<_> = all
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[tokio::test]
    async fn batch_partial_failure_is_reported() {
        let app = app();
        let (status, report) = send(
            &app,
            "POST",
            "/api/v1/albums/batch",
            Some(json!([
                {"title": "A", "artist": "Artist", "price": 1.0},
                {"title": " ", "artist": "Artist", "price": 2.0},
                {"title": "C", "artist": "Artist", "price": 3.0}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(report["created"].as_array().unwrap().len(), 2);
        assert_eq!(report["failed"][0]["index"], 1);

        let (_, all) = send(&app, "GET", "/api/v1/albums", None).await;
        assert_eq!(all.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn batch_reports_whitespace_only_rows() {
        let app = app();
        let (status, report) = send(
            &app,
            "POST",
            "/api/v1/albums/batch",
            Some(json!([
                {"title": "\t", "artist": "Artist", "price": 1.0},
                {"title": "B", "artist": "\n ", "price": 2.0},
                {"title": "C", "artist": "Artist", "price": 3.0}
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(report["failed"][0]["index"], 0);
        assert_eq!(report["failed"][1]["index"], 1);

        // Same rows are refused on the single-album paths
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/albums",
            Some(json!({"title": "\t", "artist": "Artist", "price": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, all) = send(&app, "GET", "/api/v1/albums", None).await;
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    async fn send_raw(uri: &str, content_type: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn malformed_body_uses_error_shape() {
        let (status, body) = send_raw("/api/v1/albums", "application/json", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid request body"));
    }

    #[tokio::test]
    async fn missing_field_uses_error_shape() {
        let (status, body) = send_raw(
            "/api/v1/albums/batch",
            "application/json",
            r#"[{"title": "Blue Train", "price": 56.99}]"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn wrong_content_type_uses_error_shape() {
        let (status, body) = send_raw(
            "/api/v1/albums",
            "text/plain",
            r#"{"title": "A", "artist": "B", "price": 1.0}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
