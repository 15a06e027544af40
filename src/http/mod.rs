//! HTTP surface
//!
//! Router construction, shared state and error rendering for the REST API.

mod error;
mod handlers;

pub use error::ErrorResponse;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::MatchedPath,
    http::Request,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::db::Database;
use crate::service::status::StatusTracker;
use crate::service::{ApiError, ApiResult};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub status: Arc<StatusTracker>,
}

impl AppState {
    pub fn new(db: Database, database_path: PathBuf) -> Self {
        Self {
            db,
            status: Arc::new(StatusTracker::new(database_path)),
        }
    }

    /// Run a synchronous service call on tokio's blocking pool
    pub async fn run<T, F>(&self, call: F) -> ApiResult<T>
    where
        F: FnOnce(&Database) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || call(&db))
            .await
            .map_err(|e| ApiError::Internal(format!("Service task failed: {}", e)))?
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let tags = Router::new()
        .route("/tags", get(handlers::tags::list).post(handlers::tags::create))
        .route("/tags/:id", get(handlers::tags::get).delete(handlers::tags::delete));

    let ingredients = Router::new()
        .route(
            "/ingredients",
            get(handlers::ingredients::list).post(handlers::ingredients::create),
        )
        .route(
            "/ingredients/:id",
            get(handlers::ingredients::get)
                .put(handlers::ingredients::update)
                .delete(handlers::ingredients::delete),
        );

    let recipes = Router::new()
        .route("/recipes", get(handlers::recipes::list).post(handlers::recipes::create))
        .route(
            "/recipes/:id",
            get(handlers::recipes::get)
                .put(handlers::recipes::update)
                .delete(handlers::recipes::delete),
        )
        .route("/recipes/:id/scaled", get(handlers::recipes::scaled))
        .route("/recipes/:id/nutrition", get(handlers::recipes::nutrition))
        .route(
            "/recipes/:id/tags/:tag_id",
            post(handlers::recipes::add_tag).delete(handlers::recipes::remove_tag),
        )
        .route("/recipes/:id/ingredients", post(handlers::recipes::add_ingredient))
        .route(
            "/recipes/:id/ingredients/:line_id",
            put(handlers::recipes::update_ingredient).delete(handlers::recipes::remove_ingredient),
        );

    let units: Router<AppState> = Router::new()
        .route("/units", get(handlers::units::list))
        .route("/units/convert", post(handlers::units::convert))
        .route("/units/:label", get(handlers::units::get));

    Router::new()
        .route("/", get(handlers::root))
        .route("/status", get(handlers::status))
        .merge(tags)
        .merge(ingredients)
        .merge(recipes)
        .merge(units)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_support::test_db;

    #[tokio::test]
    async fn test_run_returns_service_result() {
        let (dir, db) = test_db();
        let state = AppState::new(db, dir.path().join("test.db"));

        let count = state
            .run(|db| Ok(db.with_conn(|conn| crate::models::Tag::list(conn, None, 10, 0))?.len()))
            .await
            .unwrap();
        assert_eq!(count, 0);

        let err = state
            .run(|_| Err::<(), _>(ApiError::not_found("missing")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_run_reports_panicked_call_as_internal() {
        let (dir, db) = test_db();
        let state = AppState::new(db, dir.path().join("test.db"));

        let err = state
            .run(|_| -> ApiResult<()> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
