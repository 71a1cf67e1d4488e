//! HTTP route handlers.

use std::any::Any;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::gtfs::StoreSummary;
use crate::realtime::{EnrichContext, FeedError, FeedMessage, enrich_feed};
use crate::routing::{RoutingError, plan_direct_route};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tfi/status", get(status))
        .route("/tfi/route", get(find_route))
        .route("/tfi/live", get(live_updates))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Row counts of the loaded reference data.
async fn status(State(state): State<AppState>) -> Json<StoreSummary> {
    Json(state.store.summary())
}

/// Find a direct bus between two coordinates.
async fn find_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let (start, end) = query
        .endpoints()
        .map_err(|message| AppError::BadRequest { message })?;

    let plan = plan_direct_route(state.store.as_ref(), start, end, &state.route_config)?;

    Ok(Json(RouteResponse::from(&plan)))
}

/// Current realtime feed, enriched with names and optional stop predictions.
async fn live_updates(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Json<FeedMessage>, AppError> {
    let mut feed = state.feed.fetch().await?;

    if let Some(route_id) = query.route_id() {
        feed.retain_route(route_id);
    }

    let mut ctx = EnrichContext::today(state.timezone);
    if let Some(stop_id) = query.stop_id() {
        ctx = ctx.with_target_stop(stop_id);
    }

    Ok(Json(enrich_feed(state.store.as_ref(), feed, &ctx)))
}

/// Turn a panicking handler into a 500 with the usual error body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(detail, "handler panicked");

    AppError::Internal {
        message: "Internal server error".to_string(),
    }
    .into_response()
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The realtime feed could not be used.
    Upstream { message: String, detail: String },
    Internal { message: String },
}

impl From<RoutingError> for AppError {
    fn from(e: RoutingError) -> Self {
        AppError::NotFound {
            message: e.to_string(),
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::NotConfigured(reason) => AppError::Upstream {
                message: "TFI API configuration missing".to_string(),
                detail: reason,
            },
            other => AppError::Upstream {
                message: "Failed to fetch real-time bus updates".to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, detail) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message, None),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message, None),
            AppError::Upstream { message, detail } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(detail))
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, None)
            }
        };

        if status.is_server_error() {
            error!(%status, %message, detail = detail.as_deref(), "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            status: status.as_u16(),
            message,
            error: detail,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routing_errors_are_not_found() {
        let err = AppError::from(RoutingError::NoDirectRoute);
        assert!(
            matches!(err, AppError::NotFound { ref message } if message == "No direct bus route found")
        );
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_feed_config() {
        let err = AppError::from(FeedError::NotConfigured("NTA_API_KEY is not set".into()));
        match &err {
            AppError::Upstream { message, detail } => {
                assert_eq!(message, "TFI API configuration missing");
                assert_eq!(detail, "NTA_API_KEY is not set");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn feed_failures_keep_detail() {
        let err = AppError::from(FeedError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        });
        match err {
            AppError::Upstream { message, detail } => {
                assert_eq!(message, "Failed to fetch real-time bus updates");
                assert_eq!(detail, "API error 503: Service Unavailable");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn panic_becomes_internal_error() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(String::from("overflow")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panicking_handler_still_answers() {
        let app: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(handle_panic));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let response = reqwest::get(format!("http://{addr}/boom")).await.unwrap();
        assert_eq!(response.status(), 500);

        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.status, 500);
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error, None);
    }

    #[test]
    fn bad_request_status() {
        let err = AppError::BadRequest {
            message: "Missing start or end coordinates".into(),
        };
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
