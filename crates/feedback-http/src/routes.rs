//! warp routes
//!
//! | Method | Path            | Description                          |
//! |--------|-----------------|--------------------------------------|
//! | GET    | `/health`       | Liveness check                       |
//! | POST   | `/api/feedback` | Resolve patterns and select message  |

use feedback_core::{FeedbackError, FeedbackOrchestrator, FeedbackRequest};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 64 * 1024;

/// All routes, with rejections rendered as JSON errors
pub fn routes(
    orchestrator: Arc<FeedbackOrchestrator>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    health().or(feedback(orchestrator)).recover(handle_rejection)
}

/// `GET /health`
pub fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "ok" })))
}

/// `POST /api/feedback`
pub fn feedback(
    orchestrator: Arc<FeedbackOrchestrator>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("api" / "feedback")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(warp::any().map(move || Arc::clone(&orchestrator)))
        .and_then(handle_feedback)
}

async fn handle_feedback(
    request: FeedbackRequest,
    orchestrator: Arc<FeedbackOrchestrator>,
) -> Result<Response, Infallible> {
    match orchestrator.respond(request).await {
        Ok(response) => Ok(warp::reply::json(&response).into_response()),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(error = %e, "feedback request failed");
            } else {
                tracing::debug!(error = %e, "feedback request rejected");
            }
            Ok(error_response(status, &e.to_string()))
        }
    }
}

fn status_for(error: &FeedbackError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status).into_response()
}

async fn handle_rejection(rejection: Rejection) -> Result<Response, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("invalid request body: {e}"))
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "request body too large".to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        tracing::error!(?rejection, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    };
    Ok(error_response(status, &message))
}
