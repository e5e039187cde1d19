//! HTTP surface of the planning agent
//!
//! - `GET /health`
//! - `POST /agents/planning` plans a story
//! - `GET /agents/planning/{session_id}` returns the cached architecture

use crate::error::{ErrorBody, PlanningError};
use crate::service::PlanningService;
use autodev_core::PlanningRequest;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::filters::body::BodyDeserializeError;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

/// Upper bound for request bodies
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// All routes with error recovery and permissive CORS
pub fn routes(
    service: Arc<PlanningService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone + Send + Sync + 'static {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "authorization"]);

    health()
        .or(plan(service.clone()))
        .or(fetch(service))
        .recover(handle_rejection)
        .with(cors)
        .with(warp::trace::request())
}

fn with_service(
    service: Arc<PlanningService>,
) -> impl Filter<Extract = (Arc<PlanningService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn health() -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("health").and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "status": "healthy",
            "service": "planning-agent",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    })
}

fn plan(
    service: Arc<PlanningService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("agents" / "planning")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json::<PlanningRequest>())
        .and(with_service(service))
        .and_then(plan_handler)
}

fn fetch(
    service: Arc<PlanningService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("agents" / "planning" / String)
        .and(warp::get())
        .and(with_service(service))
        .and_then(fetch_handler)
}

async fn plan_handler(
    request: PlanningRequest,
    service: Arc<PlanningService>,
) -> Result<impl Reply, Rejection> {
    service
        .plan(request)
        .await
        .map(|response| warp::reply::json(&response))
        .map_err(warp::reject::custom)
}

async fn fetch_handler(
    segment: String,
    service: Arc<PlanningService>,
) -> Result<Response, Rejection> {
    // Path segments arrive percent-encoded (`session%201`).
    let Ok(session_id) = urlencoding::decode(&segment) else {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid session id encoding"));
    };

    match service.fetch(&session_id).await {
        Ok(Some(architecture)) => Ok(warp::reply::json(&architecture).into_response()),
        Ok(None) => Ok(error_reply(StatusCode::NOT_FOUND, "Architecture not found")),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

fn error_reply(status: StatusCode, detail: impl Into<String>) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody::new(detail)), status).into_response()
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if let Some(e) = err.find::<PlanningError>() {
        return Ok(error_reply(e.status_code(), e.to_string()));
    }

    if let Some(e) = err.find::<BodyDeserializeError>() {
        return Ok(error_reply(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()));
    }

    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "Not Found"));
    }

    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }

    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error_reply(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"));
    }

    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Unsupported Media Type",
        ));
    }

    tracing::error!(rejection = ?err, "Unhandled rejection");
    Ok(error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
    ))
}
