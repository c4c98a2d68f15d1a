use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, info};
use wrapweb_core::webhook::HookRequest;

use crate::dispatch::Dispatched;
use crate::error::ApiError;
use crate::state::AppState;

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /github-hook — regenerate wraps when a pull request is merged.
///
/// The signature is checked against the body bytes exactly as received, so
/// the payload is taken raw and parsed by the verifier.
pub async fn github_hook(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = HookRequest {
        user_agent: header(&headers, "user-agent"),
        event: header(&headers, "x-github-event"),
        signature: header(&headers, "x-hub-signature"),
        body: &body,
    };
    let cmd = app.verifier.verify(&request)?;

    info!(project = %cmd.project, branch = %cmd.branch, "accepted merge hook");
    let (project, branch) = (cmd.project.clone(), cmd.branch.clone());

    match app.dispatcher.dispatch(cmd).await {
        Ok(Dispatched::Completed) => {
            Ok((StatusCode::OK, Json(serde_json::json!({ "output": "ok" }))).into_response())
        }
        Ok(Dispatched::Queued(job)) => Ok((
            StatusCode::ACCEPTED,
            Json(serde_json::json!({ "output": "ok", "job": job.to_string() })),
        )
            .into_response()),
        Err(e) => {
            error!(%project, %branch, error = %e, "wrap generation failed");
            Err(ApiError::GenerationFailed)
        }
    }
}
