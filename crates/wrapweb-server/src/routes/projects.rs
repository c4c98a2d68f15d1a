use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use wrapweb_core::types::ArtifactKind;

use super::with_store;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

/// GET /v1/projects?q=<substring> — project names, all of them without `q`.
pub async fn list_projects(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let query = params.q.unwrap_or_default();
    let projects = with_store(&app, move |store| store.search_names(&query)).await?;
    Ok(Json(serde_json::json!({
        "output": "ok",
        "projects": projects,
    })))
}

/// GET /v1/projects/:project — every (branch, revision) of a project.
///
/// The store does not distinguish an unknown project from one with no
/// versions; both are "No such project".
pub async fn get_project(
    State(app): State<AppState>,
    Path(project): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let versions = with_store(&app, move |store| store.list_versions(&project)).await?;
    if versions.is_empty() {
        return Err(ApiError::not_found(app.not_found_status, "No such project"));
    }
    Ok(Json(serde_json::json!({
        "output": "ok",
        "versions": versions,
    })))
}

/// GET /v1/projects/:project/:branch/:revision/get_wrap
pub async fn get_wrap(
    State(app): State<AppState>,
    Path((project, branch, revision)): Path<(String, String, u64)>,
) -> Result<Response, ApiError> {
    artifact_response(&app, ArtifactKind::Wrap, project, branch, revision).await
}

/// GET /v1/projects/:project/:branch/:revision/get_zip
pub async fn get_zip(
    State(app): State<AppState>,
    Path((project, branch, revision)): Path<(String, String, u64)>,
) -> Result<Response, ApiError> {
    artifact_response(&app, ArtifactKind::Zip, project, branch, revision).await
}

async fn artifact_response(
    app: &AppState,
    kind: ArtifactKind,
    project: String,
    branch: String,
    revision: u64,
) -> Result<Response, ApiError> {
    let attachment = kind.attachment_name(&project, &branch, revision);
    let bytes = with_store(app, move |store| {
        store.get_artifact(kind, &project, &branch, revision)
    })
    .await?;
    let Some(bytes) = bytes else {
        return Err(ApiError::not_found(app.not_found_status, "No such entry"));
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, kind.content_type());
    if let Some(name) = attachment {
        builder = builder.header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        );
    }
    builder
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(e.into()))
}
