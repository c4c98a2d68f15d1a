//! Human-facing HTML views over the same data as the JSON API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use super::with_store;
use crate::error::ApiError;
use crate::state::AppState;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body style=\"font-family:sans-serif;padding:2rem\">{body}</body></html>",
        escape(title)
    )
}

/// GET / — list of all projects.
pub async fn index(State(app): State<AppState>) -> Result<Html<String>, ApiError> {
    let projects = with_store(&app, |store| store.search_names("")).await?;

    let mut items = String::new();
    for name in &projects {
        let name = escape(name);
        items.push_str(&format!("<li><a href=\"/projects/{name}\">{name}</a></li>"));
    }
    Ok(Html(page(
        "Wrap DB",
        &format!("<h1>Wrap DB</h1><ul>{items}</ul>"),
    )))
}

/// GET /projects/:project — versions of one project with download links.
pub async fn project(
    State(app): State<AppState>,
    Path(project): Path<String>,
) -> Result<Response, ApiError> {
    let name = project.clone();
    let versions = with_store(&app, move |store| store.list_versions(&name)).await?;
    let title = format!("{project} - Wrap DB");
    let project = escape(&project);

    if versions.is_empty() {
        let status = StatusCode::from_u16(app.not_found_status.code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = page(&title, "<h1>No such project</h1><p><a href=\"/\">All projects</a></p>");
        return Ok((status, Html(body)).into_response());
    }

    let mut rows = String::new();
    for v in &versions {
        let branch = escape(&v.branch);
        let base = format!("/v1/projects/{project}/{branch}/{}", v.revision);
        rows.push_str(&format!(
            "<tr><td>{branch}</td><td>{rev}</td>\
             <td><a href=\"{base}/get_wrap\">wrap</a></td>\
             <td><a href=\"{base}/get_zip\">zip</a></td></tr>",
            rev = v.revision,
        ));
    }
    let body = format!(
        "<h1>{project}</h1><table><tr><th>Branch</th><th>Revision</th><th></th><th></th></tr>\
         {rows}</table><p><a href=\"/\">All projects</a></p>"
    );
    Ok(Html(page(&title, &body)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<a href=\"x\">&'"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn page_escapes_title() {
        let html = page("<zlib>", "<p>ok</p>");
        assert!(html.contains("<title>&lt;zlib&gt;</title>"));
        assert!(html.contains("<p>ok</p>"));
    }
}
