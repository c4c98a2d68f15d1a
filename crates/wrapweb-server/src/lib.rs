pub mod dispatch;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use wrapweb_core::config::Config;

pub use state::AppState;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML views
        .route("/", get(routes::pages::index))
        .route("/projects/{project}", get(routes::pages::project))
        // JSON API
        .route("/v1/projects", get(routes::projects::list_projects))
        .route("/v1/projects/{project}", get(routes::projects::get_project))
        .route(
            "/v1/projects/{project}/{branch}/{revision}/get_wrap",
            get(routes::projects::get_wrap),
        )
        .route(
            "/v1/projects/{project}/{branch}/{revision}/get_zip",
            get(routes::projects::get_zip),
        )
        // Webhook
        .route("/github-hook", post(routes::hook::github_hook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate `config`, bind its address and serve until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    serve_on(&config, listener).await
}

/// Serve on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting.
pub async fn serve_on(config: &Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(AppState::from_config(config));

    tracing::info!(
        database = %config.database.display(),
        dispatch = ?config.dispatch,
        "wrap registry listening on http://{addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}
