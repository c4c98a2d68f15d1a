pub mod hook;
pub mod pages;
pub mod projects;

use wrapweb_core::store::QueryStore;

use crate::error::ApiError;
use crate::state::AppState;

/// Run `f` against a freshly opened store handle on the blocking pool.
///
/// The handle lives only for the closure and is dropped on every exit path.
pub(crate) async fn with_store<T, F>(app: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&dyn QueryStore) -> wrapweb_core::Result<T> + Send + 'static,
{
    let provider = app.store.clone();
    tokio::task::spawn_blocking(move || {
        let store = provider.open()?;
        f(store.as_ref())
    })
    .await
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("task join error: {e}")))?
    .map_err(ApiError::from)
}
