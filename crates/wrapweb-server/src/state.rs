use std::sync::Arc;

use wrapweb_core::command::CommandUpdaterProvider;
use wrapweb_core::config::{Config, NotFoundStatus};
use wrapweb_core::sqlite::SqliteProvider;
use wrapweb_core::store::StoreProvider;
use wrapweb_core::updater::UpdaterProvider;
use wrapweb_core::webhook::WebhookVerifier;

use crate::dispatch::Dispatcher;

/// Shared application state passed to all route handlers.
///
/// Holds providers, never open handles: each request opens and drops its own.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StoreProvider>,
    pub verifier: Arc<WebhookVerifier>,
    pub dispatcher: Arc<Dispatcher>,
    pub not_found_status: NotFoundStatus,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn StoreProvider>,
        updater: Arc<dyn UpdaterProvider>,
    ) -> Self {
        Self {
            store,
            verifier: Arc::new(WebhookVerifier::new(
                config.secret_key.clone(),
                config.webhook.clone(),
            )),
            dispatcher: Arc::new(Dispatcher::new(config.dispatch, updater)),
            not_found_status: config.not_found_status,
        }
    }

    /// State backed by the SQLite database and command updater named in `config`.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(SqliteProvider::new(&config.database));
        let updater = Arc::new(CommandUpdaterProvider::new(
            config.updater.clone(),
            &config.database,
        ));
        Self::new(config, store, updater)
    }
}
