use anyhow::{Context, Result};
use std::path::Path;
use wrapweb_core::config::Config;

pub fn run(config_path: &Path, bind: Option<String>, secret_key: Option<String>) -> Result<()> {
    let mut config = Config::load(config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if let Some(key) = secret_key {
        config.secret_key = key;
    }
    config.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(wrapweb_server::serve(config))
}
