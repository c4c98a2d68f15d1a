use anyhow::{Context, Result};
use std::path::PathBuf;
use wrapweb_core::sqlite::SqliteStore;

pub struct PublishArgs {
    pub database: PathBuf,
    pub project: String,
    pub branch: String,
    pub revision: u64,
    pub wrap: PathBuf,
    pub zip: Option<PathBuf>,
}

pub fn run(args: &PublishArgs) -> Result<()> {
    let wrap = std::fs::read(&args.wrap)
        .with_context(|| format!("failed to read wrap {}", args.wrap.display()))?;
    let zip = args
        .zip
        .as_ref()
        .map(|path| {
            std::fs::read(path).with_context(|| format!("failed to read zip {}", path.display()))
        })
        .transpose()?;

    let mut store = SqliteStore::open(&args.database)
        .with_context(|| format!("failed to open {}", args.database.display()))?;
    store.publish(
        &args.project,
        &args.branch,
        args.revision,
        &wrap,
        zip.as_deref(),
    )?;

    tracing::info!(
        project = %args.project,
        branch = %args.branch,
        revision = args.revision,
        "published"
    );
    println!(
        "published {} {} revision {}",
        args.project, args.branch, args.revision
    );
    Ok(())
}
