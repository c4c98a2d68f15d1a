//! Hands verified regeneration commands to the updater.
//!
//! Regenerations of the same `(project, branch)` never overlap: each key owns
//! an async mutex, and the guard travels into the blocking task so it is held
//! until the updater returns, even if the originating request goes away.
//! Updater handles are opened inside that task and dropped when it ends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info};
use uuid::Uuid;
use wrapweb_core::config::DispatchMode;
use wrapweb_core::updater::UpdaterProvider;
use wrapweb_core::webhook::RegenerateCommand;
use wrapweb_core::{Result, WrapError};

type LeaseKey = (String, String);

/// Outcome of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// The update ran inside the request and succeeded.
    Completed,
    /// The update was handed to a background task.
    Queued(Uuid),
}

pub struct Dispatcher {
    mode: DispatchMode,
    updater: Arc<dyn UpdaterProvider>,
    leases: Mutex<HashMap<LeaseKey, Arc<AsyncMutex<()>>>>,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode, updater: Arc<dyn UpdaterProvider>) -> Self {
        Self {
            mode,
            updater,
            leases: Mutex::new(HashMap::new()),
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    fn lease(&self, cmd: &RegenerateCommand) -> Arc<AsyncMutex<()>> {
        let mut leases = self.leases.lock().unwrap_or_else(PoisonError::into_inner);
        leases
            .entry((cmd.project.clone(), cmd.branch.clone()))
            .or_default()
            .clone()
    }

    pub async fn dispatch(&self, cmd: RegenerateCommand) -> Result<Dispatched> {
        let lease = self.lease(&cmd);
        let updater = Arc::clone(&self.updater);

        match self.mode {
            DispatchMode::Inline => {
                run(updater, lease, cmd).await?;
                Ok(Dispatched::Completed)
            }
            DispatchMode::Queued => {
                let job = Uuid::new_v4();
                info!(%job, project = %cmd.project, branch = %cmd.branch, "queued wrap regeneration");
                tokio::spawn(async move {
                    let (project, branch) = (cmd.project.clone(), cmd.branch.clone());
                    match run(updater, lease, cmd).await {
                        Ok(()) => info!(%job, %project, %branch, "wrap regeneration finished"),
                        Err(e) => error!(%job, %project, %branch, error = %e, "wrap regeneration failed"),
                    }
                });
                Ok(Dispatched::Queued(job))
            }
        }
    }
}

async fn run(
    updater: Arc<dyn UpdaterProvider>,
    lease: Arc<AsyncMutex<()>>,
    cmd: RegenerateCommand,
) -> Result<()> {
    let guard = lease.lock_owned().await;
    tokio::task::spawn_blocking(move || {
        let _guard = guard;
        let handle = updater.open()?;
        handle.update(&cmd.project, &cmd.clone_url, &cmd.branch)
    })
    .await
    .map_err(|e| WrapError::GenerationFailed(format!("updater task failed: {e}")))?
}
