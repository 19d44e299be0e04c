//! Debounced auto-save
//!
//! A background task holds at most one pending edit. Every new edit replaces
//! the pending one and pushes the save deadline back by the quiet interval;
//! only when no edit arrives for that long is the edit written through
//! `ProjectStore::update`. Callers drive it through `AutosaveHandle`.
//!
//! ```ignore
//! let store = ProjectStore::open(&config)?.into_shared();
//! let autosave = spawn_autosave_task(store.clone(), config.autosave_delay());
//!
//! autosave.edit(id, ProjectPatch::new().content(text)).await?;
//! autosave.shutdown().await?; // flushes whatever is pending
//! ```

use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::models::{ProjectId, ProjectPatch};
use crate::storage::ProjectStorage;
use crate::store::SharedStore;

/// State of the most recent edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing pending and nothing saved yet
    Idle,
    /// An edit is waiting for the quiet interval to pass
    Pending,
    /// The last pending edit was written
    Saved(DateTime<Utc>),
    /// The last write failed
    Failed(String),
}

/// Commands sent to the auto-save task
#[derive(Debug)]
enum AutosaveCommand {
    /// Replace the pending edit and restart the quiet interval
    Edit { id: ProjectId, patch: ProjectPatch },
    /// Write the pending edit now
    Flush(oneshot::Sender<()>),
    /// Drop the pending edit
    Cancel,
    /// Flush and stop
    Shutdown(oneshot::Sender<()>),
}

/// Handle to control the auto-save task
pub struct AutosaveHandle {
    command_tx: mpsc::Sender<AutosaveCommand>,
    status_rx: watch::Receiver<SaveStatus>,
}

impl AutosaveHandle {
    /// Record an edit; it is saved once edits stop for the quiet interval
    pub async fn edit(&self, id: impl Into<ProjectId>, patch: ProjectPatch) -> Result<()> {
        self.send(AutosaveCommand::Edit {
            id: id.into(),
            patch,
        })
        .await
    }

    /// Save the pending edit immediately
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(AutosaveCommand::Flush(ack_tx)).await?;
        ack_rx.await.map_err(|_| anyhow!("auto-save task stopped"))
    }

    /// Forget the pending edit without saving it
    pub async fn cancel(&self) -> Result<()> {
        self.send(AutosaveCommand::Cancel).await
    }

    /// Save the pending edit and stop the task
    pub async fn shutdown(self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(AutosaveCommand::Shutdown(ack_tx)).await?;
        ack_rx.await.map_err(|_| anyhow!("auto-save task stopped"))
    }

    /// Current save status
    pub fn status(&self) -> SaveStatus {
        self.status_rx.borrow().clone()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status_rx.clone()
    }

    async fn send(&self, command: AutosaveCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| anyhow!("auto-save task stopped"))
    }
}

/// Spawn the auto-save task for `store`
///
/// Must be called from within a tokio runtime.
pub fn spawn_autosave_task<S>(store: SharedStore<S>, delay: Duration) -> AutosaveHandle
where
    S: ProjectStorage + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(64);
    let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);

    tokio::spawn(autosave_loop(store, delay, command_rx, status_tx));

    AutosaveHandle {
        command_tx,
        status_rx,
    }
}

/// An edit waiting to be written
struct PendingEdit {
    id: ProjectId,
    patch: ProjectPatch,
    deadline: Instant,
}

async fn autosave_loop<S>(
    store: SharedStore<S>,
    delay: Duration,
    mut command_rx: mpsc::Receiver<AutosaveCommand>,
    status_tx: watch::Sender<SaveStatus>,
) where
    S: ProjectStorage + Send + 'static,
{
    let mut pending: Option<PendingEdit> = None;

    loop {
        let deadline = pending.as_ref().map(|p| p.deadline);
        let wait = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = wait => {
                if let Some(edit) = pending.take() {
                    save(&store, edit, &status_tx).await;
                }
            }
            cmd = command_rx.recv() => {
                match cmd {
                    Some(AutosaveCommand::Edit { id, patch }) => {
                        let deadline = Instant::now() + delay;
                        pending = match pending.take() {
                            Some(prev) if prev.id == id => Some(PendingEdit {
                                id,
                                patch: prev.patch.merge(patch),
                                deadline,
                            }),
                            Some(prev) => {
                                // Switching projects: don't lose the other edit
                                save(&store, prev, &status_tx).await;
                                Some(PendingEdit { id, patch, deadline })
                            }
                            None => Some(PendingEdit { id, patch, deadline }),
                        };
                        let _ = status_tx.send(SaveStatus::Pending);
                    }
                    Some(AutosaveCommand::Flush(ack)) => {
                        if let Some(edit) = pending.take() {
                            save(&store, edit, &status_tx).await;
                        }
                        let _ = ack.send(());
                    }
                    Some(AutosaveCommand::Cancel) => {
                        if pending.take().is_some() {
                            debug!("pending edit cancelled");
                            let _ = status_tx.send(SaveStatus::Idle);
                        }
                    }
                    Some(AutosaveCommand::Shutdown(ack)) => {
                        if let Some(edit) = pending.take() {
                            save(&store, edit, &status_tx).await;
                        }
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        // Handle dropped without shutdown; still save
                        if let Some(edit) = pending.take() {
                            save(&store, edit, &status_tx).await;
                        }
                        break;
                    }
                }
            }
        }
    }

    debug!("auto-save task stopped");
}

async fn save<S>(store: &SharedStore<S>, edit: PendingEdit, status_tx: &watch::Sender<SaveStatus>)
where
    S: ProjectStorage + Send + 'static,
{
    let mut store = store.lock().await;
    let status = match store.update(&edit.id, edit.patch) {
        Ok(true) => {
            debug!(id = %edit.id, "auto-saved");
            SaveStatus::Saved(Utc::now())
        }
        Ok(false) => {
            debug!(id = %edit.id, "auto-save skipped, project no longer exists");
            SaveStatus::Idle
        }
        Err(e) => {
            warn!(id = %edit.id, error = %e, "auto-save failed");
            SaveStatus::Failed(format!("{:#}", e))
        }
    };
    let _ = status_tx.send(status);
}
