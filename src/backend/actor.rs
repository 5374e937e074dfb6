//! Backend actor - runs item operations in the Tokio runtime
//!
//! Each command runs as its own task. Commands are neither ordered nor
//! deduplicated against each other: a toggle and a delete of the same item
//! fired back to back race, and the last reply wins.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::backend::ItemBackend;
use crate::messages::{BackendCommand, BackendResponse};

/// Backend actor that processes item commands
pub struct BackendActor {
    backend: Arc<dyn ItemBackend>,
    response_tx: mpsc::UnboundedSender<BackendResponse>,
    active_tasks: JoinSet<()>,
}

impl BackendActor {
    pub fn new(
        backend: Arc<dyn ItemBackend>,
        response_tx: mpsc::UnboundedSender<BackendResponse>,
    ) -> Self {
        BackendActor {
            backend,
            response_tx,
            active_tasks: JoinSet::new(),
        }
    }

    /// Run the backend actor message loop.
    ///
    /// On `Shutdown` (or a closed channel) commands already accepted still
    /// run to completion before this returns.
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(BackendCommand::Shutdown) | None => break,
                        Some(cmd) => {
                            let backend = Arc::clone(&self.backend);
                            let response_tx = self.response_tx.clone();
                            self.active_tasks.spawn(async move {
                                if let Some(response) = execute(backend.as_ref(), cmd).await {
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_tasks.join_next() => {}
            }
        }

        tracing::info!(pending = self.active_tasks.len(), "Backend draining pending commands");
        while self.active_tasks.join_next().await.is_some() {}
    }
}

/// Execute one command and turn the outcome into a response.
///
/// `Shutdown` carries no work and yields None.
pub async fn execute(backend: &dyn ItemBackend, cmd: BackendCommand) -> Option<BackendResponse> {
    let op = cmd.op()?;
    tracing::info!(?op, "Executing backend command");

    let (category_key, result) = match cmd {
        BackendCommand::LoadItems { category_key } => {
            let result = backend
                .list_items(&category_key)
                .await
                .map(|items| BackendResponse::ItemsLoaded {
                    category_key: category_key.clone(),
                    items,
                });
            (Some(category_key), result)
        }
        BackendCommand::AddItem { category_key, title } => {
            let result = backend
                .insert_item(&category_key, &title)
                .await
                .map(BackendResponse::ItemAdded);
            (Some(category_key), result)
        }
        BackendCommand::SetCompleted { id, completed } => {
            let result = backend
                .set_completed(&id, completed)
                .await
                .map(BackendResponse::ItemUpdated);
            (None, result)
        }
        BackendCommand::DeleteItem { id } => {
            let result = backend
                .delete_item(&id)
                .await
                .map(|()| BackendResponse::ItemDeleted(id));
            (None, result)
        }
        BackendCommand::PurgeCategory { category_key } => {
            let result = backend
                .purge_category(&category_key)
                .await
                .map(|removed| BackendResponse::CategoryPurged {
                    category_key: category_key.clone(),
                    removed,
                });
            (Some(category_key), result)
        }
        BackendCommand::Shutdown => return None,
    };

    Some(result.unwrap_or_else(|error| {
        tracing::error!(?op, error = %error, "Backend command failed");
        BackendResponse::Failed {
            op,
            category_key,
            error,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{LocalBackend, UnconfiguredBackend};
    use crate::error::MissionError;
    use crate::messages::BackendOp;
    use crate::storage::Storage;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_actor_round_trip() {
        let dir = tempdir().unwrap();
        let backend: Arc<dyn ItemBackend> = Arc::new(LocalBackend::open(Storage::at(dir.path())));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(BackendActor::new(backend, resp_tx).run(cmd_rx));

        cmd_tx
            .send(BackendCommand::AddItem {
                category_key: "books".into(),
                title: "dune".into(),
            })
            .unwrap();
        match resp_rx.recv().await.unwrap() {
            BackendResponse::ItemAdded(item) => assert_eq!(item.title, "dune"),
            other => panic!("unexpected response: {:?}", other),
        }

        cmd_tx.send(BackendCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_failure_carries_op_and_category() {
        let response = execute(
            &UnconfiguredBackend,
            BackendCommand::LoadItems {
                category_key: "tasks".into(),
            },
        )
        .await;
        assert_eq!(
            response,
            Some(BackendResponse::Failed {
                op: BackendOp::Load,
                category_key: Some("tasks".into()),
                error: MissionError::BackendUnconfigured,
            })
        );
    }

    #[tokio::test]
    async fn test_shutdown_finishes_accepted_commands() {
        let dir = tempdir().unwrap();
        let storage = Storage::at(dir.path());
        let seeded = LocalBackend::open(storage.clone());
        seeded.insert_item("shopping", "bread").await.unwrap();
        drop(seeded);

        let backend: Arc<dyn ItemBackend> = Arc::new(LocalBackend::open(storage.clone()));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, _resp_rx) = mpsc::unbounded_channel();

        cmd_tx
            .send(BackendCommand::PurgeCategory {
                category_key: "shopping".into(),
            })
            .unwrap();
        cmd_tx
            .send(BackendCommand::AddItem {
                category_key: "books".into(),
                title: "dune".into(),
            })
            .unwrap();
        cmd_tx.send(BackendCommand::Shutdown).unwrap();

        BackendActor::new(backend, resp_tx).run(cmd_rx).await;

        let reopened = LocalBackend::open(storage);
        assert!(reopened.list_items("shopping").await.unwrap().is_empty());
        let books = reopened.list_items("books").await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "dune");
    }
}
