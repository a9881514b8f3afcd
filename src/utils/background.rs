use crate::errors::{Result, WalletError};
use crate::utils::logger::ErrorLogger;
use futures::future::join_all;
use log::debug;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Fire-and-forget work spawned by a view-model.
///
/// Every task's error goes to the logger and nowhere else; the caller never
/// sees it. Handles are kept so a host can wait for outstanding work with
/// [`BackgroundTasks::settle`] before shutting down.
pub struct BackgroundTasks {
    logger: Arc<dyn ErrorLogger>,
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn new(logger: Arc<dyn ErrorLogger>) -> Self {
        BackgroundTasks {
            logger,
            handles: Vec::new(),
        }
    }

    /// Spawns `task` without awaiting it. A failure is logged under `context`.
    pub fn spawn_logged<F>(&mut self, context: &'static str, task: F)
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let logger = Arc::clone(&self.logger);
        debug!("Spawning background task: {}", context);
        let handle = tokio::spawn(async move {
            if let Err(e) = task.await {
                logger.error(context, &e);
            }
        });
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Tasks not yet known to have finished.
    pub fn pending(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every task spawned so far. Panicked tasks are logged.
    pub async fn settle(&mut self) {
        let handles = std::mem::take(&mut self.handles);
        for joined in join_all(handles).await {
            if let Err(join_error) = joined {
                self.logger
                    .error("Background task aborted", &WalletError::Task(join_error.to_string()));
            }
        }
    }
}
