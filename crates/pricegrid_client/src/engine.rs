use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use pricegrid_logging::{grid_debug, grid_error, grid_warn};

use crate::client::{ReqwestSearchClient, SearchClient};
use crate::{
    EngineError, EngineEvent, FailureKind, RequestTag, SearchConfig, SearchError, SearchOptions,
};

enum EngineCommand {
    Search { tag: RequestTag, query: String },
}

/// Runs searches on a background tokio runtime.
///
/// Every dispatched search produces exactly one `SearchCompleted` event, in
/// completion order, even when the client panics. Nothing is cancelled or deduplicated here; the caller
/// decides which results are still wanted.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(config: SearchConfig) -> Result<Self, EngineError> {
        let client = ReqwestSearchClient::new(config)?;
        Self::with_client(Arc::new(client))
    }

    pub fn with_client(client: Arc<dyn SearchClient>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx).await;
                });
            }
            grid_debug!("Search engine command channel closed");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        })
    }

    /// Fails with `Disconnected` when the engine thread is gone; no event
    /// will follow for `tag` in that case.
    pub fn search(&self, tag: RequestTag, query: impl Into<String>) -> Result<(), EngineError> {
        self.cmd_tx
            .send(EngineCommand::Search {
                tag,
                query: query.into(),
            })
            .map_err(|_| {
                grid_warn!("Search tag={} dropped: engine thread has stopped", tag);
                EngineError::Disconnected
            })
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time; an error means no event will ever arrive again.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        let event_rx = self
            .event_rx
            .lock()
            .map_err(|_| EngineError::Disconnected)?;
        match event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

async fn handle_command(
    client: &dyn SearchClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Search { tag, query } => {
            let options = SearchOptions::default();
            let result = AssertUnwindSafe(client.search(&query, &options))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    let reason = panic_reason(payload.as_ref());
                    grid_error!("Search tag={} panicked: {}", tag, reason);
                    Err(SearchError::new(
                        FailureKind::Network,
                        format!("search panicked: {reason}"),
                    ))
                });
            if event_tx
                .send(EngineEvent::SearchCompleted { tag, query, result })
                .is_err()
            {
                grid_debug!("Search tag={} finished after the receiver closed", tag);
            }
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text
    } else {
        "unknown panic"
    }
}
