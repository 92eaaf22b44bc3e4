use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use pricegrid_client::{EngineError, EngineEvent, EngineHandle, SearchConfig};
use pricegrid_core::{Effect, Msg, SearchFailure};
use pricegrid_logging::{grid_error, grid_info, grid_warn};

use crate::app::Incoming;

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    tx: mpsc::Sender<Incoming>,
}

impl EffectRunner {
    pub fn new(config: SearchConfig, tx: mpsc::Sender<Incoming>) -> Result<Self, EngineError> {
        let engine = Arc::new(EngineHandle::new(config)?);
        let runner = Self { engine, tx };
        runner.spawn_event_loop();
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Search { generation, query } => {
                    grid_info!(
                        "Search generation={} query_len={} query={:?}",
                        generation,
                        query.len(),
                        query
                    );
                    if let Err(err) = self.engine.search(generation, query.clone()) {
                        grid_error!("Search generation={} not dispatched: {}", generation, err);
                        let msg = Msg::SearchSettled {
                            generation,
                            query,
                            result: Err(SearchFailure::Unreachable),
                        };
                        let _ = self.tx.send(Incoming::Msg(msg));
                    }
                }
            }
        }
    }

    fn spawn_event_loop(&self) {
        let engine = self.engine.clone();
        let tx = self.tx.clone();
        thread::spawn(move || loop {
            let event = match engine.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => {
                    grid_warn!("Search event loop stopped: {}", err);
                    break;
                }
            };
            let msg = settled_msg(event);
            if tx.send(Incoming::Msg(msg)).is_err() {
                break;
            }
        });
    }
}

fn settled_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchCompleted { tag, query, result } => Msg::SearchSettled {
            generation: tag,
            query,
            result: result.map_err(|err| {
                grid_warn!("Search generation={} failed: {}", tag, err);
                err.into_failure()
            }),
        },
    }
}
