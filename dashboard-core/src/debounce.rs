//! Search-as-you-type: coalesces query changes and hands only the last one of
//! a burst to [`WeatherStore::search_cities`].

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::debug;

use crate::store::WeatherStore;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Starts the debounce loop on the current runtime.
    pub fn spawn(store: Arc<WeatherStore>, quiet: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx, quiet));
        Self { tx, task }
    }

    /// Records new input text. Restarts the quiet period.
    pub fn query_changed(&self, query: impl Into<String>) {
        if self.tx.send(query.into()).is_err() {
            debug!("Search debouncer already stopped");
        }
    }

    /// Stops the loop. A query still waiting out its quiet period is dropped;
    /// searches already issued keep running.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.task.await;
    }
}

async fn run(store: Arc<WeatherStore>, mut rx: mpsc::UnboundedReceiver<String>, quiet: Duration) {
    let timer = time::sleep(quiet);
    tokio::pin!(timer);
    let mut pending: Option<String> = None;

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(query) => {
                    pending = Some(query);
                    timer.as_mut().reset(Instant::now() + quiet);
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(query) = pending.take() {
                    debug!(%query, "Debounced query settled");
                    let store = store.clone();
                    // Not awaited: a slower, older search may still land after a newer one.
                    tokio::spawn(async move {
                        store.search_cities(&query).await;
                    });
                }
            }
        }
    }
}
