//! Background population of the store from an upstream [`Fetcher`].
//!
//! One task per identifier: fetch, then insert as soon as the record
//! arrives. Tasks are independent, so a failing or slow identifier never
//! holds back the others. A semaphore caps how many upstream calls are in
//! flight at once.

use crate::fetcher::Fetcher;
use crate::store::AirportStore;
use common::config::FetchConfig;
use common::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Limits applied to a population run.
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    /// Max fetches in flight. Zero is treated as one.
    pub max_concurrent: usize,
    /// Upper bound on a single fetch; expiry counts as an upstream failure.
    pub fetch_timeout: Duration,
}

impl PopulateOptions {
    pub fn from_config(cfg: &FetchConfig) -> Self {
        Self {
            max_concurrent: cfg.max_concurrent,
            fetch_timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

impl Default for PopulateOptions {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Outcome of a settled population run, in seed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub loaded: Vec<String>,
    /// `(identifier, error message)` for every identifier that did not load.
    pub failed: Vec<(String, String)>,
}

impl PopulationReport {
    pub fn total(&self) -> usize {
        self.loaded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Handle to an in-flight population run.
///
/// Dropping the handle detaches the tasks; they still run to completion.
#[derive(Debug)]
pub struct Population {
    tasks: Vec<(String, JoinHandle<Result<()>>)>,
}

impl Population {
    /// Number of identifiers being loaded.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every task to finish and collect the outcomes.
    pub async fn settled(self) -> PopulationReport {
        let mut report = PopulationReport::default();

        for (id, handle) in self.tasks {
            match handle.await {
                Ok(Ok(())) => report.loaded.push(id),
                Ok(Err(e)) => report.failed.push((id, e.to_string())),
                Err(e) => {
                    warn!("Population task for {} aborted: {}", id, e);
                    report.failed.push((id, format!("task aborted: {e}")));
                }
            }
        }

        report
    }
}

impl AirportStore {
    /// Start loading `ids` through `fetcher` in the background.
    ///
    /// Returns immediately. Each identifier is fetched and inserted by its
    /// own task; callers that need to know when loading is done await
    /// [`Population::settled`].
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn populate<F, I, S>(
        &self,
        ids: I,
        fetcher: Arc<F>,
        options: &PopulateOptions,
    ) -> Population
    where
        F: Fetcher + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let permits = Arc::new(Semaphore::new(options.max_concurrent.max(1)));
        let fetch_timeout = options.fetch_timeout;

        let tasks: Vec<(String, JoinHandle<Result<()>>)> = ids
            .into_iter()
            .map(Into::into)
            .map(|id: String| {
                let store = self.clone();
                let fetcher = Arc::clone(&fetcher);
                let permits = Arc::clone(&permits);
                let task_id = id.clone();

                let handle = tokio::spawn(async move {
                    load_one(&store, fetcher.as_ref(), &task_id, &permits, fetch_timeout).await
                });
                (id, handle)
            })
            .collect();

        info!(
            "Population started: {} airports, max {} in flight",
            tasks.len(),
            options.max_concurrent.max(1)
        );

        Population { tasks }
    }
}

async fn load_one<F: Fetcher>(
    store: &AirportStore,
    fetcher: &F,
    id: &str,
    permits: &Semaphore,
    fetch_timeout: Duration,
) -> Result<()> {
    let _permit = permits
        .acquire()
        .await
        .map_err(|_| Error::Upstream(format!("population closed before {id} was fetched")))?;

    debug!("Fetching airport {}", id);

    let fetched = match tokio::time::timeout(fetch_timeout, fetcher.fetch(id)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Upstream(format!(
            "fetch for {id} timed out after {}ms",
            fetch_timeout.as_millis()
        ))),
    };

    // The report is keyed by `id`, so the store key must be `id` too.
    let fetched = fetched.and_then(|airport| {
        if airport.icao == id {
            Ok(airport)
        } else {
            Err(Error::Decode(format!(
                "requested {id} but fetcher returned {}",
                airport.icao
            )))
        }
    });

    match fetched {
        Ok(airport) => {
            let stored = store.insert(airport);
            info!(
                "Loaded {} ({}): {} runways, store size {}",
                stored.icao,
                stored.name,
                stored.runways.len(),
                store.len()
            );
            Ok(())
        }
        Err(e) => {
            warn!("Failed to load airport {}: {}", id, e);
            Err(e)
        }
    }
}
