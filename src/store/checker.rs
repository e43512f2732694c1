//! Store version check: fetch the released version, then compare it to the running one

use std::sync::Arc;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::store::compare::{VersionDifference, compare_versions};
use crate::store::error::LookupError;
use crate::store::lookup::{AppStoreLookup, VersionLookup};

/// Work item handed to a [`Dispatcher`]
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Result of a version check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionCheckResult {
    /// Version of the running app
    pub current_version: String,
    /// Version published in the store (if the lookup succeeded)
    pub store_version: Option<String>,
    /// Comparison of the two (absent when the lookup failed)
    pub difference: Option<VersionDifference>,
}

impl VersionCheckResult {
    pub fn new(current_version: &str, store_version: Option<String>) -> Self {
        let difference = store_version
            .as_deref()
            .map(|store| compare_versions(store, current_version));
        Self {
            current_version: current_version.to_string(),
            store_version,
            difference,
        }
    }

    /// True when the store has a newer release
    pub fn update_available(&self) -> bool {
        self.difference.is_some_and(VersionDifference::is_store_newer)
    }
}

/// Delivers callback invocations to the execution context that owns them,
/// e.g. a UI thread draining a [`MainQueue`].
pub trait Dispatcher: Send + Sync + 'static {
    fn dispatch(&self, task: Task);
}

/// Runs callbacks directly on the background task that produced the result
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateDispatcher;

impl Dispatcher for ImmediateDispatcher {
    fn dispatch(&self, task: Task) {
        task();
    }
}

/// Sending half of a [`MainQueue`]
#[derive(Debug, Clone)]
pub struct QueueDispatcher {
    sender: mpsc::UnboundedSender<Task>,
}

impl Dispatcher for QueueDispatcher {
    fn dispatch(&self, task: Task) {
        if self.sender.send(task).is_err() {
            debug!("Main queue closed, dropping callback");
        }
    }
}

/// Queue of callbacks executed by whoever owns it, typically the UI loop
pub struct MainQueue {
    sender: mpsc::UnboundedSender<Task>,
    receiver: mpsc::UnboundedReceiver<Task>,
}

impl MainQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn dispatcher(&self) -> QueueDispatcher {
        QueueDispatcher {
            sender: self.sender.clone(),
        }
    }

    /// Runs every callback queued so far on the calling thread. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Waits for the next callback and runs it on the calling task.
    pub async fn run_next(&mut self) {
        // The queue holds a sender itself, so the channel never closes while it exists
        if let Some(task) = self.receiver.recv().await {
            task();
        }
    }
}

impl Default for MainQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Store version lookups and checks over a [`VersionLookup`] backend
pub struct StoreVersion<L = AppStoreLookup> {
    lookup: Arc<L>,
}

impl<L> Clone for StoreVersion<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
        }
    }
}

impl Default for StoreVersion<AppStoreLookup> {
    fn default() -> Self {
        Self::new(AppStoreLookup::default())
    }
}

impl<L: VersionLookup + 'static> StoreVersion<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    pub fn from_arc(lookup: Arc<L>) -> Self {
        Self { lookup }
    }

    /// Fetches the published version, keeping the failure cause.
    pub async fn lookup(&self, app_id: &str) -> Result<String, LookupError> {
        self.lookup.lookup_version(app_id).await
    }

    /// Fetches the published version. Every failure collapses to `None`.
    pub async fn fetch_remote_version(&self, app_id: &str) -> Option<String> {
        match self.lookup(app_id).await {
            Ok(version) => Some(version),
            Err(e) => {
                warn!("Store version lookup for {} failed: {}", app_id, e);
                None
            }
        }
    }

    /// Fetches the published version and compares it with `current_version`.
    pub async fn check_app_version(
        &self,
        app_id: &str,
        current_version: &str,
    ) -> VersionCheckResult {
        let store_version = self.fetch_remote_version(app_id).await;
        VersionCheckResult::new(current_version, store_version)
    }

    /// Callback form of [`Self::fetch_remote_version`]. The lookup runs on `runtime`
    /// and `complete` is handed to `dispatcher`.
    pub fn fetch_remote_version_with<D, F>(
        &self,
        runtime: &Handle,
        app_id: impl Into<String>,
        dispatcher: D,
        complete: F,
    ) -> JoinHandle<()>
    where
        D: Dispatcher,
        F: FnOnce(Option<String>) + Send + 'static,
    {
        let store = self.clone();
        let app_id = app_id.into();
        runtime.spawn(async move {
            let version = store.fetch_remote_version(&app_id).await;
            dispatcher.dispatch(Box::new(move || complete(version)));
        })
    }

    /// Callback form of [`Self::check_app_version`].
    pub fn check_app_version_with<D, F>(
        &self,
        runtime: &Handle,
        app_id: impl Into<String>,
        current_version: impl Into<String>,
        dispatcher: D,
        complete: F,
    ) -> JoinHandle<()>
    where
        D: Dispatcher,
        F: FnOnce(VersionCheckResult) + Send + 'static,
    {
        let store = self.clone();
        let app_id = app_id.into();
        let current_version = current_version.into();
        runtime.spawn(async move {
            let result = store.check_app_version(&app_id, &current_version).await;
            dispatcher.dispatch(Box::new(move || complete(result)));
        })
    }
}
