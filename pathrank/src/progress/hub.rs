//! Cross-run progress hub.
//!
//! One hub is shared by all concurrent analyses; each run addresses its
//! updates by its own analysis identifier. Publishing uses `watch` channels,
//! so a notifier never blocks on slow observers and an observer always sees
//! the latest update.

use super::{ProgressReporter, ProgressUpdate};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Fan-out point for progress updates from concurrent analyses.
#[derive(Debug, Default)]
pub struct ProgressHub {
    channels: DashMap<Uuid, watch::Sender<ProgressUpdate>>,
}

impl ProgressHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to updates for an analysis, registering it if needed.
    #[must_use]
    pub fn subscribe(&self, analysis_id: Uuid) -> watch::Receiver<ProgressUpdate> {
        self.channels
            .entry(analysis_id)
            .or_insert_with(|| watch::channel(ProgressUpdate::default()).0)
            .subscribe()
    }

    /// Publishes an update for an analysis. A publish for an unregistered
    /// analysis registers it, so updates are never lost to ordering between
    /// subscribe and run start.
    pub fn publish(&self, analysis_id: Uuid, update: ProgressUpdate) {
        self.channels
            .entry(analysis_id)
            .or_insert_with(|| watch::channel(ProgressUpdate::default()).0)
            .send_replace(update);
    }

    /// Returns the latest update published for an analysis.
    #[must_use]
    pub fn latest(&self, analysis_id: Uuid) -> Option<ProgressUpdate> {
        self.channels
            .get(&analysis_id)
            .map(|sender| sender.borrow().clone())
    }

    /// Drops the channel for a finished analysis.
    pub fn remove(&self, analysis_id: Uuid) {
        self.channels.remove(&analysis_id);
    }

    /// Number of registered analyses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if no analysis is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Creates a reporter bound to one analysis id.
    #[must_use]
    pub fn reporter_for(self: &Arc<Self>, analysis_id: Uuid) -> ScopedProgressReporter {
        ScopedProgressReporter {
            hub: self.clone(),
            analysis_id,
        }
    }
}

/// A [`ProgressReporter`] publishing into a hub under one analysis id.
#[derive(Debug, Clone)]
pub struct ScopedProgressReporter {
    hub: Arc<ProgressHub>,
    analysis_id: Uuid,
}

impl ScopedProgressReporter {
    /// The analysis this reporter publishes for.
    #[must_use]
    pub fn analysis_id(&self) -> Uuid {
        self.analysis_id
    }
}

impl ProgressReporter for ScopedProgressReporter {
    fn notify(&self, stage: &str, percent: f64, message: &str) {
        self.hub
            .publish(self.analysis_id, ProgressUpdate::new(stage, percent, message));
    }
}
