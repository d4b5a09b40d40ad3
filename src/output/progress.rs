//! Progress reporting for long-running stages
//!
//! Components receive a reporter instead of logging progress themselves, so
//! callers decide where checkpoints go.

use crate::Stage;
use std::sync::Mutex;

/// Receives progress notifications from the crawl and normalize stages
pub trait ProgressReporter: Send + Sync {
    /// Called every `checkpoint-interval` items processed
    fn checkpoint(&self, stage: Stage, processed: u64);

    /// Called once when a stage completes
    fn finished(&self, stage: Stage, total: u64);
}

/// Reporter writing checkpoints to the `tracing` log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn checkpoint(&self, stage: Stage, processed: u64) {
        match stage {
            Stage::Crawl => tracing::info!("Scraped {} articles", processed),
            Stage::Normalize => tracing::info!("Cleaned {} articles", processed),
            other => tracing::info!("{}: {} items processed", other, processed),
        }
    }

    fn finished(&self, stage: Stage, total: u64) {
        match stage {
            Stage::Crawl => tracing::info!("Total {} articles scraped", total),
            Stage::Normalize => tracing::info!("Total {} articles cleaned", total),
            other => tracing::info!("{} finished: {} items", other, total),
        }
    }
}

/// A recorded notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Checkpoint(Stage, u64),
    Finished(Stage, u64),
}

/// Reporter keeping every notification in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the notifications received so far
    pub fn events(&self) -> Vec<ProgressEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: ProgressEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl ProgressReporter for RecordingReporter {
    fn checkpoint(&self, stage: Stage, processed: u64) {
        self.push(ProgressEvent::Checkpoint(stage, processed));
    }

    fn finished(&self, stage: Stage, total: u64) {
        self.push(ProgressEvent::Finished(stage, total));
    }
}

/// Counts processed items and fires a checkpoint every `interval` items
#[derive(Debug, Clone, Copy)]
pub struct Checkpointer {
    stage: Stage,
    interval: u64,
    processed: u64,
}

impl Checkpointer {
    pub fn new(stage: Stage, interval: u64) -> Self {
        Self {
            stage,
            interval: interval.max(1),
            processed: 0,
        }
    }

    /// Records one processed item
    pub fn tick(&mut self, reporter: &dyn ProgressReporter) {
        self.processed += 1;
        if self.processed % self.interval == 0 {
            reporter.checkpoint(self.stage, self.processed);
        }
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }
}
