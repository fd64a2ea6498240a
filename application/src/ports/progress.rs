//! Progress notification port
//!
//! Defines the interface for reporting progress during an ensemble run.

use ensemble_domain::Stage;

/// Callback for progress updates during an ensemble run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, web UI, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage, total_tasks: usize);

    /// Called when one backend's work within a stage finishes
    fn on_backend_complete(&self, stage: Stage, backend_id: &str, success: bool);

    /// Called when a stage completes
    fn on_stage_complete(&self, stage: Stage);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage, _total_tasks: usize) {}
    fn on_backend_complete(&self, _stage: Stage, _backend_id: &str, _success: bool) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
