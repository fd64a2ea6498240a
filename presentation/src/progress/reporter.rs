//! Progress reporting for ensemble runs

use colored::Colorize;
use ensemble_application::ports::progress::ProgressNotifier;
use ensemble_domain::Stage;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during an ensemble run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_title(stage: Stage) -> String {
        format!("Stage {}: {}", stage.number(), stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_title(stage));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_backend_complete(&self, _stage: Stage, backend_id: &str, success: bool) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), backend_id)
            } else {
                format!("{} {}", "x".red(), backend_id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete!", stage.display_name().green()));
        }
    }
}

/// Simple text-based progress (no progress bars)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        eprintln!(
            "{} {} ({} backends)",
            "->".cyan(),
            ProgressReporter::stage_title(stage).bold(),
            total_tasks
        );
    }

    fn on_backend_complete(&self, _stage: Stage, backend_id: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), backend_id);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), backend_id);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        eprintln!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_title() {
        assert_eq!(
            ProgressReporter::stage_title(Stage::Review),
            "Stage 2: Peer Review"
        );
    }

    #[test]
    fn test_reporter_lifecycle_without_terminal() {
        let reporter = ProgressReporter::new();
        reporter.on_stage_start(Stage::Draft, 2);
        reporter.on_backend_complete(Stage::Draft, "alpha", true);
        reporter.on_backend_complete(Stage::Draft, "beta", false);
        reporter.on_stage_complete(Stage::Draft);
        assert!(reporter.stage_bar.lock().unwrap().is_none());
    }
}
