//! Output formatter trait

use ensemble_domain::{EnsembleOutput, TaskInfo};

/// Trait for formatting ensemble results
pub trait OutputFormatter {
    /// Every draft with its peer reviews, then the final answer
    fn format(&self, output: &EnsembleOutput) -> String;

    /// Format as JSON
    fn format_json(&self, output: &EnsembleOutput) -> String;

    /// Final answer only (concise output)
    fn format_answer_only(&self, output: &EnsembleOutput) -> String;

    /// Table of configured tasks
    fn format_tasks(&self, tasks: &[TaskInfo]) -> String;
}
