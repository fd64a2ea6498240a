//! Task identifiers and their display labels

use serde::{Deserialize, Serialize};

/// Built-in task identifiers with human-readable labels.
///
/// Configured tasks are free-form strings; these are the ones the ensemble
/// ships prompts and labels for.
const TASK_LABELS: &[(&str, &str)] = &[
    ("math", "Math problem solving"),
    ("code", "Coding / code generation"),
    ("research", "Research / literature review"),
    ("qa", "General Q&A / tutoring"),
    ("creative", "Creative writing"),
    ("summary", "Summarization / note taking"),
    ("business", "Business / professional writing"),
    ("data", "Data analysis / stats explanation"),
    ("translation", "Translation / multilingual"),
    ("chat", "Open chat / brainstorming"),
];

/// Look up the label of a built-in task.
pub fn task_label(id: &str) -> Option<&'static str> {
    TASK_LABELS
        .iter()
        .find(|(task, _)| *task == id)
        .map(|(_, label)| *label)
}

/// A task identifier paired with its display label (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub label: String,
}

impl TaskInfo {
    /// Describe a task, using the built-in label when one exists and the id otherwise.
    pub fn describe(id: impl Into<String>) -> Self {
        let id = id.into();
        let label = task_label(&id).map(str::to_string).unwrap_or_else(|| id.clone());
        Self { id, label }
    }

    /// All built-in tasks, in catalog order.
    pub fn builtin() -> Vec<TaskInfo> {
        TASK_LABELS
            .iter()
            .map(|(id, label)| TaskInfo {
                id: id.to_string(),
                label: label.to_string(),
            })
            .collect()
    }
}
