//! Console output formatter for ensemble results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use ensemble_application::FALLBACK_FRAGMENT;
use ensemble_domain::{Candidate, EnsembleOutput, TaskInfo};
use serde_json::json;

/// Formats ensemble results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Every draft with its peer reviews, then the final answer
    pub fn format(output: &EnsembleOutput) -> String {
        let mut out = String::new();
        let task = TaskInfo::describe(output.task.as_str());

        out.push_str(&Self::header("Ensemble Results"));
        out.push('\n');

        out.push_str(&format!("{} {}\n", "Task:".cyan().bold(), task.label));
        out.push_str(&format!("{} {}\n\n", "Prompt:".cyan().bold(), output.prompt));
        out.push_str(&format!(
            "{} {}\n",
            "Backends:".cyan().bold(),
            output.participating_backends().join(", ")
        ));

        // Stage 1 + 2: drafts with their reviews
        out.push_str(&Self::section_header("Drafts and Peer Reviews"));
        if output.candidates.is_empty() {
            out.push_str(&format!("\n{}\n", "No backend produced a draft.".red()));
        }
        for candidate in &output.candidates {
            out.push_str(&Self::candidate_block(candidate));
        }

        // Stage 3
        out.push_str(&Self::section_header("Final Answer"));
        if let Some(fallback) = output
            .result
            .chosen_fragments
            .get(FALLBACK_FRAGMENT)
            .and_then(|v| v.as_str())
        {
            out.push_str(&format!(
                "\n{}\n",
                format!("Synthesis unavailable; best draft from {}", fallback)
                    .yellow()
                    .bold()
            ));
        }
        out.push_str(&format!("\n{}\n", output.result.final_answer));

        out.push_str(&Self::footer());
        out
    }

    /// Drafts left over from an interrupted run
    pub fn format_interrupted(candidates: &[Candidate]) -> String {
        let mut out = Self::section_header("Interrupted: drafts collected so far");
        if candidates.is_empty() {
            out.push_str(&format!("\n{}\n", "No backend produced a draft.".red()));
        }
        for candidate in candidates {
            out.push_str(&Self::candidate_block(candidate));
        }
        out
    }

    fn candidate_block(candidate: &Candidate) -> String {
        let mut block = String::new();
        let title = if candidate.candidate_index == 0 {
            candidate.backend_id.clone()
        } else {
            format!("{} #{}", candidate.backend_id, candidate.candidate_index + 1)
        };

        block.push_str(&format!(
            "\n{} {}\n{}\n",
            format!("── {} ──", title).yellow().bold(),
            format!("avg {:.1}/10", candidate.average_peer_score()).dimmed(),
            candidate.text
        ));

        for (judge, score) in &candidate.peer_scores {
            let reason = candidate
                .peer_explanations
                .get(judge)
                .map(String::as_str)
                .unwrap_or("");
            block.push_str(&format!(
                "  {} {:>4.1}  {}\n",
                format!("{}:", judge).cyan(),
                score,
                Self::indent(reason, "         ").trim_start()
            ));
        }
        block
    }

    /// Format as JSON: `{final_answer, meta, candidates}`
    pub fn format_json(output: &EnsembleOutput) -> String {
        let candidates: Vec<_> = output
            .candidates
            .iter()
            .map(|c| {
                json!({
                    "backend_id": c.backend_id,
                    "candidate_index": c.candidate_index,
                    "text": c.text,
                    "peer_scores": c.peer_scores,
                    "peer_explanations": c.peer_explanations,
                    "average_score": c.average_peer_score(),
                })
            })
            .collect();

        let value = json!({
            "final_answer": output.result.final_answer,
            "meta": {
                "task": output.task,
                "task_label": TaskInfo::describe(output.task.as_str()).label,
                "prompt": output.prompt,
                "backends": output.participating_backends(),
                "chosen_fragments": output.result.chosen_fragments,
            },
            "candidates": candidates,
        });

        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Final answer only (concise output)
    pub fn format_answer_only(output: &EnsembleOutput) -> String {
        format!("{}\n", output.result.final_answer)
    }

    /// Configured tasks with their labels
    pub fn format_tasks(tasks: &[TaskInfo]) -> String {
        if tasks.is_empty() {
            return format!(
                "{}\n",
                "No tasks configured. Add [tasks.<id>] sections to ensemble.toml.".yellow()
            );
        }

        let width = tasks.iter().map(|t| t.id.len()).max().unwrap_or(0);
        let mut out = format!("{}\n", "Available tasks:".cyan().bold());
        for task in tasks {
            out.push_str(&format!(
                "  {}  {}\n",
                format!("{:<width$}", task.id, width = width).bold(),
                task.label
            ));
        }
        out
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, output: &EnsembleOutput) -> String {
        Self::format(output)
    }

    fn format_json(&self, output: &EnsembleOutput) -> String {
        Self::format_json(output)
    }

    fn format_answer_only(&self, output: &EnsembleOutput) -> String {
        Self::format_answer_only(output)
    }

    fn format_tasks(&self, tasks: &[TaskInfo]) -> String {
        Self::format_tasks(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensemble_domain::{AggregatedResult, parse_peer_verdict};

    fn sample_output() -> EnsembleOutput {
        let mut alpha = Candidate::new("alpha", 0, "Rust is memory safe.");
        alpha.record_verdict("beta", parse_peer_verdict("Score: 8\nReason: Correct."));
        let mut beta = Candidate::new("beta", 0, "Rust is fast.");
        beta.record_verdict("alpha", parse_peer_verdict("Score: 6\nReason: Thin."));

        EnsembleOutput::new(
            "qa",
            "What is Rust?",
            AggregatedResult::new("Rust is fast and memory safe."),
            vec![alpha, beta],
        )
    }

    #[test]
    fn test_json_shape() {
        let json = ConsoleFormatter::format_json(&sample_output());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["final_answer"], "Rust is fast and memory safe.");
        assert_eq!(value["meta"]["task"], "qa");
        assert_eq!(value["meta"]["task_label"], "General Q&A / tutoring");
        assert_eq!(value["meta"]["backends"], json!(["alpha", "beta"]));
        assert_eq!(value["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(value["candidates"][0]["peer_scores"]["beta"], 8.0);
        assert_eq!(value["candidates"][1]["peer_explanations"]["alpha"], "Thin.");
        assert_eq!(value["candidates"][0]["average_score"], 8.0);
    }

    #[test]
    fn test_full_format_lists_drafts_and_answer() {
        let text = ConsoleFormatter::format(&sample_output());
        assert!(text.contains("Rust is memory safe."));
        assert!(text.contains("Rust is fast."));
        assert!(text.contains("Correct."));
        assert!(text.contains("General Q&A / tutoring"));
        assert!(text.contains("Rust is fast and memory safe."));
    }

    #[test]
    fn test_full_format_without_drafts() {
        let output = EnsembleOutput::new("qa", "Q?", AggregatedResult::no_answer(), vec![]);
        let text = ConsoleFormatter::format(&output);
        assert!(text.contains("No backend produced a draft."));
        assert!(text.contains("No answers generated."));
    }

    #[test]
    fn test_interrupted_lists_partial_drafts() {
        let text = ConsoleFormatter::format_interrupted(&sample_output().candidates);
        assert!(text.contains("Interrupted"));
        assert!(text.contains("Rust is memory safe."));
        assert!(text.contains("Thin."));

        let empty = ConsoleFormatter::format_interrupted(&[]);
        assert!(empty.contains("No backend produced a draft."));
    }

    #[test]
    fn test_answer_only() {
        let text = ConsoleFormatter::format_answer_only(&sample_output());
        assert_eq!(text, "Rust is fast and memory safe.\n");
    }

    #[test]
    fn test_tasks_table() {
        let tasks = vec![TaskInfo::describe("math"), TaskInfo::describe("legal")];
        let text = ConsoleFormatter::format_tasks(&tasks);
        assert!(text.contains("Math problem solving"));
        assert!(text.contains("legal"));
    }
}
