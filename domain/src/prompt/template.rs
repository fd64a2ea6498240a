//! Prompt templates for the ensemble flow

use crate::core::string::excerpt;
use crate::core::task::TaskInfo;
use crate::ensemble::value_objects::Candidate;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Minimal instruction prompt for the draft stage.
    ///
    /// Small backends follow short prompts best, so this only carries the
    /// task label and the user's request.
    pub fn draft_prompt(task: &str, question: &str) -> String {
        format!(
            "Task: {}\nQuestion: {}\nAnswer concisely and accurately:",
            TaskInfo::describe(task).label,
            question
        )
    }

    /// Scoring prompt for one judge reviewing one draft.
    ///
    /// Only the first `excerpt_chars` characters of the draft are shown.
    pub fn review_prompt(task: &str, question: &str, draft: &str, excerpt_chars: usize) -> String {
        format!(
            r#"Evaluate this answer for {}.
Question: {}
Answer: {}
Score (0-10) and Reason.
Format: Score: 5
Reason: Good but short."#,
            TaskInfo::describe(task).label,
            question,
            excerpt(draft, excerpt_chars)
        )
    }

    /// Render one numbered block per candidate with its average peer score,
    /// full text and each judge's rationale cut to `rationale_chars`.
    pub fn candidate_blocks(candidates: &[Candidate], rationale_chars: usize) -> String {
        let mut block = String::new();

        for (idx, candidate) in candidates.iter().enumerate() {
            block.push_str(&format!(
                "--- Option {} (Score: {:.1}/10) ---\n",
                idx + 1,
                candidate.average_peer_score()
            ));
            block.push_str(&format!("Content:\n{}\n\n", candidate.text.trim()));
            block.push_str("Peer Feedback:\n");
            if candidate.peer_explanations.is_empty() {
                block.push_str("  (no reviews)\n");
            }
            for (judge, reason) in &candidate.peer_explanations {
                block.push_str(&format!(
                    "  - {}: {}\n",
                    judge,
                    excerpt(reason, rationale_chars)
                ));
            }
            block.push('\n');
        }

        block
    }

    /// Synthesis prompt for the aggregation stage ("editor" persona).
    pub fn synthesis_prompt(
        task: &str,
        question: &str,
        candidates: &[Candidate],
        rationale_chars: usize,
    ) -> String {
        format!(
            r#"You are the Chief Editor. Your goal is to write the single best response to the user.
User Task: {}
User Question: {}

Here are {} drafts from your junior team, along with their peer review scores:

{}Instructions:
1. Favor the higher-scored options and ignore low-quality ones.
2. Combine the best insights into a synthesis. Do not just list the options.
3. Write one coherent, professional final answer.
4. Do NOT mention option numbers or model names in your final text.

Final Answer:"#,
            TaskInfo::describe(task).label,
            question,
            candidates.len(),
            Self::candidate_blocks(candidates, rationale_chars)
        )
    }
}
