//! Ensemble value objects - the data flowing between pipeline stages.
//!
//! - [`Candidate`] - one backend's draft plus the peer verdicts it received
//! - [`AggregatedResult`] - the synthesized final answer
//! - [`EnsembleOutput`] - complete result: final answer plus every candidate

use super::parsing::PeerVerdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final answer returned when no backend produced a draft
pub const NO_ANSWER: &str = "No answers generated.";

/// A draft answer from one backend sample
///
/// Created by the draft stage, filled in by peer review, read by aggregation.
/// Peer maps are keyed by judge backend id and never contain the candidate's
/// own backend id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Backend that generated this draft
    pub backend_id: String,
    /// Sample index, unique per backend within one generation round
    pub candidate_index: u32,
    /// Generated text with any echoed prompt removed
    pub text: String,
    /// Judge backend id -> score
    #[serde(default)]
    pub peer_scores: BTreeMap<String, f64>,
    /// Judge backend id -> rationale
    #[serde(default)]
    pub peer_explanations: BTreeMap<String, String>,
}

impl Candidate {
    pub fn new(backend_id: impl Into<String>, candidate_index: u32, text: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            candidate_index,
            text: text.into(),
            peer_scores: BTreeMap::new(),
            peer_explanations: BTreeMap::new(),
        }
    }

    /// Whether `judge` may review this candidate (no self-review).
    pub fn is_reviewable_by(&self, judge: &str) -> bool {
        self.backend_id != judge
    }

    /// Record a judge's verdict.
    ///
    /// Returns `false` and records nothing when the judge authored this
    /// candidate.
    pub fn record_verdict(&mut self, judge: &str, verdict: PeerVerdict) -> bool {
        if !self.is_reviewable_by(judge) {
            return false;
        }
        self.peer_scores.insert(judge.to_string(), verdict.score);
        self.peer_explanations
            .insert(judge.to_string(), verdict.reason);
        true
    }

    /// Arithmetic mean over the scores present; 0.0 when nobody scored it.
    pub fn average_peer_score(&self) -> f64 {
        if self.peer_scores.is_empty() {
            return 0.0;
        }
        self.peer_scores.values().sum::<f64>() / self.peer_scores.len() as f64
    }

    /// Number of judges that scored this candidate
    pub fn review_count(&self) -> usize {
        self.peer_scores.len()
    }
}

/// Output of the aggregation stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    /// The synthesized answer
    pub final_answer: String,
    /// Auxiliary fragments, reserved for provenance data (empty today)
    #[serde(default)]
    pub chosen_fragments: BTreeMap<String, serde_json::Value>,
}

impl AggregatedResult {
    pub fn new(final_answer: impl Into<String>) -> Self {
        Self {
            final_answer: final_answer.into(),
            chosen_fragments: BTreeMap::new(),
        }
    }

    /// The explicit "no answer available" result.
    pub fn no_answer() -> Self {
        Self::new(NO_ANSWER)
    }

    /// Returns `true` if this is the "no answer available" result.
    pub fn is_no_answer(&self) -> bool {
        self.final_answer == NO_ANSWER
    }
}

/// Complete result of an ensemble run
///
/// Carries the candidates with their per-judge scores and rationales next to
/// the final answer, so callers can show how the answer was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleOutput {
    /// Task identifier the run was resolved for
    pub task: String,
    /// The user's request
    pub prompt: String,
    /// Aggregation stage output
    pub result: AggregatedResult,
    /// Every surviving draft, in configured backend order
    pub candidates: Vec<Candidate>,
}

impl EnsembleOutput {
    pub fn new(
        task: impl Into<String>,
        prompt: impl Into<String>,
        result: AggregatedResult,
        candidates: Vec<Candidate>,
    ) -> Self {
        Self {
            task: task.into(),
            prompt: prompt.into(),
            result,
            candidates,
        }
    }

    /// Distinct backend ids that produced at least one draft, in candidate order.
    pub fn participating_backends(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for candidate in &self.candidates {
            if !seen.contains(&candidate.backend_id.as_str()) {
                seen.push(&candidate.backend_id);
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(score: f64, reason: &str) -> PeerVerdict {
        PeerVerdict {
            score,
            reason: reason.to_string(),
            score_found: true,
            reason_found: true,
        }
    }

    #[test]
    fn test_record_verdict_from_peer() {
        let mut candidate = Candidate::new("alpha", 0, "Answer");
        assert!(candidate.record_verdict("beta", verdict(8.0, "Clear")));
        assert_eq!(candidate.peer_scores.get("beta"), Some(&8.0));
        assert_eq!(
            candidate.peer_explanations.get("beta").map(String::as_str),
            Some("Clear")
        );
    }

    #[test]
    fn test_record_verdict_rejects_self_review() {
        let mut candidate = Candidate::new("alpha", 0, "Answer");
        assert!(!candidate.record_verdict("alpha", verdict(10.0, "Mine is best")));
        assert!(candidate.peer_scores.is_empty());
        assert!(candidate.peer_explanations.is_empty());
    }

    #[test]
    fn test_average_over_present_scores_only() {
        let mut candidate = Candidate::new("alpha", 0, "Answer");
        candidate.record_verdict("beta", verdict(6.0, "ok"));
        candidate.record_verdict("gamma", verdict(9.0, "good"));
        assert_eq!(candidate.average_peer_score(), 7.5);
        assert_eq!(candidate.review_count(), 2);
    }

    #[test]
    fn test_average_without_scores_is_zero() {
        let candidate = Candidate::new("alpha", 0, "Answer");
        assert_eq!(candidate.average_peer_score(), 0.0);
    }

    #[test]
    fn test_no_answer_result() {
        let result = AggregatedResult::no_answer();
        assert_eq!(result.final_answer, "No answers generated.");
        assert!(result.chosen_fragments.is_empty());
        assert!(result.is_no_answer());
    }

    #[test]
    fn test_participating_backends_are_distinct() {
        let output = EnsembleOutput::new(
            "qa",
            "Q?",
            AggregatedResult::new("A"),
            vec![
                Candidate::new("alpha", 0, "a0"),
                Candidate::new("alpha", 1, "a1"),
                Candidate::new("beta", 0, "b0"),
            ],
        );
        assert_eq!(output.participating_backends(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_candidate_serializes_peer_maps() {
        let mut candidate = Candidate::new("alpha", 0, "Answer");
        candidate.record_verdict("beta", verdict(5.0, "No reason provided."));
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["backend_id"], "alpha");
        assert_eq!(json["peer_scores"]["beta"], 5.0);
    }
}
