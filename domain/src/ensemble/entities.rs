//! Ensemble domain entities

use serde::{Deserialize, Serialize};

/// Stage of an ensemble run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Draft generation - every selected backend answers the prompt
    Draft,
    /// Peer review - backends score each other's drafts
    Review,
    /// Aggregation - the synthesis backend merges drafts and reviews
    Aggregation,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Draft => "draft",
            Stage::Review => "review",
            Stage::Aggregation => "aggregation",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Draft => "Draft Generation",
            Stage::Review => "Peer Review",
            Stage::Aggregation => "Aggregation",
        }
    }

    /// 1-based position in the pipeline
    pub fn number(&self) -> usize {
        match self {
            Stage::Draft => 1,
            Stage::Review => 2,
            Stage::Aggregation => 3,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Draft.number() < Stage::Review.number());
        assert!(Stage::Review.number() < Stage::Aggregation.number());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Review.to_string(), "Peer Review");
        assert_eq!(Stage::Aggregation.as_str(), "aggregation");
    }
}
