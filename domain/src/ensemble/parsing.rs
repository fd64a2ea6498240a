//! Peer verdict parsing.
//!
//! Judges answer in free-form text. This module extracts a numeric score and
//! a rationale from that text. It is pure domain logic: no I/O, just pattern
//! matching.
//!
//! Malformed judge output is expected and common, so a missing pattern is not
//! an error. It yields the documented fallback values instead:
//!
//! | Pattern | Example | Fallback |
//! |---------|---------|----------|
//! | `Score: <number>` (case-insensitive) | `score: 7.5` | [`DEFAULT_PEER_SCORE`] |
//! | `Reason: <text to end>` (case-insensitive) | `Reason: concise` | [`MISSING_REASON`] |

use regex::Regex;
use std::sync::LazyLock;

/// Score used when a judge's response carries no score (midpoint of 0-10)
pub const DEFAULT_PEER_SCORE: f64 = 5.0;

/// Rationale used when a judge's response carries no reason
pub const MISSING_REASON: &str = "No reason provided.";

/// Lowest score on the review scale
pub const MIN_PEER_SCORE: f64 = 0.0;

/// Highest score on the review scale
pub const MAX_PEER_SCORE: f64 = 10.0;

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Score:\s*([0-9]+(?:\.[0-9]+)?)").expect("score pattern is valid")
});

static REASON_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)Reason:\s*(.+)").expect("reason pattern is valid"));

/// A judge's parsed (or defaulted) verdict on one candidate
#[derive(Debug, Clone, PartialEq)]
pub struct PeerVerdict {
    /// Score on the 0-10 scale
    pub score: f64,
    /// Rationale text
    pub reason: String,
    /// Whether the score came from the response rather than the fallback
    pub score_found: bool,
    /// Whether the reason came from the response rather than the fallback
    pub reason_found: bool,
}

impl PeerVerdict {
    /// Returns `true` if either field fell back to its default.
    pub fn used_fallback(&self) -> bool {
        !self.score_found || !self.reason_found
    }
}

/// Parse a judge's response into a [`PeerVerdict`].
///
/// Scores are clamped to 0-10. The rationale spans from `Reason:` to the end
/// of the response and is trimmed.
///
/// # Examples
///
/// ```
/// use ensemble_domain::parse_peer_verdict;
///
/// let verdict = parse_peer_verdict("Score: 8\nReason: Accurate and brief.");
/// assert_eq!(verdict.score, 8.0);
/// assert_eq!(verdict.reason, "Accurate and brief.");
///
/// let verdict = parse_peer_verdict("I liked it.");
/// assert_eq!(verdict.score, 5.0);
/// assert_eq!(verdict.reason, "No reason provided.");
/// ```
pub fn parse_peer_verdict(response: &str) -> PeerVerdict {
    let score = SCORE_PATTERN
        .captures(response)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|s| s.clamp(MIN_PEER_SCORE, MAX_PEER_SCORE));

    let reason = REASON_PATTERN
        .captures(response)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|r| !r.is_empty());

    PeerVerdict {
        score_found: score.is_some(),
        reason_found: reason.is_some(),
        score: score.unwrap_or(DEFAULT_PEER_SCORE),
        reason: reason.unwrap_or_else(|| MISSING_REASON.to_string()),
    }
}
