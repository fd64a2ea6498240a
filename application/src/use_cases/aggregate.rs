//! Aggregation use case
//!
//! Builds one synthesis prompt from every candidate, its average peer score
//! and its reviewers' rationales, and asks the synthesis backend for the
//! final answer.

use crate::config::EnsembleParams;
use crate::ports::backend_gateway::{BackendError, BackendGateway};
use crate::ports::config_resolver::ConfigResolver;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::invoke_backend;
use ensemble_domain::{AggregatedResult, Candidate, DomainError, PromptTemplate, Stage, strip_echo};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Fragment key naming the draft used when synthesis was unavailable
pub const FALLBACK_FRAGMENT: &str = "fallback_candidate";

/// Use case for the aggregation stage
pub struct AggregateUseCase<G: BackendGateway + 'static> {
    gateway: Arc<G>,
    resolver: Arc<dyn ConfigResolver>,
    params: EnsembleParams,
}

impl<G: BackendGateway + 'static> AggregateUseCase<G> {
    pub fn new(gateway: Arc<G>, resolver: Arc<dyn ConfigResolver>, params: EnsembleParams) -> Self {
        Self {
            gateway,
            resolver,
            params,
        }
    }

    /// Aggregate with default (no-op) progress
    pub async fn aggregate(
        &self,
        task: &str,
        prompt: &str,
        candidates: &[Candidate],
    ) -> Result<AggregatedResult, DomainError> {
        self.aggregate_with_progress(task, prompt, candidates, &NoProgress, None)
            .await
    }

    /// Produce the final answer.
    ///
    /// An empty candidate list yields [`AggregatedResult::no_answer`] without
    /// touching any backend. If the synthesis backend itself fails, the
    /// highest-scored draft is returned instead, and its backend id is
    /// recorded under [`FALLBACK_FRAGMENT`].
    pub async fn aggregate_with_progress(
        &self,
        task: &str,
        prompt: &str,
        candidates: &[Candidate],
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<AggregatedResult, DomainError> {
        if candidates.is_empty() {
            info!("No drafts to aggregate");
            return Ok(AggregatedResult::no_answer());
        }

        let synthesis = self.resolver.resolve_synthesis()?;
        info!(
            "Aggregating {} drafts with {}",
            candidates.len(),
            synthesis.id
        );
        progress.on_stage_start(Stage::Aggregation, 1);

        let synthesis_prompt =
            PromptTemplate::synthesis_prompt(task, prompt, candidates, self.params.rationale_chars);
        let request = synthesis.request(synthesis_prompt.as_str());

        let call = async {
            let outputs = invoke_backend(
                self.gateway.as_ref(),
                &synthesis.id,
                &request,
                self.params.backend_timeout,
            )
            .await?;
            let answer = strip_echo(&outputs[0], &synthesis_prompt);
            if answer.is_empty() {
                return Err(BackendError::MalformedOutput(
                    "synthesis returned only the prompt".to_string(),
                ));
            }
            Ok(answer)
        };

        let outcome = match cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("Aggregation cancelled");
                        progress.on_stage_complete(Stage::Aggregation);
                        return Err(DomainError::Cancelled);
                    }
                    outcome = call => outcome,
                }
            }
            None => call.await,
        };

        let result = match outcome {
            Ok(answer) => {
                progress.on_backend_complete(Stage::Aggregation, &synthesis.id, true);
                AggregatedResult::new(answer)
            }
            Err(e) => {
                warn!("Synthesis backend {} failed: {}", synthesis.id, e);
                progress.on_backend_complete(Stage::Aggregation, &synthesis.id, false);
                Self::best_draft(candidates)
            }
        };

        progress.on_stage_complete(Stage::Aggregation);
        Ok(result)
    }

    /// Degraded answer: the draft with the highest average peer score.
    ///
    /// Ties keep the earliest candidate.
    fn best_draft(candidates: &[Candidate]) -> AggregatedResult {
        let mut best = &candidates[0];
        for candidate in &candidates[1..] {
            if candidate.average_peer_score() > best.average_peer_score() {
                best = candidate;
            }
        }

        let mut result = AggregatedResult::new(best.text.trim());
        result
            .chosen_fragments
            .insert(FALLBACK_FRAGMENT.to_string(), best.backend_id.clone().into());
        result
    }
}
