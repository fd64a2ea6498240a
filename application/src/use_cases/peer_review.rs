//! Peer review use case
//!
//! Every backend that produced a draft judges every draft it did not write.
//!
//! # Flow
//!
//! ```text
//! judge pool = distinct backend ids among the candidates
//!
//!   for each judge (concurrently):
//!       for each candidate not authored by the judge (concurrently):
//!           scoring prompt → judge → strip echo
//!       all calls succeeded?  ── yes ──▶ verdicts handed to the merge loop
//!                             └─ no ───▶ judge skipped for this round
//!
//! merge loop (single writer): parse verdicts, record into candidates
//! ```
//!
//! A judge's verdicts are committed all-or-nothing, so a failed judge never
//! leaves partial scores behind.

use crate::config::EnsembleParams;
use crate::ports::backend_gateway::{BackendError, BackendGateway};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{Joined, invoke_backend, join_next_or_cancel};
use ensemble_domain::{
    Candidate, GenerationRequest, PromptTemplate, Stage, parse_peer_verdict, strip_echo,
};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What a judge is asked to review: candidate position and draft text
type ReviewTarget = (usize, String);

/// Use case for the peer review stage
pub struct PeerReviewUseCase<G: BackendGateway + 'static> {
    gateway: Arc<G>,
    params: EnsembleParams,
}

impl<G: BackendGateway + 'static> PeerReviewUseCase<G> {
    pub fn new(gateway: Arc<G>, params: EnsembleParams) -> Self {
        Self { gateway, params }
    }

    /// Review candidates with default (no-op) progress
    pub async fn review(&self, task: &str, prompt: &str, candidates: Vec<Candidate>) -> Vec<Candidate> {
        self.review_with_progress(task, prompt, candidates, &NoProgress, None)
            .await
    }

    /// Fill `peer_scores` / `peer_explanations` of the given candidates.
    ///
    /// Returns the same collection; an empty input is returned unchanged
    /// without invoking any backend. On cancellation the verdicts merged so
    /// far are kept and outstanding judges are abandoned.
    pub async fn review_with_progress(
        &self,
        task: &str,
        prompt: &str,
        mut candidates: Vec<Candidate>,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Vec<Candidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let judges = Self::judge_pool(&candidates);
        info!("Running peer review with {} judges", judges.len());
        progress.on_stage_start(Stage::Review, judges.len());

        let pool = Arc::new(Semaphore::new(self.params.max_concurrency.max(1)));
        let task: Arc<str> = Arc::from(task);
        let question: Arc<str> = Arc::from(prompt);
        let mut join_set = JoinSet::new();

        for judge in judges {
            let targets: Vec<ReviewTarget> = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_reviewable_by(&judge))
                .map(|(i, c)| (i, c.text.clone()))
                .collect();

            if targets.is_empty() {
                debug!("Judge {} has nothing to review", judge);
                progress.on_backend_complete(Stage::Review, &judge, true);
                continue;
            }

            let gateway = Arc::clone(&self.gateway);
            let pool = Arc::clone(&pool);
            let task = Arc::clone(&task);
            let question = Arc::clone(&question);
            let params = self.params.clone();

            join_set.spawn(async move {
                let result =
                    Self::judge(&gateway, &pool, &judge, &task, &question, targets, &params).await;
                (judge, result)
            });
        }

        loop {
            match join_next_or_cancel(&mut join_set, cancellation).await {
                Joined::Next(Ok((judge, Ok(responses)))) => {
                    for (idx, response) in responses {
                        let verdict = parse_peer_verdict(&response);
                        if verdict.used_fallback() {
                            debug!(
                                "Judge {} gave an unparseable verdict for {}; using defaults",
                                judge, candidates[idx].backend_id
                            );
                        }
                        candidates[idx].record_verdict(&judge, verdict);
                    }
                    info!("Judge {} completed review", judge);
                    progress.on_backend_complete(Stage::Review, &judge, true);
                }
                Joined::Next(Ok((judge, Err(e)))) => {
                    warn!("Peer review failed for {}: {}", judge, e);
                    progress.on_backend_complete(Stage::Review, &judge, false);
                }
                Joined::Next(Err(e)) => {
                    warn!("Task join error: {}", e);
                }
                Joined::Drained => break,
                Joined::Cancelled => {
                    warn!("Peer review cancelled");
                    break;
                }
            }
        }

        progress.on_stage_complete(Stage::Review);
        candidates
    }

    /// Distinct backend ids among the candidates, in first-seen order.
    fn judge_pool(candidates: &[Candidate]) -> Vec<String> {
        let mut judges: Vec<String> = Vec::new();
        for candidate in candidates {
            if !judges.contains(&candidate.backend_id) {
                judges.push(candidate.backend_id.clone());
            }
        }
        judges
    }

    /// Have one judge score every target; fails if any call fails.
    async fn judge(
        gateway: &G,
        pool: &Semaphore,
        judge: &str,
        task: &str,
        question: &str,
        targets: Vec<ReviewTarget>,
        params: &EnsembleParams,
    ) -> Result<Vec<(usize, String)>, BackendError> {
        let calls = targets.into_iter().map(|(idx, text)| async move {
            let prompt =
                PromptTemplate::review_prompt(task, question, &text, params.review_excerpt_chars);
            let request = GenerationRequest::new(
                prompt,
                params.review_max_tokens,
                params.review_temperature,
            );

            let _permit = pool
                .acquire()
                .await
                .map_err(|_| BackendError::Unavailable("worker pool closed".to_string()))?;
            let outputs = invoke_backend(gateway, judge, &request, params.backend_timeout).await?;
            Ok::<_, BackendError>((idx, strip_echo(&outputs[0], &request.prompt)))
        });

        try_join_all(calls).await
    }
}
