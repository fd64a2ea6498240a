//! Run Ensemble use case
//!
//! Chains draft generation, peer review and aggregation into one run.

use crate::config::EnsembleParams;
use crate::ports::backend_gateway::BackendGateway;
use crate::ports::config_resolver::ConfigResolver;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::aggregate::AggregateUseCase;
use crate::use_cases::generate_drafts::DraftGenerationUseCase;
use crate::use_cases::peer_review::PeerReviewUseCase;
use crate::use_cases::shared::is_cancelled;
use ensemble_domain::{Candidate, DomainError, EnsembleOutput};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur during an ensemble run
#[derive(Error, Debug)]
pub enum RunEnsembleError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] DomainError),

    /// Carries the drafts collected before cancellation, with whatever
    /// peer reviews were merged.
    #[error("Operation cancelled after {} drafts", .candidates.len())]
    Cancelled { candidates: Vec<Candidate> },
}

/// Input for the RunEnsemble use case
#[derive(Debug, Clone)]
pub struct RunEnsembleInput {
    /// Task identifier used to pick backends
    pub task: String,
    /// The user's request
    pub prompt: String,
    /// Whether to run the peer review stage
    pub enable_review: bool,
    pub cancellation: Option<CancellationToken>,
}

impl RunEnsembleInput {
    pub fn new(task: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            prompt: prompt.into(),
            enable_review: true,
            cancellation: None,
        }
    }

    pub fn without_review(mut self) -> Self {
        self.enable_review = false;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Use case for a full ensemble run
pub struct RunEnsembleUseCase<G: BackendGateway + 'static> {
    drafts: DraftGenerationUseCase<G>,
    review: PeerReviewUseCase<G>,
    aggregate: AggregateUseCase<G>,
}

impl<G: BackendGateway + 'static> RunEnsembleUseCase<G> {
    pub fn new(gateway: Arc<G>, resolver: Arc<dyn ConfigResolver>, params: EnsembleParams) -> Self {
        Self {
            drafts: DraftGenerationUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&resolver),
                params.clone(),
            ),
            review: PeerReviewUseCase::new(Arc::clone(&gateway), params.clone()),
            aggregate: AggregateUseCase::new(gateway, resolver, params),
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunEnsembleInput) -> Result<EnsembleOutput, RunEnsembleError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunEnsembleInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<EnsembleOutput, RunEnsembleError> {
        let cancellation = input.cancellation.as_ref();
        info!("Starting ensemble run for task '{}'", input.task);

        // Stage 1: drafts
        let candidates = self
            .drafts
            .generate_with_progress(&input.task, &input.prompt, progress, cancellation)
            .await?;
        if is_cancelled(cancellation) {
            return Err(RunEnsembleError::Cancelled { candidates });
        }
        info!("Collected {} drafts", candidates.len());

        // Stage 2: peer review
        let candidates = if input.enable_review {
            let reviewed = self
                .review
                .review_with_progress(&input.task, &input.prompt, candidates, progress, cancellation)
                .await;
            if is_cancelled(cancellation) {
                return Err(RunEnsembleError::Cancelled {
                    candidates: reviewed,
                });
            }
            reviewed
        } else {
            warn!("Peer review disabled; drafts go to aggregation unscored");
            candidates
        };

        // Stage 3: aggregation
        let result = match self
            .aggregate
            .aggregate_with_progress(&input.task, &input.prompt, &candidates, progress, cancellation)
            .await
        {
            Ok(result) => result,
            Err(DomainError::Cancelled) => return Err(RunEnsembleError::Cancelled { candidates }),
            Err(other) => return Err(RunEnsembleError::Configuration(other)),
        };

        info!("Ensemble run complete");
        Ok(EnsembleOutput::new(input.task, input.prompt, result, candidates))
    }
}
