//! Draft generation use case
//!
//! Fans out one generation request per selected backend and collects the
//! drafts that came back. A failing backend contributes nothing; it never
//! aborts the stage.

use crate::config::EnsembleParams;
use crate::ports::backend_gateway::{BackendError, BackendGateway};
use crate::ports::config_resolver::ConfigResolver;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{Joined, invoke_backend, join_next_or_cancel};
use ensemble_domain::{Candidate, DomainError, PromptTemplate, Stage, strip_echo};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Use case for the draft stage
pub struct DraftGenerationUseCase<G: BackendGateway + 'static> {
    gateway: Arc<G>,
    resolver: Arc<dyn ConfigResolver>,
    params: EnsembleParams,
}

impl<G: BackendGateway + 'static> DraftGenerationUseCase<G> {
    pub fn new(gateway: Arc<G>, resolver: Arc<dyn ConfigResolver>, params: EnsembleParams) -> Self {
        Self {
            gateway,
            resolver,
            params,
        }
    }

    /// Generate drafts with default (no-op) progress
    pub async fn generate(&self, task: &str, prompt: &str) -> Result<Vec<Candidate>, DomainError> {
        self.generate_with_progress(task, prompt, &NoProgress, None)
            .await
    }

    /// Generate drafts with progress callbacks and optional cancellation.
    ///
    /// Only an unknown task is an error. If every backend fails the result is
    /// an empty list. On cancellation the drafts collected so far are returned
    /// and in-flight calls are aborted.
    pub async fn generate_with_progress(
        &self,
        task: &str,
        prompt: &str,
        progress: &dyn ProgressNotifier,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Vec<Candidate>, DomainError> {
        let backends: Vec<_> = self
            .resolver
            .resolve(task)?
            .into_iter()
            .take(self.params.top_k)
            .collect();

        info!(
            "Generating drafts for task '{}' with {} backends",
            task,
            backends.len()
        );
        progress.on_stage_start(Stage::Draft, backends.len());

        let draft_prompt = PromptTemplate::draft_prompt(task, prompt);
        let pool = Arc::new(Semaphore::new(self.params.max_concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for (position, backend) in backends.into_iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let pool = Arc::clone(&pool);
            let request = backend
                .request(draft_prompt.as_str())
                .with_samples(self.params.samples_per_backend);
            let timeout = self.params.backend_timeout;

            join_set.spawn(async move {
                let result = match pool.acquire_owned().await {
                    Ok(_permit) => {
                        invoke_backend(gateway.as_ref(), &backend.id, &request, timeout).await
                    }
                    Err(_) => Err(BackendError::Unavailable("worker pool closed".to_string())),
                };
                (position, backend.id, result)
            });
        }

        let mut drafts: Vec<(usize, Candidate)> = Vec::new();

        loop {
            match join_next_or_cancel(&mut join_set, cancellation).await {
                Joined::Next(Ok((position, backend_id, Ok(outputs)))) => {
                    debug!("Backend {} returned {} samples", backend_id, outputs.len());
                    progress.on_backend_complete(Stage::Draft, &backend_id, true);
                    for (idx, raw) in outputs.iter().enumerate() {
                        let text = strip_echo(raw, &draft_prompt);
                        drafts.push((position, Candidate::new(&backend_id, idx as u32, text)));
                    }
                }
                Joined::Next(Ok((_, backend_id, Err(e)))) => {
                    warn!("Skipping {}: {}", backend_id, e);
                    progress.on_backend_complete(Stage::Draft, &backend_id, false);
                }
                Joined::Next(Err(e)) => {
                    warn!("Task join error: {}", e);
                }
                Joined::Drained => break,
                Joined::Cancelled => {
                    warn!("Draft generation cancelled");
                    break;
                }
            }
        }

        // Keep configured backend order regardless of completion order
        drafts.sort_by_key(|(position, candidate)| (*position, candidate.candidate_index));
        let candidates: Vec<Candidate> = drafts.into_iter().map(|(_, c)| c).collect();

        if candidates.is_empty() {
            warn!("No backend produced a draft for task '{}'", task);
        }

        progress.on_stage_complete(Stage::Draft);
        Ok(candidates)
    }
}
