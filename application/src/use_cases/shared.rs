//! Shared utilities for use cases.
//!
//! Contains the timeout-wrapped backend invocation and the cancellable
//! join loop used by every stage.

use crate::ports::backend_gateway::{BackendError, BackendGateway};
use ensemble_domain::GenerationRequest;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Connect to `backend_id` and run `request`, bounded by `timeout`.
///
/// A timeout and an empty sample list are reported like any other backend
/// failure.
pub(crate) async fn invoke_backend<G: BackendGateway + ?Sized>(
    gateway: &G,
    backend_id: &str,
    request: &GenerationRequest,
    timeout: Duration,
) -> Result<Vec<String>, BackendError> {
    let call = async {
        let generator = gateway.connect(backend_id).await?;
        generator.generate(request).await
    };

    let outputs = tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| BackendError::Timeout(timeout))??;

    if outputs.is_empty() {
        return Err(BackendError::MalformedOutput(format!(
            "{} returned no samples",
            backend_id
        )));
    }
    Ok(outputs)
}

/// Outcome of waiting on a stage's join set
pub(crate) enum Joined<T> {
    /// A spawned task finished
    Next(Result<T, JoinError>),
    /// Every task has been collected
    Drained,
    /// The run was cancelled; remaining tasks were aborted
    Cancelled,
}

/// Wait for the next task in `join_set`, aborting everything on cancellation.
pub(crate) async fn join_next_or_cancel<T: 'static>(
    join_set: &mut JoinSet<T>,
    cancellation: Option<&CancellationToken>,
) -> Joined<T> {
    let next = match cancellation {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    join_set.abort_all();
                    return Joined::Cancelled;
                }
                next = join_set.join_next() => next,
            }
        }
        None => join_set.join_next().await,
    };

    match next {
        Some(result) => Joined::Next(result),
        None => Joined::Drained,
    }
}

/// Check if cancellation has been requested.
pub(crate) fn is_cancelled(cancellation: Option<&CancellationToken>) -> bool {
    cancellation.is_some_and(|token| token.is_cancelled())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{Reply, ScriptedGateway};

    #[tokio::test]
    async fn test_invoke_backend_returns_samples() {
        let gateway = ScriptedGateway::new().with("alpha", Reply::text("hello"));
        let request = GenerationRequest::new("p", 10, 0.5);

        let outputs = invoke_backend(&gateway, "alpha", &request, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(outputs, vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_invoke_backend_unknown_id() {
        let gateway = ScriptedGateway::new();
        let request = GenerationRequest::new("p", 10, 0.5);

        let err = invoke_backend(&gateway, "ghost", &request, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_invoke_backend_empty_output_is_malformed() {
        let gateway = ScriptedGateway::new().with("alpha", Reply::Samples(vec![]));
        let request = GenerationRequest::new("p", 10, 0.5);

        let err = invoke_backend(&gateway, "alpha", &request, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::MalformedOutput(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoke_backend_timeout() {
        let gateway = ScriptedGateway::new().with("slow", Reply::Hang);
        let request = GenerationRequest::new("p", 10, 0.5);

        let err = invoke_backend(&gateway, "slow", &request, Duration::from_secs(3))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::Timeout(Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_join_next_or_cancel_after_cancel() {
        let mut join_set: JoinSet<u32> = JoinSet::new();
        join_set.spawn(async {
            std::future::pending::<()>().await;
            1
        });
        let token = CancellationToken::new();
        token.cancel();

        let joined = join_next_or_cancel(&mut join_set, Some(&token)).await;
        assert!(matches!(joined, Joined::Cancelled));
        assert!(is_cancelled(Some(&token)));
        assert!(!is_cancelled(None));
    }
}
