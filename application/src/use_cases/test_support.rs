//! Scripted test doubles shared by the use case tests.

use crate::ports::backend_gateway::{BackendError, BackendGateway, TextGenerator};
use crate::ports::config_resolver::ConfigResolver;
use crate::ports::progress::ProgressNotifier;
use async_trait::async_trait;
use ensemble_domain::{BackendConfig, DomainError, GenerationRequest, Stage};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type ScriptFn = dyn Fn(&GenerationRequest) -> Result<Vec<String>, BackendError> + Send + Sync;

/// How a scripted backend answers
#[derive(Clone)]
pub enum Reply {
    /// Return these samples as-is
    Samples(Vec<String>),
    /// Echo the prompt, then append the text
    Echo(String),
    /// Fail every call
    Fail,
    /// Never answer
    Hang,
    /// Answer drafts with the text, never answer a scoring prompt
    HangOnReview(String),
    /// Sleep, then return the text
    Slow(Duration, String),
    /// Compute the answer from the request
    Script(Arc<ScriptFn>),
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Reply::Samples(vec![text.to_string()])
    }

    pub fn script(
        f: impl Fn(&GenerationRequest) -> Result<Vec<String>, BackendError> + Send + Sync + 'static,
    ) -> Self {
        Reply::Script(Arc::new(f))
    }
}

/// A recorded backend call
#[derive(Debug, Clone)]
pub struct Call {
    pub backend_id: String,
    pub request: GenerationRequest,
}

/// Gateway whose backends answer from a script and record every call
#[derive(Default)]
pub struct ScriptedGateway {
    replies: HashMap<String, Reply>,
    calls: Arc<Mutex<Vec<Call>>>,
    gauge: Arc<InFlight>,
}

/// Tracks concurrent `generate` calls
#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, backend_id: &str, reply: Reply) -> Self {
        self.replies.insert(backend_id.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, backend_id: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.backend_id == backend_id)
            .collect()
    }

    /// Most `generate` calls that were ever running at once
    pub fn peak_in_flight(&self) -> usize {
        self.gauge.peak.load(Ordering::SeqCst)
    }

    /// Calls whose prompt is a judge's scoring prompt
    pub fn review_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| is_review_prompt(&c.request.prompt))
            .collect()
    }
}

#[async_trait]
impl BackendGateway for ScriptedGateway {
    async fn connect(&self, backend_id: &str) -> Result<Arc<dyn TextGenerator>, BackendError> {
        let reply = self
            .replies
            .get(backend_id)
            .cloned()
            .ok_or_else(|| BackendError::Unavailable(backend_id.to_string()))?;
        Ok(Arc::new(ScriptedGenerator {
            backend_id: backend_id.to_string(),
            reply,
            calls: Arc::clone(&self.calls),
            gauge: Arc::clone(&self.gauge),
        }))
    }
}

struct ScriptedGenerator {
    backend_id: String,
    reply: Reply,
    calls: Arc<Mutex<Vec<Call>>>,
    gauge: Arc<InFlight>,
}

fn is_review_prompt(prompt: &str) -> bool {
    prompt.starts_with("Evaluate this answer")
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn backend_id(&self) -> &str {
        &self.backend_id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<String>, BackendError> {
        self.calls.lock().unwrap().push(Call {
            backend_id: self.backend_id.clone(),
            request: request.clone(),
        });

        self.gauge.enter();
        let result = self.answer(request).await;
        self.gauge.leave();
        result
    }
}

impl ScriptedGenerator {
    async fn answer(&self, request: &GenerationRequest) -> Result<Vec<String>, BackendError> {
        match &self.reply {
            Reply::Samples(samples) => Ok(samples.clone()),
            Reply::Echo(text) => Ok(vec![format!("{}{}", request.prompt, text)]),
            Reply::Fail => Err(BackendError::RequestFailed(format!(
                "{} is out of memory",
                self.backend_id
            ))),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Ok(vec![])
            }
            Reply::HangOnReview(text) => {
                if is_review_prompt(&request.prompt) {
                    std::future::pending::<()>().await;
                }
                Ok(vec![text.clone()])
            }
            Reply::Slow(delay, text) => {
                tokio::time::sleep(*delay).await;
                Ok(vec![text.clone()])
            }
            Reply::Script(f) => f(request),
        }
    }
}

/// Resolver over an in-memory task table
#[derive(Default)]
pub struct StaticResolver {
    tasks: HashMap<String, Vec<BackendConfig>>,
    synthesis: Option<BackendConfig>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(mut self, task: &str, backend_ids: &[&str]) -> Self {
        let backends = backend_ids
            .iter()
            .map(|id| BackendConfig::new(*id, task))
            .collect();
        self.tasks.insert(task.to_string(), backends);
        self
    }

    pub fn with_synthesis(mut self, backend_id: &str) -> Self {
        self.synthesis = Some(
            BackendConfig::new(backend_id, "synthesis")
                .with_max_tokens(1024)
                .with_temperature(0.3),
        );
        self
    }
}

impl ConfigResolver for StaticResolver {
    fn resolve(&self, task: &str) -> Result<Vec<BackendConfig>, DomainError> {
        self.tasks
            .get(task)
            .cloned()
            .ok_or_else(|| DomainError::UnknownTask(task.to_string()))
    }

    fn resolve_synthesis(&self) -> Result<BackendConfig, DomainError> {
        self.synthesis
            .clone()
            .ok_or_else(|| DomainError::MissingSection("synthesis".to_string()))
    }

    fn list_tasks(&self) -> BTreeSet<String> {
        self.tasks.keys().cloned().collect()
    }
}

/// Progress notifier that records every event as a string
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        self.events
            .lock()
            .unwrap()
            .push(format!("start:{}:{}", stage.as_str(), total_tasks));
    }

    fn on_backend_complete(&self, stage: Stage, backend_id: &str, success: bool) {
        self.events
            .lock()
            .unwrap()
            .push(format!("done:{}:{}:{}", stage.as_str(), backend_id, success));
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.events
            .lock()
            .unwrap()
            .push(format!("end:{}", stage.as_str()));
    }
}
