//! Inference server settings from TOML (`[inference]` section)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Endpoint used when neither the file nor the environment names one
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080";

/// Raw `[inference]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInferenceConfig {
    /// Base URL shared by every backend without an override
    pub endpoint: String,
    /// Per-backend base URL overrides, keyed by backend id
    pub endpoints: BTreeMap<String, String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for FileInferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            endpoints: BTreeMap::new(),
            request_timeout_secs: 120,
        }
    }
}

impl FileInferenceConfig {
    /// Base URL serving `backend_id`
    pub fn endpoint_for(&self, backend_id: &str) -> &str {
        self.endpoints
            .get(backend_id)
            .map(String::as_str)
            .unwrap_or(&self.endpoint)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
