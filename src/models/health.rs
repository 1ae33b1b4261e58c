use serde::{Deserialize, Serialize};

/// Body of the `/readyz` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Registered components that have not reported ready yet.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub pending: Vec<String>,
    pub timestamp: String,
}
