//! JSON contract of the analysis service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lower and upper specification limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecLimits {
    /// Lower specification limit.
    pub lei: f64,
    /// Upper specification limit.
    pub les: f64,
}

impl SpecLimits {
    /// Create spec limits.
    pub fn new(lei: f64, les: f64) -> Self {
        Self { lei, les }
    }
}

/// Body of an analysis request.
///
/// Optional fields are omitted from the JSON when unset, never sent as
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Which analysis the service should run.
    pub analysis_type: String,
    /// Identifier of the uploaded spreadsheet.
    pub file_id: String,
    /// Conversation message the result will be attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Target value for capability analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<f64>,
    /// Specification limits for capability analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_limits: Option<SpecLimits>,
}

impl AnalysisRequest {
    /// Create a request with only the required fields.
    pub fn new(analysis_type: impl Into<String>, file_id: impl Into<String>) -> Self {
        Self {
            analysis_type: analysis_type.into(),
            file_id: file_id.into(),
            message_id: None,
            specification: None,
            spec_limits: None,
        }
    }

    /// Set the message id. Blank ids are treated as unset.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        let message_id = message_id.into();
        self.message_id = (!message_id.trim().is_empty()).then_some(message_id);
        self
    }

    /// Set the specification target.
    pub fn with_specification(mut self, specification: f64) -> Self {
        self.specification = Some(specification);
        self
    }

    /// Set the specification limits.
    pub fn with_spec_limits(mut self, limits: SpecLimits) -> Self {
        self.spec_limits = Some(limits);
        self
    }
}

/// Payload of a successful analysis.
///
/// `results` is what makes a payload an analysis; a `data` object without it
/// fails to parse. Charts and instructions are presentation extras and may be
/// omitted by analyses that produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    /// Named statistical results.
    pub results: Map<String, Value>,
    /// Series the UI turns into charts.
    #[serde(rename = "chartData", default)]
    pub chart_data: Vec<Value>,
    /// Human-readable interpretation.
    #[serde(default)]
    pub instructions: String,
}

/// Application error carried in a response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireError {
    /// Machine-readable error code, e.g. `VALIDATION_ERROR`.
    pub code: String,
    /// Server-supplied description.
    #[serde(default)]
    pub message: String,
    /// Field-level issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<Value>>,
}

/// The `{data, error}` envelope every response uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Present on success.
    #[serde(default)]
    pub data: Option<AnalysisData>,
    /// Present on failure.
    #[serde(default)]
    pub error: Option<WireError>,
}

impl ResponseEnvelope {
    /// Parse an envelope from raw body bytes.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
