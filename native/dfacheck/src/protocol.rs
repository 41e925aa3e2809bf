//! Wire records of the batch response.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Outcome of one test word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordResult {
    pub input: String,
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WordResult {
    pub fn new(input: impl Into<String>, outcome: Result<bool, SimulationError>) -> Self {
        let input = input.into();
        match outcome {
            Ok(result) => Self {
                input,
                result,
                error: None,
            },
            Err(err) => Self {
                input,
                result: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// One record per submitted definition, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutomatonResult {
    Success {
        id: String,
        success: bool,
        inputs_validation: Vec<WordResult>,
        graph: String,
    },
    Failure {
        id: String,
        success: bool,
        error_description: String,
    },
}

impl AutomatonResult {
    pub fn success(id: impl Into<String>, inputs_validation: Vec<WordResult>, graph: String) -> Self {
        AutomatonResult::Success {
            id: id.into(),
            success: true,
            inputs_validation,
            graph,
        }
    }

    pub fn failure(id: impl Into<String>, error_description: impl Into<String>) -> Self {
        AutomatonResult::Failure {
            id: id.into(),
            success: false,
            error_description: error_description.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            AutomatonResult::Success { id, .. } | AutomatonResult::Failure { id, .. } => id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AutomatonResult::Success { .. })
    }
}

/// Body returned instead of a result array when the whole request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
