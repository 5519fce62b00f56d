use serde::Deserialize;
use serde_json::Value;

use crate::error::{CleanupError, Result};

/// `detail-type` EventBridge uses for a completed EC2 termination.
pub const INSTANCE_TERMINATED: &str = "EC2 Instance Terminate Successful";

/// The parts of an EC2 termination notification the cleanup reads. Both
/// fields are optional and `detail-type` may be any JSON value, so any event
/// carrying an instance id gets processed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TerminationEvent {
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<Value>,
    #[serde(default)]
    pub detail: Option<TerminationDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TerminationDetail {
    #[serde(rename = "EC2InstanceId", default)]
    pub ec2_instance_id: Option<String>,
}

impl TerminationEvent {
    pub fn from_value(event: &Value) -> Result<Self> {
        Self::deserialize(event).map_err(|e| CleanupError::InvalidEvent(e.to_string()))
    }

    /// `detail-type` as logged: strings verbatim, other values as JSON.
    pub fn detail_type(&self) -> String {
        match &self.detail_type {
            Some(Value::String(detail_type)) => detail_type.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        }
    }

    pub fn is_instance_terminated(&self) -> bool {
        self.detail_type.as_ref().and_then(Value::as_str) == Some(INSTANCE_TERMINATED)
    }

    pub fn instance_id(&self) -> Result<&str> {
        self.detail
            .as_ref()
            .and_then(|detail| detail.ec2_instance_id.as_deref())
            .ok_or_else(|| CleanupError::InvalidEvent("missing detail.EC2InstanceId".to_string()))
    }
}
