use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::HandlerConfig;
use crate::deregister::{remove_runner, Deregistration};
use crate::error::Result;
use crate::event::TerminationEvent;
use crate::github::RunnerApi;
use crate::ssm::ParameterStore;

/// What the function returns to Lambda. Always a 200: failures only show up
/// in the logs so EventBridge does not retry the cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResponse {
    fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }
}

/// Entry point state, built once per cold start and reused by every
/// invocation.
pub struct RunnerCleanupHandler<P, A> {
    config: HandlerConfig,
    store: P,
    api: A,
}

impl<P, A> RunnerCleanupHandler<P, A>
where
    P: ParameterStore,
    A: RunnerApi,
{
    pub fn new(config: HandlerConfig, store: P, api: A) -> Self {
        Self { config, store, api }
    }

    /// Handles one event. Never fails: workflow errors are logged and
    /// reported in the response body.
    pub async fn handle(&self, event: &Value) -> InvocationResponse {
        info!(event = %event, "received event");

        match self.process(event).await {
            Ok(Processed::Completed(outcome)) => InvocationResponse::ok(self.describe(&outcome)),
            Ok(Processed::Skipped { detail_type }) => {
                InvocationResponse::ok(format!("no action for event type {detail_type}"))
            }
            Err(e) => {
                error!(error = %e, "error executing runner cleanup");
                InvocationResponse::ok(format!("runner cleanup failed: {e}"))
            }
        }
    }

    /// Runs the workflow and surfaces its result instead of swallowing it.
    pub async fn process(&self, event: &Value) -> Result<Processed> {
        let event = TerminationEvent::from_value(event)?;

        if !event.is_instance_terminated() {
            let detail_type = event.detail_type();
            warn!(
                %detail_type,
                enforced = self.config.enforce_detail_type,
                "no action for event type"
            );
            if self.config.enforce_detail_type {
                return Ok(Processed::Skipped { detail_type });
            }
        }

        let instance_id = event.instance_id()?;
        let result = remove_runner(&self.config, &self.store, &self.api, instance_id).await?;

        Ok(Processed::Completed(Outcome {
            instance_id: instance_id.to_string(),
            result,
        }))
    }

    fn describe(&self, outcome: &Outcome) -> String {
        let repo = self.config.repo();
        match outcome.result {
            Deregistration::Removed { runner_id } => format!(
                "runner {runner_id} for EC2 instance {} removed from {repo}",
                outcome.instance_id
            ),
            Deregistration::NotRegistered => format!(
                "no runner for EC2 instance {} in {repo}, skipped",
                outcome.instance_id
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// An enforced `detail-type` check turned the event away.
    Skipped { detail_type: String },
    Completed(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub instance_id: String,
    pub result: Deregistration,
}
