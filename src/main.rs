use lambda_runtime::{service_fn, Error, LambdaEvent};
use runner_cleanup::config::HandlerConfig;
use runner_cleanup::github::GitHubClient;
use runner_cleanup::handler::{InvocationResponse, RunnerCleanupHandler};
use runner_cleanup::logging;
use runner_cleanup::ssm::SsmParameterStore;
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = HandlerConfig::from_env()?;
    let store = SsmParameterStore::load(config.parameter_region.clone()).await;
    let api = GitHubClient::new(reqwest::Client::new(), config.api_base_url.clone());
    info!(
        owner = %config.owner,
        repository = %config.repository,
        api = %config.api_base_url,
        "runner cleanup initialised"
    );

    let handler = RunnerCleanupHandler::new(config, store, api);
    let handler = &handler;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<InvocationResponse, Error>(handler.handle(&event.payload).await)
    }))
    .await
}
