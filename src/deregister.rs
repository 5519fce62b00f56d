use tracing::{error, info};

use crate::config::HandlerConfig;
use crate::error::Result;
use crate::github::{Runner, RunnerApi};
use crate::ssm::ParameterStore;

/// How a deregistration attempt ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deregistration {
    Removed { runner_id: u64 },
    NotRegistered,
}

/// First runner named after the instance. Duplicate names are not expected.
pub fn find_runner<'a>(runners: &'a [Runner], instance_id: &str) -> Option<&'a Runner> {
    runners.iter().find(|runner| runner.name == instance_id)
}

/// Fetches the token, lists the repository's runners and deletes the one
/// named after `instance_id`, if any. At most one runner is deleted.
pub async fn remove_runner<P, A>(
    config: &HandlerConfig,
    store: &P,
    api: &A,
    instance_id: &str,
) -> Result<Deregistration>
where
    P: ParameterStore,
    A: RunnerApi,
{
    let repo = config.repo();
    let token = store
        .get_parameter(&config.parameter_name)
        .await
        .inspect_err(|e| error!(error = %e, "error fetching SSM parameter"))?;

    info!(instance_id, %repo, "removing GitHub self-hosted runner for EC2 instance");
    let list = api
        .list_runners(&repo, &token)
        .await
        .inspect_err(|e| error!(error = %e, %repo, "error listing runners"))?;

    let Some(runner) = find_runner(&list.runners, instance_id) else {
        info!(
            instance_id,
            %repo,
            runners = list.runners.len(),
            total_count = list.total_count,
            "no GitHub self-hosted runner for EC2 instance, skipping"
        );
        return Ok(Deregistration::NotRegistered);
    };

    api.delete_runner(&repo, &token, runner.id)
        .await
        .inspect_err(|e| error!(error = %e, runner_id = runner.id, %repo, "error deleting runner"))?;
    info!(instance_id, runner_id = runner.id, %repo, "GitHub self-hosted runner removed");

    Ok(Deregistration::Removed {
        runner_id: runner.id,
    })
}
