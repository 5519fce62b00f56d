use std::future::Future;

use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::Client as SsmClient;
use aws_types::region::Region;
use tracing::{debug, error};

use crate::error::{CleanupError, Result};

/// Source of decrypted secrets, keyed by parameter name.
pub trait ParameterStore {
    fn get_parameter(&self, name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Parameter store backed by AWS Systems Manager.
#[derive(Clone)]
pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }

    /// Builds the SSM client once per cold start. An explicit region wins
    /// over the default provider chain (`AWS_REGION` inside Lambda).
    pub async fn load(region: Option<String>) -> Self {
        let region_provider =
            RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        Self::new(SsmClient::new(&sdk_config))
    }
}

impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        debug!(parameter = name, "fetching SSM parameter");
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                let err = CleanupError::CredentialFetch {
                    name: name.to_string(),
                    message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
                };
                error!(error = %err, "credential fetch failed");
                err
            })?;

        response
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| CleanupError::MissingParameterValue(name.to_string()))
    }
}
