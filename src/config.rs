use crate::error::{CleanupError, Result};
use crate::github::RepoRef;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Deployment-time settings, read once at cold start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub repository: String,
    pub owner: String,
    pub parameter_name: String,
    /// Region of the parameter when it is not the function's own region.
    pub parameter_region: Option<String>,
    pub api_base_url: String,
    /// Skip the workflow for events whose `detail-type` is not the expected
    /// one. Off by default: the check is only logged.
    pub enforce_detail_type: bool,
}

impl HandlerConfig {
    pub fn new(
        repository: impl Into<String>,
        owner: impl Into<String>,
        parameter_name: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            owner: owner.into(),
            parameter_name: parameter_name.into(),
            parameter_region: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            enforce_detail_type: false,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup` so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CleanupError::Configuration(format!("{key} must be configured")))
        };

        let mut config = Self::new(
            required("REPOSITORY")?,
            required("OWNER")?,
            required("PARAMETER_NAME")?,
        );

        config.parameter_region = lookup("PARAMETER_REGION")
            .map(|region| region.trim().to_string())
            .filter(|region| !region.is_empty());

        if let Some(url) = lookup("GITHUB_API_URL").filter(|url| !url.trim().is_empty()) {
            config = config.with_api_base_url(url.trim());
        }

        if let Some(flag) = lookup("ENFORCE_DETAIL_TYPE") {
            config.enforce_detail_type = parse_flag(&flag).ok_or_else(|| {
                CleanupError::Configuration(format!(
                    "ENFORCE_DETAIL_TYPE must be true or false, got '{flag}'"
                ))
            })?;
        }

        Ok(config)
    }

    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.owner, &self.repository)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" => Some(false),
        "1" | "true" | "yes" => Some(true),
        _ => None,
    }
}
