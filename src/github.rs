use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Method};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{CleanupError, Result};

pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
pub const GITHUB_API_VERSION: &str = "2022-11-28";
const API_VERSION_HEADER: &str = "x-github-api-version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Runner {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunnerList {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub runners: Vec<Runner>,
}

/// The two runner endpoints the cleanup needs.
pub trait RunnerApi {
    fn list_runners(
        &self,
        repo: &RepoRef,
        token: &str,
    ) -> impl Future<Output = Result<RunnerList>> + Send;

    fn delete_runner(
        &self,
        repo: &RepoRef,
        token: &str,
        runner_id: u64,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn runners_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/actions/runners",
            self.base_url, repo.owner, repo.name
        )
    }

    pub fn runner_url(&self, repo: &RepoRef, runner_id: u64) -> String {
        format!("{}/{}", self.runners_url(repo), runner_id)
    }
}

impl RunnerApi for GitHubClient {
    async fn list_runners(&self, repo: &RepoRef, token: &str) -> Result<RunnerList> {
        let headers = github_headers(token, &repo.owner)?;
        let url = self.runners_url(repo);
        let body = get_body(&self.http, Method::GET, &url, headers)
            .await?
            .ok_or_else(|| CleanupError::UnexpectedResponse(format!("empty body from {url}")))?;

        serde_json::from_value(body).map_err(|e| {
            error!(error = %e, %url, "runner list has an unexpected shape");
            CleanupError::Decode(e)
        })
    }

    async fn delete_runner(&self, repo: &RepoRef, token: &str, runner_id: u64) -> Result<()> {
        let headers = github_headers(token, &repo.owner)?;
        let url = self.runner_url(repo, runner_id);
        get_body(&self.http, Method::DELETE, &url, headers).await?;
        Ok(())
    }
}

/// Headers every runner call carries. The owner doubles as the user agent.
pub fn github_headers(token: &str, owner: &str) -> Result<HeaderMap> {
    let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| CleanupError::InvalidHeader("Authorization".to_string()))?;
    authorization.set_sensitive(true);
    let user_agent = HeaderValue::from_str(owner)
        .map_err(|_| CleanupError::InvalidHeader("User-Agent".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
    headers.insert(AUTHORIZATION, authorization);
    headers.insert(API_VERSION_HEADER, HeaderValue::from_static(GITHUB_API_VERSION));
    headers.insert(USER_AGENT, user_agent);
    Ok(headers)
}

/// Sends one request and returns the JSON body, or `None` when the body is
/// empty. Transport failures and non-2xx statuses are errors.
pub async fn get_body(
    client: &Client,
    method: Method,
    url: &str,
    headers: HeaderMap,
) -> Result<Option<Value>> {
    debug!(%method, url, "sending request");
    let response = client
        .request(method.clone(), url)
        .headers(headers)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, %method, url, "HTTP request error");
            CleanupError::Transport(e)
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| {
        error!(error = %e, %method, url, "error reading response body");
        CleanupError::Transport(e)
    })?;

    if !status.is_success() {
        let err = CleanupError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body: text,
        };
        error!(error = %err, %method, "HTTP request failed");
        return Err(err);
    }

    if text.trim().is_empty() {
        debug!(status = status.as_u16(), url, "empty response body");
        return Ok(None);
    }

    let body: Value = serde_json::from_str(&text)?;
    debug!(status = status.as_u16(), url, %body, "response body");
    Ok(Some(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_runner_urls_under_the_repository() {
        let client = GitHubClient::new(Client::new(), "https://api.github.com/");
        let repo = RepoRef::new("acme", "portal-backend");

        assert_eq!(
            client.runners_url(&repo),
            "https://api.github.com/repos/acme/portal-backend/actions/runners"
        );
        assert_eq!(
            client.runner_url(&repo, 9),
            "https://api.github.com/repos/acme/portal-backend/actions/runners/9"
        );
    }

    #[test]
    fn headers_carry_token_version_and_owner() {
        let headers = github_headers("s3cret", "acme").unwrap();

        assert_eq!(headers[ACCEPT], GITHUB_ACCEPT);
        assert_eq!(headers[AUTHORIZATION], "Bearer s3cret");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[API_VERSION_HEADER], GITHUB_API_VERSION);
        assert_eq!(headers[USER_AGENT], "acme");
    }

    #[test]
    fn token_with_control_characters_is_rejected() {
        let err = github_headers("bad\ntoken", "acme").unwrap_err();
        assert!(matches!(err, CleanupError::InvalidHeader(name) if name == "Authorization"));
    }

    #[test]
    fn runner_list_ignores_extra_fields() {
        let list: RunnerList = serde_json::from_value(json!({
            "total_count": 2,
            "runners": [
                {"id": 9, "name": "i-0123", "os": "linux", "status": "offline", "busy": false},
                {"id": 10, "name": "i-9999", "labels": []}
            ]
        }))
        .unwrap();

        assert_eq!(list.total_count, Some(2));
        assert_eq!(
            list.runners,
            vec![
                Runner { id: 9, name: "i-0123".to_string() },
                Runner { id: 10, name: "i-9999".to_string() },
            ]
        );
    }

    #[test]
    fn runner_list_without_runners_field_fails_to_decode() {
        let result: std::result::Result<RunnerList, _> =
            serde_json::from_value(json!({"message": "Not Found"}));
        assert!(result.is_err());
    }
}
