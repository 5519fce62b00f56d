//! Recording fakes for the parameter store and the runner API.

use std::sync::Mutex;

use crate::error::{CleanupError, Result};
use crate::github::{RepoRef, Runner, RunnerApi, RunnerList};
use crate::ssm::ParameterStore;

pub struct FakeStore {
    token: Option<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ParameterStore for FakeStore {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        self.requested.lock().unwrap().push(name.to_string());
        self.token.clone().ok_or_else(|| CleanupError::CredentialFetch {
            name: name.to_string(),
            message: "ParameterNotFound".to_string(),
        })
    }
}

#[derive(Default)]
pub struct FakeApi {
    runners: Vec<Runner>,
    list_status: Option<u16>,
    delete_status: Option<u16>,
    list_calls: Mutex<usize>,
    deleted: Mutex<Vec<u64>>,
    tokens: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_runners(runners: Vec<Runner>) -> Self {
        Self {
            runners,
            ..Self::default()
        }
    }

    pub fn failing_list(status: u16) -> Self {
        Self {
            list_status: Some(status),
            ..Self::default()
        }
    }

    pub fn failing_delete(mut self, status: u16) -> Self {
        self.delete_status = Some(status);
        self
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn deleted(&self) -> Vec<u64> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

fn status_error(status: u16, url: String) -> CleanupError {
    CleanupError::HttpStatus {
        status,
        url,
        body: String::new(),
    }
}

impl RunnerApi for FakeApi {
    async fn list_runners(&self, repo: &RepoRef, token: &str) -> Result<RunnerList> {
        *self.list_calls.lock().unwrap() += 1;
        self.tokens.lock().unwrap().push(token.to_string());
        if let Some(status) = self.list_status {
            return Err(status_error(status, format!("{repo}/actions/runners")));
        }
        Ok(RunnerList {
            total_count: Some(self.runners.len() as u64),
            runners: self.runners.clone(),
        })
    }

    async fn delete_runner(&self, repo: &RepoRef, token: &str, runner_id: u64) -> Result<()> {
        self.deleted.lock().unwrap().push(runner_id);
        self.tokens.lock().unwrap().push(token.to_string());
        match self.delete_status {
            Some(status) => Err(status_error(
                status,
                format!("{repo}/actions/runners/{runner_id}"),
            )),
            None => Ok(()),
        }
    }
}
