//! Deregisters a repository's GitHub self-hosted runner when the EC2
//! instance it ran on terminates.
//!
//! The lambda binary wires [`handler::RunnerCleanupHandler`] to SSM and the
//! GitHub REST API; everything below it is plain async code behind the
//! [`ssm::ParameterStore`] and [`github::RunnerApi`] traits.

pub mod config;
pub mod deregister;
pub mod error;
pub mod event;
pub mod github;
pub mod handler;
pub mod logging;
pub mod ssm;

#[cfg(test)]
mod testing;
