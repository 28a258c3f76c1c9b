//! Screen flows: validation, the request, and what the user is told.
//!
//! Each flow is written against `CertificateApi` so that validation
//! failures provably never reach the network.
//!
//! - `login`: credentials → session
//! - `upload`: form → multipart upload, plus logout
//! - `listing`: owner/category/document → file descriptors

pub mod listing;
pub mod login;
pub mod upload;

use thiserror::Error;
use tracing::error;

use crate::api::ApiError;

/// Why a submission ended without success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Rejected locally; no request was made
    #[error("{0}")]
    Validation(String),

    /// The server answered with an error
    #[error("{0}")]
    Server(String),

    /// The request failed or its reply could not be read
    #[error("{0}")]
    Transport(String),

    /// The server accepted the request but local state could not be saved
    #[error("{0}")]
    Storage(String),

    #[error("A request is already in progress")]
    Busy,
}

impl FlowError {
    /// Map an API failure to what the user sees. A server-supplied `error`
    /// field is shown verbatim.
    pub fn from_api(err: &ApiError, rejected_fallback: &str, transport_fallback: &str) -> Self {
        error!(error = %err, "Request failed");
        if err.is_rejection() {
            FlowError::Server(err.server_message().unwrap_or(rejected_fallback).to_string())
        } else {
            FlowError::Transport(transport_fallback.to_string())
        }
    }
}

/// Single-shot submission state: `Idle → Submitting → Succeeded | Failed`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl SubmitState {
    /// Enter `Submitting`. Refused while a request is already in flight.
    pub fn begin(&mut self) -> Result<(), FlowError> {
        if self.is_submitting() {
            return Err(FlowError::Busy);
        }
        *self = SubmitState::Submitting;
        Ok(())
    }

    pub fn finish<T>(&mut self, outcome: &Result<T, FlowError>, success_message: impl FnOnce(&T) -> String) {
        *self = match outcome {
            Ok(value) => SubmitState::Succeeded(success_message(value)),
            Err(e) => SubmitState::Failed(e.to_string()),
        };
    }

    /// Record a failure that happened before any request (validation)
    pub fn fail(&mut self, err: &FlowError) {
        *self = SubmitState::Failed(err.to_string());
    }

    pub fn reset(&mut self) {
        *self = SubmitState::Idle;
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    pub fn success_message(&self) -> Option<&str> {
        match self {
            SubmitState::Succeeded(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}
