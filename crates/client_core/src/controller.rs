//! Conversion request controller: owns the input field, the single-slot result cache
//! and the request lifecycle for one panel.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use serde::Serialize;
use shared::error::{ErrorCode, CONNECTION_FAILURE_MESSAGE, EMPTY_INPUT_MESSAGE};
use tracing::debug;

use crate::{
    diagnostics::DiagnosticsSink,
    service::{ConversionService, ServiceFailure},
    validation::{validate, Validation},
};

/// Fixed tag logged once for every failed service call.
pub const FAILURE_LOG_TAG: &str = "API Error";
pub const RESULT_PREFIX: &str = "Roman numeral: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    ServerMessage(String),
    ConnectionFailure,
}

/// A classified, user-visible failure. Only the controller creates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    kind: ErrorKind,
}

impl ErrorInfo {
    fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    fn classify(failure: ServiceFailure) -> Self {
        match failure {
            ServiceFailure::Response { body, .. } => Self::new(ErrorKind::ServerMessage(body)),
            ServiceFailure::Transport(_) => Self::new(ErrorKind::ConnectionFailure),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            ErrorKind::EmptyInput => ErrorCode::EmptyInput,
            ErrorKind::ServerMessage(_) => ErrorCode::ServerMessage,
            ErrorKind::ConnectionFailure => ErrorCode::ConnectionFailure,
        }
    }

    pub fn message(&self) -> &str {
        match &self.kind {
            ErrorKind::EmptyInput => EMPTY_INPUT_MESSAGE,
            ErrorKind::ServerMessage(body) => body,
            ErrorKind::ConnectionFailure => CONNECTION_FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(ErrorInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Settled(Outcome),
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Settled(Outcome::Success(output)) => Some(output),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            Self::Settled(Outcome::Failure(info)) => Some(info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
}

/// Render-ready view of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub input: String,
    pub pending: bool,
    pub result_text: Option<String>,
    pub error_text: Option<String>,
    pub error_code: Option<ErrorCode>,
}

#[derive(Default)]
struct ControllerState {
    input: String,
    cache: Option<CacheEntry>,
    request: RequestState,
}

pub struct ConversionController {
    service: Arc<dyn ConversionService>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    state: Mutex<ControllerState>,
    generation: AtomicU64,
}

impl ConversionController {
    pub fn new(service: Arc<dyn ConversionService>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            service,
            diagnostics,
            state: Mutex::new(ControllerState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adopts `raw` as the current input if it validates. Rejected text is logged and
    /// dropped; the displayed result and error are left alone either way.
    pub fn on_input_changed(&self, raw: &str) -> Validation {
        let validation = validate(raw);
        match &validation {
            Validation::Accepted(value) => {
                self.lock_state().input.clone_from(value);
            }
            Validation::Rejected(reason) => {
                debug!(%reason, "input rejected");
                self.diagnostics.warn(&format!("Invalid input: {raw}"));
            }
        }
        validation
    }

    /// Converts the current input, answering from the cache when the input matches the
    /// last successful conversion. Returns the settled state.
    pub async fn submit(&self) -> RequestState {
        self.diagnostics.debug("Convert requested");

        let input = {
            let mut state = self.lock_state();

            if state.input.is_empty() {
                self.diagnostics.error("Empty input field");
                state.request = RequestState::Settled(Outcome::Failure(ErrorInfo::new(
                    ErrorKind::EmptyInput,
                )));
                return state.request.clone();
            }

            let cached = state
                .cache
                .as_ref()
                .filter(|entry| entry.key == state.input)
                .map(|entry| entry.value.clone());
            if let Some(value) = cached {
                self.diagnostics.debug("Same number as previous input");
                state.request = RequestState::Settled(Outcome::Success(value));
                return state.request.clone();
            }

            state.request = RequestState::Pending;
            state.input.clone()
        };

        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(generation, query = %input, "conversion request issued");
        self.diagnostics
            .info(&format!("Fetching result for number: {input}"));

        let outcome = self.service.convert(&input).await;

        let mut state = self.lock_state();
        match outcome {
            Ok(output) => {
                self.diagnostics
                    .info(&format!("Received result for number: {input}"));
                state.cache = Some(CacheEntry {
                    key: input,
                    value: output.clone(),
                });
                state.request = RequestState::Settled(Outcome::Success(output));
            }
            Err(failure) => {
                debug!(generation, %failure, "conversion request failed");
                self.diagnostics.error(FAILURE_LOG_TAG);
                state.request =
                    RequestState::Settled(Outcome::Failure(ErrorInfo::classify(failure)));
            }
        }
        state.request.clone()
    }

    pub fn input(&self) -> String {
        self.lock_state().input.clone()
    }

    pub fn request_state(&self) -> RequestState {
        self.lock_state().request.clone()
    }

    pub fn cache_entry(&self) -> Option<CacheEntry> {
        self.lock_state().cache.clone()
    }

    /// `Roman numeral: <value>`, present only for a non-empty successful result.
    pub fn result_text(&self) -> Option<String> {
        result_text(&self.lock_state().request)
    }

    pub fn error_text(&self) -> Option<String> {
        error_text(&self.lock_state().request)
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.lock_state();
        ControllerSnapshot {
            input: state.input.clone(),
            pending: state.request.is_pending(),
            result_text: result_text(&state.request),
            error_text: error_text(&state.request),
            error_code: state.request.error().map(ErrorInfo::code),
        }
    }
}

fn result_text(request: &RequestState) -> Option<String> {
    request
        .result()
        .filter(|output| !output.is_empty())
        .map(|output| format!("{RESULT_PREFIX}{output}"))
}

fn error_text(request: &RequestState) -> Option<String> {
    request
        .error()
        .map(ErrorInfo::message)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
