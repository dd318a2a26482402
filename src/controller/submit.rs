//! Submission states and failure classification.

use serde::Deserialize;

use crate::errors::ServiceError;
use crate::forms::FieldError;
use crate::notify::CONNECTION_FAILURE_MESSAGE;

/// HTTP status the backend uses for per-field validation failures.
pub const UNPROCESSABLE_ENTITY: u16 = 422;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    /// A create or update is in flight.
    Submitting,
    Succeeded,
    /// The last attempt failed; submitting again is allowed.
    Failed,
}

/// Result of one submit action.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// The record was persisted and the page redirected to its edit route.
    Saved(R),
    /// Client-side validation failed; nothing was sent.
    Invalid(Vec<FieldError>),
    Failed(SubmitFailure),
}

/// Holds [`SubmitState::Submitting`] while a dispatch is in flight. If the
/// dispatch future is dropped before completing, the state it replaced is
/// put back so the form can be submitted again.
pub(crate) struct DispatchGuard<'a> {
    state: &'a mut SubmitState,
    previous: SubmitState,
}

impl<'a> DispatchGuard<'a> {
    pub(crate) fn enter(state: &'a mut SubmitState) -> Self {
        let previous = std::mem::replace(state, SubmitState::Submitting);
        Self { state, previous }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if *self.state == SubmitState::Submitting {
            *self.state = self.previous;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// 422 carrying the backend's error list.
    Validation(Vec<String>),
    /// 422 whose body is not `{"errors": [...]}`.
    MalformedValidationBody { reason: String },
    /// Any other failure, with the HTTP status when there was a response.
    Transport { status: Option<u16> },
}

#[derive(Debug, Deserialize)]
struct ValidationErrorBody {
    errors: Vec<String>,
}

impl SubmitFailure {
    pub fn classify(error: &ServiceError) -> Self {
        if error.status() != Some(UNPROCESSABLE_ENTITY) {
            return SubmitFailure::Transport {
                status: error.status(),
            };
        }
        let body = error.body().unwrap_or("");
        match serde_json::from_str::<ValidationErrorBody>(body) {
            Ok(parsed) => SubmitFailure::Validation(parsed.errors),
            Err(err) => SubmitFailure::MalformedValidationBody {
                reason: err.to_string(),
            },
        }
    }

    /// Messages shown under the form.
    pub fn messages(&self) -> Vec<String> {
        match self {
            SubmitFailure::Validation(errors) => errors.clone(),
            SubmitFailure::MalformedValidationBody { .. } | SubmitFailure::Transport { .. } => {
                vec![CONNECTION_FAILURE_MESSAGE.to_string()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_dispatch_restores_previous_state() {
        let mut state = SubmitState::Failed;
        {
            let guard = DispatchGuard::enter(&mut state);
            assert_eq!(*guard.state, SubmitState::Submitting);
        }
        assert_eq!(state, SubmitState::Failed);
    }

    fn http(status: u16, body: Option<&str>) -> ServiceError {
        ServiceError::Http {
            status,
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn validation_body_is_parsed() {
        let failure = SubmitFailure::classify(&http(422, Some(r#"{"errors":["name is required"]}"#)));
        assert_eq!(
            failure,
            SubmitFailure::Validation(vec!["name is required".to_string()])
        );
        assert_eq!(failure.messages(), vec!["name is required".to_string()]);
    }

    #[test]
    fn malformed_validation_body_falls_back_to_generic_message() {
        for body in [None, Some("<html>"), Some(r#"{"errors":"name"}"#)] {
            let failure = SubmitFailure::classify(&http(422, body));
            assert!(matches!(
                failure,
                SubmitFailure::MalformedValidationBody { .. }
            ));
            assert_eq!(failure.messages(), vec![CONNECTION_FAILURE_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn other_failures_are_transport_failures() {
        assert_eq!(
            SubmitFailure::classify(&http(500, None)),
            SubmitFailure::Transport { status: Some(500) }
        );
        assert_eq!(
            SubmitFailure::classify(&ServiceError::Transport("reset".into())),
            SubmitFailure::Transport { status: None }
        );
    }
}
