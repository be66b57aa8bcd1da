use super::{Notifier, StructuralOutcome};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::counter;
use serde::Serialize;

pub const NOT_FOUND_MESSAGE: &str = "resource not found";
pub const FORBIDDEN_MESSAGE: &str = "you do not have permission to perform this operation";

/// The single canonical result of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Created(T),
    NoContent,
    ValidationFailure(Vec<String>),
    NotFound,
    Forbidden,
}

impl<T> Outcome<T> {
    /// Promote a plain success to `Created`; other outcomes pass through.
    pub fn created(self) -> Self {
        match self {
            Outcome::Success(body) => Outcome::Created(body),
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::Created(_) => "created",
            Outcome::NoContent => "no_content",
            Outcome::ValidationFailure(_) => "validation_failure",
            Outcome::NotFound => "not_found",
            Outcome::Forbidden => "forbidden",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Success(_) => StatusCode::OK,
            Outcome::Created(_) => StatusCode::CREATED,
            Outcome::NoContent => StatusCode::NO_CONTENT,
            Outcome::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            Outcome::NotFound => StatusCode::NOT_FOUND,
            Outcome::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

/// Decide the outcome of a request that returns a body.
///
/// Precedence: structural failure, then business notifications, then a
/// missing payload (not found), then success.
pub fn shape<T>(
    structural: &StructuralOutcome,
    notifier: &Notifier,
    payload: Option<T>,
) -> Outcome<T> {
    if let Some(failure) = failure(structural, notifier) {
        return failure;
    }
    match payload {
        Some(body) => Outcome::Success(body),
        None => Outcome::NotFound,
    }
}

/// Decide the outcome of an operation with no natural body, e.g. deletion.
pub fn shape_empty(structural: &StructuralOutcome, notifier: &Notifier) -> Outcome<()> {
    failure(structural, notifier).unwrap_or(Outcome::NoContent)
}

fn failure<T>(structural: &StructuralOutcome, notifier: &Notifier) -> Option<Outcome<T>> {
    if !structural.is_valid() {
        return Some(Outcome::ValidationFailure(structural.errors().to_vec()));
    }
    if notifier.has_notifications() {
        return Some(Outcome::ValidationFailure(notifier.messages()));
    }
    None
}

#[derive(Serialize)]
struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        counter!("http_outcomes_total", "outcome" => self.kind()).increment(1);
        let status = self.status();

        let envelope = match self {
            Outcome::Success(body) | Outcome::Created(body) => Envelope {
                success: true,
                data: Some(body),
                errors: Vec::new(),
            },
            Outcome::NoContent => return status.into_response(),
            Outcome::ValidationFailure(errors) => Envelope {
                success: false,
                data: None,
                errors,
            },
            Outcome::NotFound => Envelope {
                success: false,
                data: None,
                errors: vec![NOT_FOUND_MESSAGE.to_string()],
            },
            Outcome::Forbidden => Envelope {
                success: false,
                data: None,
                errors: vec![FORBIDDEN_MESSAGE.to_string()],
            },
        };

        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structural_failure() -> StructuralOutcome {
        StructuralOutcome::invalid(vec!["body is malformed".into()])
    }

    fn notified() -> Notifier {
        let mut notifier = Notifier::new();
        notifier.notify("name is required");
        notifier.notify("price must be greater than zero");
        notifier
    }

    #[test]
    fn structural_failure_wins_over_everything() {
        let outcome = shape(&structural_failure(), &notified(), Some(1));
        assert_eq!(
            outcome,
            Outcome::ValidationFailure(vec!["body is malformed".into()])
        );

        let outcome = shape_empty(&structural_failure(), &notified());
        assert_eq!(outcome.kind(), "validation_failure");
    }

    #[test]
    fn notifications_win_over_missing_payload() {
        let outcome = shape::<i32>(&StructuralOutcome::Valid, &notified(), None);
        assert_eq!(
            outcome,
            Outcome::ValidationFailure(vec![
                "name is required".into(),
                "price must be greater than zero".into()
            ])
        );
    }

    #[test]
    fn notifications_win_over_present_payload() {
        let outcome = shape(&StructuralOutcome::Valid, &notified(), Some("body"));
        assert_eq!(outcome.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_payload_is_not_found() {
        let outcome = shape::<i32>(&StructuralOutcome::Valid, &Notifier::new(), None);
        assert_eq!(outcome, Outcome::NotFound);
        assert_eq!(outcome.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn clean_request_succeeds() {
        let outcome = shape(&StructuralOutcome::Valid, &Notifier::new(), Some(7));
        assert_eq!(outcome, Outcome::Success(7));
        assert_eq!(outcome.created(), Outcome::Created(7));

        let outcome = shape_empty(&StructuralOutcome::Valid, &Notifier::new());
        assert_eq!(outcome, Outcome::NoContent);
        assert_eq!(outcome.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn created_does_not_mask_failures() {
        let outcome = shape::<i32>(&StructuralOutcome::Valid, &notified(), Some(1)).created();
        assert_eq!(outcome.kind(), "validation_failure");
    }

    #[test]
    fn failure_envelope_lists_errors() {
        let response = Outcome::<()>::ValidationFailure(vec!["a".into(), "b".into()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Outcome::<()>::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
