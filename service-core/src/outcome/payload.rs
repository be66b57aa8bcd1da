use super::{Notifier, StructuralOutcome, shape};
use axum::{
    Json,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body plus its structural validation outcome.
///
/// Unlike a rejecting extractor, `validator` failures do not stop the
/// request: the handler receives them in `structural` and hands them to the
/// shaper. Only a body that cannot be deserialized at all is rejected, and
/// that rejection is itself produced by the shaper so callers see one failure
/// contract.
pub struct Payload<T> {
    pub body: T,
    pub structural: StructuralOutcome,
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::info!(error = %rejection.body_text(), "Rejected malformed request body");
                let structural = StructuralOutcome::invalid(vec![rejection.body_text()]);
                shape::<()>(&structural, &Notifier::new(), None).into_response()
            })?;

        let structural = StructuralOutcome::from(body.validate());
        Ok(Payload { body, structural })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{self, StatusCode},
    };
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(length(max = 4, message = "name is too long"))]
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn well_formed_body_carries_structural_errors() {
        let payload = Payload::<Sample>::from_request(json_request(r#"{"name":"too long"}"#), &())
            .await
            .ok()
            .unwrap();

        assert_eq!(payload.body.name, "too long");
        assert_eq!(payload.structural.errors(), &["name is too long".to_string()]);
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_as_validation_failure() {
        let rejection = Payload::<Sample>::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }
}
