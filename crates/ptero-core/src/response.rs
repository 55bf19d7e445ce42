//! Response validation.
//!
//! [`validate`] is the single place status codes are interpreted. Every
//! resource operation routes its response through it.

use crate::error::{Error, PanelErrors, Result};
use crate::transport::PanelResponse;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Check the status of a response.
///
/// - 200, 201 and 202 return the body bytes unchanged.
/// - 204 returns `None` whatever the body holds.
/// - Anything else decodes the body as a [`PanelErrors`] document.
///
/// # Errors
///
/// Returns [`Error::Api`] with the decoded document for non-success statuses,
/// or [`Error::DecodeError`] if that document cannot be decoded.
pub fn validate(response: PanelResponse) -> Result<Option<Vec<u8>>> {
    match response.status {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(Some(response.body)),
        StatusCode::NO_CONTENT => Ok(None),
        status => {
            let errors: PanelErrors = serde_json::from_slice(&response.body).map_err(|err| {
                Error::DecodeError(format!(
                    "Failed to decode panel error document for status {status}: {err}"
                ))
            })?;
            debug!(status = status.as_u16(), %errors, "panel returned an error");
            Err(Error::Api {
                status: status.as_u16(),
                errors,
            })
        }
    }
}

/// Decode a validated success body.
///
/// # Errors
///
/// Returns [`Error::DecodeError`] if the body is absent or does not match `T`.
pub fn decode<T: DeserializeOwned>(body: Option<Vec<u8>>) -> Result<T> {
    let body = body.ok_or_else(|| {
        Error::DecodeError("expected a response body but the panel sent none".to_string())
    })?;
    serde_json::from_slice(&body).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    #[test]
    fn success_statuses_return_exact_body() {
        for status in [StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED] {
            let body = br#"{"attributes":{"id":1}}"#.to_vec();
            let result = validate(PanelResponse::new(status, body.clone())).unwrap();
            assert_eq!(result, Some(body));
        }
    }

    #[test]
    fn no_content_ignores_body() {
        let result = validate(PanelResponse::new(StatusCode::NO_CONTENT, "ignored")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn error_status_decodes_panel_errors() {
        let body = r#"{"errors":[{"code":"NotFoundHttpException","status":"404","detail":"The requested resource could not be found on the server."}]}"#;
        let err = validate(PanelResponse::new(StatusCode::NOT_FOUND, body)).unwrap_err();

        match err {
            Error::Api { status, errors } => {
                assert_eq!(status, 404);
                assert!(errors.has_code("NotFoundHttpException"));
                assert_eq!(errors.errors[0].status, "404");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_success_codes_are_errors() {
        let err = validate(PanelResponse::new(StatusCode::RESET_CONTENT, r#"{"errors":[]}"#))
            .unwrap_err();
        assert_eq!(err.status(), Some(205));
    }

    #[test]
    fn error_status_with_invalid_json_is_decode_error() {
        let err = validate(PanelResponse::new(
            StatusCode::BAD_GATEWAY,
            "<html>Bad Gateway</html>",
        ))
        .unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[test]
    fn decode_record() {
        #[derive(serde::Deserialize)]
        struct Thing {
            id: u64,
        }

        let record: Record<Thing> = decode(Some(br#"{"attributes":{"id":7}}"#.to_vec())).unwrap();
        assert_eq!(record.attributes.id, 7);
    }

    #[test]
    fn decode_missing_body_is_decode_error() {
        let err = decode::<serde_json::Value>(None).unwrap_err();
        assert!(matches!(err, Error::DecodeError(_)));
    }
}
