//! Error classification for the AI backend.
//!
//! Both AI endpoints report failures the same way: a non-2xx status, or a
//! 2xx body carrying an `error` field. The session layer needs three of
//! those cases told apart (authentication, exhausted credits, and
//! everything else) because the UI reacts differently to each.

use serde::Deserialize;
use tinta_core::TintaError;

/// Error body shape shared by both AI endpoints.
#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Extracts the server's error message from a raw error body, falling back
/// to the body text itself when it is not the expected JSON shape.
pub(crate) fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error)
        .unwrap_or_else(|_| body.to_string())
}

/// Maps a failed AI call to the error variant the UI keys off.
///
/// - 401/403 mean the caller is not (or no longer) authenticated;
/// - 402, or a message mentioning credits, means the account balance is
///   exhausted and the user should be sent to purchase credits;
/// - anything else is a recoverable remote failure.
pub(crate) fn classify_remote_failure(status: Option<u16>, message: String) -> TintaError {
    match status {
        Some(401) | Some(403) => return TintaError::Auth(message),
        Some(402) => return TintaError::InsufficientCredits(message),
        _ => {}
    }

    let lowered = message.to_lowercase();
    if lowered.contains("credit") || lowered.contains("crédito") {
        TintaError::InsufficientCredits(message)
    } else {
        TintaError::Remote(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert!(classify_remote_failure(Some(401), "Unauthorized".into()).is_auth());
        assert!(classify_remote_failure(Some(403), "Forbidden".into()).is_auth());
    }

    #[test]
    fn test_credit_status_and_message() {
        assert!(
            classify_remote_failure(Some(402), "Payment required".into())
                .is_insufficient_credits()
        );
        assert!(
            classify_remote_failure(Some(200), "Insufficient AI credits.".into())
                .is_insufficient_credits()
        );
        assert!(
            classify_remote_failure(None, "Créditos insuficientes".into())
                .is_insufficient_credits()
        );
    }

    #[test]
    fn test_everything_else_is_remote() {
        assert!(classify_remote_failure(Some(500), "boom".into()).is_remote());
        assert!(classify_remote_failure(None, "connection reset".into()).is_remote());
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message("{\"error\":\"Insufficient AI credits.\"}"),
            "Insufficient AI credits."
        );
        assert_eq!(extract_error_message("<html>502</html>"), "<html>502</html>");
    }
}
