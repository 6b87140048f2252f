//! Classification of provider failures.
//!
//! rig reports HTTP and provider failures as strings wrapped in its own error
//! enums. The retry policy and the user-facing messages only care about the
//! broad category, which is recovered from the message text.

use std::fmt;

use quizgen_core::{Error, ErrorKind};

/// Converts a provider failure into a classified core error.
pub fn classify_provider_error(provider: &str, error: impl fmt::Display) -> Error {
    let message = error.to_string();
    let kind = classify_message(&message);

    tracing::debug!(
        target: super::TRACING_TARGET,
        provider,
        kind = kind.as_ref(),
        error = %message,
        "Provider call failed"
    );

    Error::new(kind).with_message(format!("{provider}: {message}"))
}

fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if mentions(&["timed out", "timeout", "deadline exceeded"]) || has_status(&lower, &[408, 504])
    {
        ErrorKind::Timeout
    } else if mentions(&["rate limit", "rate_limit", "too many requests", "quota", "resource_exhausted"])
        || has_status(&lower, &[429])
    {
        ErrorKind::RateLimited
    } else if mentions(&[
        "api key",
        "api_key",
        "apikey",
        "unauthorized",
        "unauthenticated",
        "invalid authentication",
    ]) || has_status(&lower, &[401])
    {
        ErrorKind::Authentication
    } else if mentions(&["forbidden", "permission denied", "permission_denied"])
        || has_status(&lower, &[403])
    {
        ErrorKind::Authorization
    } else if mentions(&["unavailable", "overloaded", "bad gateway", "internal server error"])
        || has_status(&lower, &[500, 502, 503])
    {
        ErrorKind::ServiceUnavailable
    } else if mentions(&["error sending request", "connection", "connect", "dns", "network"]) {
        ErrorKind::NetworkError
    } else if mentions(&["json", "deserialize", "decode"]) {
        ErrorKind::Serialization
    } else {
        ErrorKind::ExternalError
    }
}

/// True if any whole number token in `text` equals one of `codes`.
fn has_status(text: &str, codes: &[u16]) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 3)
        .filter_map(|token| token.parse::<u16>().ok())
        .any(|code| codes.contains(&code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_authentication_failures() {
        assert_eq!(
            classify_message("HttpError: 401 Unauthorized"),
            ErrorKind::Authentication
        );
        assert_eq!(
            classify_message("ProviderError: API key not valid. Please pass a valid API key."),
            ErrorKind::Authentication
        );
    }

    #[test]
    fn recognizes_rate_limits() {
        assert_eq!(
            classify_message("ProviderError: status 429, Resource has been exhausted (e.g. check quota)."),
            ErrorKind::RateLimited
        );
    }

    #[test]
    fn recognizes_transient_server_failures() {
        assert_eq!(
            classify_message("ProviderError: 503 Service Unavailable"),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            classify_message("HttpError: error sending request for url"),
            ErrorKind::NetworkError
        );
        assert_eq!(classify_message("operation timed out"), ErrorKind::Timeout);
    }

    #[test]
    fn status_codes_must_be_whole_tokens() {
        assert!(!has_status("used 5000 tokens", &[500]));
        assert!(has_status("status: 500", &[500]));
        assert_eq!(
            classify_message("context has 15003 tokens"),
            ErrorKind::ExternalError
        );
    }

    #[test]
    fn message_names_the_provider() {
        let err = classify_provider_error("gemini", "401 Unauthorized");
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "authentication: gemini: 401 Unauthorized");
    }
}
