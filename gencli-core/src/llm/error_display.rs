//! Turning capability errors into something a user can act on.

use super::LLMError;
use console::style;

const NETWORK_MARKERS: &[&str] = &[
    "network",
    "timed out",
    "timeout",
    "connection",
    "dns",
    "resolve",
    "unreachable",
    "econnrefused",
    "enotfound",
];

const CREDENTIAL_MARKERS: &[&str] = &[
    "authentication",
    "api key",
    "api_key",
    "permission",
    "unauthorized",
    "forbidden",
    "401",
    "403",
];

/// Remediation hint for a failed model call, chosen from the error text.
pub fn error_hint(error: &LLMError) -> &'static str {
    if matches!(error, LLMError::RateLimit) {
        return "The API quota was exceeded. Wait a moment and try again.";
    }
    let message = error.to_string().to_lowercase();
    if NETWORK_MARKERS.iter().any(|marker| message.contains(marker)) {
        "Check your internet connection and try again."
    } else if CREDENTIAL_MARKERS.iter().any(|marker| message.contains(marker)) {
        "Check that GEMINI_API_KEY is set to a valid key (see https://aistudio.google.com/app/apikey)."
    } else {
        "The model request failed. Try again, or switch models with `set model <name>`."
    }
}

/// `gemini <error>` with the provider name highlighted.
pub fn format_llm_error(provider: &str, error: &LLMError) -> String {
    format!("{} {}", style(provider).blue(), style(error.to_string()).red())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_get_connection_hint() {
        let hint = error_hint(&LLMError::Network("error sending request: connection refused".into()));
        assert!(hint.contains("internet connection"));
        assert!(error_hint(&LLMError::Timeout(30)).contains("internet connection"));
    }

    #[test]
    fn credential_errors_get_key_hint() {
        let hint = error_hint(&LLMError::Authentication("HTTP 403 Forbidden".into()));
        assert!(hint.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn other_errors_get_generic_hint() {
        let hint = error_hint(&LLMError::Provider("HTTP 500: boom".into()));
        assert!(hint.contains("Try again"));
        let formatted = format_llm_error("gemini", &LLMError::RateLimit);
        assert!(formatted.contains("Rate limit"));
    }
}
