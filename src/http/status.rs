//! Human-readable classification of failed HTTP responses.

use reqwest::StatusCode;

/// Describe a non-success status in terms of what went wrong with the
/// release download.
pub fn describe_status(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => {
            "release archive not found (HTTP 404); check the version string".to_string()
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("access denied (HTTP {})", status.as_u16())
        }
        StatusCode::TOO_MANY_REQUESTS => "rate limited (HTTP 429); try again later".to_string(),
        s if s.is_server_error() => format!("server error (HTTP {})", s.as_u16()),
        s => format!("unexpected HTTP status {}", s.as_u16()),
    }
}

/// Describe a transport-level failure (no response received).
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {}", error)
    } else if error.is_connect() {
        format!("could not connect: {}", error)
    } else {
        format!("request failed: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_not_found() {
        let msg = describe_status(StatusCode::NOT_FOUND);
        assert!(msg.contains("not found"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_describe_auth() {
        assert!(describe_status(StatusCode::UNAUTHORIZED).contains("401"));
        assert!(describe_status(StatusCode::FORBIDDEN).contains("access denied"));
    }

    #[test]
    fn test_describe_rate_limit() {
        assert!(describe_status(StatusCode::TOO_MANY_REQUESTS).contains("rate limited"));
    }

    #[test]
    fn test_describe_server_error() {
        assert_eq!(
            describe_status(StatusCode::BAD_GATEWAY),
            "server error (HTTP 502)"
        );
    }

    #[test]
    fn test_describe_other_client_error() {
        assert_eq!(
            describe_status(StatusCode::GONE),
            "unexpected HTTP status 410"
        );
    }
}
