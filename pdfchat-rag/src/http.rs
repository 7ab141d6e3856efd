//! Shared JSON-over-HTTP plumbing for the hosted backends.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Send a request and decode a JSON response body.
///
/// Non-success statuses are reported with the API's own error message when
/// the body carries one (`{"error": {"message": ...}}` or `{"error": "..."}`),
/// falling back to the raw body.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> std::result::Result<T, String> {
    let response = request.send().await.map_err(|e| format!("request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("API returned {status}: {}", error_detail(&body)));
    }

    response.json::<T>().await.map_err(|e| format!("failed to parse response: {e}"))
}

fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    match value.get("error") {
        Some(Value::String(message)) => message.clone(),
        Some(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_nested_error_message() {
        let body =
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_detail(body), "API key not valid");
    }

    #[test]
    fn extracts_flat_error_message() {
        assert_eq!(error_detail(r#"{"error":"model not found"}"#), "model not found");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }
}
