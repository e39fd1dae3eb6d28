use serde::{Deserialize, Serialize};

/// Plain acknowledgement returned by mutations (`{"message": ..., "detail": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

/// Body of a non-2xx response.
///
/// `detail` is either a human-readable string or, for request validation
/// failures, a list of `{loc, msg, type}` items.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Extract the message a user should see, if the body carries one.
    pub fn parse(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        match parsed.detail? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            serde_json::Value::Array(items) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string),
            serde_json::Value::Null | serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_string() {
        assert_eq!(
            ErrorBody::parse(r#"{"detail": "Incorrect credentials"}"#).as_deref(),
            Some("Incorrect credentials")
        );
    }

    #[test]
    fn test_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "text"], "msg": "field required", "type": "missing"}]}"#;
        assert_eq!(ErrorBody::parse(body).as_deref(), Some("field required"));
    }

    #[test]
    fn test_missing_or_garbage_detail() {
        assert_eq!(ErrorBody::parse(r#"{"detail": null}"#), None);
        assert_eq!(ErrorBody::parse(r#"{"message": "x"}"#), None);
        assert_eq!(ErrorBody::parse("<html>Bad Gateway</html>"), None);
    }
}
