use crate::error::AttributionError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Decoded metrics response.
///
/// Only `URL` is mandatory. A missing `is_organic` reads as `false`; every
/// other string-valued field rides along as a routing parameter, in stable
/// key order. Non-string extras are dropped, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsResponse {
    pub is_organic: bool,
    pub url: String,
    pub params: BTreeMap<String, String>,
}

impl MetricsResponse {
    pub fn parse(body: &str) -> Result<Self, AttributionError> {
        if body.trim().is_empty() {
            return Err(AttributionError::EmptyBody);
        }

        let value: Value = serde_json::from_str(body)
            .map_err(|e| AttributionError::MalformedJson(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| AttributionError::MalformedJson("top level is not an object".into()))?;

        let url = object
            .get("URL")
            .and_then(Value::as_str)
            .ok_or(AttributionError::MissingUrl)?
            .to_string();
        let is_organic = object
            .get("is_organic")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let params = object
            .iter()
            .filter(|(key, _)| key.as_str() != "URL" && key.as_str() != "is_organic")
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
            .collect();

        Ok(Self {
            is_organic,
            url,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_response() {
        let body = r#"{
            "is_organic": false,
            "URL": "https://x.test/go",
            "sub_id_2": "42",
            "foo": "bar"
        }"#;

        let response = MetricsResponse::parse(body).expect("parse");
        assert!(!response.is_organic);
        assert_eq!(response.url, "https://x.test/go");
        assert_eq!(response.params.get("sub_id_2").map(String::as_str), Some("42"));
        assert_eq!(response.params.get("foo").map(String::as_str), Some("bar"));
    }

    #[test]
    fn empty_body_is_distinct_error() {
        assert!(matches!(
            MetricsResponse::parse("   "),
            Err(AttributionError::EmptyBody)
        ));
    }

    #[test]
    fn non_json_body_is_malformed() {
        assert!(matches!(
            MetricsResponse::parse("<html>nope</html>"),
            Err(AttributionError::MalformedJson(_))
        ));
    }

    #[test]
    fn non_object_body_is_malformed() {
        assert!(matches!(
            MetricsResponse::parse("[1, 2, 3]"),
            Err(AttributionError::MalformedJson(_))
        ));
    }

    #[test]
    fn missing_url_is_distinct_error() {
        assert!(matches!(
            MetricsResponse::parse(r#"{"is_organic": true}"#),
            Err(AttributionError::MissingUrl)
        ));
    }

    #[test]
    fn missing_is_organic_defaults_to_false() {
        let response = MetricsResponse::parse(r#"{"URL": "https://x.test"}"#).expect("parse");
        assert!(!response.is_organic);
    }

    #[test]
    fn non_string_extras_are_dropped() {
        let body = r#"{"URL": "https://x.test", "count": 3, "nested": {"a": 1}, "ok": "yes"}"#;
        let response = MetricsResponse::parse(body).expect("parse");
        assert_eq!(response.params.len(), 1);
        assert_eq!(response.params.get("ok").map(String::as_str), Some("yes"));
    }

    #[test]
    fn params_iterate_in_key_order() {
        let body = r#"{"URL": "https://x.test", "z": "last", "a": "first", "m": "mid"}"#;
        let response = MetricsResponse::parse(body).expect("parse");
        let keys: Vec<&str> = response.params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "m", "z"]);
    }
}
