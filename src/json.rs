//! JSON decoding with path-aware error messages.

use serde::de::DeserializeOwned;

/// Maximum number of body characters echoed into error messages and logs.
const MAX_BODY_ECHO: usize = 500;

/// Decode `body` into `T`, reporting the JSON path of the first mismatch.
pub fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, String> {
    let mut deserializer = serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::debug!("{what} body START:\n\n{}\n\nbody END", truncate(body));
        format!("Error parsing {what}: path={} error={}", e.path(), e.inner())
    })
}

/// First [`MAX_BODY_ECHO`] characters of `body`.
pub fn truncate(body: &str) -> String {
    let mut out: String = body.chars().take(MAX_BODY_ECHO).collect();
    if body.chars().nth(MAX_BODY_ECHO).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Doc {
        #[allow(dead_code)]
        prefixes: Vec<String>,
    }

    #[test]
    fn test_decode_reports_path() {
        let err = decode::<Doc>(r#"{"prefixes": ["1.2.3.0/24", 7]}"#, "range list").unwrap_err();
        assert!(err.contains("prefixes[1]"), "{err}");
        assert!(err.starts_with("Error parsing range list"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short"), "short");
        let long = "x".repeat(MAX_BODY_ECHO + 10);
        assert_eq!(truncate(&long).len(), MAX_BODY_ECHO + 3);
    }
}
