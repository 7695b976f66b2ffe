//! Batch file parsing
//!
//! A batch file is a JSON array of `{"tool", "parameters", "confidence"}`
//! objects. Ids and states are assigned on load.

use toolflow_domain::InvocationRequest;

/// Parse a batch from JSON text.
pub fn parse_batch(json: &str) -> Result<Vec<InvocationRequest>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolflow_domain::InvocationState;

    #[test]
    fn test_parse_batch() {
        let batch = parse_batch(
            r#"[
                {"tool": "search", "parameters": {"keyword": "lamp", "limit": 3}, "confidence": 0.9},
                {"tool": "add_to_order"}
            ]"#,
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].tool_name, "search");
        assert_eq!(batch[0].get_param("limit"), Some(&serde_json::json!(3)));
        assert_eq!(batch[0].confidence, 0.9);
        assert_eq!(batch[1].confidence, 1.0);
        assert!(batch.iter().all(|r| r.state == InvocationState::Pending));
        assert_ne!(batch[0].id, batch[1].id);
    }

    #[test]
    fn test_reject_non_array() {
        assert!(parse_batch(r#"{"tool": "search"}"#).is_err());
    }
}
