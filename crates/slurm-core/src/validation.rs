use serde_json::Value;

use crate::errors::ValidationError;
use crate::version::is_versioned_schema_name;

/// Checks the structural preconditions generation relies on.
///
/// Returns non-fatal warnings on success. All violated rules are collected
/// into a single [`ValidationError`].
pub fn validate_document(document: &Value, source_name: &str) -> Result<Vec<String>, ValidationError> {
    let fail = |violations: Vec<String>| ValidationError {
        source_name: source_name.to_string(),
        violations,
    };

    let Some(root) = document.as_object() else {
        return Err(fail(vec!["Root must be a JSON object".into()]));
    };

    let mut violations = Vec::new();
    let mut warnings = Vec::new();

    let schemas = match root.get("components") {
        None => {
            violations.push("Missing 'components' section".to_string());
            None
        }
        Some(components) => match components.as_object() {
            None => {
                violations.push("'components' must be an object".to_string());
                None
            }
            Some(components) => match components.get("schemas") {
                None => {
                    violations.push("Missing 'components.schemas' section".to_string());
                    None
                }
                Some(schemas) => match schemas.as_object() {
                    None => {
                        violations.push("'components.schemas' must be an object".to_string());
                        None
                    }
                    Some(schemas) if schemas.is_empty() => {
                        violations.push("'components.schemas' is empty".to_string());
                        None
                    }
                    Some(schemas) => Some(schemas),
                },
            },
        },
    };

    if !root.contains_key("info") {
        warnings.push("Missing 'info' section (version detection may fail)".to_string());
    }

    if let Some(schemas) = schemas {
        if !schemas.keys().any(|name| is_versioned_schema_name(name)) {
            violations.push(
                "No SLURM versioned schemas found (expected a v<version>_ prefix such as v0.0.44_)"
                    .to_string(),
            );
        }
    }

    if !violations.is_empty() {
        return Err(fail(violations));
    }

    for warning in &warnings {
        tracing::warn!(source = source_name, "{warning}");
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::validate_document;

    #[test]
    fn valid_document_passes() {
        let doc = json!({
            "info": {"version": "1.0"},
            "components": {"schemas": {"v0.0.44_test": {"type": "object"}}}
        });

        assert_eq!(validate_document(&doc, "test.json").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn root_must_be_object() {
        let err = validate_document(&json!([1, 2]), "test.json").unwrap_err();

        assert_eq!(err.violations, vec!["Root must be a JSON object".to_string()]);
    }

    #[test]
    fn missing_components_is_reported() {
        let err = validate_document(&json!({"info": {}}), "test.json").unwrap_err();

        assert!(err.to_string().contains("components"));
    }

    #[test]
    fn components_must_be_object() {
        let err = validate_document(&json!({"info": {}, "components": 3}), "test.json").unwrap_err();

        assert_eq!(err.violations, vec!["'components' must be an object".to_string()]);
    }

    #[test]
    fn schemas_must_be_mapping() {
        let doc = json!({"info": {}, "components": {"schemas": ["v0.0.44_a"]}});
        let err = validate_document(&doc, "test.json").unwrap_err();

        assert_eq!(err.violations, vec!["'components.schemas' must be an object".to_string()]);
    }

    #[test]
    fn empty_schemas_are_rejected() {
        let doc = json!({"info": {}, "components": {"schemas": {}}});
        let err = validate_document(&doc, "test.json").unwrap_err();

        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn unversioned_schemas_are_rejected() {
        let doc = json!({"info": {}, "components": {"schemas": {"job": {"type": "object"}}}});
        let err = validate_document(&doc, "test.json").unwrap_err();

        assert!(err.violations[0].starts_with("No SLURM versioned schemas found"));
    }

    #[test]
    fn missing_info_is_a_warning() {
        let doc = json!({"components": {"schemas": {"v0.0.44_test": {"type": "object"}}}});
        let warnings = validate_document(&doc, "test.json").unwrap();

        assert!(warnings.iter().any(|w| w.contains("info")));
    }
}
