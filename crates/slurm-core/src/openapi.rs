use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SpecError;
use crate::validation::validate_document;
use crate::version::detect_version;

/// `type` is usually a single name, but some documents list several
/// (`["string", "null"]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeDecl {
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeDecl::Single(name) => Some(name.as_str()),
            TypeDecl::Multiple(names) => names
                .iter()
                .map(String::as_str)
                .find(|name| *name != "null"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Flag(bool),
    Schema(Box<SchemaNode>),
}

impl AdditionalProperties {
    pub fn schema(&self) -> Option<&SchemaNode> {
        match self {
            AdditionalProperties::Flag(_) => None,
            AdditionalProperties::Schema(node) => Some(node),
        }
    }
}

/// One node of a component schema graph: an object with properties, an
/// array, an enum-constrained primitive, a plain primitive or a `$ref`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<TypeDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn type_name(&self) -> Option<&str> {
        self.type_.as_ref().and_then(TypeDecl::primary)
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.type_name() == Some(name)
    }

    /// Final path segment of `$ref`, i.e. the referenced schema name.
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|r| r.rsplit('/').next().unwrap_or(r))
    }

    /// Enum members as strings; non-string members keep their JSON spelling.
    pub fn enum_labels(&self) -> Option<Vec<String>> {
        self.enum_values.as_ref().map(|values| {
            values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
    }

    /// First line of the description, or an empty string.
    pub fn summary(&self) -> &str {
        self.description
            .as_deref()
            .and_then(|d| d.lines().next())
            .unwrap_or("")
    }

    pub fn collect_refs(&self, found: &mut BTreeSet<String>) {
        if let Some(name) = self.ref_name() {
            found.insert(name.to_string());
        }
        for prop in self.properties.values() {
            prop.collect_refs(found);
        }
        if let Some(items) = &self.items {
            items.collect_refs(found);
        }
        if let Some(extra) = self.additional_properties.as_ref().and_then(|a| a.schema()) {
            extra.collect_refs(found);
        }
        for node in self.all_of.iter().chain(&self.one_of).chain(&self.any_of) {
            node.collect_refs(found);
        }
    }

    pub fn refs(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.collect_refs(&mut found);
        found
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// A validated document: its `info` block and the `components.schemas` map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    pub info: Option<Info>,
    pub schemas: BTreeMap<String, SchemaNode>,
    pub warnings: Vec<String>,
}

impl SchemaDocument {
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&raw, &path.display().to_string())
    }

    pub fn parse(raw: &str, source_name: &str) -> Result<Self, SpecError> {
        let value: Value = serde_json::from_str(raw).map_err(|source| SpecError::Malformed {
            source_name: source_name.to_string(),
            source,
        })?;

        Self::from_value(value, source_name)
    }

    pub fn from_value(mut value: Value, source_name: &str) -> Result<Self, SpecError> {
        let warnings = validate_document(&value, source_name)?;

        let info = match value.get("info") {
            Some(info) => serde_json::from_value(info.clone()).ok(),
            None => None,
        };

        let schemas = value
            .pointer_mut("/components/schemas")
            .map(Value::take)
            .unwrap_or_default();
        let schemas = serde_json::from_value(schemas).map_err(|source| SpecError::Malformed {
            source_name: source_name.to_string(),
            source,
        })?;

        tracing::debug!(source = source_name, "schema document parsed");

        Ok(Self {
            info,
            schemas,
            warnings,
        })
    }

    pub fn schema(&self, name: &str) -> Option<&SchemaNode> {
        self.schemas.get(name)
    }

    pub fn declared_version(&self) -> Option<&str> {
        self.info.as_ref().and_then(|i| i.version.as_deref())
    }

    /// Version token of the first versioned schema name.
    pub fn detected_version(&self) -> Option<String> {
        detect_version(self.schemas.keys())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{SchemaDocument, SchemaNode};
    use crate::errors::SpecError;

    fn node(value: serde_json::Value) -> SchemaNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn ref_name_is_last_path_segment() {
        let n = node(json!({"$ref": "#/components/schemas/v0.0.44_node"}));

        assert_eq!(n.ref_name(), Some("v0.0.44_node"));
    }

    #[test]
    fn collects_refs_from_properties_and_items() {
        let n = node(json!({
            "properties": {
                "account": {"$ref": "#/components/schemas/v0.0.44_account"},
                "users": {"type": "array", "items": {"$ref": "#/components/schemas/v0.0.44_user"}},
                "labels": {"type": "object", "additionalProperties": {"$ref": "#/components/schemas/v0.0.44_label"}}
            }
        }));

        assert_eq!(
            n.refs().into_iter().collect::<Vec<_>>(),
            vec!["v0.0.44_account", "v0.0.44_label", "v0.0.44_user"]
        );
    }

    #[test]
    fn no_refs_on_plain_primitive() {
        let n = node(json!({"type": "string", "description": "A simple string"}));

        assert!(n.refs().is_empty());
    }

    #[test]
    fn multiple_types_pick_first_non_null() {
        let n = node(json!({"type": ["null", "integer"]}));

        assert_eq!(n.type_name(), Some("integer"));
    }

    #[test]
    fn enum_labels_stringify_non_strings() {
        let n = node(json!({"type": "string", "enum": ["A", 2, true]}));

        assert_eq!(
            n.enum_labels(),
            Some(vec!["A".to_string(), "2".to_string(), "true".to_string()])
        );
    }

    #[test]
    fn summary_keeps_first_line() {
        let n = node(json!({"description": "first line\nsecond line"}));

        assert_eq!(n.summary(), "first line");
    }

    #[test]
    fn parse_rejects_malformed_json() {
        let err = SchemaDocument::parse("{not json", "broken.json").unwrap_err();

        assert!(matches!(err, SpecError::Malformed { .. }));
    }

    #[test]
    fn parse_reads_schemas_and_info() {
        let raw = json!({
            "info": {"title": "Slurm REST API", "version": "0.0.44"},
            "components": {"schemas": {
                "v0.0.44_widget": {"type": "object", "properties": {"name": {"type": "string"}}}
            }}
        })
        .to_string();

        let doc = SchemaDocument::parse(&raw, "spec.json").unwrap();

        assert_eq!(doc.declared_version(), Some("0.0.44"));
        assert_eq!(doc.detected_version(), Some("0.0.44".to_string()));
        assert_eq!(doc.schemas.len(), 1);
        assert!(doc.schema("v0.0.44_widget").is_some());
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn load_reads_from_disk_and_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slurm.json");
        let raw = json!({
            "components": {"schemas": {"v0.0.43_node": {"type": "object"}}}
        });
        std::fs::write(&path, raw.to_string()).unwrap();

        let doc = SchemaDocument::load(&path).unwrap();
        let missing = SchemaDocument::load(&dir.path().join("absent.json")).unwrap_err();

        assert_eq!(doc.detected_version(), Some("0.0.43".to_string()));
        assert_eq!(doc.declared_version(), None);
        assert_eq!(doc.warnings.len(), 1);
        assert!(matches!(missing, SpecError::Io { .. }));
    }
}
