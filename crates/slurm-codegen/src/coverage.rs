use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use eyre::Context;
use itertools::Itertools;
use regex::Regex;
use slurm_core::SchemaDocument;

use crate::config::TypeConfig;
use crate::errors::CoverageError;
use crate::naming::file_name;

pub const COVERAGE_THRESHOLD: f64 = 95.0;

static JSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"json:"([^",]+)"#).expect("json tag pattern is valid"));

/// Wire names found in `json:"..."` struct tags, options stripped.
pub fn extract_wire_names(contents: &str) -> BTreeSet<String> {
    JSON_TAG
        .captures_iter(contents)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Generated file name -> schema name for the static work set.
pub fn coverage_mappings(config: &TypeConfig) -> BTreeMap<String, String> {
    config
        .base_schemas()
        .into_iter()
        .chain(config.auxiliary_schemas())
        .map(|(schema, type_name)| (file_name(&type_name), schema))
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnitCoverage {
    pub file_name: String,
    pub schema_name: String,
    pub matched: usize,
    pub total: usize,
    pub missing: Vec<String>,
}

impl UnitCoverage {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoverageReport {
    /// Sorted by coverage, best first.
    pub units: Vec<UnitCoverage>,
    pub skipped: Vec<String>,
}

impl CoverageReport {
    pub fn total_fields(&self) -> usize {
        self.units.iter().map(|u| u.total).sum()
    }

    pub fn matched_fields(&self) -> usize {
        self.units.iter().map(|u| u.matched).sum()
    }

    pub fn overall_percent(&self) -> f64 {
        match self.total_fields() {
            0 => 100.0,
            total => self.matched_fields() as f64 / total as f64 * 100.0,
        }
    }

    pub fn issues(&self) -> Vec<String> {
        self.units
            .iter()
            .filter(|u| !u.missing.is_empty())
            .map(|u| format!("{}: missing [{}]", u.file_name, u.missing.iter().join(", ")))
            .collect()
    }

    pub fn passes(&self, strict: bool) -> bool {
        self.check(strict).is_ok()
    }

    /// With `strict`, any unit missing a field fails regardless of the total.
    pub fn check(&self, strict: bool) -> Result<(), CoverageError> {
        let issues = self.issues().len();
        if strict && issues > 0 {
            return Err(CoverageError::MissingFields(issues));
        }

        let percent = self.overall_percent();
        if percent < COVERAGE_THRESHOLD {
            return Err(CoverageError::BelowThreshold {
                percent,
                threshold: COVERAGE_THRESHOLD,
            });
        }

        Ok(())
    }
}

pub fn verify_coverage(
    document: &SchemaDocument,
    types_dir: &Path,
    mappings: &BTreeMap<String, String>,
) -> eyre::Result<CoverageReport> {
    let mut report = CoverageReport::default();

    for (file, schema_name) in mappings {
        let path = types_dir.join(file);
        if !path.exists() {
            tracing::debug!(file = %file, "generated file not found");
            report.skipped.push(format!("{file}: not found"));
            continue;
        }
        let Some(schema) = document.schema(schema_name) else {
            tracing::debug!(file = %file, schema = %schema_name, "schema not in document");
            report.skipped.push(format!("{file}: schema {schema_name} not in document"));
            continue;
        };

        let contents = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let tags = extract_wire_names(&contents);

        let declared = schema.properties.keys().collect::<BTreeSet<_>>();
        let missing = declared
            .iter()
            .filter(|name| !tags.contains(name.as_str()))
            .map(|name| name.to_string())
            .collect::<Vec<_>>();

        report.units.push(UnitCoverage {
            file_name: file.clone(),
            schema_name: schema_name.clone(),
            matched: declared.len() - missing.len(),
            total: declared.len(),
            missing,
        });
    }

    report.units = report
        .units
        .into_iter()
        .sorted_by(|a, b| b.percent().total_cmp(&a.percent()))
        .collect();

    Ok(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_tag_names_without_options() {
        let contents = r#"
type Job struct {
	JobID *int32 `json:"job_id,omitempty"` // id
	Name string `json:"name"`
	Skip string `json:"-"`
}
"#;

        assert_eq!(
            extract_wire_names(contents).into_iter().collect::<Vec<_>>(),
            vec!["-", "job_id", "name"]
        );
    }

    #[test]
    fn mappings_cover_static_work_set() {
        let config = TypeConfig::defaults("0.0.44");

        let mappings = coverage_mappings(&config);

        assert_eq!(mappings.get("job.gen.go"), Some(&"v0.0.44_job_info".to_string()));
        assert_eq!(mappings.get("stepid.gen.go"), Some(&"v0.0.44_slurm_step_id".to_string()));
        assert_eq!(mappings.len(), 23);
    }

    #[test]
    fn reports_per_unit_coverage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("job.gen.go"),
            "type Job struct {\n\tName string `json:\"name\"`\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("node.gen.go"),
            "type Node struct {\n\tName string `json:\"name\"`\n}\n",
        )
        .unwrap();

        let raw = json!({
            "info": {"version": "0.0.44"},
            "components": {"schemas": {
                "v0.0.44_job_info": {"type": "object", "properties": {
                    "name": {"type": "string"}, "user": {"type": "string"}
                }},
                "v0.0.44_node": {"type": "object", "properties": {"name": {"type": "string"}}}
            }}
        });
        let document = SchemaDocument::from_value(raw, "spec.json").unwrap();
        let mappings = BTreeMap::from([
            ("job.gen.go".to_string(), "v0.0.44_job_info".to_string()),
            ("node.gen.go".to_string(), "v0.0.44_node".to_string()),
            ("qos.gen.go".to_string(), "v0.0.44_qos".to_string()),
        ]);

        let report = verify_coverage(&document, dir.path(), &mappings).unwrap();

        assert_eq!(report.units[0].file_name, "node.gen.go");
        assert_eq!(report.units[1].missing, vec!["user".to_string()]);
        assert_eq!(report.units[1].percent(), 50.0);
        assert_eq!(report.matched_fields(), 2);
        assert_eq!(report.total_fields(), 3);
        assert_eq!(report.skipped, vec!["qos.gen.go: not found".to_string()]);
        assert_eq!(report.issues(), vec!["job.gen.go: missing [user]".to_string()]);
        assert!(!report.passes(false));
        assert_eq!(
            report.check(false),
            Err(CoverageError::BelowThreshold {
                percent: 2.0 / 3.0 * 100.0,
                threshold: COVERAGE_THRESHOLD,
            })
        );
        assert_eq!(report.check(true), Err(CoverageError::MissingFields(1)));
    }

    #[test]
    fn empty_report_passes() {
        let report = CoverageReport::default();

        assert_eq!(report.overall_percent(), 100.0);
        assert!(report.passes(true));
    }
}
