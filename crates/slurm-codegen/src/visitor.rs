use std::collections::{BTreeMap, BTreeSet};

use slurm_core::{SchemaDocument, SchemaNode};

use crate::config::TypeConfig;
use crate::discovery::discover;
use crate::models::TypeExpr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WorkSetMode {
    /// Base entities plus the configured auxiliary types.
    #[default]
    Static,
    /// Base entities plus everything they reference.
    Discover,
    /// Request-body entities, reusing enums from the read model.
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkItem {
    pub schema_name: String,
    pub type_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkSet {
    pub items: Vec<WorkItem>,
    pub substitutions: BTreeMap<String, TypeExpr>,
    pub known_enum_types: BTreeSet<String>,
}

impl WorkSet {
    pub fn plan(document: &SchemaDocument, config: &TypeConfig, mode: WorkSetMode) -> Self {
        let base = config.base_schemas();

        let work_set = match mode {
            WorkSetMode::Static => {
                let mut all = config.auxiliary_schemas();
                all.extend(base.clone());
                Self {
                    items: ordered_items(&base, all),
                    ..Self::default()
                }
            }
            WorkSetMode::Discover => {
                let discovered = discover(&document.schemas, &base, config);
                Self {
                    items: ordered_items(&base, discovered.to_generate),
                    substitutions: discovered.substitutions,
                    ..Self::default()
                }
            }
            WorkSetMode::Write => Self {
                items: ordered_items(&BTreeMap::new(), config.write_schemas()),
                known_enum_types: config.known_enum_types.clone(),
                ..Self::default()
            },
        };

        tracing::info!(?mode, units = work_set.items.len(), "planned work set");
        work_set
    }

    pub fn friendly_names(&self) -> BTreeMap<String, String> {
        self.items
            .iter()
            .map(|item| (item.schema_name.clone(), item.type_name.clone()))
            .collect()
    }
}

/// Base entities first, then the rest, each group sorted by schema name.
fn ordered_items(base: &BTreeMap<String, String>, all: BTreeMap<String, String>) -> Vec<WorkItem> {
    let (first, rest): (Vec<_>, Vec<_>) = all
        .into_iter()
        .partition(|(schema_name, _)| base.contains_key(schema_name));

    first
        .into_iter()
        .chain(rest)
        .map(|(schema_name, type_name)| WorkItem {
            schema_name,
            type_name,
        })
        .collect()
}

pub struct Visitor<'a> {
    pub document: &'a SchemaDocument,
    pub work_set: &'a WorkSet,
}

impl Visitor<'_> {
    /// Calls `visit` for every work item present in the document and returns
    /// how many were visited. Absent schemas are skipped with a warning.
    pub fn run<F>(&self, mut visit: F) -> eyre::Result<usize>
    where
        F: FnMut(&WorkItem, &SchemaNode) -> eyre::Result<()>,
    {
        let mut visited = 0;

        for item in &self.work_set.items {
            let Some(node) = self.document.schema(&item.schema_name) else {
                tracing::warn!(
                    schema = %item.schema_name,
                    type_name = %item.type_name,
                    "schema not found in document, skipping"
                );
                continue;
            };

            visit(item, node)?;
            visited += 1;
        }

        Ok(visited)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;

    fn document() -> SchemaDocument {
        let raw = json!({
            "info": {"version": "0.0.44"},
            "components": {"schemas": {
                "v0.0.44_node": {"type": "object", "properties": {
                    "energy": {"$ref": "#/components/schemas/v0.0.44_acct_gather_energy"},
                    "gres": {"$ref": "#/components/schemas/v0.0.44_gres_list"}
                }},
                "v0.0.44_acct_gather_energy": {"type": "object", "properties": {"watts": {"type": "integer"}}},
                "v0.0.44_gres_list": {"type": "array", "items": {"type": "string"}}
            }}
        });
        SchemaDocument::from_value(raw, "spec.json").unwrap()
    }

    fn config() -> TypeConfig {
        let mut config = TypeConfig::defaults("0.0.44");
        config.base_entities = BTreeMap::from([("node".to_string(), "Node".to_string())]);
        config.auxiliary_types = BTreeMap::from([("coord".to_string(), "Coord".to_string())]);
        config
    }

    #[test]
    fn static_plan_puts_base_first() {
        let work_set = WorkSet::plan(&document(), &config(), WorkSetMode::Static);

        assert_eq!(
            work_set
                .items
                .iter()
                .map(|i| i.type_name.as_str())
                .collect::<Vec<_>>(),
            vec!["Node", "Coord"]
        );
        assert!(work_set.known_enum_types.is_empty());
    }

    #[test]
    fn discover_plan_carries_substitutions() {
        let work_set = WorkSet::plan(&document(), &config(), WorkSetMode::Discover);

        assert_eq!(
            work_set.friendly_names(),
            BTreeMap::from([
                ("v0.0.44_acct_gather_energy".to_string(), "NodeEnergy".to_string()),
                ("v0.0.44_node".to_string(), "Node".to_string()),
            ])
        );
        assert_eq!(work_set.items[0].type_name, "Node");
        assert_eq!(
            work_set.substitutions.get("v0.0.44_gres_list"),
            Some(&TypeExpr::sequence(TypeExpr::named("string")))
        );
    }

    #[test]
    fn write_plan_uses_known_enums() {
        let work_set = WorkSet::plan(&document(), &config(), WorkSetMode::Write);

        assert_eq!(work_set.items[0].type_name, "JobCreate");
        assert!(work_set.known_enum_types.contains("JobState"));
    }

    #[test]
    #[traced_test]
    fn missing_schemas_are_skipped_with_warning() {
        let document = document();
        let work_set = WorkSet::plan(&document, &config(), WorkSetMode::Static);
        let mut seen = Vec::new();

        let visited = Visitor {
            document: &document,
            work_set: &work_set,
        }
        .run(|item, _| {
            seen.push(item.type_name.clone());
            Ok(())
        })
        .unwrap();

        assert_eq!(visited, 1);
        assert_eq!(seen, vec!["Node".to_string()]);
        assert!(logs_contain("schema not found in document, skipping"));
    }
}
