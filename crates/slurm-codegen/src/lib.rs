pub mod config;
pub mod coverage;
pub mod discovery;
pub mod enum_registry;
pub mod errors;
mod functions;
mod generator;
pub mod go;
pub mod models;
pub mod naming;
mod predicates;
pub mod resolver;
pub mod typegen;
pub mod utility;
pub mod visitor;

use eyre::Context;
use slurm_core::SchemaDocument;

pub use self::config::TypeConfig;
pub use self::enum_registry::EnumRegistry;
pub use self::errors::{ConfigError, CoverageError};
pub use self::functions::{CommonFunctions, DynFormatTypeFuncs, FormatTypeFuncs};
pub use self::generator::{DynGenerator, Generator};
pub use self::models::{GeneratedFile, OutputFormat};
pub use self::visitor::WorkSetMode;

use self::resolver::ResolveContext;
use self::typegen::TypeGenerator;
use self::visitor::{Visitor, WorkSet};

/// Generates one file per work-set schema found in `document`.
///
/// `registry` is reset first, so enums never leak between runs.
pub fn generate(
    document: &SchemaDocument,
    config: &TypeConfig,
    mode: WorkSetMode,
    generator: DynGenerator,
    registry: &mut EnumRegistry,
) -> eyre::Result<Vec<GeneratedFile>> {
    let work_set = WorkSet::plan(document, config, mode);
    registry.reset(work_set.known_enum_types.clone());

    let friendly_names = work_set.friendly_names();
    let mut typegen = TypeGenerator::new(ResolveContext {
        config,
        friendly_names: &friendly_names,
        substitutions: &work_set.substitutions,
    });

    let mut files = Vec::new();
    Visitor {
        document,
        work_set: &work_set,
    }
    .run(|item, node| {
        let generated = typegen.generate(&item.schema_name, node, &item.type_name, registry);
        let contents = generator
            .render(&generated)
            .wrap_err_with(|| format!("failed to render {}", item.type_name))?;

        files.push(GeneratedFile {
            file_name: generator.file_name(&generated),
            type_name: generated.type_name,
            schema_name: generated.schema_name,
            field_count: generated.field_count,
            contents,
        });

        Ok(())
    })?;

    tracing::info!(units = files.len(), enums = registry.len(), "generation finished");

    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::go::GoGenerator;

    #[test]
    fn generates_one_file_per_schema() {
        let raw = json!({
            "info": {"version": "0.0.44"},
            "components": {"schemas": {
                "v0.0.44_node": {"type": "object", "required": ["name"], "properties": {
                    "name": {"type": "string"},
                    "state": {"type": "array", "items": {"type": "string", "enum": ["IDLE", "DOWN"]}}
                }},
                "v0.0.44_qos": {"type": "object", "properties": {"name": {"type": "string"}}}
            }}
        });
        let document = SchemaDocument::from_value(raw, "spec.json").unwrap();
        let config = TypeConfig::defaults("0.0.44");
        let generator = Arc::new(GoGenerator::new(config.naming.clone()));
        let mut registry = EnumRegistry::new();

        let files = generate(&document, &config, WorkSetMode::Static, generator, &mut registry).unwrap();

        assert_eq!(
            files.iter().map(|f| f.file_name.as_str()).collect::<Vec<_>>(),
            vec!["node.gen.go", "qos.gen.go"]
        );
        assert!(files[0].contents.contains("State []NodeState `json:\"state,omitempty\"`"));
        assert!(files[0].contents.contains("type NodeState string"));
        assert_eq!(registry.len(), 1);
    }
}
