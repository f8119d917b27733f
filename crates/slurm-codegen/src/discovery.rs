use std::collections::{BTreeMap, BTreeSet, VecDeque};

use slurm_core::SchemaNode;

use crate::config::TypeConfig;
use crate::models::TypeExpr;
use crate::predicates::{is_array, is_deprecated_stub, is_reference};
use crate::resolver::primitive_type;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiscoveryResult {
    /// Schema name -> type name of every struct that must be generated.
    pub to_generate: BTreeMap<String, String>,
    /// Schemas replaced at each use site instead of being generated.
    pub substitutions: BTreeMap<String, TypeExpr>,
}

/// Breadth-first closure over `$ref`s starting from `base`.
///
/// Each schema is expanded at most once and references are visited in
/// sorted order, so the result is stable for a given document.
pub fn discover(
    schemas: &BTreeMap<String, SchemaNode>,
    base: &BTreeMap<String, String>,
    config: &TypeConfig,
) -> DiscoveryResult {
    let mut discovery = Discovery {
        schemas,
        config,
        result: DiscoveryResult {
            to_generate: base.clone(),
            substitutions: BTreeMap::new(),
        },
        visited: BTreeSet::new(),
        queue: base.keys().cloned().collect(),
    };

    while let Some(name) = discovery.queue.pop_front() {
        if !discovery.visited.insert(name.clone()) {
            continue;
        }

        let Some(schema) = schemas.get(&name) else {
            tracing::debug!(schema = %name, "queued schema is not in the document");
            continue;
        };

        for ref_name in schema.refs() {
            discovery.visit_ref(&ref_name);
        }
    }

    tracing::info!(
        types = discovery.result.to_generate.len(),
        substitutions = discovery.result.substitutions.len(),
        "discovery finished"
    );

    discovery.result
}

struct Discovery<'a> {
    schemas: &'a BTreeMap<String, SchemaNode>,
    config: &'a TypeConfig,
    result: DiscoveryResult,
    visited: BTreeSet<String>,
    queue: VecDeque<String>,
}

impl Discovery<'_> {
    fn visit_ref(&mut self, ref_name: &str) {
        if self.visited.contains(ref_name)
            || self.result.to_generate.contains_key(ref_name)
            || self.result.substitutions.contains_key(ref_name)
            || self.config.matches_primitive_pattern(ref_name)
        {
            return;
        }

        let schemas = self.schemas;
        match schemas.get(ref_name) {
            Some(target) if is_deprecated_stub(target) => {
                tracing::debug!(schema = ref_name, "deprecated stub replaced by interface{{}}");
                self.substitute(ref_name, TypeExpr::Any);
            }
            Some(target) if is_array(target) => {
                let expr = self.array_substitution(target);
                self.substitute(ref_name, expr);
            }
            _ => self.schedule(ref_name),
        }
    }

    fn array_substitution(&mut self, array: &SchemaNode) -> TypeExpr {
        let Some(items) = array.items.as_deref() else {
            return TypeExpr::sequence(TypeExpr::Any);
        };

        if let Some(item) = items.ref_name().filter(|_| is_reference(items)) {
            return TypeExpr::sequence(self.item_type(item));
        }

        if items.type_name().is_some() {
            return TypeExpr::sequence(primitive_type(items, "", self.config));
        }

        TypeExpr::sequence(TypeExpr::Any)
    }

    fn item_type(&mut self, item: &str) -> TypeExpr {
        if let Some(replacement) = self.config.primitive_replacement(item) {
            return replacement.clone();
        }
        if let Some(substitution) = self.result.substitutions.get(item) {
            return substitution.clone();
        }

        let schemas = self.schemas;
        match schemas.get(item) {
            Some(target) if is_deprecated_stub(target) || is_array(target) => TypeExpr::Any,
            _ => {
                self.schedule(item);
                let name = self
                    .result
                    .to_generate
                    .get(item)
                    .cloned()
                    .unwrap_or_else(|| self.config.friendly_name(item));
                TypeExpr::Named(name)
            }
        }
    }

    fn substitute(&mut self, name: &str, expr: TypeExpr) {
        self.result.substitutions.insert(name.to_string(), expr);
    }

    fn schedule(&mut self, name: &str) {
        if self.result.to_generate.contains_key(name) {
            return;
        }

        let friendly = self.config.friendly_name(name);
        tracing::debug!(schema = name, type_name = %friendly, "discovered struct");
        self.result.to_generate.insert(name.to_string(), friendly);
        self.queue.push_back(name.to_string());
    }
}
