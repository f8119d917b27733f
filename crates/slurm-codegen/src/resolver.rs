use std::collections::BTreeMap;
use std::sync::Arc;

use slurm_core::SchemaNode;

use crate::config::TypeConfig;
use crate::enum_registry::EnumRegistry;
use crate::models::TypeExpr;
use crate::predicates::{has_enum, is_array, is_inline_object, is_map_object, is_reference};

/// Everything a rule may consult besides the node itself.
pub struct ResolveContext<'a> {
    pub config: &'a TypeConfig,
    /// Work-set schema name -> type name.
    pub friendly_names: &'a BTreeMap<String, String>,
    /// Inline substitutions found by discovery.
    pub substitutions: &'a BTreeMap<String, TypeExpr>,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRef<'a> {
    pub owner_type: &'a str,
    pub wire_name: &'a str,
}

pub trait TypeRule {
    fn name(&self) -> &'static str;

    fn predicate(&self, node: &SchemaNode, field: FieldRef, ctx: &ResolveContext) -> bool;

    fn resolve(
        &self,
        resolver: &TypeResolver,
        node: &SchemaNode,
        field: FieldRef,
        ctx: &ResolveContext,
        registry: &mut EnumRegistry,
    ) -> TypeExpr;
}

pub type DynTypeRule = Arc<dyn TypeRule + Send + Sync>;
pub type TypeRules = Vec<DynTypeRule>;

/// Ordered rule chain; the first rule whose predicate holds decides the type.
pub struct TypeResolver {
    rules: TypeRules,
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(TimestampWrapper),
            Arc::new(UnwrapTable),
            Arc::new(SchemaRef),
            Arc::new(Array),
            Arc::new(InlineObject),
            Arc::new(MapObject),
            Arc::new(Enumeration),
            Arc::new(Primitive),
        ])
    }
}

impl TypeResolver {
    pub fn new(rules: TypeRules) -> Self {
        Self { rules }
    }

    pub fn matching_rule(&self, node: &SchemaNode, field: FieldRef, ctx: &ResolveContext) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.predicate(node, field, ctx))
            .map(|rule| rule.name())
    }

    pub fn resolve(
        &self,
        node: &SchemaNode,
        field: FieldRef,
        ctx: &ResolveContext,
        registry: &mut EnumRegistry,
    ) -> TypeExpr {
        match self.rules.iter().find(|rule| rule.predicate(node, field, ctx)) {
            Some(rule) => rule.resolve(self, node, field, ctx, registry),
            None => TypeExpr::Any,
        }
    }
}

/// Maps a declared primitive type and format. Shared with discovery.
pub fn primitive_type(node: &SchemaNode, wire_name: &str, config: &TypeConfig) -> TypeExpr {
    match node.format.as_deref() {
        Some("int64") => return TypeExpr::named("int64"),
        Some("uint32") => return TypeExpr::named("uint32"),
        Some("uint16") => return TypeExpr::named("uint16"),
        Some("uint64") if config.is_timestamp_field(wire_name) => return TypeExpr::Timestamp,
        Some("uint64") => return TypeExpr::named("uint64"),
        Some("date-time") => return TypeExpr::Timestamp,
        _ => {}
    }

    match node.type_name() {
        Some("string") => TypeExpr::named("string"),
        Some("integer") => TypeExpr::named("int32"),
        Some("number") => TypeExpr::named("float64"),
        Some("boolean") => TypeExpr::named("bool"),
        _ => TypeExpr::Any,
    }
}

fn ref_name(node: &SchemaNode) -> &str {
    node.ref_name().unwrap_or_default()
}

/// Optional-numeric or 64-bit wrappers referenced by timestamp fields.
pub struct TimestampWrapper;

impl TypeRule for TimestampWrapper {
    fn name(&self) -> &'static str {
        "timestamp-wrapper"
    }

    fn predicate(&self, node: &SchemaNode, field: FieldRef, ctx: &ResolveContext) -> bool {
        if !is_reference(node) || !ctx.config.is_timestamp_field(field.wire_name) {
            return false;
        }
        let lower = ref_name(node).to_lowercase();
        lower.contains("uint64") || lower.contains("no_val")
    }

    fn resolve(&self, _: &TypeResolver, _: &SchemaNode, _: FieldRef, _: &ResolveContext, _: &mut EnumRegistry) -> TypeExpr {
        TypeExpr::Timestamp
    }
}

pub struct UnwrapTable;

impl UnwrapTable {
    fn lookup<'a>(node: &SchemaNode, ctx: &'a ResolveContext) -> Option<&'a TypeExpr> {
        let name = node.ref_name()?;
        ctx.substitutions
            .get(name)
            .or_else(|| ctx.config.unwrap_for(name))
            .or_else(|| ctx.config.primitive_replacement(name))
    }
}

impl TypeRule for UnwrapTable {
    fn name(&self) -> &'static str {
        "unwrap-table"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, ctx: &ResolveContext) -> bool {
        Self::lookup(node, ctx).is_some()
    }

    fn resolve(&self, _: &TypeResolver, node: &SchemaNode, _: FieldRef, ctx: &ResolveContext, _: &mut EnumRegistry) -> TypeExpr {
        Self::lookup(node, ctx).cloned().unwrap_or(TypeExpr::Any)
    }
}

pub struct SchemaRef;

impl TypeRule for SchemaRef {
    fn name(&self) -> &'static str {
        "schema-ref"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        is_reference(node)
    }

    fn resolve(&self, _: &TypeResolver, node: &SchemaNode, _: FieldRef, ctx: &ResolveContext, _: &mut EnumRegistry) -> TypeExpr {
        let name = ref_name(node);
        match ctx.friendly_names.get(name) {
            Some(type_name) => TypeExpr::named(type_name.clone()),
            None => TypeExpr::named(ctx.config.friendly_name(name)),
        }
    }
}

pub struct Array;

impl TypeRule for Array {
    fn name(&self) -> &'static str {
        "array"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        is_array(node)
    }

    fn resolve(
        &self,
        resolver: &TypeResolver,
        node: &SchemaNode,
        field: FieldRef,
        ctx: &ResolveContext,
        registry: &mut EnumRegistry,
    ) -> TypeExpr {
        let Some(items) = node.items.as_deref() else {
            return TypeExpr::sequence(TypeExpr::Any);
        };

        if let Some(labels) = items.enum_labels() {
            let name = registry.resolve(ctx.config, field.owner_type, field.wire_name, &labels);
            return TypeExpr::sequence(TypeExpr::Named(name));
        }

        if is_reference(items) || items.type_name().is_some() {
            return TypeExpr::sequence(resolver.resolve(items, field, ctx, registry));
        }

        TypeExpr::sequence(TypeExpr::Any)
    }
}

/// Object with its own properties; the generator emits a nested type for it.
pub struct InlineObject;

impl TypeRule for InlineObject {
    fn name(&self) -> &'static str {
        "inline-object"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        is_inline_object(node)
    }

    fn resolve(&self, _: &TypeResolver, _: &SchemaNode, field: FieldRef, ctx: &ResolveContext, _: &mut EnumRegistry) -> TypeExpr {
        TypeExpr::Named(ctx.config.naming.field_name(field.wire_name))
    }
}

pub struct MapObject;

impl TypeRule for MapObject {
    fn name(&self) -> &'static str {
        "map-object"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        is_map_object(node)
    }

    fn resolve(
        &self,
        resolver: &TypeResolver,
        node: &SchemaNode,
        field: FieldRef,
        ctx: &ResolveContext,
        registry: &mut EnumRegistry,
    ) -> TypeExpr {
        let value = node
            .additional_properties
            .as_ref()
            .and_then(|extra| extra.schema())
            .filter(|schema| is_reference(schema) || schema.type_name().is_some());

        match value {
            Some(schema) => TypeExpr::map(resolver.resolve(schema, field, ctx, registry)),
            None => TypeExpr::map(TypeExpr::Any),
        }
    }
}

pub struct Enumeration;

impl TypeRule for Enumeration {
    fn name(&self) -> &'static str {
        "enum"
    }

    fn predicate(&self, node: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        has_enum(node)
    }

    fn resolve(
        &self,
        _: &TypeResolver,
        node: &SchemaNode,
        field: FieldRef,
        ctx: &ResolveContext,
        registry: &mut EnumRegistry,
    ) -> TypeExpr {
        let labels = node.enum_labels().unwrap_or_default();
        TypeExpr::Named(registry.resolve(ctx.config, field.owner_type, field.wire_name, &labels))
    }
}

pub struct Primitive;

impl TypeRule for Primitive {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn predicate(&self, _: &SchemaNode, _: FieldRef, _: &ResolveContext) -> bool {
        true
    }

    fn resolve(&self, _: &TypeResolver, node: &SchemaNode, field: FieldRef, ctx: &ResolveContext, _: &mut EnumRegistry) -> TypeExpr {
        primitive_type(node, field.wire_name, ctx.config)
    }
}
