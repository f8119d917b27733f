use std::collections::BTreeSet;

use slurm_core::SchemaNode;

use crate::enum_registry::EnumRegistry;
use crate::models::{GeneratedType, ResolvedField, TypeExpr};
use crate::naming::truncate_description;
use crate::predicates::{is_array_of_inline_objects, is_inline_object, is_map_of_inline_objects};
use crate::resolver::{FieldRef, ResolveContext, TypeResolver};

pub const MAX_NESTING_DEPTH: usize = 16;

/// Where an inline object sits inside a property.
enum Inline<'n> {
    Direct(&'n SchemaNode),
    Items(&'n SchemaNode),
    Values(&'n SchemaNode),
}

impl<'n> Inline<'n> {
    fn of(prop: &'n SchemaNode) -> Option<Self> {
        if is_inline_object(prop) {
            return Some(Self::Direct(prop));
        }
        if is_array_of_inline_objects(prop) {
            return prop.items.as_deref().map(Self::Items);
        }
        if is_map_of_inline_objects(prop) {
            return prop
                .additional_properties
                .as_ref()
                .and_then(|extra| extra.schema())
                .map(Self::Values);
        }
        None
    }

    fn object(&self) -> &'n SchemaNode {
        match self {
            Self::Direct(node) | Self::Items(node) | Self::Values(node) => node,
        }
    }

    fn wrap(&self, inner: TypeExpr) -> TypeExpr {
        match self {
            Self::Direct(_) => inner,
            Self::Items(_) => TypeExpr::sequence(inner),
            Self::Values(_) => TypeExpr::map(inner),
        }
    }
}

/// Builds [`GeneratedType`]s for one run. Nested type names are unique for
/// the lifetime of the generator.
pub struct TypeGenerator<'a> {
    ctx: ResolveContext<'a>,
    resolver: TypeResolver,
    used_names: BTreeSet<String>,
    max_depth: usize,
}

impl<'a> TypeGenerator<'a> {
    pub fn new(ctx: ResolveContext<'a>) -> Self {
        let used_names = ctx.friendly_names.values().cloned().collect();

        Self {
            ctx,
            resolver: TypeResolver::default(),
            used_names,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    pub fn with_resolver(mut self, resolver: TypeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn generate(
        &mut self,
        schema_name: &str,
        schema: &SchemaNode,
        type_name: &str,
        registry: &mut EnumRegistry,
    ) -> GeneratedType {
        self.used_names.insert(type_name.to_string());
        let generated = self.generate_at(schema_name, schema, type_name, 0, registry);

        tracing::debug!(
            schema = schema_name,
            type_name,
            fields = generated.fields.len(),
            nested = generated.nested.len(),
            enums = generated.enums.len(),
            "generated type"
        );

        generated
    }

    fn generate_at(
        &mut self,
        schema_name: &str,
        schema: &SchemaNode,
        type_name: &str,
        depth: usize,
        registry: &mut EnumRegistry,
    ) -> GeneratedType {
        let required = schema.required.iter().map(String::as_str).collect::<BTreeSet<_>>();
        let config = self.ctx.config;

        let mut fields = Vec::with_capacity(schema.properties.len());
        let mut nested = Vec::new();
        let mut enums = Vec::new();

        for (wire_name, prop) in &schema.properties {
            let ident = config.naming.field_name(wire_name);

            let type_expr = match Inline::of(prop) {
                Some(inline) => {
                    // Enums registered so far belong to this type, not the nested one.
                    enums.extend(registry.take_pending());

                    let inner = self.nested_type(
                        schema_name,
                        type_name,
                        wire_name,
                        &ident,
                        inline.object(),
                        depth,
                        registry,
                        &mut nested,
                    );
                    inline.wrap(inner)
                }
                None => {
                    let field = FieldRef {
                        owner_type: type_name,
                        wire_name,
                    };
                    self.resolver.resolve(prop, field, &self.ctx, registry)
                }
            };

            fields.push(ResolvedField {
                ident,
                type_expr,
                wire_name: wire_name.clone(),
                required: required.contains(wire_name.as_str()),
                description: truncate_description(
                    prop.summary(),
                    config.description_max_length,
                    config.description_min_cutoff,
                ),
            });
        }

        enums.extend(registry.take_pending());
        enums.sort_by(|a, b| a.name.cmp(&b.name));

        GeneratedType {
            type_name: type_name.to_string(),
            schema_name: schema_name.to_string(),
            fields,
            nested,
            enums,
            field_count: schema.properties.len(),
            nested_unit: depth > 0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn nested_type(
        &mut self,
        schema_name: &str,
        type_name: &str,
        wire_name: &str,
        ident: &str,
        object: &SchemaNode,
        depth: usize,
        registry: &mut EnumRegistry,
        nested: &mut Vec<GeneratedType>,
    ) -> TypeExpr {
        if depth + 1 > self.max_depth {
            tracing::warn!(
                schema = schema_name,
                field = wire_name,
                max_depth = self.max_depth,
                "inline object nesting too deep, using map[string]interface{{}}"
            );
            return TypeExpr::map(TypeExpr::Any);
        }

        let nested_name = self.unique_name(format!("{type_name}{ident}"));
        let nested_schema = format!("{schema_name}_{wire_name}");

        let generated = self.generate_at(&nested_schema, object, &nested_name, depth + 1, registry);
        nested.push(generated);

        TypeExpr::Named(nested_name)
    }

    fn unique_name(&mut self, base: String) -> String {
        let name = if self.used_names.contains(&base) {
            (2..)
                .map(|n| format!("{base}{n}"))
                .find(|candidate| !self.used_names.contains(candidate))
                .unwrap_or_else(|| base.clone())
        } else {
            base
        };

        self.used_names.insert(name.clone());
        name
    }
}
