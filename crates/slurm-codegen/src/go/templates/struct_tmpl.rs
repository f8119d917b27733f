use genco::prelude::go;
use genco::quote;

use super::RenderContext;
use crate::models::{GeneratedType, OutputFormat, ResolvedField};
use crate::utility::{clip, non_empty};

const COMPACT_COMMENT_LENGTH: usize = 40;

fn render_type_comment(ctx: &RenderContext, t: &GeneratedType) -> Option<String> {
    if !ctx.comments() {
        return None;
    }

    let name = &t.type_name;
    if t.nested_unit {
        Some(format!("// {name} is a nested type within its parent."))
    } else {
        Some(format!("// {name} represents a SLURM {name}."))
    }
}

fn render_field_comment(ctx: &RenderContext, field: &ResolvedField) -> Option<String> {
    let description = non_empty(&field.description)?;

    match ctx.format {
        OutputFormat::Minimal => None,
        OutputFormat::Compact => Some(format!("// {}", clip(description, COMPACT_COMMENT_LENGTH))),
        OutputFormat::Full => Some(format!("// {description}")),
    }
}

fn render_tag(field: &ResolvedField) -> String {
    let omit = if field.required { "" } else { ",omitempty" };
    format!("`json:\"{}{omit}\"`", field.wire_name)
}

pub fn render_field(ctx: &RenderContext, field: &ResolvedField) -> go::Tokens {
    quote! {
        $(&field.ident) $(ctx.funcs.format_field_type(field)) $(render_tag(field)) $(render_field_comment(ctx, field))
    }
}

pub fn render_struct(ctx: &RenderContext, t: &GeneratedType) -> go::Tokens {
    quote! {
        $(render_type_comment(ctx, t))
        type $(&t.type_name) struct {
            $(for field in &t.fields join ($['\r']) => $(render_field(ctx, field)))
        }
    }
}
