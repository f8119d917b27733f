use genco::prelude::go;
use genco::quote;
use genco::tokens::quoted;

use super::RenderContext;
use crate::models::EnumType;
use crate::naming::enum_hint;

fn render_enum_value(ctx: &RenderContext, e: &EnumType, value: &str) -> go::Tokens {
    quote!($(ctx.naming.enum_const_name(&e.name, value)) $(&e.name) = $(quoted(value.to_string())))
}

fn render_enum_values(ctx: &RenderContext, e: &EnumType) -> go::Tokens {
    quote! {
        $(for value in &e.values join ($['\r']) => $(render_enum_value(ctx, e, value)))
    }
}

pub fn render_enum(ctx: &RenderContext, e: &EnumType) -> go::Tokens {
    let comments = ctx.comments();

    quote! {
        $(if comments {
            $(format!("// {} represents possible values for {} field.", e.name, enum_hint(&e.name)))
        })
        type $(&e.name) string

        $(if comments {
            $(format!("// {} constants.", e.name))
        })
        const (
            $(render_enum_values(ctx, e))
        )
    }
}
