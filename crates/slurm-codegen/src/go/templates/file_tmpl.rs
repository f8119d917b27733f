use genco::prelude::go;
use genco::quote;
use genco::tokens::quoted;

use super::enum_tmpl::render_enum;
use super::struct_tmpl::render_struct;
use super::RenderContext;
use crate::models::GeneratedType;

pub const BANNER: &str = "// Code generated by slurm-typegen from OpenAPI spec. DO NOT EDIT.";

/// A struct, every type nested in it and the enums it introduced.
pub fn render_unit(ctx: &RenderContext, t: &GeneratedType) -> go::Tokens {
    quote! {
        $(render_struct(ctx, t))
        $(for nested in &t.nested => $['\n']$(render_unit(ctx, nested)))
        $(for e in &t.enums => $['\n']$(render_enum(ctx, e)))
    }
}

pub fn render_file(ctx: &RenderContext, t: &GeneratedType, package: &str, license: Option<&str>) -> go::Tokens {
    let spdx = license.map(|license| format!("// SPDX-License-Identifier: {license}"));

    quote! {
        $BANNER
        $spdx

        package $package

        $(if t.uses_timestamp() {
            import $(quoted("time"))
        })

        $(render_unit(ctx, t))
    }
}
