use std::sync::Arc;

use crate::models::{ResolvedField, TypeExpr};

/// Language-specific spelling of each [`TypeExpr`] shape.
pub trait FormatTypeFuncs {
    fn format_kind_sequence(&self, representation: &str) -> String;
    fn format_kind_map(&self, representation: &str) -> String;
    fn format_kind_timestamp(&self) -> String;
    fn format_kind_any(&self) -> String;
    fn format_kind_named(&self, name: &str) -> String;
    fn format_kind_nullable(&self, representation: &str) -> String;
}

pub type DynFormatTypeFuncs = Arc<dyn FormatTypeFuncs + Send + Sync>;

pub struct CommonFunctions {
    format_type_funcs: DynFormatTypeFuncs,
}

impl CommonFunctions {
    pub fn new(funcs: DynFormatTypeFuncs) -> Self {
        Self {
            format_type_funcs: funcs,
        }
    }

    pub fn format_type(&self, t: &TypeExpr) -> String {
        match t {
            TypeExpr::Named(name) => self.format_type_funcs.format_kind_named(name),
            TypeExpr::Sequence(inner) => {
                let inner = self.format_type(inner);
                self.format_type_funcs.format_kind_sequence(&inner)
            }
            TypeExpr::Map(inner) => {
                let inner = self.format_type(inner);
                self.format_type_funcs.format_kind_map(&inner)
            }
            TypeExpr::Timestamp => self.format_type_funcs.format_kind_timestamp(),
            TypeExpr::Any => self.format_type_funcs.format_kind_any(),
        }
    }

    pub fn format_field_type(&self, field: &ResolvedField) -> String {
        let representation = self.format_type(&field.type_expr);
        if field.is_nullable() {
            self.format_type_funcs.format_kind_nullable(&representation)
        } else {
            representation
        }
    }
}
