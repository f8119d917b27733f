pub mod enum_tmpl;
pub mod file_tmpl;
pub mod struct_tmpl;

use crate::functions::CommonFunctions;
use crate::models::OutputFormat;
use crate::naming::NamingRules;

pub struct RenderContext<'a> {
    pub funcs: &'a CommonFunctions,
    pub naming: &'a NamingRules,
    pub format: OutputFormat,
}

impl RenderContext<'_> {
    pub fn comments(&self) -> bool {
        self.format != OutputFormat::Minimal
    }
}
