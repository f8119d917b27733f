pub mod format;
pub mod templates;

use std::sync::Arc;

use eyre::Context;
use genco::fmt;
use genco::lang::Go;
use genco::prelude::go;

use crate::functions::CommonFunctions;
use crate::generator::Generator;
use crate::models::{GeneratedType, OutputFormat};
use crate::naming::{file_name, NamingRules};

use self::format::FormatTypeFunc;
use self::templates::file_tmpl::render_file;
use self::templates::RenderContext;

pub const DEFAULT_PACKAGE: &str = "api";
pub const DEFAULT_LICENSE: &str = "Apache-2.0";

pub struct GoGenerator {
    naming: NamingRules,
    format: OutputFormat,
    package: String,
    license: Option<String>,
}

impl GoGenerator {
    pub fn new(naming: NamingRules) -> Self {
        Self {
            naming,
            format: OutputFormat::default(),
            package: DEFAULT_PACKAGE.into(),
            license: Some(DEFAULT_LICENSE.into()),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    pub fn with_license(mut self, license: Option<String>) -> Self {
        self.license = license;
        self
    }
}

impl Generator for GoGenerator {
    fn file_name(&self, generated: &GeneratedType) -> String {
        file_name(&generated.type_name)
    }

    fn render(&self, generated: &GeneratedType) -> eyre::Result<String> {
        let funcs = CommonFunctions::new(Arc::new(FormatTypeFunc));
        let ctx = RenderContext {
            funcs: &funcs,
            naming: &self.naming,
            format: self.format,
        };

        let tokens = render_file(&ctx, generated, &self.package, self.license.as_deref());
        to_gofmt_string(&tokens).context("could not render to file string")
    }
}

/// Tab indentation, as gofmt writes it.
fn to_gofmt_string(tokens: &go::Tokens) -> std::result::Result<String, std::fmt::Error> {
    let fmt = fmt::Config::from_lang::<Go>().with_indentation(fmt::Indentation::Tab);
    let config = go::Config::default();

    let mut w = fmt::FmtWriter::new(String::new());
    tokens.format_file(&mut w.as_formatter(&fmt), &config)?;

    Ok(w.into_inner())
}
