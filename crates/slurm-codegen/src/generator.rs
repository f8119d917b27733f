use std::sync::Arc;

use crate::models::GeneratedType;

pub trait Generator {
    fn file_name(&self, generated: &GeneratedType) -> String;
    fn render(&self, generated: &GeneratedType) -> eyre::Result<String>;
}

pub type DynGenerator = Arc<dyn Generator + Send + Sync>;
