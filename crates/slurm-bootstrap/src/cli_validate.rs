use std::path::PathBuf;

use clap::{value_parser, Arg, ArgMatches};
use slurm_core::SchemaDocument;

use crate::cli_generate::resolve_version;

pub struct ValidateCommand;

impl ValidateCommand {
    pub fn new_cmd() -> clap::Command {
        clap::Command::new("validate")
            .about("Check that an OpenAPI document can be generated from")
            .arg(
                Arg::new("spec")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
            )
    }

    pub fn exec(arg_matches: &ArgMatches) -> eyre::Result<()> {
        let spec = arg_matches
            .get_one::<PathBuf>("spec")
            .ok_or_else(|| eyre::eyre!("spec path missing"))?;

        let document = SchemaDocument::load(spec)?;
        let version = resolve_version(None, &document);

        println!(
            "{}: valid ({} schemas, version {version})",
            spec.display(),
            document.schemas.len()
        );
        for warning in &document.warnings {
            println!("  warning: {warning}");
        }

        Ok(())
    }
}
