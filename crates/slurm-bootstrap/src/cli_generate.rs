use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{value_parser, Arg, ArgAction, ArgMatches};
use eyre::Context;
use slurm_codegen::go::{GoGenerator, DEFAULT_PACKAGE};
use slurm_codegen::{generate, EnumRegistry, GeneratedFile, OutputFormat, TypeConfig, WorkSetMode};
use slurm_core::version::DEFAULT_VERSION;
use slurm_core::SchemaDocument;

pub const DEFAULT_CONFIG_PATH: &str = "type_config.yaml";

pub struct GenerateCommand;

impl GenerateCommand {
    pub fn new_cmd() -> clap::Command {
        clap::Command::new("generate")
            .about("Generate Go types from an OpenAPI document")
            .disable_version_flag(true)
            .arg(
                Arg::new("spec")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("Path to the OpenAPI JSON document"),
            )
            .arg(
                Arg::new("output_dir")
                    .value_parser(value_parser!(PathBuf))
                    .required_unless_present_any(["validate-only", "dry-run"])
                    .help("Directory the generated files are written to"),
            )
            .arg(
                Arg::new("version")
                    .long("version")
                    .help("API version, detected from the schema names when omitted"),
            )
            .arg(config_arg())
            .arg(
                Arg::new("dry-run")
                    .long("dry-run")
                    .action(ArgAction::SetTrue)
                    .help("List the files that would be generated"),
            )
            .arg(
                Arg::new("discover")
                    .long("discover")
                    .action(ArgAction::SetTrue)
                    .help("Generate every struct reachable from the base entities"),
            )
            .arg(
                Arg::new("validate-only")
                    .long("validate-only")
                    .action(ArgAction::SetTrue)
                    .help("Validate the document and stop"),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_parser(["full", "compact", "minimal"])
                    .default_value("full"),
            )
            .arg(
                Arg::new("write-types")
                    .long("write-types")
                    .action(ArgAction::SetTrue)
                    .conflicts_with("discover")
                    .help("Generate request-body types instead of the read model"),
            )
            .arg(
                Arg::new("package")
                    .long("package")
                    .default_value(DEFAULT_PACKAGE)
                    .help("Go package name of the generated files"),
            )
    }

    pub fn exec(arg_matches: &ArgMatches) -> eyre::Result<()> {
        let spec = arg_matches
            .get_one::<PathBuf>("spec")
            .ok_or_else(|| eyre::eyre!("spec path missing"))?;

        let document = SchemaDocument::load(spec)?;
        tracing::info!(path = %spec.display(), schemas = document.schemas.len(), "loaded schema document");

        if arg_matches.get_flag("validate-only") {
            println!("{}: valid ({} schemas)", spec.display(), document.schemas.len());
            return Ok(());
        }

        let version = resolve_version(arg_matches.get_one::<String>("version"), &document);
        let config = TypeConfig::load(config_path(arg_matches), &version)?;

        let mode = if arg_matches.get_flag("write-types") {
            WorkSetMode::Write
        } else if arg_matches.get_flag("discover") {
            WorkSetMode::Discover
        } else {
            WorkSetMode::Static
        };

        let format = arg_matches
            .get_one::<String>("format")
            .map(|f| f.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default();
        let package = arg_matches
            .get_one::<String>("package")
            .map(String::as_str)
            .unwrap_or(DEFAULT_PACKAGE);

        let generator = GoGenerator::new(config.naming.clone())
            .with_format(format)
            .with_package(package);
        let mut registry = EnumRegistry::new();
        let files = generate(&document, &config, mode, Arc::new(generator), &mut registry)?;

        if arg_matches.get_flag("dry-run") {
            for file in &files {
                println!("{} ({}, {} fields)", file.file_name, file.type_name, file.field_count);
            }
            return Ok(());
        }

        let output_dir = arg_matches
            .get_one::<PathBuf>("output_dir")
            .ok_or_else(|| eyre::eyre!("output directory missing"))?;
        write_files(output_dir, &files)?;

        println!("Generated {} files in {}", files.len(), output_dir.display());

        Ok(())
    }
}

pub fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .default_value(DEFAULT_CONFIG_PATH)
        .help("Type configuration document, built-in tables are used when absent")
}

pub fn config_path(arg_matches: &ArgMatches) -> Option<&Path> {
    arg_matches.get_one::<PathBuf>("config").map(PathBuf::as_path)
}

/// `--version` wins, then the schema-name prefix, then the default.
pub fn resolve_version(requested: Option<&String>, document: &SchemaDocument) -> String {
    let version = match requested {
        Some(version) => version.clone(),
        None => document.detected_version().unwrap_or_else(|| {
            tracing::warn!(default = DEFAULT_VERSION, "could not detect API version");
            DEFAULT_VERSION.to_string()
        }),
    };

    if let Some(declared) = document.declared_version() {
        if declared != version {
            tracing::info!(declared, version = %version, "document info.version differs from schema version");
        }
    }

    version
}

fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> eyre::Result<()> {
    std::fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("failed to create {}", output_dir.display()))?;

    for file in files {
        let path = output_dir.join(&file.file_name);
        std::fs::write(&path, &file.contents)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), fields = file.field_count, "wrote file");
    }

    Ok(())
}
