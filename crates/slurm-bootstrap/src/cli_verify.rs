use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches};
use slurm_codegen::coverage::{coverage_mappings, verify_coverage, CoverageReport};
use slurm_codegen::TypeConfig;
use slurm_core::SchemaDocument;

use crate::cli_generate::{config_arg, config_path, resolve_version};

pub struct VerifyCommand;

impl VerifyCommand {
    pub fn new_cmd() -> clap::Command {
        clap::Command::new("verify")
            .about("Compare generated struct tags against the schema properties")
            .arg(
                Arg::new("spec")
                    .long("spec")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("types-dir")
                    .long("types-dir")
                    .required(true)
                    .value_parser(value_parser!(PathBuf)),
            )
            .arg(
                Arg::new("strict")
                    .long("strict")
                    .action(ArgAction::SetTrue)
                    .help("Fail when any type misses a field"),
            )
            .arg(config_arg())
    }

    pub fn exec(arg_matches: &ArgMatches) -> eyre::Result<()> {
        let spec = arg_matches
            .get_one::<PathBuf>("spec")
            .ok_or_else(|| eyre::eyre!("spec path missing"))?;
        let types_dir = arg_matches
            .get_one::<PathBuf>("types-dir")
            .ok_or_else(|| eyre::eyre!("types directory missing"))?;

        let document = SchemaDocument::load(spec)?;
        let version = resolve_version(None, &document);
        let config = TypeConfig::load(config_path(arg_matches), &version)?;

        let report = verify_coverage(&document, types_dir, &coverage_mappings(&config))?;
        print!("{}", render_report(&version, &report));

        report.check(arg_matches.get_flag("strict"))?;

        Ok(())
    }
}

fn render_report(version: &str, report: &CoverageReport) -> String {
    let mut out = format!("Field coverage for API {version}\n");

    for unit in &report.units {
        out.push_str(&format!(
            "  {:<28} {:>3}/{:<3} {:>6.1}%\n",
            unit.file_name,
            unit.matched,
            unit.total,
            unit.percent()
        ));
    }
    for skipped in &report.skipped {
        out.push_str(&format!("  skipped {skipped}\n"));
    }

    out.push_str(&format!(
        "Overall: {}/{} fields ({:.1}%)\n",
        report.matched_fields(),
        report.total_fields(),
        report.overall_percent()
    ));
    for issue in report.issues() {
        out.push_str(&format!("  {issue}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slurm_codegen::coverage::UnitCoverage;

    use super::*;

    #[test]
    fn report_lists_units_and_gaps() {
        let report = CoverageReport {
            units: vec![UnitCoverage {
                file_name: "job.gen.go".into(),
                schema_name: "v0.0.44_job_info".into(),
                matched: 1,
                total: 2,
                missing: vec!["user".into()],
            }],
            skipped: vec!["qos.gen.go: not found".into()],
        };

        let rendered = render_report("0.0.44", &report);

        assert_eq!(
            rendered.lines().collect::<Vec<_>>(),
            vec![
                "Field coverage for API 0.0.44",
                "  job.gen.go                     1/2     50.0%",
                "  skipped qos.gen.go: not found",
                "Overall: 1/2 fields (50.0%)",
                "  job.gen.go: missing [user]",
            ]
        );
    }
}
