use std::process::ExitCode;

use cli::Cli;
use slurm_codegen::{ConfigError, CoverageError};
use slurm_core::{SpecError, ValidationError};

pub mod cli;
mod cli_generate;
mod cli_validate;
mod cli_verify;
mod logging;

fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("failed to install error reporting: {err}");
    }

    let args = std::env::args();
    let args = args.collect::<Vec<String>>();
    let args = args.iter().map(|s| s.as_str()).collect::<Vec<&str>>();

    match Cli::new().and_then(|cli| cli.execute(args.as_slice())) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(exit_status(&err))
        }
    }
}

/// 2 for unusable schema documents, 3 for config problems, 1 otherwise.
fn exit_status(err: &eyre::Report) -> u8 {
    for cause in err.chain() {
        if cause.is::<SpecError>() || cause.is::<ValidationError>() {
            return 2;
        }
        if cause.is::<ConfigError>() {
            return 3;
        }
        if cause.is::<CoverageError>() {
            return 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_follows_error_kind() {
        let spec = eyre::Report::new(SpecError::Invalid(ValidationError {
            source_name: "spec.json".into(),
            violations: vec!["Missing 'components' section".into()],
        }));
        let config = eyre::Report::new(ConfigError::InvalidEnumOverrideKey("state".into()))
            .wrap_err("failed to load config");
        let coverage = eyre::Report::new(CoverageError::MissingFields(2));

        assert_eq!(exit_status(&spec), 2);
        assert_eq!(exit_status(&config), 3);
        assert_eq!(exit_status(&coverage), 1);
        assert_eq!(exit_status(&eyre::eyre!("anything else")), 1);
    }
}
