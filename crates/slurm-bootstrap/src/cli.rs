use clap::{Arg, ArgAction};

use crate::{cli_generate, cli_validate, cli_verify, logging};

pub struct Cli {
    cmd: clap::Command,
}

impl Cli {
    pub fn new() -> eyre::Result<Self> {
        Ok(Self {
            cmd: clap::Command::new("slurm-typegen")
                .about("Generates Go types from the SLURM REST API OpenAPI document")
                .subcommand_required(true)
                .arg(
                    Arg::new("verbose")
                        .long("verbose")
                        .short('v')
                        .global(true)
                        .action(ArgAction::SetTrue)
                        .help("Log per-schema decisions"),
                )
                .subcommand(cli_generate::GenerateCommand::new_cmd())
                .subcommand(cli_validate::ValidateCommand::new_cmd())
                .subcommand(cli_verify::VerifyCommand::new_cmd()),
        })
    }

    pub fn execute(self, args: &[&str]) -> eyre::Result<()> {
        let matches = self.cmd.get_matches_from(args);

        logging::default_logging(matches.get_flag("verbose"))?;

        match matches.subcommand() {
            Some(("generate", args)) => cli_generate::GenerateCommand::exec(args)?,
            Some(("validate", args)) => cli_validate::ValidateCommand::exec(args)?,
            Some(("verify", args)) => cli_verify::VerifyCommand::exec(args)?,
            _ => eyre::bail!("command missing"),
        }

        Ok(())
    }
}
