//! `famtrack` - CLI for familytracker
//!
//! This binary hosts one in-memory tracking session, either interactively on
//! stdin or from a script file.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs::File;
use std::io::{self, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use familytracker::cli::{Cli, Command, ConfigCommand, RunCommand, SessionArgs};
use familytracker::{init_logging, Config, Error, Session};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Config commands load the configuration themselves so they can report
    // on a file that fails to load.
    match cli.command {
        Command::Session(args) => handle_session(&load_config(cli.config)?, &args),
        Command::Run(run) => handle_run(&load_config(cli.config)?, &run),
        Command::Config(config_cmd) => {
            handle_config(cli.config, config_cmd, &mut io::stdout().lock())
        }
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    Config::load_from(path).context("loading configuration")
}

fn handle_session(config: &Config, args: &SessionArgs) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let prompt = !args.no_prompt && stdin.is_terminal();

    let mut session = Session::new(config);
    session.run(stdin.lock(), &mut io::stdout().lock(), prompt)?;
    Ok(())
}

fn handle_run(config: &Config, cmd: &RunCommand) -> anyhow::Result<()> {
    let file = File::open(&cmd.script).map_err(|source| Error::ScriptRead {
        path: cmd.script.clone(),
        source,
    })?;

    let mut session = Session::new(config);
    session.run_script(BufReader::new(file), &mut io::stdout().lock(), cmd.json)?;
    Ok(())
}

fn handle_config<W: Write>(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
    out: &mut W,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(config_path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Map]")?;
                writeln!(
                    out,
                    "  Center:             {}, {}",
                    config.map.center_latitude, config.map.center_longitude
                )?;
                writeln!(out, "  Zoom:               {}", config.map.zoom)?;
                writeln!(out, "  Tile URL:           {}", config.map.tile_url)?;
                writeln!(out, "  Attribution:        {}", config.map.attribution)?;
                writeln!(out)?;
                writeln!(out, "[Forms]")?;
                writeln!(
                    out,
                    "  Reject non-numeric: {}",
                    config.forms.reject_non_numeric
                )?;
                writeln!(
                    out,
                    "  Require shelter:    {}",
                    config.forms.require_member_shelter
                )?;
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            match Config::load_from(Some(path)) {
                Ok(_) => writeln!(out, "Configuration is valid.")?,
                Err(e) => writeln!(out, "Configuration error: {e}")?,
            }
        }
    }
    Ok(())
}
