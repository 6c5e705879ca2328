//! retro-shelf CLI
//!
//! Command-line front end for browsing, syncing, and launching ROM
//! collections configured in `es_systems.cfg`.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::{Level, LevelFilter};

use retro_shelf_lib::AppPaths;
use retro_shelf_lib::settings::load_settings;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Session;
use error::CliError;

/// User-facing output goes through `log::info!`, so info lines are printed
/// bare; other levels carry a prefix.
fn init_logger(quiet: bool, verbose: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
        .target(Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "[{}] {}", level, record.args()),
        })
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let paths = AppPaths::resolve()?;

    if let Commands::Config { action } = &cli.command {
        return match action {
            ConfigAction::Init => commands::config::run_config_init(&paths),
            ConfigAction::Path => {
                commands::config::run_config_path(&paths, cli.config.as_deref());
                Ok(())
            }
            ConfigAction::Show => commands::config::run_config_show(&paths, cli.config.as_deref()),
        };
    }

    let settings = load_settings(&paths.settings_file());
    let mut options = settings.scan_options();
    if cli.gamelist_only {
        options.gamelist_only = true;
    }
    if cli.ignore_gamelist {
        options.ignore_gamelist = true;
    }

    let config_path = cli.config.unwrap_or_else(|| paths.systems_config());
    let mut session = Session::open(&config_path, paths, options, cli.quiet)?;

    match cli.command {
        Commands::List => commands::list::run_list(&session),
        Commands::Tree { system } => commands::tree::run_tree(&session, system.as_deref())?,
        Commands::Sync { dry_run } => commands::sync::run_sync(&mut session, dry_run)?,
        Commands::Launch { system, path, exec } => {
            commands::launch::run_launch(&mut session, &system, &path, exec)?
        }
        Commands::Config { .. } => {}
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
