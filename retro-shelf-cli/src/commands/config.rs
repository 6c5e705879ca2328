use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_shelf_lib::AppPaths;
use retro_shelf_lib::settings::{AppSettings, load_settings, save_settings};
use retro_shelf_lib::systems::{load_systems, write_example_config};

use crate::error::CliError;

/// Write an example systems config and default settings, leaving existing
/// files alone.
pub(crate) fn run_config_init(paths: &AppPaths) -> Result<(), CliError> {
    let systems = paths.systems_config();
    if systems.exists() {
        log::info!("{} already exists", systems.display());
    } else {
        write_example_config(&systems)?;
        log::info!(
            "Wrote example config to {}",
            systems.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }

    let settings = paths.settings_file();
    if settings.exists() {
        log::info!("{} already exists", settings.display());
    } else {
        save_settings(&settings, &AppSettings::default())?;
        log::info!(
            "Wrote default settings to {}",
            settings.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}

/// Print the config file paths.
pub(crate) fn run_config_path(paths: &AppPaths, config: Option<&Path>) {
    let systems = config.map(Path::to_path_buf).unwrap_or_else(|| paths.systems_config());
    println!("{}", systems.display());
    println!("{}", paths.settings_file().display());
}

/// Show parsed systems and the effective settings.
pub(crate) fn run_config_show(paths: &AppPaths, config: Option<&Path>) -> Result<(), CliError> {
    let systems_path = config.map(Path::to_path_buf).unwrap_or_else(|| paths.systems_config());
    let parsed = load_systems(&systems_path, paths)?;

    log::info!(
        "{} {}",
        "Systems config:".if_supports_color(Stdout, |t| t.bold()),
        systems_path.display(),
    );
    for system in &parsed.systems {
        log::info!(
            "  {} [{}]",
            system.name.if_supports_color(Stdout, |t| t.bold()),
            system.desc_name.if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Path: {}", system.path.display());
        log::info!("    Extensions: {}", system.extensions);
        log::info!("    Command: {}", system.command);
    }
    for err in &parsed.errors {
        log::info!("  {} {}", "!".if_supports_color(Stdout, |t| t.yellow()), err);
    }

    let settings_path = paths.settings_file();
    let settings = load_settings(&settings_path);
    log::info!("");
    log::info!(
        "{} {}{}",
        "Settings:".if_supports_color(Stdout, |t| t.bold()),
        settings_path.display(),
        if settings_path.exists() {
            String::new()
        } else {
            format!(" {}", "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()))
        },
    );
    log::info!("  gamelist_only: {}", settings.scan.gamelist_only);
    log::info!("  ignore_gamelist: {}", settings.scan.ignore_gamelist);
    log::info!("  prefer_rom_dir: {}", settings.gamelist.prefer_rom_dir);
    Ok(())
}
