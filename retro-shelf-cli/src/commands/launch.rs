use std::path::Path;
use std::process::Command;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_shelf_lib::CatalogError;

use super::Session;
use crate::error::CliError;

/// Print the launch command for `path`; with `exec`, run it, count the play,
/// and save the gamelist.
pub(crate) fn run_launch(session: &mut Session, system: &str, path: &Path, exec: bool) -> Result<(), CliError> {
    let catalog = session.catalog_mut(system)?;
    let path = catalog
        .locate(path)
        .map(Path::to_path_buf)
        .ok_or_else(|| CatalogError::unknown_file(system, path))?;
    let rendered = catalog.launch_command(&path)?;

    if !exec {
        log::info!("{}", rendered.command_line);
        return Ok(());
    }

    log::info!(
        "Launching {}",
        rendered.command_line.if_supports_color(Stdout, |t| t.cyan()),
    );
    let status = Command::new("sh")
        .arg("-c")
        .arg(&rendered.command_line)
        .status()
        .map_err(|e| CliError::launch(format!("{}: {}", rendered.program, e)))?;

    catalog.record_play(&path, chrono::Local::now().naive_local())?;
    catalog.save()?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::launch(format!("{} exited with {}", rendered.program, status)))
    }
}
