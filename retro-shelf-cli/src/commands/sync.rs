use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::Session;
use crate::error::CliError;

/// Report each catalog's merge result and, unless `dry_run`, save its
/// gamelist.
pub(crate) fn run_sync(session: &mut Session, dry_run: bool) -> Result<(), CliError> {
    let mut total_pruned = 0usize;

    for catalog in session.registry.catalogs() {
        let report = catalog.last_sync();
        log::info!(
            "{}: {} matched, {} new, {} missing",
            catalog.name().if_supports_color(Stdout, |t| t.bold()),
            report.matched,
            report.created,
            report.pruned.len(),
        );
        for key in &report.pruned {
            log::info!(
                "  {} {}",
                "-".if_supports_color(Stdout, |t| t.red()),
                key.display(),
            );
        }
        for skipped in catalog.skipped() {
            log::warn!("  {}", skipped);
        }
        total_pruned += report.pruned.len();
    }

    if dry_run {
        log::info!("");
        log::info!(
            "Dry run: {} stale entries would be removed",
            total_pruned,
        );
        return Ok(());
    }

    let failures = session.registry.save_all();
    match failures.into_iter().next() {
        Some(first) => Err(first.into()),
        None => Ok(()),
    }
}
