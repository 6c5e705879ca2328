use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::Session;

pub(crate) fn run_list(session: &Session) {
    log::info!("Configured systems:");
    log::info!("");

    for catalog in session.registry.catalogs() {
        log::info!(
            "  {} [{}] {} games",
            catalog.name().if_supports_color(Stdout, |t| t.bold()),
            catalog.desc_name().if_supports_color(Stdout, |t| t.cyan()),
            catalog.file_count(),
        );
        log::info!("    Path: {}", catalog.root_path().display());
        log::info!("    Extensions: {}", catalog.config().extensions);
        log::info!("    Gamelist: {}", catalog.gamelist_path().display());
        if !catalog.skipped().is_empty() {
            log::info!(
                "    {}",
                format!("{} folder(s) skipped", catalog.skipped().len())
                    .if_supports_color(Stdout, |t| t.yellow()),
            );
        }
    }
}
