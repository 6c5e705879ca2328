use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_shelf_lib::{Catalog, CatalogEntry, FolderNode};

use super::Session;
use crate::error::CliError;

pub(crate) fn run_tree(session: &Session, system: Option<&str>) -> Result<(), CliError> {
    match system {
        Some(name) => print_catalog(session.catalog(name)?),
        None => session.registry.catalogs().for_each(print_catalog),
    }
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    log::info!(
        "{} ({})",
        catalog.desc_name().if_supports_color(Stdout, |t| t.bold()),
        catalog.root_path().display(),
    );
    print_folder(catalog.root(), 1);
    log::info!("");
}

fn print_folder(folder: &FolderNode, depth: usize) {
    let indent = "  ".repeat(depth);
    for child in folder.children() {
        match child {
            CatalogEntry::Folder(sub) => {
                log::info!(
                    "{}{}/",
                    indent,
                    sub.display_name().if_supports_color(Stdout, |t| t.blue()),
                );
                print_folder(sub, depth + 1);
            }
            CatalogEntry::File(file) => {
                let record = file.metadata();
                let title = record.map(|r| r.name.as_str()).unwrap_or(file.display_name());
                let star = if record.is_some_and(|r| r.favorite) {
                    format!(" {}", "*".if_supports_color(Stdout, |t| t.yellow()))
                } else {
                    String::new()
                };
                let plays = match record.map(|r| r.play_count) {
                    Some(n) if n > 0 => format!(" ({} plays)", n)
                        .if_supports_color(Stdout, |t| t.dimmed())
                        .to_string(),
                    _ => String::new(),
                };
                log::info!("{}{}{}{}", indent, title, star, plays);
            }
        }
    }
}
