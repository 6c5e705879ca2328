use std::path::{Component, Path};

/// Split a file name into its stem and extension at the last period.
///
/// The extension keeps its leading period. Unlike [`Path::file_stem`], a
/// leading period is not treated as part of the stem, so `.nes` splits into
/// an empty stem and the extension `.nes`. `.` and `..` have no extension.
pub fn split_file_name(name: &str) -> (&str, &str) {
    if name == "." || name == ".." {
        return (name, "");
    }
    match name.rfind('.') {
        Some(pos) => name.split_at(pos),
        None => (name, ""),
    }
}

/// Stem of the last component of `path`, using [`split_file_name`] rules.
///
/// Returns an empty string for paths without a final component.
pub fn stem_of(path: &Path) -> String {
    path.file_name()
        .map(|n| split_file_name(&n.to_string_lossy()).0.to_string())
        .unwrap_or_default()
}

/// Whether `path` is a non-empty relative path made only of plain names.
///
/// `..`, `.`, roots and prefixes are all rejected, so a path that passes
/// can be joined onto a directory without leaving it.
pub fn is_plain_relative(path: &Path) -> bool {
    let mut components = path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_file_name() {
        assert_eq!(split_file_name("game.nes"), ("game", ".nes"));
        assert_eq!(split_file_name("Zelda (USA).v1.1.sfc"), ("Zelda (USA).v1.1", ".sfc"));
        assert_eq!(split_file_name("README"), ("README", ""));
        assert_eq!(split_file_name("trailing."), ("trailing", "."));
    }

    #[test]
    fn test_dotfiles_have_empty_stem() {
        assert_eq!(split_file_name(".nes"), ("", ".nes"));
        assert_eq!(split_file_name(".git"), ("", ".git"));
    }

    #[test]
    fn test_dot_entries() {
        assert_eq!(split_file_name("."), (".", ""));
        assert_eq!(split_file_name(".."), ("..", ""));
    }

    #[test]
    fn test_plain_relative_paths() {
        assert!(is_plain_relative(Path::new("Mario.nes")));
        assert!(is_plain_relative(Path::new("Hacks/Metroid (Hack).nes")));
        assert!(!is_plain_relative(Path::new("../other/X.nes")));
        assert!(!is_plain_relative(Path::new("sub/../X.nes")));
        assert!(!is_plain_relative(Path::new("/roms/nes/X.nes")));
        assert!(!is_plain_relative(Path::new("")));
    }

    #[test]
    fn test_stem_of_path() {
        assert_eq!(stem_of(Path::new("/roms/nes/Mario.nes")), "Mario");
        assert_eq!(stem_of(Path::new("/roms/nes/Disc Set.m3u")), "Disc Set");
        assert_eq!(stem_of(Path::new("/")), "");
    }
}
