use std::fs;
use std::path::Path;

use retro_shelf_lib::scanner::scan;
use retro_shelf_lib::{CatalogEntry, FolderNode, GamelistStore, ScanError, synchronize};
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn assert_no_empty_folders(folder: &FolderNode) {
    for child in folder.children() {
        if let CatalogEntry::Folder(sub) = child {
            assert!(sub.file_count() >= 1, "empty folder {}", sub.path().display());
            assert_no_empty_folders(sub);
        }
    }
}

#[test]
fn scan_collects_matching_files_recursively() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "Mario.nes");
    touch(tmp.path(), "Zelda.NES");
    touch(tmp.path(), "notes.txt");
    touch(tmp.path(), "Hacks/Metroid (Hack).nes");
    touch(tmp.path(), "Hacks/Deeper/Kirby.nes");

    let outcome = scan(tmp.path(), ".nes .NES");
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.root.file_count(), 4);
    assert!(outcome.root.find_file(&tmp.path().join("Hacks/Deeper/Kirby.nes")).is_some());
    assert!(outcome.root.find_file(&tmp.path().join("notes.txt")).is_none());
}

#[test]
fn scan_drops_folders_without_games() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "game.nes");
    touch(tmp.path(), "images/game.png");
    fs::create_dir_all(tmp.path().join("empty/also-empty")).unwrap();
    touch(tmp.path(), "mixed/readme.txt");
    touch(tmp.path(), "mixed/sub/b.nes");

    let outcome = scan(tmp.path(), ".nes");
    let mut root = outcome.root;
    root.sort_recursive();
    let names: Vec<_> = root.children().iter().map(|c| c.display_name()).collect();
    assert_eq!(names, vec!["mixed", "game"]);
    assert_no_empty_folders(&root);
}

#[test]
fn scan_skips_empty_stems() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ".nes");
    touch(tmp.path(), ".hidden/inside.nes");
    touch(tmp.path(), "real.nes");

    let outcome = scan(tmp.path(), ".nes");
    assert_eq!(outcome.root.file_count(), 1);
}

#[test]
fn scan_of_file_root_is_not_a_directory() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "game.nes");

    let outcome = scan(&tmp.path().join("game.nes"), ".nes");
    assert_eq!(outcome.root.file_count(), 0);
    assert!(matches!(outcome.skipped.as_slice(), [ScanError::NotADirectory(_)]));
}

#[test]
fn scan_of_missing_root_is_not_a_directory() {
    let tmp = TempDir::new().unwrap();
    let outcome = scan(&tmp.path().join("missing"), ".nes");
    assert!(outcome.root.is_empty());
    assert_eq!(outcome.skipped.len(), 1);
}

#[test]
fn scan_then_merge_is_repeatable() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "b.nes");
    touch(tmp.path(), "A.nes");
    touch(tmp.path(), "sub/c.nes");
    let mut store = GamelistStore::new();
    store.insert(
        "sub/c.nes",
        retro_shelf_lib::MetadataRecord {
            favorite: true,
            ..retro_shelf_lib::MetadataRecord::for_file("Charlie")
        },
    );

    let run = || {
        let mut root = scan(tmp.path(), ".nes").root;
        synchronize(&mut root, tmp.path(), &store);
        root.sort_recursive();
        root
    };
    assert_eq!(run(), run());
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::os::unix::fs::symlink;

    #[test]
    fn link_to_ancestor_is_excluded() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "roms/game.nes");
        touch(tmp.path(), "roms/sub/other.nes");
        symlink(tmp.path().join("roms"), tmp.path().join("roms/sub/loop")).unwrap();
        symlink(tmp.path().join("roms"), tmp.path().join("roms/self")).unwrap();

        let outcome = scan(&tmp.path().join("roms"), ".nes");
        assert_eq!(outcome.root.file_count(), 2);
        let recursive = outcome
            .skipped
            .iter()
            .filter(|e| matches!(e, ScanError::RecursiveSymlink(_)))
            .count();
        assert_eq!(recursive, 2);
    }

    #[test]
    fn mutual_links_between_siblings_terminate() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "roms/a/game.nes");
        touch(tmp.path(), "roms/b/other.nes");
        symlink(tmp.path().join("roms/b"), tmp.path().join("roms/a/to_b")).unwrap();
        symlink(tmp.path().join("roms/a"), tmp.path().join("roms/b/to_a")).unwrap();

        let outcome = scan(&tmp.path().join("roms"), ".nes");
        // Each sibling is walked once directly and once through the other's link.
        assert_eq!(outcome.root.file_count(), 4);
        let recursive = outcome
            .skipped
            .iter()
            .filter(|e| matches!(e, ScanError::RecursiveSymlink(_)))
            .count();
        assert_eq!(recursive, 2);
    }

    #[test]
    fn link_to_outside_directory_is_followed() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "roms/game.nes");
        touch(tmp.path(), "shared/extra.nes");
        symlink(tmp.path().join("shared"), tmp.path().join("roms/shared")).unwrap();

        let outcome = scan(&tmp.path().join("roms"), ".nes");
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.root.file_count(), 2);
        assert!(
            outcome
                .root
                .find_file(&tmp.path().join("roms/shared/extra.nes"))
                .is_some()
        );
    }

    #[test]
    fn recursive_root_is_rejected() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "roms/game.nes");
        let root = tmp.path().join("roms/again");
        symlink(tmp.path().join("roms"), &root).unwrap();

        let outcome = scan(&root, ".nes");
        assert_eq!(outcome.root.file_count(), 0);
        assert!(matches!(outcome.skipped.as_slice(), [ScanError::RecursiveSymlink(_)]));
    }

    #[test]
    fn unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "ok.nes");
        touch(tmp.path(), "locked/hidden.nes");
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits; nothing to test there.
        let can_read = fs::read_dir(&locked).is_ok();
        let outcome = scan(tmp.path(), ".nes");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !can_read {
            assert_eq!(outcome.root.file_count(), 1);
            assert!(matches!(
                outcome.skipped.as_slice(),
                [ScanError::UnreadableEntry { .. }]
            ));
        }
    }
}
