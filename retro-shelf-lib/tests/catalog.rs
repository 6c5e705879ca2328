use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use retro_shelf_lib::{
    AppPaths, Catalog, CatalogError, CatalogRegistry, CatalogState, ExtensionFilter,
    GamelistStore, LaunchTemplate, ScanOptions, SystemConfig,
};
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

struct Fixture {
    _tmp: TempDir,
    home: PathBuf,
    roms: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let roms = tmp.path().join("roms").join("nes");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&roms).unwrap();
        Self {
            _tmp: tmp,
            home,
            roms,
        }
    }

    fn paths(&self) -> AppPaths {
        AppPaths::with_home(&self.home)
    }

    fn config(&self, name: &str) -> SystemConfig {
        SystemConfig {
            name: name.to_string(),
            desc_name: format!("{name} system"),
            path: self.roms.clone(),
            extensions: ExtensionFilter::parse(".nes"),
            command: LaunchTemplate::new("emu %ROM%"),
        }
    }

    fn gamelist(&self, name: &str) -> PathBuf {
        self.home
            .join(".emulationstation")
            .join(name)
            .join("gamelist.xml")
    }

    fn write_gamelist(&self, name: &str, xml: &str) {
        let path = self.gamelist(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, xml).unwrap();
    }
}

const GAMELIST: &str = r#"<?xml version="1.0"?>
<gameList>
  <game>
    <path>./A.nes</path>
    <name>Alpha</name>
    <desc>meta1</desc>
    <favorite>true</favorite>
  </game>
  <game>
    <path>./C.nes</path>
    <name>Gamma</name>
    <desc>meta3</desc>
  </game>
</gameList>
"#;

#[test]
fn open_scans_merges_and_sorts() {
    let fx = Fixture::new();
    touch(&fx.roms, "B.nes");
    touch(&fx.roms, "A.nes");
    touch(&fx.roms, "zeta/z.nes");
    fx.write_gamelist("nes", GAMELIST);

    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(catalog.state(), CatalogState::Ready);
    assert_eq!(catalog.file_count(), 3);

    let names: Vec<_> = catalog.root().children().iter().map(|c| c.display_name()).collect();
    assert_eq!(names, vec!["zeta", "A", "B"]);

    let a = catalog.find_file(&fx.roms.join("A.nes")).unwrap().metadata().unwrap();
    assert_eq!(a.name, "Alpha");
    assert!(a.favorite);
    let b = catalog.find_file(&fx.roms.join("B.nes")).unwrap().metadata().unwrap();
    assert_eq!(b.name, "B");
    assert!(b.description.is_none());

    assert_eq!(catalog.last_sync().pruned, vec![PathBuf::from("C.nes")]);
    // Pruned entries stay in memory until the next save.
    assert!(catalog.store().contains(Path::new("C.nes")));
}

#[test]
fn save_drops_pruned_entries_and_is_stable() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    touch(&fx.roms, "B.nes");
    fx.write_gamelist("nes", GAMELIST);

    let mut catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(catalog.save().unwrap(), 1);
    let first = fs::read_to_string(fx.gamelist("nes")).unwrap();
    assert!(first.contains("./A.nes"));
    assert!(first.contains("./B.nes"));
    assert!(!first.contains("./C.nes"));

    let mut again = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(again.save().unwrap(), 0);
    let second = fs::read_to_string(fx.gamelist("nes")).unwrap();
    assert_eq!(first, second);

    let store = GamelistStore::load(&fx.gamelist("nes"), &fx.roms).unwrap();
    assert_eq!(&store, again.store());
}

#[test]
fn metadata_survives_rescan() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let played = NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap();

    let mut catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    let a = fx.roms.join("A.nes");
    catalog.record_play(&a, played).unwrap();
    assert!(catalog.toggle_favorite(&a).unwrap());
    catalog.save().unwrap();

    touch(&fx.roms, "new.nes");
    let reopened = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    let record = reopened.find_file(&a).unwrap().metadata().unwrap();
    assert_eq!(record.play_count, 1);
    assert_eq!(record.last_played, Some(played));
    assert!(record.favorite);
    assert_eq!(reopened.last_sync().created, 1);
}

#[test]
fn reload_keeps_unsaved_metadata() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let a = fx.roms.join("A.nes");

    let mut catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    catalog.toggle_favorite(&a).unwrap();
    touch(&fx.roms, "B.nes");
    catalog.reload();

    assert_eq!(catalog.state(), CatalogState::Ready);
    assert_eq!(catalog.file_count(), 2);
    assert!(catalog.find_file(&a).unwrap().metadata().unwrap().favorite);
}

#[test]
fn unloaded_catalog_refuses_launch_and_save() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let mut catalog = Catalog::new(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(catalog.state(), CatalogState::Unloaded);

    assert!(matches!(
        catalog.launch_target(&fx.roms.join("A.nes")),
        Err(CatalogError::NotReady { .. })
    ));
    assert!(matches!(catalog.save(), Err(CatalogError::NotReady { .. })));

    catalog.load();
    assert!(catalog.launch_target(&fx.roms.join("A.nes")).is_ok());
}

#[test]
fn launch_command_uses_resolved_path() {
    let fx = Fixture::new();
    touch(&fx.roms, "Super Mario.nes");
    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());

    let rendered = catalog.launch_command(&fx.roms.join("Super Mario.nes")).unwrap();
    let resolved = fs::canonicalize(fx.roms.join("Super Mario.nes")).unwrap();
    assert_eq!(rendered.program, "emu");
    assert_eq!(rendered.args, vec![resolved.to_string_lossy().into_owned()]);
    assert!(rendered.command_line.ends_with("Super\\ Mario.nes"));

    assert!(matches!(
        catalog.launch_command(&fx.roms.join("missing.nes")),
        Err(CatalogError::UnknownFile { .. })
    ));
}

#[test]
fn locate_accepts_non_normalized_paths() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    touch(&fx.roms, "zeta/z.nes");
    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());

    let a = fx.roms.join("A.nes");
    assert_eq!(catalog.locate(&a), Some(a.as_path()));
    assert_eq!(catalog.locate(&fx.roms.join("zeta/../A.nes")), Some(a.as_path()));
    assert_eq!(catalog.locate(&fx.roms.join("missing.nes")), None);
}

#[cfg(unix)]
#[test]
fn locate_through_symlinked_root() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let link = fx.home.join("nes-link");
    std::os::unix::fs::symlink(&fx.roms, &link).unwrap();
    let mut config = fx.config("nes");
    config.path = link.clone();

    let catalog = Catalog::open(config, &fx.paths(), ScanOptions::default());
    let expected = link.join("A.nes");
    assert_eq!(catalog.locate(&fx.roms.join("A.nes")), Some(expected.as_path()));
    assert!(catalog.launch_command(&expected).is_ok());
}

#[test]
fn malformed_gamelist_falls_back_to_defaults() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    fx.write_gamelist("nes", "<gameList><game><path>./A.nes</path>");

    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(catalog.state(), CatalogState::Ready);
    let a = catalog.find_file(&fx.roms.join("A.nes")).unwrap().metadata().unwrap();
    assert_eq!(a.name, "A");
}

#[test]
fn ignore_gamelist_attaches_defaults_and_never_writes() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    fx.write_gamelist("nes", GAMELIST);
    let options = ScanOptions {
        ignore_gamelist: true,
        ..ScanOptions::default()
    };

    let mut catalog = Catalog::open(fx.config("nes"), &fx.paths(), options);
    let a = catalog.find_file(&fx.roms.join("A.nes")).unwrap().metadata().unwrap();
    assert_eq!(a.name, "A");
    assert!(catalog.last_sync().pruned.is_empty());

    assert_eq!(catalog.save().unwrap(), 0);
    assert_eq!(fs::read_to_string(fx.gamelist("nes")).unwrap(), GAMELIST);
}

#[test]
fn gamelist_only_builds_tree_from_entries() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    touch(&fx.roms, "unlisted.nes");
    fx.write_gamelist("nes", GAMELIST);
    let options = ScanOptions {
        gamelist_only: true,
        ..ScanOptions::default()
    };

    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), options);
    assert_eq!(catalog.file_count(), 1);
    assert!(catalog.find_file(&fx.roms.join("unlisted.nes")).is_none());
    assert_eq!(catalog.last_sync().pruned, vec![PathBuf::from("C.nes")]);
}

#[test]
fn gamelist_entries_outside_root_are_dropped() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    touch(&fx.roms, "../other/X.nes");
    fx.write_gamelist(
        "nes",
        "<gameList><game><path>./A.nes</path></game>\
         <game><path>../other/X.nes</path><name>Escapee</name></game></gameList>",
    );
    let options = ScanOptions {
        gamelist_only: true,
        ..ScanOptions::default()
    };

    let mut catalog = Catalog::open(fx.config("nes"), &fx.paths(), options);
    let names: Vec<_> = catalog.root().children().iter().map(|c| c.display_name()).collect();
    assert_eq!(names, vec!["A"]);

    catalog.save().unwrap();
    let saved = fs::read_to_string(fx.gamelist("nes")).unwrap();
    assert!(saved.contains("<path>./A.nes</path>"));
    assert!(!saved.contains("other"));
    assert!(!saved.contains("Escapee"));
}

#[test]
fn gamelist_beside_roms_is_preferred() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    fs::write(fx.roms.join("gamelist.xml"), GAMELIST).unwrap();

    let catalog = Catalog::open(fx.config("nes"), &fx.paths(), ScanOptions::default());
    assert_eq!(catalog.gamelist_path(), fx.roms.join("gamelist.xml"));
    let a = catalog.find_file(&fx.roms.join("A.nes")).unwrap().metadata().unwrap();
    assert_eq!(a.name, "Alpha");
}

#[test]
fn registry_discards_empty_catalogs() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let mut empty = fx.config("empty");
    empty.path = fx.home.join("no-roms-here");

    let mut registry = CatalogRegistry::from_configs(
        vec![fx.config("nes"), empty],
        fx.paths(),
        ScanOptions::default(),
    );
    assert_eq!(registry.names(), vec!["nes"]);
    assert!(registry.get("empty").is_none());

    let a = fx.roms.join("A.nes");
    assert_eq!(registry.catalog_for(&a).unwrap().name(), "nes");
    assert!(registry.get_mut("nes").unwrap().toggle_favorite(&a).unwrap());
    assert!(registry.save_all().is_empty());
    assert!(fx.gamelist("nes").exists());

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn registry_reload_picks_up_new_systems() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let mut late = fx.config("late");
    late.path = fx.home.join("late-roms");
    late.extensions = ExtensionFilter::parse(".gb");

    let mut registry = CatalogRegistry::from_configs(
        vec![fx.config("nes"), late],
        fx.paths(),
        ScanOptions::default(),
    );
    assert_eq!(registry.len(), 1);

    touch(&fx.home, "late-roms/Tetris.gb");
    registry.reload();
    assert_eq!(registry.names(), vec!["nes", "late"]);
}

#[test]
fn registry_loads_config_file() {
    let fx = Fixture::new();
    touch(&fx.roms, "A.nes");
    let cfg = fx.home.join(".emulationstation").join("es_systems.cfg");
    fs::create_dir_all(cfg.parent().unwrap()).unwrap();
    fs::write(
        &cfg,
        format!(
            "NAME=nes\nPATH={}/\nEXTENSION=.nes\nCOMMAND=emu %ROM%\nbogus line\n",
            fx.roms.display()
        ),
    )
    .unwrap();

    let registry = CatalogRegistry::load(&cfg, fx.paths(), ScanOptions::default()).unwrap();
    assert_eq!(registry.names(), vec!["nes"]);
    assert_eq!(registry.get("nes").unwrap().root_path(), fx.roms.as_path());
}
