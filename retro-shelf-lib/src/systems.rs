//! Reader for the line-oriented systems config (`es_systems.cfg`).
//!
//! ```text
//! # comment
//! NAME=nes
//! DESCNAME=Nintendo Entertainment System
//! PATH=~/ROMs/nes/
//! EXTENSION=.nes .NES
//! COMMAND=retroarch -L ~/cores/libretro-fceumm.so %ROM%
//! ```
//!
//! Keys within a block may come in any order. A key that the current block
//! already has starts the next block. Bad lines are reported and skipped;
//! they never stop the rest of the file from loading.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use retro_shelf_core::ExtensionFilter;

use crate::error::ConfigError;
use crate::launch::LaunchTemplate;
use crate::paths::AppPaths;

/// One configured game system.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    /// Short internal name, also used for the per-system gamelist directory
    pub name: String,
    /// Descriptive name for headers
    pub desc_name: String,
    /// ROM root, with `~` expanded and no trailing slash
    pub path: PathBuf,
    pub extensions: ExtensionFilter,
    pub command: LaunchTemplate,
}

/// Systems parsed from a config file, plus every recoverable problem found.
#[derive(Debug, Default)]
pub struct ParsedSystems {
    pub systems: Vec<SystemConfig>,
    pub errors: Vec<ConfigError>,
}

#[derive(Default)]
struct PendingSystem {
    line: usize,
    name: Option<String>,
    desc_name: Option<String>,
    path: Option<String>,
    extension: Option<String>,
    command: Option<String>,
}

/// The keys a system block may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    DescName,
    Path,
    Extension,
    Command,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "NAME" => Some(Field::Name),
            "DESCNAME" => Some(Field::DescName),
            "PATH" => Some(Field::Path),
            "EXTENSION" => Some(Field::Extension),
            "COMMAND" => Some(Field::Command),
            _ => None,
        }
    }
}

impl PendingSystem {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Name => &mut self.name,
            Field::DescName => &mut self.desc_name,
            Field::Path => &mut self.path,
            Field::Extension => &mut self.extension,
            Field::Command => &mut self.command,
        }
    }

    fn is_blank(&self) -> bool {
        self.name.is_none()
            && self.desc_name.is_none()
            && self.path.is_none()
            && self.extension.is_none()
            && self.command.is_none()
    }

    fn finish(self, paths: &AppPaths) -> Result<SystemConfig, ConfigError> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("NAME");
        }
        if self.path.is_none() {
            missing.push("PATH");
        }
        if self.extension.is_none() {
            missing.push("EXTENSION");
        }
        if self.command.is_none() {
            missing.push("COMMAND");
        }

        match (self.name, self.path, self.extension, self.command) {
            (Some(name), Some(path), Some(extension), Some(command)) => {
                let extensions = ExtensionFilter::parse(&extension);
                if extensions.is_empty() {
                    log::warn!("System \"{name}\" has no usable extensions in {extension:?}");
                }
                Ok(SystemConfig {
                    desc_name: self.desc_name.unwrap_or_else(|| name.clone()),
                    name,
                    path: expand_system_path(&path, paths),
                    extensions,
                    command: LaunchTemplate::new(command),
                })
            }
            (name, ..) => Err(ConfigError::MissingField {
                line: self.line,
                name: name.unwrap_or_else(|| "<unnamed>".to_string()),
                missing,
            }),
        }
    }
}

/// Strip one trailing `/` and expand a leading `~`.
fn expand_system_path(raw: &str, paths: &AppPaths) -> PathBuf {
    let trimmed = match raw.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => raw,
    };
    paths.expand_tilde(trimmed)
}

/// Parse systems from a reader.
///
/// Only I/O failures are returned as `Err`; everything else ends up in
/// [`ParsedSystems::errors`] and is logged.
pub fn parse_systems<R: BufRead>(reader: R, paths: &AppPaths) -> Result<ParsedSystems, ConfigError> {
    let mut parsed = ParsedSystems::default();
    let mut pending = PendingSystem::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim_end_matches('\r');
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            let err = ConfigError::syntax(line_no, line);
            log::error!("{err}");
            parsed.errors.push(err);
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        let Some(field) = Field::from_key(key) else {
            let err = ConfigError::UnknownKey {
                line: line_no,
                key: key.to_string(),
            };
            log::warn!("{err}");
            parsed.errors.push(err);
            continue;
        };
        // Empty values count as unset, so a blank template block is ignored.
        if value.is_empty() {
            continue;
        }

        // A key the pending block already has starts the next block.
        if pending.slot(field).is_some() {
            flush(std::mem::take(&mut pending), paths, &mut parsed);
        }
        if pending.is_blank() {
            pending.line = line_no;
        }
        *pending.slot(field) = Some(value.to_string());
    }

    if !pending.is_blank() {
        flush(pending, paths, &mut parsed);
    }

    Ok(parsed)
}

fn flush(pending: PendingSystem, paths: &AppPaths, parsed: &mut ParsedSystems) {
    match pending.finish(paths) {
        Ok(system) => parsed.systems.push(system),
        Err(err) => {
            log::warn!("{err}");
            parsed.errors.push(err);
        }
    }
}

/// Read and parse a systems config file.
pub fn load_systems(path: &Path, paths: &AppPaths) -> Result<ParsedSystems, ConfigError> {
    log::debug!("Loading system config file {}", path.display());
    let file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    parse_systems(std::io::BufReader::new(file), paths)
}

const EXAMPLE_CONFIG: &str = "\
# This is the systems configuration file.
# Lines that begin with a hash (#) are ignored, as are empty lines.
# A sample system might look like this:
#NAME=nes
#DESCNAME=Nintendo Entertainment System
#PATH=~/ROMs/nes/
#EXTENSION=.nes .NES
#COMMAND=retroarch -L ~/cores/libretro-fceumm.so %ROM%

#NAME is a short name used internally (and in alternative paths).
#DESCNAME is a descriptive name to identify the system. It may be displayed in a header.
#PATH is the path to start the recursive search for ROMs in. ~ will be expanded into the home directory.
#EXTENSION is a list of extensions to search for, separated by spaces. You MUST include the period, and it must be exact - it's case sensitive, and no wildcards.
#COMMAND is the shell command to execute when a game is selected. %ROM% will be replaced with the (shell-escaped) path to the ROM, %BASENAME% with its name without extension.

#Now try your own!
NAME=
DESCNAME=
PATH=
EXTENSION=
COMMAND=
";

/// Write the commented example config.
pub fn write_example_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, EXAMPLE_CONFIG)
}
