//! Launch command templates.
//!
//! A system's `COMMAND` is a template containing placeholders that are
//! replaced with values taken from the chosen file. This module only builds
//! the command; spawning it is up to the caller.

use std::path::{Path, PathBuf};

use retro_shelf_core::FileNode;
use retro_shelf_core::util::stem_of;

use crate::error::CatalogError;

/// Characters that need a backslash in a POSIX shell word.
const SHELL_SPECIAL: &[char] = &[
    ' ', '\t', '\'', '"', '\\', '!', '$', '^', '&', '*', '(', ')', '{', '}', '[', ']', '?', ';',
    '<', '>', '|', '`', '#', '~',
];

/// A substitutable token in a launch template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Absolute, resolved path of the ROM
    Rom,
    /// ROM file name without extension
    Basename,
}

impl Placeholder {
    pub const ALL: [Placeholder; 2] = [Placeholder::Rom, Placeholder::Basename];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Rom => "%ROM%",
            Placeholder::Basename => "%BASENAME%",
        }
    }
}

/// The values a template is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    path: PathBuf,
    basename: String,
}

impl LaunchTarget {
    /// Resolve a file to its canonical absolute path.
    pub fn resolve(file: &FileNode) -> Result<Self, CatalogError> {
        let path = std::fs::canonicalize(file.path()).map_err(|source| CatalogError::Unresolvable {
            path: file.path().to_path_buf(),
            source,
        })?;
        Ok(Self {
            basename: stem_of(file.path()),
            path,
        })
    }

    /// Build a target from an already-resolved path.
    pub fn from_resolved(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            basename: stem_of(&path),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    fn value(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::Rom => self.path.to_string_lossy().into_owned(),
            Placeholder::Basename => self.basename.clone(),
        }
    }
}

/// A fully substituted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    /// Command line for `sh -c`, with values shell-escaped
    pub command_line: String,
    /// First template word, for spawning without a shell
    pub program: String,
    /// Remaining words with raw (unescaped) values
    pub args: Vec<String>,
}

/// A system's launch command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTemplate {
    template: String,
}

impl LaunchTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholders that appear in the template.
    pub fn placeholders(&self) -> Vec<Placeholder> {
        Placeholder::ALL
            .into_iter()
            .filter(|p| self.template.contains(p.token()))
            .collect()
    }

    /// Substitute every placeholder occurrence.
    pub fn render(&self, target: &LaunchTarget) -> RenderedCommand {
        let command_line = substitute(&self.template, |p| shell_escape(&target.value(p)));

        let mut words = self
            .template
            .split_whitespace()
            .map(|word| substitute(word, |p| target.value(p)));
        let program = words.next().unwrap_or_default();
        let args = words.collect();

        RenderedCommand {
            command_line,
            program,
            args,
        }
    }
}

impl std::fmt::Display for LaunchTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.template)
    }
}

fn substitute(text: &str, value: impl Fn(Placeholder) -> String) -> String {
    let mut out = text.to_string();
    for placeholder in Placeholder::ALL {
        if out.contains(placeholder.token()) {
            out = out.replace(placeholder.token(), &value(placeholder));
        }
    }
    out
}

/// Backslash-escape characters a POSIX shell would interpret.
pub fn shell_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if SHELL_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
