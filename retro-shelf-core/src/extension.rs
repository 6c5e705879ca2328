//! Extension-list matching for catalog membership.
//!
//! A system's extension list is a single configuration string such as
//! `.nes .NES`. Tokens are separated by single spaces and compared to a
//! file's extension by exact, case-sensitive equality.

use std::path::Path;

use crate::util::split_file_name;

/// Parsed extension list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Parse a space-delimited extension list.
    ///
    /// Empty tokens (from doubled or trailing spaces) are skipped. Tokens
    /// that do not start with a period can never match an extension and are
    /// dropped.
    pub fn parse(list: &str) -> Self {
        let mut extensions = Vec::new();
        for token in list.split(' ') {
            if token.is_empty() {
                continue;
            }
            if !token.starts_with('.') {
                log::debug!("Ignoring extension token without leading period: {token:?}");
                continue;
            }
            if !extensions.iter().any(|e| e == token) {
                extensions.push(token.to_string());
            }
        }
        Self { extensions }
    }

    /// The accepted extensions, in configuration order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Check whether a file name belongs in the catalog.
    ///
    /// Files with an empty stem (`.nes`) never match.
    pub fn matches(&self, file_name: &str) -> bool {
        let (stem, extension) = split_file_name(file_name);
        if stem.is_empty() || extension.is_empty() {
            return false;
        }
        self.extensions.iter().any(|e| e == extension)
    }

    /// [`matches`](Self::matches) applied to the last component of a path.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name()
            .map(|n| self.matches(&n.to_string_lossy()))
            .unwrap_or(false)
    }
}

impl std::fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extensions.join(" "))
    }
}

/// Match a file name against an unparsed extension list.
pub fn matches(file_name: &str, extension_list: &str) -> bool {
    ExtensionFilter::parse(extension_list).matches(file_name)
}
