//! The catalog tree: folders own their children, files carry metadata.
//!
//! There are no parent pointers. Code that needs a node's folder or catalog
//! looks it up by path from the root ([`FolderNode::parent_of`]).

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::metadata::MetadataRecord;
use crate::util::{is_plain_relative, stem_of};

/// A leaf of the catalog tree: one game file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    path: PathBuf,
    name: String,
    metadata: Option<MetadataRecord>,
}

impl FileNode {
    /// Create a file node named after the path's stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = stem_of(&path);
        Self {
            path,
            name,
            metadata: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Option<&MetadataRecord> {
        self.metadata.as_ref()
    }

    pub fn metadata_mut(&mut self) -> Option<&mut MetadataRecord> {
        self.metadata.as_mut()
    }

    pub fn set_metadata(&mut self, record: MetadataRecord) {
        self.metadata = Some(record);
    }

    /// Path relative to `root`, or `None` if the file lives elsewhere.
    pub fn relative_path(&self, root: &Path) -> Option<PathBuf> {
        self.path.strip_prefix(root).ok().map(Path::to_path_buf)
    }
}

/// An internal node of the catalog tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderNode {
    path: PathBuf,
    name: String,
    children: Vec<CatalogEntry>,
}

impl FolderNode {
    /// Create an empty folder named after the path's stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = stem_of(&path);
        Self::with_name(path, name)
    }

    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[CatalogEntry] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Attach a child. Returns `false` (and drops the child) if a sibling
    /// with the same path is already present.
    pub fn push(&mut self, entry: impl Into<CatalogEntry>) -> bool {
        let entry = entry.into();
        if self.children.iter().any(|c| c.path() == entry.path()) {
            return false;
        }
        self.children.push(entry);
        true
    }

    /// Remove every child, keeping the folder itself.
    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Recursive count of file descendants.
    pub fn file_count(&self) -> usize {
        self.children.iter().map(CatalogEntry::file_count).sum()
    }

    /// Depth-first iterator over every file in the tree.
    pub fn files(&self) -> Files<'_> {
        Files {
            stack: vec![self.children.iter()],
        }
    }

    /// Call `f` on every file in the tree, depth first.
    pub fn for_each_file_mut<F: FnMut(&mut FileNode)>(&mut self, f: &mut F) {
        for child in &mut self.children {
            match child {
                CatalogEntry::File(file) => f(file),
                CatalogEntry::Folder(folder) => folder.for_each_file_mut(f),
            }
        }
    }

    pub fn find_file(&self, path: &Path) -> Option<&FileNode> {
        self.files().find(|f| f.path() == path)
    }

    pub fn find_file_mut(&mut self, path: &Path) -> Option<&mut FileNode> {
        for child in &mut self.children {
            match child {
                CatalogEntry::File(file) if file.path() == path => return Some(file),
                CatalogEntry::Folder(folder) if path.starts_with(folder.path()) => {
                    if let Some(found) = folder.find_file_mut(path) {
                        return Some(found);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// The folder that directly contains the entry at `path`.
    pub fn parent_of(&self, path: &Path) -> Option<&FolderNode> {
        if self.children.iter().any(|c| c.path() == path) {
            return Some(self);
        }
        self.children.iter().find_map(|c| match c {
            CatalogEntry::Folder(folder) if path.starts_with(folder.path()) => {
                folder.parent_of(path)
            }
            _ => None,
        })
    }

    /// Insert a file below this folder, creating any missing intermediate
    /// folders. Returns `false` if the file is not under this folder (`..`
    /// components count as leaving it) or is already present.
    pub fn insert_file(&mut self, file: FileNode) -> bool {
        let relative = match file.path().strip_prefix(&self.path) {
            Ok(rel) if is_plain_relative(rel) => rel.to_path_buf(),
            _ => return false,
        };
        let mut folder = self;
        let mut components: Vec<_> = relative.components().collect();
        components.pop();
        for component in components {
            let child_path = folder.path.join(component);
            let idx = match folder
                .children
                .iter()
                .position(|c| c.is_folder() && c.path() == child_path)
            {
                Some(idx) => idx,
                None => {
                    folder.children.push(FolderNode::new(child_path).into());
                    folder.children.len() - 1
                }
            };
            folder = match &mut folder.children[idx] {
                CatalogEntry::Folder(next) => next,
                CatalogEntry::File(_) => return false,
            };
        }
        folder.push(file)
    }

    /// Drop every descendant folder that contains no files.
    pub fn prune_empty(&mut self) {
        self.children.retain_mut(|child| match child {
            CatalogEntry::Folder(folder) => {
                folder.prune_empty();
                folder.file_count() > 0
            }
            CatalogEntry::File(_) => true,
        });
    }

    /// Sort every folder's children: folders first, then files, each group
    /// by display name ignoring case.
    pub fn sort_recursive(&mut self) {
        for child in &mut self.children {
            if let CatalogEntry::Folder(folder) = child {
                folder.sort_recursive();
            }
        }
        self.children.sort_by(compare_entries);
    }
}

fn compare_entries(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| {
            a.display_name()
                .to_lowercase()
                .cmp(&b.display_name().to_lowercase())
        })
        .then_with(|| a.display_name().cmp(b.display_name()))
        .then_with(|| a.path().cmp(b.path()))
}

/// A node of the catalog tree.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEntry {
    File(FileNode),
    Folder(FolderNode),
}

impl CatalogEntry {
    pub fn path(&self) -> &Path {
        match self {
            CatalogEntry::File(f) => f.path(),
            CatalogEntry::Folder(d) => d.path(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CatalogEntry::File(f) => f.display_name(),
            CatalogEntry::Folder(d) => d.display_name(),
        }
    }

    /// 1 for a file, the recursive file count for a folder.
    pub fn file_count(&self) -> usize {
        match self {
            CatalogEntry::File(_) => 1,
            CatalogEntry::Folder(d) => d.file_count(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, CatalogEntry::Folder(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            CatalogEntry::File(f) => Some(f),
            CatalogEntry::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            CatalogEntry::Folder(d) => Some(d),
            CatalogEntry::File(_) => None,
        }
    }
}

impl From<FileNode> for CatalogEntry {
    fn from(file: FileNode) -> Self {
        CatalogEntry::File(file)
    }
}

impl From<FolderNode> for CatalogEntry {
    fn from(folder: FolderNode) -> Self {
        CatalogEntry::Folder(folder)
    }
}

/// Iterator returned by [`FolderNode::files`].
pub struct Files<'a> {
    stack: Vec<std::slice::Iter<'a, CatalogEntry>>,
}

impl<'a> Iterator for Files<'a> {
    type Item = &'a FileNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(CatalogEntry::File(file)) => return Some(file),
                Some(CatalogEntry::Folder(folder)) => self.stack.push(folder.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/tree_tests.rs"]
mod tests;
