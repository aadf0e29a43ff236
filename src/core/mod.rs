use std::path::PathBuf;

/// A file name paired with the directory that contains it, as produced by a
/// flattening traversal of the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub dir: PathBuf,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}

mod affix;
mod cluster;
mod fs;
mod report;
mod settings;
mod trie;

pub use affix::*;
pub use cluster::*;
pub use fs::*;
pub use report::*;
pub use settings::*;
pub use trie::*;
