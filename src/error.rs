use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the core tree and clustering operations.
///
/// Tree mutations never fail halfway: any error leaves the trie exactly as it
/// was before the call.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A path that does not exist, or a node handle that no longer refers to
    /// a live node.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("'{}' is not a folder", .0.display())]
    NotADirectory(PathBuf),

    #[error("'{}' does not contain any file", .0.display())]
    EmptyDirectory(PathBuf),

    /// An internal ordering or arena lookup produced an impossible shape.
    /// The operation was aborted before mutating the tree.
    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}
