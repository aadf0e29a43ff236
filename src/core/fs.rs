use std::io;
use std::path::{Component, Path, PathBuf};
use std::{env, fs};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/* =========================== Path normalization ============================ */

/// Normalize a path for use as trie components: absolute, symlink-resolved
/// where possible, with `.`/`..` removed lexically for any tail that does not
/// exist yet.
#[must_use]
pub fn normalize_path(p: &Path) -> PathBuf {
    if let Ok(c) = dunce::canonicalize(p) {
        return c;
    }

    // Anchor relative paths to a canonicalized cwd.
    let cwd = env::current_dir()
        .ok()
        .map(|cd| dunce::canonicalize(&cd).unwrap_or(cd))
        .unwrap_or_else(|| PathBuf::from("."));
    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        cwd.join(p)
    };

    // Peel non-existent tail components until an existing ancestor is found,
    // canonicalize that ancestor, then reattach the tail.
    let mut cur = abs.as_path();
    let mut tail: Vec<std::ffi::OsString> = Vec::new();
    while !cur.exists() {
        match (cur.parent(), cur.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                cur = parent;
            }
            _ => break,
        }
    }
    let mut base = if cur.exists() {
        dunce::canonicalize(cur).unwrap_or_else(|_| cur.to_path_buf())
    } else {
        abs.clone()
    };
    for c in tail.iter().rev() {
        base.push(c);
    }

    let mut cleaned = PathBuf::new();
    for comp in base.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let _ = cleaned.pop();
            }
            _ => cleaned.push(comp.as_os_str()),
        }
    }
    cleaned
}

/// Split a path into owned component strings, root included.
#[must_use]
pub fn path_components(p: &Path) -> Vec<String> {
    p.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}

/* ============================ Directory reader ============================= */

/// List the names of the regular files directly inside `dir`, unordered.
///
/// This is the only place the trie touches the filesystem. A missing path,
/// a non-directory, or a directory without a single direct file are all
/// rejected here, before the trie mutates anything.
pub fn read_file_names(dir: &Path) -> Result<Vec<String>> {
    let meta = match fs::metadata(dir) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::NotFound(dir.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    if !meta.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut names = Vec::new();
    for ent in fs::read_dir(dir)? {
        let ent = ent?;
        if ent.file_type()?.is_file() {
            names.push(ent.file_name().to_string_lossy().into_owned());
        }
    }

    if names.is_empty() {
        return Err(Error::EmptyDirectory(dir.to_path_buf()));
    }
    Ok(names)
}

/// Walk `root` top-down and collect every directory (root included) that has
/// at least one direct regular file. Unreadable entries are skipped.
pub fn dirs_with_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for ent in WalkDir::new(root).follow_links(false) {
        let ent = match ent {
            Ok(e) => e,
            Err(err) => {
                log::debug!("skipping unreadable entry under {}: {err}", root.display());
                continue;
            }
        };
        if !ent.file_type().is_dir() {
            continue;
        }
        match read_file_names(ent.path()) {
            Ok(_) => found.push(ent.path().to_path_buf()),
            Err(Error::EmptyDirectory(_)) => {}
            Err(err) => return Err(err),
        }
    }
    Ok(found)
}
